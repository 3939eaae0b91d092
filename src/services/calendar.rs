use chrono::Duration;

use crate::models::Booking;

/// Escapes text for an iCalendar property value.
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

fn vevent(booking: &Booking, venue_name: &str) -> String {
    // The venue is held for the whole day.
    let dtstart = booking.date.format("%Y%m%d").to_string();
    let dtend = (booking.date + Duration::days(1)).format("%Y%m%d").to_string();
    let uid = format!("{}@venuebook", booking.id);

    let summary = escape(&format!("{} at {}", booking.event_type, venue_name));
    let mut description = format!(
        "{} ({}), {} guests, starts {}, status {}",
        booking.client_name,
        booking.client_email,
        booking.guests,
        booking.time.format("%H:%M"),
        booking.status,
    );
    if !booking.notes.is_empty() {
        description.push_str(". ");
        description.push_str(&booking.notes);
    }
    let description = escape(&description);

    format!(
        "BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTART;VALUE=DATE:{dtstart}\r\n\
         DTEND;VALUE=DATE:{dtend}\r\n\
         SUMMARY:{summary}\r\n\
         DESCRIPTION:{description}\r\n\
         END:VEVENT\r\n"
    )
}

fn calendar(events: String) -> String {
    format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Venuebook//Venue Bookings//EN\r\n\
         {events}\
         END:VCALENDAR\r\n"
    )
}

pub fn generate_ics(booking: &Booking, venue_name: &str) -> String {
    calendar(vevent(booking, venue_name))
}

pub fn generate_feed<'a>(bookings: impl IntoIterator<Item = &'a Booking>, venue_name: &str) -> String {
    calendar(
        bookings
            .into_iter()
            .map(|b| vevent(b, venue_name))
            .collect::<String>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;
    use chrono::{NaiveDate, NaiveTime};

    fn booking(id: &str, date: &str, notes: &str) -> Booking {
        Booking {
            id: id.to_string(),
            client_name: "Alice Johnson".to_string(),
            client_email: "alice@example.com".to_string(),
            event_type: "Wedding".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            guests: 150,
            status: BookingStatus::Confirmed,
            notes: notes.to_string(),
            payment: 5000.0,
            version: 1,
        }
    }

    #[test]
    fn test_generate_ics() {
        let ics = generate_ics(&booking("B001", "2024-08-15", "Needs a vegetarian menu."), "The Soul Garden");
        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.contains("BEGIN:VEVENT"));
        assert!(ics.contains("DTSTART;VALUE=DATE:20240815"));
        assert!(ics.contains("DTEND;VALUE=DATE:20240816"));
        assert!(ics.contains("SUMMARY:Wedding at The Soul Garden"));
        assert!(ics.contains("150 guests\\, starts 14:00"));
        assert!(ics.contains("Needs a vegetarian menu."));
        assert!(ics.contains("UID:B001@venuebook"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn test_generate_ics_month_end() {
        let ics = generate_ics(&booking("B009", "2024-12-31", ""), "Venue");
        assert!(ics.contains("DTSTART;VALUE=DATE:20241231"));
        assert!(ics.contains("DTEND;VALUE=DATE:20250101"));
        assert!(ics.contains("status Confirmed\r\n"));
    }

    #[test]
    fn test_generate_feed() {
        let bookings = vec![booking("B001", "2024-08-15", ""), booking("B002", "2024-08-20", "")];
        let feed = generate_feed(&bookings, "Venue");
        assert_eq!(feed.matches("BEGIN:VEVENT").count(), 2);
        assert_eq!(feed.matches("BEGIN:VCALENDAR").count(), 1);
    }
}
