use anyhow::Context;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::Connection;

use crate::db::queries;
use crate::models::{
    Booking, BookingStatus, CampRegistration, EventCategory, PastEvent, PaymentStatus,
    StallRegistration, StallSize, Testimonial,
};

/// Loads the demo venue data. A store that already holds bookings is left alone.
pub fn seed_demo_data(conn: &Connection) -> anyhow::Result<bool> {
    if queries::count_bookings(conn)? > 0 {
        return Ok(false);
    }

    for booking in demo_bookings()? {
        queries::insert_booking(conn, &booking)
            .with_context(|| format!("failed to seed booking {}", booking.id))?;
    }
    for event in demo_past_events() {
        queries::insert_past_event(conn, &event)?;
    }
    for testimonial in demo_testimonials() {
        queries::insert_testimonial(conn, &testimonial)?;
    }
    for stall in demo_stalls() {
        queries::insert_stall(conn, &stall)?;
    }
    for camp in demo_camps() {
        queries::insert_camp(conn, &camp)?;
    }

    tracing::info!("seeded demo venue data");
    Ok(true)
}

#[allow(clippy::too_many_arguments)]
fn booking(
    id: &str,
    client_name: &str,
    client_email: &str,
    event_type: &str,
    date: &str,
    time: &str,
    guests: u32,
    status: BookingStatus,
    notes: &str,
    payment: f64,
) -> anyhow::Result<Booking> {
    Ok(Booking {
        id: id.to_string(),
        client_name: client_name.to_string(),
        client_email: client_email.to_string(),
        event_type: event_type.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d")?,
        time: NaiveTime::parse_from_str(time, "%H:%M")?,
        guests,
        status,
        notes: notes.to_string(),
        payment,
        version: 1,
    })
}

fn demo_bookings() -> anyhow::Result<Vec<Booking>> {
    use BookingStatus::*;

    Ok(vec![
        booking("B001", "Alice Johnson", "alice@example.com", "Wedding", "2024-08-15", "14:00", 150, Confirmed, "Needs a vegetarian menu.", 5000.0)?,
        booking("B002", "Bob Williams", "bob@example.com", "Corporate Event", "2024-08-20", "10:00", 200, Confirmed, "Requires projector and screen.", 7500.0)?,
        booking("B003", "Charlie Brown", "charlie@example.com", "Birthday Party", "2024-09-01", "18:00", 50, Pending, "Wants a DJ.", 0.0)?,
        booking("B004", "Diana Prince", "diana@example.com", "Cultural Fest", "2024-07-28", "12:00", 300, Completed, "Outdoor stage setup.", 10000.0)?,
        booking("B005", "Ethan Hunt", "ethan@example.com", "Wedding", "2024-09-10", "15:00", 120, Confirmed, "Floral arrangements are key.", 6000.0)?,
        booking("B006", "Fiona Glenanne", "fiona@example.com", "Corporate Event", "2024-08-22", "09:00", 80, Cancelled, "Cancelled due to budget cuts.", 0.0)?,
        booking("B007", "George Costanza", "george@example.com", "Birthday Party", "2024-09-05", "19:00", 30, Pending, "", 0.0)?,
    ])
}

fn demo_past_events() -> Vec<PastEvent> {
    [
        ("PE01", "Smith & Jones Wedding", EventCategory::Wedding, 1, "A beautiful summer wedding."),
        ("PE02", "TechCorp Annual Summit", EventCategory::Corporate, 2, "A successful gathering of industry leaders."),
        ("PE03", "Festival of Lights", EventCategory::Cultural, 3, "A vibrant celebration of culture."),
        ("PE04", "Leo's 10th Birthday Bash", EventCategory::Birthday, 4, "A fun-filled day for the kids."),
        ("PE05", "Innovate Conference 2023", EventCategory::Corporate, 5, "Sharing ideas for the future."),
        ("PE06", "Garcia & Rodriguez Union", EventCategory::Wedding, 6, "An elegant evening ceremony."),
    ]
    .into_iter()
    .map(|(id, title, category, image, caption)| PastEvent {
        id: id.to_string(),
        title: title.to_string(),
        category,
        image_url: format!("https://picsum.photos/600/400?random={image}"),
        caption: caption.to_string(),
    })
    .collect()
}

fn demo_testimonials() -> Vec<Testimonial> {
    [
        ("T01", "Sarah L.", "Wedding", 10, "The venue was absolutely stunning and the staff made our day perfect. We couldn't have asked for more!"),
        ("T02", "Mark C.", "Corporate Event", 11, "Professional, seamless, and impressive. Our annual conference was a huge success thanks to this amazing venue and its team."),
        ("T03", "Jessica P.", "Birthday Party", 12, "They handled everything for my son's birthday party. It was stress-free for me and tons of fun for the kids."),
    ]
    .into_iter()
    .map(|(id, name, event_type, avatar, quote)| Testimonial {
        id: id.to_string(),
        name: name.to_string(),
        event_type: event_type.to_string(),
        quote: quote.to_string(),
        avatar_url: format!("https://picsum.photos/100/100?random={avatar}"),
    })
    .collect()
}

fn demo_stalls() -> Vec<StallRegistration> {
    [
        ("S01", "Crafty Creations", StallSize::Medium, "Handicrafts", PaymentStatus::Paid, Some(12)),
        ("S02", "Gourmet Bites", StallSize::Large, "Food", PaymentStatus::Paid, Some(3)),
        ("S03", "Vintage Threads", StallSize::Medium, "Apparel", PaymentStatus::Unpaid, None),
    ]
    .into_iter()
    .map(|(id, vendor, stall_size, category, payment_status, stall_number)| StallRegistration {
        id: id.to_string(),
        vendor_name: vendor.to_string(),
        stall_size,
        category: category.to_string(),
        payment_status,
        stall_number,
    })
    .collect()
}

fn demo_camps() -> Vec<CampRegistration> {
    [
        ("C01", "Emily White", 8, "Arts & Crafts"),
        ("C02", "Michael Green", 10, "Robotics"),
        ("C03", "Olivia Blue", 9, "Sports"),
    ]
    .into_iter()
    .map(|(id, child, age, activity)| CampRegistration {
        id: id.to_string(),
        child_name: child.to_string(),
        age,
        activity: activity.to_string(),
        payment_status: PaymentStatus::Paid,
    })
    .collect()
}
