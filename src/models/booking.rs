use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub client_name: String,
    pub client_email: String,
    pub event_type: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub guests: u32,
    pub status: BookingStatus,
    pub notes: String,
    pub payment: f64,
    /// Bumped on every status write; used to reject stale edits.
    pub version: i64,
}

/// A validated booking request, before the store assigns id, status and payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    pub client_name: String,
    pub client_email: String,
    pub event_type: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub guests: u32,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
        BookingStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Completed => "Completed",
        }
    }

    /// Case-insensitive, so query strings like `?status=pending` work.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `HH:MM` on the wire; seconds are accepted on input and dropped.
pub mod hhmm {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:02}:{:02}", time.hour(), time.minute()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid time: {raw}")))
    }

    pub fn parse(s: &str) -> Option<NaiveTime> {
        let s = s.trim();
        NaiveTime::parse_from_str(s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .ok()
            .and_then(|t| t.with_second(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(BookingStatus::parse("pending"), Some(BookingStatus::Pending));
        assert_eq!(BookingStatus::parse("Confirmed"), Some(BookingStatus::Confirmed));
        assert_eq!(BookingStatus::parse(" COMPLETED "), Some(BookingStatus::Completed));
        assert_eq!(BookingStatus::parse("archived"), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Confirmed.is_terminal());
    }

    #[test]
    fn test_booking_json_shape() {
        let booking = Booking {
            id: "B001".to_string(),
            client_name: "Alice Johnson".to_string(),
            client_email: "alice@example.com".to_string(),
            event_type: "Wedding".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 8, 15).unwrap(),
            time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            guests: 150,
            status: BookingStatus::Confirmed,
            notes: "Needs a vegetarian menu.".to_string(),
            payment: 5000.0,
            version: 1,
        };

        let json = serde_json::to_value(&booking).unwrap();
        assert_eq!(json["date"], "2024-08-15");
        assert_eq!(json["time"], "14:00");
        assert_eq!(json["status"], "Confirmed");
    }

    #[test]
    fn test_time_accepts_seconds() {
        assert_eq!(hhmm::parse("09:30:45"), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(hhmm::parse("18:00"), NaiveTime::from_hms_opt(18, 0, 0));
        assert_eq!(hhmm::parse("25:00"), None);
        assert_eq!(hhmm::parse("noon"), None);
    }
}
