//! Occupied-date calculation and month grid generation for the booking calendar.
//!
//! Dates are plain Gregorian calendar dates with no timezone attached; two
//! bookings collide when their `date` fields are equal.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{Booking, BookingStatus};

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Which bookings make their date unavailable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BookedDatePolicy {
    /// Every booking occupies its date, cancelled ones included.
    #[default]
    AnyStatus,
    /// Cancelled bookings free their date.
    ExcludeCancelled,
}

impl BookedDatePolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "any_status" | "any" => Some(BookedDatePolicy::AnyStatus),
            "exclude_cancelled" => Some(BookedDatePolicy::ExcludeCancelled),
            _ => None,
        }
    }

    pub fn occupies(&self, booking: &Booking) -> bool {
        self.occupies_status(booking.status)
    }

    pub fn occupies_status(&self, status: BookingStatus) -> bool {
        match self {
            BookedDatePolicy::AnyStatus => true,
            BookedDatePolicy::ExcludeCancelled => status != BookingStatus::Cancelled,
        }
    }
}

/// Canonical `YYYY-MM-DD` key for a date.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn booked_dates(bookings: &[Booking], policy: BookedDatePolicy) -> BTreeSet<NaiveDate> {
    bookings
        .iter()
        .filter(|b| policy.occupies(b))
        .map(|b| b.date)
        .collect()
}

/// Booked dates restricted to one month.
pub fn booked_dates_in_month(
    bookings: &[Booking],
    policy: BookedDatePolicy,
    year: i32,
    month: u32,
) -> BTreeSet<NaiveDate> {
    booked_dates(bookings, policy)
        .into_iter()
        .filter(|d| d.year() == year && d.month() == month)
        .collect()
}

/// Single-day exclusivity: a new request may not land on an occupied date.
pub fn ensure_date_available(
    bookings: &[Booking],
    policy: BookedDatePolicy,
    date: NaiveDate,
) -> Result<(), AppError> {
    if bookings.iter().any(|b| b.date == date && policy.occupies(b)) {
        return Err(AppError::DateUnavailable(date_key(date)));
    }
    Ok(())
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

pub fn month_title(year: i32, month: u32) -> String {
    let name = MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?");
    format!("{name} {year}")
}

/// A Sunday-first month layout: blank cells up to the weekday of the 1st,
/// then one cell per day.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub leading_blanks: u32,
    pub days: Vec<NaiveDate>,
}

impl MonthGrid {
    pub fn new(year: i32, month: u32) -> Result<Self, AppError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| AppError::InvalidField {
            field: "month",
            reason: format!("{year}-{month} is not a calendar month"),
        })?;
        let len = days_in_month(year, month).unwrap_or(0);

        Ok(Self {
            year,
            month,
            leading_blanks: first.weekday().num_days_from_sunday(),
            days: first.iter_days().take(len as usize).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.leading_blanks as usize + self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cells(&self) -> impl Iterator<Item = Option<NaiveDate>> + '_ {
        std::iter::repeat(None)
            .take(self.leading_blanks as usize)
            .chain(self.days.iter().copied().map(Some))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

/// Bookings of one month grouped by day, for the operator's calendar.
pub fn bookings_by_date(bookings: &[Booking], year: i32, month: u32) -> BTreeMap<NaiveDate, Vec<&Booking>> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&Booking>> = BTreeMap::new();
    for booking in bookings
        .iter()
        .filter(|b| b.date.year() == year && b.date.month() == month)
    {
        by_date.entry(booking.date).or_default().push(booking);
    }
    by_date
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn booking(id: &str, day: &str, status: BookingStatus) -> Booking {
        Booking {
            id: id.to_string(),
            client_name: "Client".to_string(),
            client_email: "client@example.com".to_string(),
            event_type: "Wedding".to_string(),
            date: date(day),
            time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            guests: 100,
            status,
            notes: String::new(),
            payment: 0.0,
            version: 1,
        }
    }

    #[test]
    fn test_grid_size_matches_offset_plus_days() {
        for year in [1999, 2000, 2023, 2024, 2100] {
            for month in 1..=12 {
                let grid = MonthGrid::new(year, month).unwrap();
                let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
                assert_eq!(grid.leading_blanks, first.weekday().num_days_from_sunday());
                assert_eq!(grid.len(), grid.leading_blanks as usize + grid.days.len());
                assert_eq!(grid.cells().count(), grid.len());
                assert_eq!(grid.cells().take_while(|c| c.is_none()).count(), grid.leading_blanks as usize);
            }
        }
    }

    #[test]
    fn test_days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2000, 2), Some(29));
        assert_eq!(days_in_month(2100, 2), Some(28));
        assert_eq!(days_in_month(2024, 4), Some(30));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 13), None);
    }

    #[test]
    fn test_august_2024_layout() {
        // 2024-08-01 is a Thursday
        let grid = MonthGrid::new(2024, 8).unwrap();
        assert_eq!(grid.leading_blanks, 4);
        assert_eq!(grid.days.len(), 31);
        assert_eq!(grid.days.first(), Some(&date("2024-08-01")));
        assert_eq!(grid.days.last(), Some(&date("2024-08-31")));
    }

    #[test]
    fn test_invalid_month_rejected() {
        assert!(MonthGrid::new(2024, 0).is_err());
        assert!(MonthGrid::new(2024, 13).is_err());
    }

    #[test]
    fn test_booked_dates_any_status() {
        let bookings = vec![
            booking("B001", "2024-08-15", BookingStatus::Confirmed),
            booking("B002", "2024-08-20", BookingStatus::Pending),
            booking("B003", "2024-08-22", BookingStatus::Cancelled),
        ];
        let booked = booked_dates(&bookings, BookedDatePolicy::AnyStatus);

        let grid = MonthGrid::new(2024, 8).unwrap();
        for day in &grid.days {
            let expected = bookings.iter().any(|b| b.date == *day);
            assert_eq!(booked.contains(day), expected, "{day}");
        }
    }

    #[test]
    fn test_exclude_cancelled_frees_date() {
        let bookings = vec![
            booking("B001", "2024-08-15", BookingStatus::Confirmed),
            booking("B003", "2024-08-22", BookingStatus::Cancelled),
        ];
        let booked = booked_dates(&bookings, BookedDatePolicy::ExcludeCancelled);
        assert!(booked.contains(&date("2024-08-15")));
        assert!(!booked.contains(&date("2024-08-22")));
    }

    #[test]
    fn test_booked_dates_in_month_filters() {
        let bookings = vec![
            booking("B001", "2024-08-15", BookingStatus::Confirmed),
            booking("B002", "2024-09-01", BookingStatus::Pending),
        ];
        let booked = booked_dates_in_month(&bookings, BookedDatePolicy::AnyStatus, 2024, 8);
        assert_eq!(booked.into_iter().collect::<Vec<_>>(), vec![date("2024-08-15")]);
    }

    #[test]
    fn test_ensure_date_available() {
        let bookings = vec![booking("B006", "2024-08-22", BookingStatus::Cancelled)];

        let err = ensure_date_available(&bookings, BookedDatePolicy::AnyStatus, date("2024-08-22"))
            .unwrap_err();
        assert!(matches!(err, AppError::DateUnavailable(d) if d == "2024-08-22"));

        assert!(ensure_date_available(&bookings, BookedDatePolicy::ExcludeCancelled, date("2024-08-22")).is_ok());
        assert!(ensure_date_available(&bookings, BookedDatePolicy::AnyStatus, date("2024-08-23")).is_ok());
    }

    #[test]
    fn test_bookings_by_date_groups_month() {
        let bookings = vec![
            booking("B001", "2024-08-15", BookingStatus::Confirmed),
            booking("B002", "2024-08-15", BookingStatus::Cancelled),
            booking("B003", "2024-09-01", BookingStatus::Pending),
        ];
        let grouped = bookings_by_date(&bookings, 2024, 8);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[&date("2024-08-15")].len(), 2);
    }

    #[test]
    fn test_month_title() {
        assert_eq!(month_title(2024, 8), "August 2024");
        assert_eq!(month_title(2025, 1), "January 2025");
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(BookedDatePolicy::parse("exclude_cancelled"), Some(BookedDatePolicy::ExcludeCancelled));
        assert_eq!(BookedDatePolicy::parse("ANY_STATUS"), Some(BookedDatePolicy::AnyStatus));
        assert_eq!(BookedDatePolicy::parse("sometimes"), None);
    }
}
