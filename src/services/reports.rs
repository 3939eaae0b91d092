use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use crate::models::{Booking, BookingStatus};

/// Expenses are estimated as a fixed share of revenue.
pub const EXPENSE_RATIO: f64 = 0.4;

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_revenue: f64,
    pub confirmed_bookings: usize,
    pub pending_requests: usize,
    pub total_events: usize,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub event_types: Vec<EventTypeShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    /// `YYYY-MM`
    pub month: String,
    pub label: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventTypeShare {
    pub event_type: String,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyFinancials {
    pub month: String,
    pub label: String,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
}

fn revenue_by_month(bookings: &[Booking]) -> BTreeMap<(i32, u32), f64> {
    let mut by_month = BTreeMap::new();
    for booking in bookings {
        *by_month
            .entry((booking.date.year(), booking.date.month()))
            .or_insert(0.0) += booking.payment;
    }
    by_month
}

fn month_key(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}")
}

fn month_label(year: i32, month: u32) -> String {
    let abbr = MONTH_ABBR.get(month as usize - 1).copied().unwrap_or("?");
    format!("{abbr} {year}")
}

pub fn monthly_revenue(bookings: &[Booking]) -> Vec<MonthlyRevenue> {
    revenue_by_month(bookings)
        .into_iter()
        .map(|((year, month), revenue)| MonthlyRevenue {
            month: month_key(year, month),
            label: month_label(year, month),
            revenue,
        })
        .collect()
}

/// Most frequent first; ties break alphabetically.
pub fn event_type_breakdown(bookings: &[Booking]) -> Vec<EventTypeShare> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for booking in bookings {
        *counts.entry(booking.event_type.as_str()).or_default() += 1;
    }

    let total = bookings.len().max(1) as f64;
    let mut shares: Vec<EventTypeShare> = counts
        .into_iter()
        .map(|(event_type, count)| EventTypeShare {
            event_type: event_type.to_string(),
            count,
            percent: (count as f64 / total * 1000.0).round() / 10.0,
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.event_type.cmp(&b.event_type)));
    shares
}

pub fn dashboard_summary(bookings: &[Booking]) -> DashboardSummary {
    let count = |status: BookingStatus| bookings.iter().filter(|b| b.status == status).count();

    DashboardSummary {
        total_revenue: bookings.iter().map(|b| b.payment).sum(),
        confirmed_bookings: count(BookingStatus::Confirmed),
        pending_requests: count(BookingStatus::Pending),
        total_events: bookings.len(),
        monthly_revenue: monthly_revenue(bookings),
        event_types: event_type_breakdown(bookings),
    }
}

pub fn monthly_financials(bookings: &[Booking]) -> Vec<MonthlyFinancials> {
    revenue_by_month(bookings)
        .into_iter()
        .map(|((year, month), revenue)| {
            let expenses = revenue * EXPENSE_RATIO;
            MonthlyFinancials {
                month: month_key(year, month),
                label: month_label(year, month),
                revenue,
                expenses,
                profit: revenue - expenses,
            }
        })
        .collect()
}
