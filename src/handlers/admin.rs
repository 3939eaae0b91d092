use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::{Booking, BookingStatus, CampRegistration, StallRegistration};
use crate::services::availability::{self, MonthGrid};
use crate::services::reports::{self, DashboardSummary, MonthlyFinancials};
use crate::services::retry::with_retry;
use crate::services::status_editor;
use crate::state::AppState;

async fn fetch_bookings(state: &AppState) -> Result<Vec<Booking>, AppError> {
    let store = state.store.as_ref();
    with_retry(&state.config.retry_policy(), "list_bookings", move || store.list_bookings()).await
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let status_filter = match query.status.as_deref() {
        Some(raw) => Some(BookingStatus::parse(raw).ok_or_else(|| AppError::InvalidField {
            field: "status",
            reason: format!("unknown status {raw:?}"),
        })?),
        None => None,
    };

    let bookings = fetch_bookings(&state)
        .await?
        .into_iter()
        .filter(|b| status_filter.map_or(true, |s| b.status == s))
        .collect();

    Ok(Json(bookings))
}

// POST /api/admin/bookings/:id/status
#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: BookingStatus,
    /// Version the operator last saw; omit to overwrite unconditionally.
    pub version: Option<i64>,
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AppJson(body): AppJson<StatusRequest>,
) -> Result<Json<Booking>, AppError> {
    let updated = status_editor::apply_status(
        state.store.as_ref(),
        &state.config.retry_policy(),
        state.config.transition_policy,
        state.config.booked_date_policy,
        &id,
        body.status,
        body.version,
    )
    .await?;

    Ok(Json(updated))
}

// GET /api/admin/dashboard
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Result<Json<DashboardSummary>, AppError> {
    let bookings = fetch_bookings(&state).await?;
    Ok(Json(reports::dashboard_summary(&bookings)))
}

// GET /api/admin/financials
pub async fn get_financials(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MonthlyFinancials>>, AppError> {
    let bookings = fetch_bookings(&state).await?;
    Ok(Json(reports::monthly_financials(&bookings)))
}

// GET /api/admin/calendar
#[derive(Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Serialize)]
pub struct BookingSummary {
    id: String,
    client_name: String,
    status: BookingStatus,
}

#[derive(Serialize)]
pub struct AdminCalendarDay {
    date: NaiveDate,
    day: u32,
    bookings: Vec<BookingSummary>,
}

#[derive(Serialize)]
pub struct AdminCalendarResponse {
    year: i32,
    month: u32,
    title: String,
    weekdays: [&'static str; 7],
    cells: Vec<Option<AdminCalendarDay>>,
}

pub async fn get_admin_calendar(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<AdminCalendarResponse>, AppError> {
    let today = chrono::Local::now().date_naive();
    let grid = MonthGrid::new(
        query.year.unwrap_or(today.year()),
        query.month.unwrap_or(today.month()),
    )?;

    let bookings = fetch_bookings(&state).await?;
    let by_date = availability::bookings_by_date(&bookings, grid.year, grid.month);

    let cells = grid
        .cells()
        .map(|cell| {
            cell.map(|date| AdminCalendarDay {
                date,
                day: date.day(),
                bookings: by_date
                    .get(&date)
                    .map(|day| {
                        day.iter()
                            .map(|b| BookingSummary {
                                id: b.id.clone(),
                                client_name: b.client_name.clone(),
                                status: b.status,
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
        })
        .collect();

    Ok(Json(AdminCalendarResponse {
        year: grid.year,
        month: grid.month,
        title: availability::month_title(grid.year, grid.month),
        weekdays: availability::WEEKDAY_LABELS,
        cells,
    }))
}

// GET /api/admin/registrations
#[derive(Serialize)]
pub struct RegistrationsResponse {
    stalls: Vec<StallRegistration>,
    camps: Vec<CampRegistration>,
}

pub async fn get_registrations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RegistrationsResponse>, AppError> {
    let store = state.store.as_ref();
    let retry = state.config.retry_policy();

    let (stalls, camps) = tokio::try_join!(
        with_retry(&retry, "list_stalls", move || store.list_stalls()),
        with_retry(&retry, "list_camps", move || store.list_camps()),
    )?;

    Ok(Json(RegistrationsResponse { stalls, camps }))
}
