use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::{Booking, PastEvent, Testimonial};
use crate::services::availability;
use crate::services::booking_request::{BookingForm, BookingRequestFlow};
use crate::services::calendar_widget::{CalendarView, CalendarWidget};
use crate::services::retry::with_retry;
use crate::state::AppState;

// GET /api/calendar
#[derive(Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub delta: Option<i32>,
    pub select: Option<String>,
}

#[derive(Serialize)]
pub struct CalendarResponse {
    #[serde(flatten)]
    view: CalendarView,
    #[serde(skip_serializing_if = "Option::is_none")]
    selection_accepted: Option<bool>,
}

pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let store = state.store.as_ref();
    let bookings = with_retry(&state.config.retry_policy(), "list_bookings", move || {
        store.list_bookings()
    })
    .await?;

    let today = chrono::Local::now().date_naive();
    let mut widget = CalendarWidget::new(today, &bookings, state.config.booked_date_policy);

    if query.year.is_some() || query.month.is_some() {
        widget.show_month(
            query.year.unwrap_or(widget.current_year()),
            query.month.unwrap_or(widget.current_month()),
        )?;
    }
    if let Some(delta) = query.delta {
        widget.navigate(delta);
    }

    let selection_accepted = match query.select.as_deref() {
        Some(raw) => {
            let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                AppError::InvalidField {
                    field: "select",
                    reason: format!("expected YYYY-MM-DD, got {raw:?}"),
                }
            })?;
            Some(widget.select_date(date))
        }
        None => None,
    };

    Ok(Json(CalendarResponse {
        view: widget.render()?,
        selection_accepted,
    }))
}

// POST /api/bookings
#[derive(Serialize)]
pub struct SubmitResponse {
    booking: Booking,
    booked_dates: Vec<String>,
}

pub async fn submit_booking(
    State(state): State<Arc<AppState>>,
    AppJson(form): AppJson<BookingForm>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let mut flow = BookingRequestFlow::new(
        state.store.clone(),
        state.config.retry_policy(),
        state.config.booked_date_policy,
    );

    let booking = flow.submit(&form).await?;
    let booked_dates = availability::booked_dates(flow.bookings(), state.config.booked_date_policy)
        .into_iter()
        .map(availability::date_key)
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            booking,
            booked_dates,
        }),
    ))
}

// GET /api/events/past
pub async fn get_past_events(State(state): State<Arc<AppState>>) -> Result<Json<Vec<PastEvent>>, AppError> {
    let store = state.store.as_ref();
    let events = with_retry(&state.config.retry_policy(), "list_past_events", move || {
        store.list_past_events()
    })
    .await?;
    Ok(Json(events))
}

// GET /api/testimonials
pub async fn get_testimonials(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Testimonial>>, AppError> {
    let store = state.store.as_ref();
    let testimonials = with_retry(&state.config.retry_policy(), "list_testimonials", move || {
        store.list_testimonials()
    })
    .await?;
    Ok(Json(testimonials))
}
