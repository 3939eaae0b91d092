use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::errors::AppError;
use crate::services::calendar::{generate_feed, generate_ics};
use crate::services::retry::with_retry;
use crate::state::AppState;

const ICS_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

// GET /calendar/:booking_id
pub async fn download_ics(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let booking_id = raw_id.strip_suffix(".ics").unwrap_or(&raw_id);

    let store = state.store.as_ref();
    let booking = with_retry(&state.config.retry_policy(), "get_booking", move || {
        store.get_booking(booking_id)
    })
    .await?;

    let ics = generate_ics(&booking, &state.config.venue_name);
    let filename = format!("booking-{booking_id}.ics");

    Ok((
        [
            (header::CONTENT_TYPE, ICS_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        ics,
    )
        .into_response())
}

// GET /calendar/feed.ics
pub async fn calendar_feed(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let store = state.store.as_ref();
    let bookings = with_retry(&state.config.retry_policy(), "list_bookings", move || {
        store.list_bookings()
    })
    .await?;

    let policy = state.config.booked_date_policy;
    let feed = generate_feed(
        bookings.iter().filter(|b| policy.occupies(b)),
        &state.config.venue_name,
    );

    Ok(([(header::CONTENT_TYPE, ICS_CONTENT_TYPE)], feed).into_response())
}
