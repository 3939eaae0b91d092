use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::{AppError, RETRY_MESSAGE};
use crate::models::booking::hhmm;
use crate::models::{Booking, NewBooking};
use crate::services::availability::{self, BookedDatePolicy};
use crate::services::retry::{with_retry, RetryPolicy};
use crate::services::store::RecordStore;

/// Raw request fields as submitted by the booking form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingForm {
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub event_type: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub guests: Option<u32>,
    pub notes: Option<String>,
}

fn required(value: Option<&str>, field: &'static str) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::ValidationMissing(field)),
    }
}

impl BookingForm {
    /// Checks presence of every field but notes, plus the formats a date or
    /// time picker would guarantee. Capacity and email deliverability are not
    /// checked.
    pub fn validate(&self) -> Result<NewBooking, AppError> {
        let client_name = required(self.client_name.as_deref(), "client_name")?;
        let client_email = required(self.client_email.as_deref(), "client_email")?;
        let event_type = required(self.event_type.as_deref(), "event_type")?;
        let date = required(self.date.as_deref(), "date")?;
        let time = required(self.time.as_deref(), "time")?;
        let guests = self.guests.ok_or(AppError::ValidationMissing("guests"))?;

        if !client_email.contains('@') {
            return Err(AppError::InvalidField {
                field: "client_email",
                reason: format!("{client_email:?} is not an email address"),
            });
        }

        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| AppError::InvalidField {
            field: "date",
            reason: format!("expected YYYY-MM-DD, got {date:?}"),
        })?;
        let time = hhmm::parse(&time).ok_or_else(|| AppError::InvalidField {
            field: "time",
            reason: format!("expected HH:MM, got {time:?}"),
        })?;

        Ok(NewBooking {
            client_name,
            client_email,
            event_type,
            date,
            time,
            guests,
            notes: self.notes.as_deref().map(str::trim).unwrap_or_default().to_string(),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FlowState {
    Editing,
    Confirmed(Booking),
    /// The store stayed unreachable; the user may submit again.
    Failed(String),
}

/// Collects a booking request, submits it, and keeps a fresh bookings
/// snapshot for the calendar afterwards.
pub struct BookingRequestFlow {
    store: Arc<dyn RecordStore>,
    retry: RetryPolicy,
    policy: BookedDatePolicy,
    state: FlowState,
    bookings: Vec<Booking>,
}

impl BookingRequestFlow {
    pub fn new(store: Arc<dyn RecordStore>, retry: RetryPolicy, policy: BookedDatePolicy) -> Self {
        Self {
            store,
            retry,
            policy,
            state: FlowState::Editing,
            bookings: Vec::new(),
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub async fn load(&mut self) -> Result<&[Booking], AppError> {
        let store = self.store.as_ref();
        self.bookings = with_retry(&self.retry, "list_bookings", move || store.list_bookings()).await?;
        Ok(&self.bookings)
    }

    /// Validation failures leave the flow editing. Store outages after the
    /// retry budget move it to `Failed` so the caller can offer a retry.
    pub async fn submit(&mut self, form: &BookingForm) -> Result<Booking, AppError> {
        let request = form.validate()?;

        match self.create(&request).await {
            Ok(booking) => {
                self.state = FlowState::Confirmed(booking.clone());
                self.refresh(&booking).await;
                Ok(booking)
            }
            Err(e) => {
                if e.is_retryable() {
                    self.state = FlowState::Failed(RETRY_MESSAGE.to_string());
                }
                Err(e)
            }
        }
    }

    async fn create(&self, request: &NewBooking) -> Result<Booking, AppError> {
        let store = self.store.as_ref();

        let policy = self.policy;

        // Early rejection from the snapshot; the store re-checks when it claims the date.
        let current = with_retry(&self.retry, "list_bookings", move || store.list_bookings()).await?;
        availability::ensure_date_available(&current, policy, request.date)?;

        with_retry(&self.retry, "create_booking_request", move || {
            store.create_booking_request(request, policy)
        })
        .await
    }

    async fn refresh(&mut self, created: &Booking) {
        let store = self.store.as_ref();
        match with_retry(&self.retry, "list_bookings", move || store.list_bookings()).await {
            Ok(bookings) => self.bookings = bookings,
            Err(e) => {
                tracing::warn!(error = %e, booking_id = %created.id, "refresh after submit failed, keeping previous snapshot");
                if !self.bookings.iter().any(|b| b.id == created.id) {
                    self.bookings.push(created.clone());
                }
            }
        }
    }
}
