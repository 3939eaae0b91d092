use std::sync::Arc;

use crate::errors::AppError;
use crate::models::{Booking, BookingStatus};
use crate::services::availability::BookedDatePolicy;
use crate::services::retry::{with_retry, RetryPolicy};
use crate::services::store::RecordStore;

/// Which status changes the operator may make.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// Any status may move to any other.
    #[default]
    Permissive,
    /// Cancelled and Completed are final; only same-status writes are allowed.
    TerminalLocked,
}

impl TransitionPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "permissive" => Some(TransitionPolicy::Permissive),
            "terminal_locked" => Some(TransitionPolicy::TerminalLocked),
            _ => None,
        }
    }

    pub fn allows(&self, from: BookingStatus, to: BookingStatus) -> bool {
        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::TerminalLocked => !from.is_terminal() || from == to,
        }
    }
}

/// Writes a new status through the store and returns the store's record.
///
/// Under `TerminalLocked` the current record is read first and its version is
/// used for the write, so a concurrent edit surfaces as `Conflict`. Reopening
/// a booking whose date was taken in the meantime fails with `DateUnavailable`.
pub async fn apply_status(
    store: &dyn RecordStore,
    retry: &RetryPolicy,
    transitions: TransitionPolicy,
    occupancy: BookedDatePolicy,
    id: &str,
    status: BookingStatus,
    expected_version: Option<i64>,
) -> Result<Booking, AppError> {
    let expected_version = match transitions {
        TransitionPolicy::Permissive => expected_version,
        TransitionPolicy::TerminalLocked => {
            let current = with_retry(retry, "get_booking", move || store.get_booking(id)).await?;
            if let Some(expected) = expected_version {
                if expected != current.version {
                    return Err(AppError::Conflict {
                        id: id.to_string(),
                        expected,
                        current: current.version,
                    });
                }
            }
            if !transitions.allows(current.status, status) {
                return Err(AppError::InvalidTransition {
                    from: current.status,
                    to: status,
                });
            }
            Some(current.version)
        }
    };

    with_retry(retry, "update_booking_status", move || {
        store.update_booking_status(id, status, expected_version, occupancy)
    })
    .await
}

/// The operator's bookings table. Edits show immediately and are replaced by
/// the store's confirmed record, or reverted if the store rejects them.
pub struct StatusEditor {
    store: Arc<dyn RecordStore>,
    retry: RetryPolicy,
    transitions: TransitionPolicy,
    occupancy: BookedDatePolicy,
    bookings: Vec<Booking>,
}

impl StatusEditor {
    pub fn new(
        store: Arc<dyn RecordStore>,
        retry: RetryPolicy,
        transitions: TransitionPolicy,
        occupancy: BookedDatePolicy,
    ) -> Self {
        Self {
            store,
            retry,
            transitions,
            occupancy,
            bookings: Vec::new(),
        }
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn booking(&self, id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    pub async fn load(&mut self) -> Result<&[Booking], AppError> {
        let store = self.store.as_ref();
        self.bookings = with_retry(&self.retry, "list_bookings", move || store.list_bookings()).await?;
        Ok(&self.bookings)
    }

    pub async fn set_status(&mut self, id: &str, status: BookingStatus) -> Result<Booking, AppError> {
        let index = self.bookings.iter().position(|b| b.id == id);
        let prior = index.map(|i| self.bookings[i].clone());

        if let Some(i) = index {
            self.bookings[i].status = status;
        }

        let store = self.store.as_ref();
        let result = apply_status(
            store,
            &self.retry,
            self.transitions,
            self.occupancy,
            id,
            status,
            prior.as_ref().map(|b| b.version),
        )
        .await;

        match (&result, index, prior) {
            (Ok(confirmed), Some(i), _) => self.bookings[i] = confirmed.clone(),
            (Ok(confirmed), None, _) => self.bookings.push(confirmed.clone()),
            (Err(e), Some(i), Some(prior)) => {
                tracing::warn!(booking_id = %id, error = %e, "status change rejected, reverting");
                self.bookings[i] = prior;
            }
            (Err(_), _, _) => {}
        }

        result
    }
}
