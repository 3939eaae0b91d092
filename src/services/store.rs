use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::queries::{self, StatusUpdate};
use crate::errors::AppError;
use crate::models::{
    Booking, BookingStatus, CampRegistration, NewBooking, PastEvent, StallRegistration,
    Testimonial,
};
use crate::services::availability::{self, BookedDatePolicy};

/// The single authoritative holder of every venue collection.
///
/// Reads are full snapshots; there is no subscription, so callers refetch
/// after a mutation to observe it.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_bookings(&self) -> Result<Vec<Booking>, AppError>;

    async fn get_booking(&self, id: &str) -> Result<Booking, AppError>;

    /// Changes only the status field. `expected_version` turns the write into
    /// a compare-and-set; a mismatch is reported as `Conflict`. A status that
    /// makes the booking occupy its date again fails with `DateUnavailable`
    /// when another booking already holds that date.
    async fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
        expected_version: Option<i64>,
        policy: BookedDatePolicy,
    ) -> Result<Booking, AppError>;

    /// Assigns a fresh id and forces `Pending` with zero payment. The date is
    /// checked and claimed in one step; an occupied date is `DateUnavailable`.
    async fn create_booking_request(
        &self,
        request: &NewBooking,
        policy: BookedDatePolicy,
    ) -> Result<Booking, AppError>;

    async fn list_past_events(&self) -> Result<Vec<PastEvent>, AppError>;

    async fn list_testimonials(&self) -> Result<Vec<Testimonial>, AppError>;

    async fn list_stalls(&self) -> Result<Vec<StallRegistration>, AppError>;

    async fn list_camps(&self) -> Result<Vec<CampRegistration>, AppError>;
}

/// SQLite-backed store that simulates a network round-trip on every call.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    latency: Duration,
}

impl SqliteStore {
    pub fn new(conn: Connection, latency: Duration) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            latency,
        }
    }

    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.conn
            .lock()
            .map_err(|_| AppError::StoreUnavailable("connection lock poisoned".to_string()))
    }
}

fn backend(e: anyhow::Error) -> AppError {
    AppError::StoreUnavailable(format!("{e:#}"))
}

/// Occupancy check against the rows on `date`, run while the caller holds
/// the connection lock. `except` skips the booking being edited.
fn ensure_date_free(
    db: &Connection,
    policy: BookedDatePolicy,
    date: NaiveDate,
    except: Option<&str>,
) -> Result<(), AppError> {
    let others: Vec<Booking> = queries::list_bookings_on_date(db, date)
        .map_err(backend)?
        .into_iter()
        .filter(|b| except != Some(b.id.as_str()))
        .collect();
    availability::ensure_date_available(&others, policy, date)
}

fn new_booking_id() -> String {
    format!("B-{}", uuid::Uuid::new_v4().simple())
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn list_bookings(&self) -> Result<Vec<Booking>, AppError> {
        self.round_trip().await;
        let db = self.conn()?;
        queries::list_bookings(&db).map_err(backend)
    }

    async fn get_booking(&self, id: &str) -> Result<Booking, AppError> {
        self.round_trip().await;
        let db = self.conn()?;
        queries::get_booking_by_id(&db, id)
            .map_err(backend)?
            .ok_or_else(|| AppError::NotFound(format!("booking {id}")))
    }

    async fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
        expected_version: Option<i64>,
        policy: BookedDatePolicy,
    ) -> Result<Booking, AppError> {
        self.round_trip().await;
        let db = self.conn()?;

        let current = queries::get_booking_by_id(&db, id)
            .map_err(backend)?
            .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;
        if policy.occupies_status(status) && !policy.occupies_status(current.status) {
            ensure_date_free(&db, policy, current.date, Some(id))?;
        }

        match queries::update_booking_status(&db, id, status, expected_version).map_err(backend)? {
            StatusUpdate::Updated => {}
            StatusUpdate::Missing => return Err(AppError::NotFound(format!("booking {id}"))),
            StatusUpdate::Stale { current } => {
                return Err(AppError::Conflict {
                    id: id.to_string(),
                    expected: expected_version.unwrap_or(current),
                    current,
                })
            }
        }

        let updated = queries::get_booking_by_id(&db, id)
            .map_err(backend)?
            .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;

        tracing::info!(booking_id = %id, status = %status, version = updated.version, "booking status updated");
        Ok(updated)
    }

    async fn create_booking_request(
        &self,
        request: &NewBooking,
        policy: BookedDatePolicy,
    ) -> Result<Booking, AppError> {
        self.round_trip().await;

        let booking = Booking {
            id: new_booking_id(),
            client_name: request.client_name.clone(),
            client_email: request.client_email.clone(),
            event_type: request.event_type.clone(),
            date: request.date,
            time: request.time,
            guests: request.guests,
            status: BookingStatus::Pending,
            notes: request.notes.clone(),
            payment: 0.0,
            version: 1,
        };

        let db = self.conn()?;
        ensure_date_free(&db, policy, booking.date, None)?;
        queries::insert_booking(&db, &booking).map_err(backend)?;

        tracing::info!(booking_id = %booking.id, date = %booking.date, "booking request created");
        Ok(booking)
    }

    async fn list_past_events(&self) -> Result<Vec<PastEvent>, AppError> {
        self.round_trip().await;
        let db = self.conn()?;
        queries::list_past_events(&db).map_err(backend)
    }

    async fn list_testimonials(&self) -> Result<Vec<Testimonial>, AppError> {
        self.round_trip().await;
        let db = self.conn()?;
        queries::list_testimonials(&db).map_err(backend)
    }

    async fn list_stalls(&self) -> Result<Vec<StallRegistration>, AppError> {
        self.round_trip().await;
        let db = self.conn()?;
        queries::list_stalls(&db).map_err(backend)
    }

    async fn list_camps(&self) -> Result<Vec<CampRegistration>, AppError> {
        self.round_trip().await;
        let db = self.conn()?;
        queries::list_camps(&db).map_err(backend)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::memory_store;
    use super::*;
    use chrono::NaiveTime;

    const ANY: BookedDatePolicy = BookedDatePolicy::AnyStatus;

    fn request(date: &str) -> NewBooking {
        NewBooking {
            client_name: "Hana Kim".to_string(),
            client_email: "hana@example.com".to_string(),
            event_type: "Anniversary".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            time: NaiveTime::from_hms_opt(17, 30, 0).unwrap(),
            guests: 10,
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_forces_pending_and_zero_payment() {
        let store = memory_store(true);
        let created = store.create_booking_request(&request("2024-08-16"), ANY).await.unwrap();

        assert_eq!(created.status, BookingStatus::Pending);
        assert_eq!(created.payment, 0.0);
        assert_eq!(created.version, 1);

        let all = store.list_bookings().await.unwrap();
        assert_eq!(all.len(), 8);
        assert_eq!(all.iter().filter(|b| b.id == created.id).count(), 1);
        assert_eq!(all.last().unwrap(), &created);
    }

    #[tokio::test]
    async fn test_created_ids_are_distinct() {
        let store = memory_store(true);
        let a = store.create_booking_request(&request("2024-10-01"), ANY).await.unwrap();
        let b = store.create_booking_request(&request("2024-10-02"), ANY).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let store = memory_store(true);
        let before = store.list_bookings().await.unwrap();

        let err = store
            .update_booking_status("B999", BookingStatus::Confirmed, None, ANY)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.list_bookings().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_with_stale_version_conflicts() {
        let store = memory_store(true);
        store
            .update_booking_status("B003", BookingStatus::Confirmed, Some(1), ANY)
            .await
            .unwrap();

        let err = store
            .update_booking_status("B003", BookingStatus::Cancelled, Some(1), ANY)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { current: 2, .. }));
    }

    #[tokio::test]
    async fn test_create_on_occupied_date_is_rejected() {
        let store = memory_store(true);
        let err = store
            .create_booking_request(&request("2024-08-15"), ANY)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DateUnavailable(ref d) if d == "2024-08-15"));
        assert_eq!(store.list_bookings().await.unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_concurrent_creates_claim_a_date_once() {
        let conn = crate::db::init_db(":memory:").unwrap();
        crate::db::seed::seed_demo_data(&conn).unwrap();
        let store = SqliteStore::new(conn, Duration::from_millis(30));

        let first = request("2024-08-16");
        let second = request("2024-08-16");
        let (a, b) = tokio::join!(
            store.create_booking_request(&first, ANY),
            store.create_booking_request(&second, ANY),
        );

        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
        assert!(matches!(a.err().or(b.err()), Some(AppError::DateUnavailable(_))));

        let on_date = store
            .list_bookings()
            .await
            .unwrap()
            .into_iter()
            .filter(|b| b.date == first.date)
            .count();
        assert_eq!(on_date, 1);
    }

    #[tokio::test]
    async fn test_cancelled_date_can_be_rebooked_but_not_reopened() {
        let store = memory_store(true);
        let policy = BookedDatePolicy::ExcludeCancelled;

        // B006 on 2024-08-22 is cancelled, so the date is free under this policy.
        let rebooked = store
            .create_booking_request(&request("2024-08-22"), policy)
            .await
            .unwrap();
        assert_eq!(rebooked.status, BookingStatus::Pending);

        let err = store
            .update_booking_status("B006", BookingStatus::Pending, None, policy)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DateUnavailable(_)));
        assert_eq!(
            store.get_booking("B006").await.unwrap().status,
            BookingStatus::Cancelled
        );

        // Cancelling the new request frees the date again.
        store
            .update_booking_status(&rebooked.id, BookingStatus::Cancelled, None, policy)
            .await
            .unwrap();
        let reopened = store
            .update_booking_status("B006", BookingStatus::Confirmed, None, policy)
            .await
            .unwrap();
        assert_eq!(reopened.status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_latency_is_applied() {
        let conn = crate::db::init_db(":memory:").unwrap();
        let store = SqliteStore::new(conn, Duration::from_millis(20));

        let started = std::time::Instant::now();
        store.list_bookings().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
