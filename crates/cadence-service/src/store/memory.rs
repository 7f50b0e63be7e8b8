use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RecurringBookingStore, StoreFuture};
use crate::error::{ServiceError, ServiceResult};
use crate::recurrence::{Occurrence, RecurrenceException, RecurringBooking};

#[derive(Debug, Default)]
struct Tables {
    bookings: HashMap<Uuid, RecurringBooking>,
    exceptions: HashMap<Uuid, BTreeMap<NaiveDate, RecurrenceException>>,
    occurrences: HashMap<Uuid, Vec<Occurrence>>,
}

impl Tables {
    fn check_version(&self, booking_id: Uuid, expected_version: u64) -> ServiceResult<u64> {
        let stored = self
            .bookings
            .get(&booking_id)
            .ok_or_else(|| ServiceError::booking_not_found(booking_id))?;
        if stored.version != expected_version {
            return Err(ServiceError::Conflict(format!(
                "recurring booking {booking_id} was modified concurrently (expected version {expected_version}, found {})",
                stored.version
            )));
        }
        stored
            .version
            .checked_add(1)
            .ok_or(ServiceError::InvariantViolation("booking version overflow"))
    }

    /// Moves a booking to `version` after a write to one of its child rows.
    fn touch(&mut self, booking_id: Uuid, version: u64) {
        if let Some(stored) = self.bookings.get_mut(&booking_id) {
            stored.version = version;
        }
    }
}

/// Process-local store. All tables share one lock so `commit_advance` is
/// atomic.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecurringBookingStore for InMemoryStore {
    fn insert_booking<'a>(
        &'a self,
        booking: &'a RecurringBooking,
    ) -> StoreFuture<'a, RecurringBooking> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            if tables.bookings.contains_key(&booking.id) {
                return Err(ServiceError::Conflict(format!(
                    "recurring booking {} already exists",
                    booking.id
                )));
            }
            let mut stored = booking.clone();
            stored.version = 0;
            tables.bookings.insert(stored.id, stored.clone());
            Ok(stored)
        })
    }

    fn get_booking(&self, id: Uuid) -> StoreFuture<'_, RecurringBooking> {
        Box::pin(async move {
            self.tables
                .read()
                .await
                .bookings
                .get(&id)
                .cloned()
                .ok_or_else(|| ServiceError::booking_not_found(id))
        })
    }

    fn update_booking<'a>(
        &'a self,
        booking: &'a RecurringBooking,
        expected_version: u64,
    ) -> StoreFuture<'a, RecurringBooking> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            let version = tables.check_version(booking.id, expected_version)?;
            let mut stored = booking.clone();
            stored.version = version;
            tables.bookings.insert(stored.id, stored.clone());
            Ok(stored)
        })
    }

    fn list_exceptions(&self, booking_id: Uuid) -> StoreFuture<'_, Vec<RecurrenceException>> {
        Box::pin(async move {
            let tables = self.tables.read().await;
            Ok(tables
                .exceptions
                .get(&booking_id)
                .map(|by_date| by_date.values().cloned().collect())
                .unwrap_or_default())
        })
    }

    fn upsert_exception<'a>(
        &'a self,
        exception: &'a RecurrenceException,
        expected_version: u64,
    ) -> StoreFuture<'a, RecurrenceException> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            let booking_id = exception.recurring_booking_id;
            let version = tables.check_version(booking_id, expected_version)?;
            tables
                .exceptions
                .entry(booking_id)
                .or_default()
                .insert(exception.exception_date, exception.clone());
            tables.touch(booking_id, version);
            Ok(exception.clone())
        })
    }

    fn delete_exception(
        &self,
        booking_id: Uuid,
        date: NaiveDate,
        expected_version: u64,
    ) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            let version = tables.check_version(booking_id, expected_version)?;
            let removed = tables
                .exceptions
                .get_mut(&booking_id)
                .and_then(|by_date| by_date.remove(&date));
            if removed.is_none() {
                return Err(ServiceError::NotFound(format!(
                    "exception on {date} for recurring booking {booking_id}"
                )));
            }
            tables.touch(booking_id, version);
            Ok(())
        })
    }

    fn commit_advance<'a>(
        &'a self,
        booking: &'a RecurringBooking,
        expected_version: u64,
        occurrence: Option<&'a Occurrence>,
    ) -> StoreFuture<'a, RecurringBooking> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            let version = tables.check_version(booking.id, expected_version)?;
            let mut stored = booking.clone();
            stored.version = version;
            tables.bookings.insert(stored.id, stored.clone());
            if let Some(occurrence) = occurrence {
                tables
                    .occurrences
                    .entry(stored.id)
                    .or_default()
                    .push(occurrence.clone());
            }
            Ok(stored)
        })
    }

    fn list_occurrences(&self, booking_id: Uuid) -> StoreFuture<'_, Vec<Occurrence>> {
        Box::pin(async move {
            let tables = self.tables.read().await;
            Ok(tables
                .occurrences
                .get(&booking_id)
                .cloned()
                .unwrap_or_default())
        })
    }
}
