//! Persistence port for recurring bookings.
//!
//! ## Summary
//! The recurrence logic never queries storage itself. Callers load records
//! through [`RecurringBookingStore`], hand them to the expander and write the
//! result back with an optimistic version check.

use std::future::Future;
use std::pin::Pin;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::ServiceResult;
use crate::recurrence::{Occurrence, RecurrenceException, RecurringBooking};

pub mod memory;

pub use memory::InMemoryStore;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = ServiceResult<T>> + Send + 'a>>;

pub trait RecurringBookingStore: Send + Sync {
    /// Stores a new booking with version 0.
    ///
    /// Fails with `Conflict` if the id is taken.
    fn insert_booking<'a>(&'a self, booking: &'a RecurringBooking)
    -> StoreFuture<'a, RecurringBooking>;

    /// Fails with `NotFound` if no booking has this id.
    fn get_booking(&self, id: Uuid) -> StoreFuture<'_, RecurringBooking>;

    /// Replaces a booking if its stored version equals `expected_version`,
    /// returning it with the version bumped.
    ///
    /// Fails with `Conflict` on a version mismatch.
    fn update_booking<'a>(
        &'a self,
        booking: &'a RecurringBooking,
        expected_version: u64,
    ) -> StoreFuture<'a, RecurringBooking>;

    fn list_exceptions(&self, booking_id: Uuid) -> StoreFuture<'_, Vec<RecurrenceException>>;

    /// Inserts or replaces the exception keyed by its booking and date.
    ///
    /// Exceptions are part of the booking's state: the owning booking must
    /// still be at `expected_version`, and its version is bumped in the same
    /// write. Fails with `Conflict` on a version mismatch.
    fn upsert_exception<'a>(
        &'a self,
        exception: &'a RecurrenceException,
        expected_version: u64,
    ) -> StoreFuture<'a, RecurrenceException>;

    /// Removes the exception on `date` under the same version check as
    /// `upsert_exception`.
    ///
    /// Fails with `NotFound` if no exception exists on `date`.
    fn delete_exception(
        &self,
        booking_id: Uuid,
        date: NaiveDate,
        expected_version: u64,
    ) -> StoreFuture<'_, ()>;

    /// Atomically applies the result of an advance: the version-checked
    /// booking update and the materialized occurrence, if any.
    fn commit_advance<'a>(
        &'a self,
        booking: &'a RecurringBooking,
        expected_version: u64,
        occurrence: Option<&'a Occurrence>,
    ) -> StoreFuture<'a, RecurringBooking>;

    /// Occurrences written by `commit_advance`, in commit order.
    fn list_occurrences(&self, booking_id: Uuid) -> StoreFuture<'_, Vec<Occurrence>>;
}
