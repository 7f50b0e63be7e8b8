use std::sync::Arc;

use cadence_core::types::BookingStatus;
use chrono::NaiveDate;
use uuid::Uuid;

use super::{NewRecurrenceException, NewRecurringBooking};
use crate::error::{ServiceError, ServiceResult};
use crate::notify::{OccurrenceNotifier, TracingNotifier};
use crate::recurrence::{
    Advanced, ExceptionSet, ExpansionPolicy, Occurrence, RecurrenceException, RecurrenceExpander,
    RecurringBooking,
};
use crate::store::{InMemoryStore, RecurringBookingStore};

/// Owns the read, advance and commit unit of work for recurring bookings.
#[derive(Clone)]
pub struct RecurringBookingService {
    store: Arc<dyn RecurringBookingStore>,
    notifier: Arc<dyn OccurrenceNotifier>,
    expander: RecurrenceExpander,
}

impl std::fmt::Debug for RecurringBookingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecurringBookingService")
            .field("expander", &self.expander)
            .finish_non_exhaustive()
    }
}

impl RecurringBookingService {
    #[must_use]
    pub fn new(
        store: Arc<dyn RecurringBookingStore>,
        notifier: Arc<dyn OccurrenceNotifier>,
        policy: ExpansionPolicy,
    ) -> Self {
        Self {
            store,
            notifier,
            expander: RecurrenceExpander::new(policy),
        }
    }

    /// Service backed by an [`InMemoryStore`] that logs created occurrences.
    #[must_use]
    pub fn in_memory(policy: ExpansionPolicy) -> Self {
        Self::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(TracingNotifier),
            policy,
        )
    }

    #[must_use]
    pub const fn expander(&self) -> &RecurrenceExpander {
        &self.expander
    }

    /// ## Summary
    /// Validates and stores a new active booking with no occurrences yet.
    ///
    /// ## Errors
    /// Returns `ServiceError::ValidationError` if the duration or cap is zero
    /// or the end date is not after the first occurrence.
    #[tracing::instrument(skip(self, request), fields(customer_id = %request.customer_id, frequency = %request.frequency))]
    pub async fn create(&self, request: NewRecurringBooking) -> ServiceResult<RecurringBooking> {
        if let Some(end) = request.end_date
            && end <= request.first_occurrence_date
        {
            return Err(ServiceError::ValidationError(format!(
                "end_date {end} must be after first_occurrence_date {}",
                request.first_occurrence_date
            )));
        }

        let booking = RecurringBooking {
            id: Uuid::now_v7(),
            customer_id: request.customer_id,
            provider_id: request.provider_id,
            service_id: request.service_id,
            frequency: request.frequency,
            status: BookingStatus::Active,
            start_time: request.start_time,
            duration_minutes: request.duration_minutes,
            next_occurrence_date: request.first_occurrence_date,
            end_date: request.end_date,
            max_occurrences: request.max_occurrences,
            occurrence_count: 0,
            version: 0,
        };
        booking.validate()?;

        let stored = self.store.insert_booking(&booking).await?;
        tracing::info!(booking_id = %stored.id, "Recurring booking created");
        Ok(stored)
    }

    /// ## Errors
    /// Returns `ServiceError::NotFound` if the booking does not exist.
    pub async fn get(&self, id: Uuid) -> ServiceResult<RecurringBooking> {
        self.store.get_booking(id).await
    }

    /// ## Errors
    /// Returns `ServiceError::InvalidState` unless the booking is active.
    #[tracing::instrument(skip(self))]
    pub async fn pause(&self, id: Uuid) -> ServiceResult<RecurringBooking> {
        self.transition(id, "pause", |status| {
            (status == BookingStatus::Active).then_some(BookingStatus::Paused)
        })
        .await
    }

    /// ## Errors
    /// Returns `ServiceError::InvalidState` unless the booking is paused.
    #[tracing::instrument(skip(self))]
    pub async fn resume(&self, id: Uuid) -> ServiceResult<RecurringBooking> {
        self.transition(id, "resume", |status| {
            (status == BookingStatus::Paused).then_some(BookingStatus::Active)
        })
        .await
    }

    /// ## Errors
    /// Returns `ServiceError::InvalidState` if the booking is already
    /// completed or cancelled.
    #[tracing::instrument(skip(self))]
    pub async fn cancel(&self, id: Uuid) -> ServiceResult<RecurringBooking> {
        self.transition(id, "cancel", |status| {
            (!status.is_terminal()).then_some(BookingStatus::Cancelled)
        })
        .await
    }

    async fn transition(
        &self,
        id: Uuid,
        action: &'static str,
        next: impl FnOnce(BookingStatus) -> Option<BookingStatus>,
    ) -> ServiceResult<RecurringBooking> {
        let mut booking = self.store.get_booking(id).await?;
        let expected_version = booking.version;
        let from = booking.status;

        booking.status = next(from).ok_or(ServiceError::InvalidState {
            booking_id: id,
            status: from,
            action,
        })?;

        let stored = self.store.update_booking(&booking, expected_version).await?;
        tracing::info!(booking_id = %id, %from, to = %stored.status, "Recurring booking status changed");
        Ok(stored)
    }

    /// ## Summary
    /// Creates or replaces the exception on `date`.
    ///
    /// The exception is validated together with the booking's other
    /// exceptions; an existing exception on the same date is replaced and
    /// keeps its id. Writing an exception bumps the booking's version, so an
    /// advance that read the old exceptions fails to commit.
    ///
    /// ## Errors
    /// - `ServiceError::InvalidState` if the booking is completed or cancelled.
    /// - `ServiceError::InvalidException` if `date` was already consumed.
    /// - `ServiceError::Conflict` if the booking changed since it was read.
    /// - Any validation error from [`ExceptionSet::build`].
    #[tracing::instrument(skip(self, request), fields(exception_type = %request.exception_type))]
    pub async fn put_exception(
        &self,
        booking_id: Uuid,
        date: NaiveDate,
        request: NewRecurrenceException,
    ) -> ServiceResult<RecurrenceException> {
        let booking = self.mutable_exceptions(booking_id).await?;
        if date < booking.next_occurrence_date {
            return Err(ServiceError::InvalidException {
                booking_id,
                date,
                reason: format!(
                    "date is before the next occurrence {}",
                    booking.next_occurrence_date
                ),
            });
        }

        let (same_date, mut others): (Vec<_>, Vec<_>) = self
            .store
            .list_exceptions(booking_id)
            .await?
            .into_iter()
            .partition(|existing| existing.exception_date == date);

        let exception = RecurrenceException {
            id: same_date
                .first()
                .map_or_else(Uuid::now_v7, |existing| existing.id),
            recurring_booking_id: booking_id,
            exception_date: date,
            exception_type: request.exception_type,
            new_date: request.new_date,
            new_time: request.new_time,
            reason: request.reason,
        };

        others.push(exception.clone());
        ExceptionSet::build(&booking, &others, self.expander.policy())?;

        let stored = self
            .store
            .upsert_exception(&exception, booking.version)
            .await?;
        tracing::info!(
            %booking_id,
            %date,
            replaced = !same_date.is_empty(),
            "Recurrence exception stored"
        );
        Ok(stored)
    }

    /// ## Errors
    /// - `ServiceError::NotFound` if there is no exception on `date`.
    /// - `ServiceError::InvalidState` if the booking is completed or cancelled.
    /// - `ServiceError::Conflict` if the booking changed since it was read.
    #[tracing::instrument(skip(self))]
    pub async fn remove_exception(&self, booking_id: Uuid, date: NaiveDate) -> ServiceResult<()> {
        let booking = self.mutable_exceptions(booking_id).await?;
        self.store
            .delete_exception(booking_id, date, booking.version)
            .await?;
        tracing::info!(%booking_id, %date, "Recurrence exception removed");
        Ok(())
    }

    /// Loads a booking whose exceptions may still change.
    async fn mutable_exceptions(&self, booking_id: Uuid) -> ServiceResult<RecurringBooking> {
        let booking = self.store.get_booking(booking_id).await?;
        if booking.status.is_terminal() {
            return Err(ServiceError::InvalidState {
                booking_id,
                status: booking.status,
                action: "change exceptions",
            });
        }
        Ok(booking)
    }

    /// ## Errors
    /// Returns `ServiceError::NotFound` if the booking does not exist.
    pub async fn list_exceptions(&self, booking_id: Uuid) -> ServiceResult<Vec<RecurrenceException>> {
        self.store.get_booking(booking_id).await?;
        self.store.list_exceptions(booking_id).await
    }

    /// ## Summary
    /// Expands the stored booking over `[range_start, range_end)` without
    /// changing anything.
    ///
    /// ## Errors
    /// Returns `ServiceError::NotFound` for an unknown booking, or any error
    /// from [`RecurrenceExpander::expand`].
    #[tracing::instrument(skip(self))]
    pub async fn preview(
        &self,
        booking_id: Uuid,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> ServiceResult<Vec<Occurrence>> {
        let booking = self.store.get_booking(booking_id).await?;
        let exceptions = self.store.list_exceptions(booking_id).await?;
        self.expander
            .expand(&booking, &exceptions, range_start, range_end)
    }

    /// ## Summary
    /// Materializes the occurrence at the booking's pointer.
    ///
    /// The booking update and the occurrence are committed together against
    /// the version that was read. A failed notification is logged and does
    /// not undo the commit.
    ///
    /// ## Errors
    /// - `ServiceError::InvalidState` if the booking is not active.
    /// - `ServiceError::Conflict` if the booking changed since it was read.
    /// - Any error from [`RecurrenceExpander::advance`].
    #[tracing::instrument(skip(self))]
    pub async fn generate_next(&self, booking_id: Uuid) -> ServiceResult<Advanced> {
        let booking = self.store.get_booking(booking_id).await?;
        let exceptions = self.store.list_exceptions(booking_id).await?;

        let mut advanced = self.expander.advance(&booking, &exceptions)?;
        advanced.booking = self
            .store
            .commit_advance(&advanced.booking, booking.version, advanced.occurrence.as_ref())
            .await?;

        if let Some(occurrence) = &advanced.occurrence
            && let Err(err) = self
                .notifier
                .occurrence_created(&advanced.booking, occurrence)
                .await
        {
            tracing::warn!(%booking_id, error = %err, "Failed to deliver occurrence notification");
        }

        Ok(advanced)
    }

    /// ## Errors
    /// Returns `ServiceError::NotFound` if the booking does not exist.
    pub async fn list_occurrences(&self, booking_id: Uuid) -> ServiceResult<Vec<Occurrence>> {
        self.store.get_booking(booking_id).await?;
        self.store.list_occurrences(booking_id).await
    }
}
