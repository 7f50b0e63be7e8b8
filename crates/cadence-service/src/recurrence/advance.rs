use cadence_core::types::{BookingStatus, ExceptionType};
use chrono::NaiveDate;
use serde::Serialize;

use super::exception::{ExceptionAction, ExceptionSet};
use super::expand::{RecurrenceExpander, materialize};
use super::frequency::compute_next_occurrence_date;
use super::model::{Occurrence, RecurrenceException, RecurringBooking};
use crate::error::{ServiceError, ServiceResult};

/// Result of consuming one grid date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advanced {
    /// The booking after the pointer moved. Not yet persisted.
    pub booking: RecurringBooking,
    /// Grid date that was consumed, or `None` if the booking only completed.
    pub consumed_date: Option<NaiveDate>,
    /// Exception applied to the consumed date, if any.
    pub exception_type: Option<ExceptionType>,
    /// Occurrence to write to the booking store; `None` for skip and cancel.
    pub occurrence: Option<Occurrence>,
}

impl RecurrenceExpander {
    /// ## Summary
    /// Consumes the grid date at `next_occurrence_date`.
    ///
    /// Moves the pointer one period forward and, unless the consumed date was
    /// skipped or cancelled (see [`ExpansionPolicy`](super::ExpansionPolicy)),
    /// increments `occurrence_count`. The booking becomes completed once the
    /// pointer reaches `end_date` or the count reaches `max_occurrences`. An
    /// active booking that is already exhausted is only marked completed.
    ///
    /// The input is not modified; the caller persists the returned booking.
    ///
    /// ## Errors
    /// - `ServiceError::InvalidState` if the booking is not active.
    /// - Any error from [`ExceptionSet::build`] or
    ///   [`compute_next_occurrence_date`].
    pub fn advance(
        &self,
        booking: &RecurringBooking,
        exceptions: &[RecurrenceException],
    ) -> ServiceResult<Advanced> {
        if booking.status != BookingStatus::Active {
            return Err(ServiceError::InvalidState {
                booking_id: booking.id,
                status: booking.status,
                action: "advance",
            });
        }

        let exceptions = ExceptionSet::build(booking, exceptions, self.policy())?;
        let mut updated = booking.clone();

        if updated.limit_reached() || updated.window_closed() {
            updated.status = BookingStatus::Completed;
            tracing::info!(
                booking_id = %booking.id,
                occurrence_count = updated.occurrence_count,
                "Recurring booking already exhausted; marking completed"
            );
            return Ok(Advanced {
                booking: updated,
                consumed_date: None,
                exception_type: None,
                occurrence: None,
            });
        }

        let scheduled = booking.next_occurrence_date;
        let action = exceptions.get(scheduled);
        let occurrence = materialize(booking, scheduled, action);

        updated.next_occurrence_date = compute_next_occurrence_date(scheduled, booking.frequency)?;
        if self.policy().consumes_slot(action) {
            updated.occurrence_count = updated
                .occurrence_count
                .checked_add(1)
                .ok_or(ServiceError::InvariantViolation("occurrence_count overflow"))?;
        }
        if updated.limit_reached() || updated.window_closed() {
            updated.status = BookingStatus::Completed;
        }

        tracing::debug!(
            booking_id = %booking.id,
            %scheduled,
            next = %updated.next_occurrence_date,
            occurrence_count = updated.occurrence_count,
            status = %updated.status,
            materialized = occurrence.is_some(),
            "Advanced recurring booking"
        );

        Ok(Advanced {
            booking: updated,
            consumed_date: Some(scheduled),
            exception_type: action.map(ExceptionAction::exception_type),
            occurrence,
        })
    }
}
