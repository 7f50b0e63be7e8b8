use std::collections::BTreeMap;

use cadence_core::types::ExceptionType;
use chrono::{NaiveDate, NaiveTime};

use super::frequency::occurrence_dates;
use super::model::{RecurrenceException, RecurringBooking};
use super::policy::ExpansionPolicy;
use crate::error::{ServiceError, ServiceResult};

/// What happens to a single grid date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionAction {
    Skip,
    Cancel,
    Reschedule { date: NaiveDate, time: NaiveTime },
}

impl ExceptionAction {
    /// ## Summary
    /// Interprets a stored exception row.
    ///
    /// ## Errors
    /// Returns `ServiceError::InvalidException` if a reschedule lacks
    /// `new_date` or `new_time`, or a skip/cancel carries either.
    pub fn from_exception(exception: &RecurrenceException) -> ServiceResult<Self> {
        let invalid = |reason: &str| ServiceError::InvalidException {
            booking_id: exception.recurring_booking_id,
            date: exception.exception_date,
            reason: reason.to_string(),
        };

        match exception.exception_type {
            ExceptionType::Reschedule => match (exception.new_date, exception.new_time) {
                (Some(date), Some(time)) => Ok(Self::Reschedule { date, time }),
                (None, _) => Err(invalid("reschedule requires new_date")),
                (Some(_), None) => Err(invalid("reschedule requires new_time")),
            },
            kind @ (ExceptionType::Skip | ExceptionType::Cancel) => {
                if exception.new_date.is_some() || exception.new_time.is_some() {
                    return Err(invalid(&format!(
                        "new_date and new_time are only allowed on reschedule, not {kind}"
                    )));
                }
                Ok(if kind == ExceptionType::Skip {
                    Self::Skip
                } else {
                    Self::Cancel
                })
            }
        }
    }

    #[must_use]
    pub const fn exception_type(&self) -> ExceptionType {
        match self {
            Self::Skip => ExceptionType::Skip,
            Self::Cancel => ExceptionType::Cancel,
            Self::Reschedule { .. } => ExceptionType::Reschedule,
        }
    }
}

/// Validated exceptions of one recurring booking, keyed by grid date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionSet {
    actions: BTreeMap<NaiveDate, ExceptionAction>,
}

impl ExceptionSet {
    /// ## Summary
    /// Validates a booking's exceptions and indexes them by date.
    ///
    /// Exceptions dated before `next_occurrence_date` refer to occurrences
    /// that were already consumed; they are kept but never consulted again.
    ///
    /// ## Errors
    /// - `ServiceError::InvalidException` if an exception belongs to another
    ///   booking, has inconsistent reschedule fields, or is dated on or after
    ///   the pointer without landing on a grid date before `end_date`.
    /// - `ServiceError::DuplicateException` if two exceptions share a date.
    /// - `ServiceError::ValidationError` if locating an exception would walk
    ///   more than `policy.max_candidates` grid dates.
    pub fn build(
        booking: &RecurringBooking,
        exceptions: &[RecurrenceException],
        policy: &ExpansionPolicy,
    ) -> ServiceResult<Self> {
        let mut actions = BTreeMap::new();

        for exception in exceptions {
            if exception.recurring_booking_id != booking.id {
                return Err(ServiceError::InvalidException {
                    booking_id: booking.id,
                    date: exception.exception_date,
                    reason: format!(
                        "exception {} belongs to recurring booking {}",
                        exception.id, exception.recurring_booking_id
                    ),
                });
            }

            let action = ExceptionAction::from_exception(exception)?;
            if actions.insert(exception.exception_date, action).is_some() {
                return Err(ServiceError::DuplicateException {
                    booking_id: booking.id,
                    date: exception.exception_date,
                });
            }
        }

        let set = Self { actions };
        set.check_on_grid(booking, policy.max_candidates)?;

        tracing::trace!(
            booking_id = %booking.id,
            exception_count = set.actions.len(),
            "Exception set validated"
        );
        Ok(set)
    }

    /// Walks the grid once, in step with the pending exception dates.
    fn check_on_grid(&self, booking: &RecurringBooking, max_candidates: u32) -> ServiceResult<()> {
        let off_grid = |date: NaiveDate, reason: &str| ServiceError::InvalidException {
            booking_id: booking.id,
            date,
            reason: reason.to_string(),
        };

        let mut grid = occurrence_dates(booking.next_occurrence_date, booking.frequency).peekable();
        let mut walked: u32 = 0;

        for &date in self.actions.range(booking.next_occurrence_date..).map(|(date, _)| date) {
            if booking.end_date.is_some_and(|end| date >= end) {
                return Err(off_grid(date, "date is on or after the booking's end date"));
            }

            while let Some(&candidate) = grid.peek() {
                if candidate >= date {
                    break;
                }
                walked += 1;
                if walked > max_candidates {
                    return Err(ServiceError::ValidationError(format!(
                        "recurring booking {}: exception on {date} is more than {} occurrences ahead",
                        booking.id, max_candidates
                    )));
                }
                grid.next();
            }

            if grid.peek() != Some(&date) {
                return Err(off_grid(
                    date,
                    &format!(
                        "date is not a scheduled {} occurrence",
                        booking.frequency
                    ),
                ));
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<&ExceptionAction> {
        self.actions.get(&date)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
