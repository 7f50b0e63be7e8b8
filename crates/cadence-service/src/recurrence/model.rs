use cadence_core::types::{BookingStatus, ExceptionType, Frequency};
use cadence_core::util::time::{hhmm, hhmm_option};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

/// A booking that repeats on a fixed grid of dates.
///
/// `next_occurrence_date` is the earliest grid date that has not been
/// materialized yet. It only moves forward, through
/// [`RecurrenceExpander::advance`](super::RecurrenceExpander::advance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringBooking {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub frequency: Frequency,
    pub status: BookingStatus,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
    pub next_occurrence_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub max_occurrences: Option<u32>,
    #[serde(default)]
    pub occurrence_count: u32,
    /// Bumped by the store on every persisted mutation.
    #[serde(default)]
    pub version: u64,
}

impl RecurringBooking {
    /// True once `occurrence_count` has reached `max_occurrences`.
    #[must_use]
    pub fn limit_reached(&self) -> bool {
        self.max_occurrences
            .is_some_and(|max| self.occurrence_count >= max)
    }

    /// True once the pointer has reached `end_date`. The end date itself is
    /// never scheduled.
    #[must_use]
    pub fn window_closed(&self) -> bool {
        self.end_date
            .is_some_and(|end| self.next_occurrence_date >= end)
    }

    /// ## Summary
    /// Checks the field-level invariants of a booking definition.
    ///
    /// ## Errors
    /// Returns `ServiceError::ValidationError` if the duration is zero or
    /// `max_occurrences` is zero, and `ServiceError::InvariantViolation` if
    /// the occurrence count exceeds the cap.
    pub fn validate(&self) -> ServiceResult<()> {
        if self.duration_minutes == 0 {
            return Err(ServiceError::ValidationError(format!(
                "recurring booking {}: duration_minutes must be positive",
                self.id
            )));
        }
        if self.max_occurrences == Some(0) {
            return Err(ServiceError::ValidationError(format!(
                "recurring booking {}: max_occurrences must be positive",
                self.id
            )));
        }
        if self
            .max_occurrences
            .is_some_and(|max| self.occurrence_count > max)
        {
            return Err(ServiceError::InvariantViolation(
                "occurrence_count exceeds max_occurrences",
            ));
        }
        Ok(())
    }
}

/// An override for one grid date of a recurring booking.
///
/// `new_date` and `new_time` are only meaningful for reschedules;
/// [`ExceptionSet::build`](super::ExceptionSet::build) enforces that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceException {
    pub id: Uuid,
    pub recurring_booking_id: Uuid,
    pub exception_date: NaiveDate,
    pub exception_type: ExceptionType,
    #[serde(default)]
    pub new_date: Option<NaiveDate>,
    #[serde(default, with = "hhmm_option")]
    pub new_time: Option<NaiveTime>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// One concrete instance of a recurring booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub recurring_booking_id: Uuid,
    /// Effective date, after any reschedule.
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
    /// The grid date this occurrence was generated from.
    pub scheduled_date: NaiveDate,
    pub rescheduled: bool,
}

impl Occurrence {
    #[must_use]
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    /// `None` if the end falls past the last representable date.
    #[must_use]
    pub fn ends_at(&self) -> Option<NaiveDateTime> {
        self.starts_at()
            .checked_add_signed(TimeDelta::minutes(i64::from(self.duration_minutes)))
    }
}
