//! Recurring booking lifecycle on top of the storage and notification ports.

use cadence_core::types::{ExceptionType, Frequency};
use cadence_core::util::time::{hhmm, hhmm_option};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;

mod service;

pub use service::RecurringBookingService;

/// Customer request for a new recurring booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NewRecurringBooking {
    pub customer_id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub frequency: Frequency,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
    pub first_occurrence_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub max_occurrences: Option<u32>,
}

/// Exception body; the booking and the overridden date come from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewRecurrenceException {
    pub exception_type: ExceptionType,
    #[serde(default)]
    pub new_date: Option<NaiveDate>,
    #[serde(default, with = "hhmm_option")]
    pub new_time: Option<NaiveTime>,
    #[serde(default)]
    pub reason: Option<String>,
}
