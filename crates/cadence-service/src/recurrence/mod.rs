//! Recurring booking expansion.
//!
//! ## Summary
//! A recurring booking walks a fixed grid of dates from its next occurrence
//! pointer. Exceptions keyed by grid date skip, cancel or reschedule single
//! occurrences. Everything in this module is pure: [`RecurrenceExpander`]
//! receives loaded records and returns plain data, and [`advance`] works on a
//! copy of the booking.
//!
//! [`advance`]: RecurrenceExpander::advance

mod advance;
mod exception;
mod expand;
mod frequency;
mod model;
mod policy;

pub use advance::Advanced;
pub use exception::{ExceptionAction, ExceptionSet};
pub use expand::RecurrenceExpander;
pub use frequency::{OccurrenceDates, compute_next_occurrence_date, occurrence_dates};
pub use model::{Occurrence, RecurrenceException, RecurringBooking};
pub use policy::ExpansionPolicy;
