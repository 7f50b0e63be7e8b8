use cadence_core::types::Frequency;
use chrono::{Days, Months, NaiveDate};

use crate::error::{ServiceError, ServiceResult};

/// Steps a date forward by one period, or `None` past the end of the calendar.
///
/// Month-based steps clamp to the last day of the target month, and each
/// step chains from the previous result: Jan 31 -> Feb 28 -> Mar 28.
fn step(date: NaiveDate, frequency: Frequency) -> Option<NaiveDate> {
    match frequency {
        Frequency::Weekly => date.checked_add_days(Days::new(7)),
        Frequency::Biweekly => date.checked_add_days(Days::new(14)),
        Frequency::Monthly => date.checked_add_months(Months::new(1)),
        Frequency::Quarterly => date.checked_add_months(Months::new(3)),
    }
}

/// ## Summary
/// Returns the grid date following `current` for the given frequency.
///
/// ## Errors
/// Returns `ServiceError::ValidationError` if the result is past the last
/// representable date.
pub fn compute_next_occurrence_date(
    current: NaiveDate,
    frequency: Frequency,
) -> ServiceResult<NaiveDate> {
    step(current, frequency).ok_or_else(|| {
        ServiceError::ValidationError(format!(
            "no {frequency} occurrence after {current}: date out of range"
        ))
    })
}

/// Unbounded iterator over grid dates, starting with `start` itself.
#[derive(Debug, Clone)]
pub struct OccurrenceDates {
    next: Option<NaiveDate>,
    frequency: Frequency,
}

impl Iterator for OccurrenceDates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = step(current, self.frequency);
        Some(current)
    }
}

#[must_use]
pub const fn occurrence_dates(start: NaiveDate, frequency: Frequency) -> OccurrenceDates {
    OccurrenceDates {
        next: Some(start),
        frequency,
    }
}
