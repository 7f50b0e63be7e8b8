use chrono::NaiveDate;

use super::exception::{ExceptionAction, ExceptionSet};
use super::frequency::occurrence_dates;
use super::model::{Occurrence, RecurrenceException, RecurringBooking};
use super::policy::ExpansionPolicy;
use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// Expands recurring bookings into concrete occurrences.
///
/// Holds only the [`ExpansionPolicy`]; every call is a pure function of its
/// arguments, so repeated calls with the same inputs return the same output.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecurrenceExpander {
    policy: ExpansionPolicy,
}

impl RecurrenceExpander {
    #[must_use]
    pub const fn new(policy: ExpansionPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub const fn policy(&self) -> &ExpansionPolicy {
        &self.policy
    }

    /// ## Summary
    /// Lists the occurrences whose grid date lies in `[range_start, range_end)`.
    ///
    /// The grid is walked from `next_occurrence_date`, never re-anchored on
    /// `range_start`, and stops before `end_date` or once
    /// `max_occurrences` would be exhausted. Skipped and cancelled dates emit
    /// nothing. A rescheduled date emits one occurrence at its new date and
    /// time, even when that date falls outside the range.
    ///
    /// The result is sorted by effective date, then by grid date. Completed
    /// and cancelled bookings expand to nothing.
    ///
    /// ## Errors
    /// - `ServiceError::ValidationError` if `range_start > range_end` or the
    ///   walk exceeds `policy.max_candidates` grid dates.
    /// - Any error from [`ExceptionSet::build`].
    pub fn expand(
        &self,
        booking: &RecurringBooking,
        exceptions: &[RecurrenceException],
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> ServiceResult<Vec<Occurrence>> {
        if range_start > range_end {
            return Err(ServiceError::ValidationError(format!(
                "range start {range_start} is after range end {range_end}"
            )));
        }

        let exceptions = ExceptionSet::build(booking, exceptions, &self.policy)?;

        if booking.status.is_terminal() {
            tracing::debug!(
                booking_id = %booking.id,
                status = %booking.status,
                "Terminal booking has no occurrences"
            );
            return Ok(Vec::new());
        }

        let upper = booking
            .end_date
            .map_or(range_end, |end| end.min(range_end));

        let mut occurrences = Vec::new();
        let mut consumed: u32 = 0;
        let mut walked: u32 = 0;

        for scheduled in occurrence_dates(booking.next_occurrence_date, booking.frequency) {
            if scheduled >= upper {
                break;
            }
            if booking
                .max_occurrences
                .is_some_and(|max| booking.occurrence_count.saturating_add(consumed) >= max)
            {
                tracing::trace!(booking_id = %booking.id, %scheduled, "Occurrence limit reached");
                break;
            }

            walked += 1;
            if walked > self.policy.max_candidates {
                return Err(ServiceError::ValidationError(format!(
                    "recurring booking {}: range ending {range_end} spans more than {} occurrences",
                    booking.id, self.policy.max_candidates
                )));
            }

            let action = exceptions.get(scheduled);
            if self.policy.consumes_slot(action) {
                consumed += 1;
            }

            if scheduled < range_start {
                continue;
            }

            if let Some(occurrence) = materialize(booking, scheduled, action) {
                occurrences.push(occurrence);
            }
        }

        occurrences.sort_by_key(|occurrence| (occurrence.date, occurrence.scheduled_date));

        tracing::debug!(
            booking_id = %booking.id,
            %range_start,
            %range_end,
            walked,
            emitted = occurrences.len(),
            "Expanded recurring booking"
        );

        Ok(occurrences)
    }
}

/// Builds the occurrence for one grid date, or `None` if it is skipped or cancelled.
pub(super) fn materialize(
    booking: &RecurringBooking,
    scheduled: NaiveDate,
    action: Option<&ExceptionAction>,
) -> Option<Occurrence> {
    let (date, start_time, rescheduled) = match action {
        None => (scheduled, booking.start_time, false),
        Some(ExceptionAction::Skip | ExceptionAction::Cancel) => return None,
        Some(&ExceptionAction::Reschedule { date, time }) => (date, time, true),
    };

    Some(Occurrence {
        recurring_booking_id: booking.id,
        date,
        start_time,
        duration_minutes: booking.duration_minutes,
        scheduled_date: scheduled,
        rescheduled,
    })
}
