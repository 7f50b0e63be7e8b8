//! Post-commit notification port.

use std::future::Future;
use std::pin::Pin;

use crate::error::ServiceResult;
use crate::recurrence::{Occurrence, RecurringBooking};

pub type NotifyFuture<'a> = Pin<Box<dyn Future<Output = ServiceResult<()>> + Send + 'a>>;

/// Told about every occurrence after it has been committed.
///
/// Delivery failures are reported to the caller but never undo the commit.
pub trait OccurrenceNotifier: Send + Sync {
    fn occurrence_created<'a>(
        &'a self,
        booking: &'a RecurringBooking,
        occurrence: &'a Occurrence,
    ) -> NotifyFuture<'a>;
}

/// Emits one structured log event per occurrence.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl OccurrenceNotifier for TracingNotifier {
    fn occurrence_created<'a>(
        &'a self,
        booking: &'a RecurringBooking,
        occurrence: &'a Occurrence,
    ) -> NotifyFuture<'a> {
        Box::pin(async move {
            tracing::info!(
                booking_id = %booking.id,
                customer_id = %booking.customer_id,
                provider_id = %booking.provider_id,
                service_id = %booking.service_id,
                starts_at = %occurrence.starts_at(),
                ends_at = occurrence.ends_at().map(tracing::field::display),
                rescheduled = occurrence.rescheduled,
                "Occurrence created"
            );
            Ok(())
        })
    }
}
