use salvo::async_trait;
use std::sync::Arc;

use crate::error::AppResult;
use cadence_core::error::CoreError;
use cadence_service::booking::RecurringBookingService;

pub struct BookingServiceHandler {
    pub service: Arc<RecurringBookingService>,
}

#[async_trait]
impl salvo::Handler for BookingServiceHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.service));
    }
}

/// ## Summary
/// Retrieves the recurring booking service from the depot.
///
/// ## Errors
/// Returns an error if the service is not found in the depot.
pub fn get_service_from_depot(depot: &salvo::Depot) -> AppResult<Arc<RecurringBookingService>> {
    depot
        .obtain::<Arc<RecurringBookingService>>()
        .cloned()
        .map_err(|_err| {
            CoreError::InvariantViolation("Recurring booking service not found in depot").into()
        })
}
