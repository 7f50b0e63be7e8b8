use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, handler};

use cadence_service::booking::NewRecurringBooking;
use cadence_service::recurrence::{Advanced, RecurringBooking};

use super::types::{booking_id, respond};
use crate::error::{AppError, AppResult};
use crate::service_handler::get_service_from_depot;

/// ## Summary
/// POST /recurring-bookings - Create a recurring booking.
///
/// ## Errors
/// Returns HTTP 400 for a malformed body or an invalid definition.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
pub async fn create_booking(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = create(req, depot).await;
    respond(res, StatusCode::CREATED, result);
}

async fn create(req: &mut Request, depot: &Depot) -> AppResult<RecurringBooking> {
    let request: NewRecurringBooking = req.parse_json().await.map_err(|e| {
        tracing::debug!(error = ?e, "Failed to parse create booking request");
        AppError::BadRequest(format!("Invalid request body: {e}"))
    })?;
    let service = get_service_from_depot(depot)?;
    Ok(service.create(request).await?)
}

/// ## Summary
/// GET /recurring-bookings/{id}
///
/// ## Errors
/// Returns HTTP 404 if the booking does not exist.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
pub async fn get_booking(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result: AppResult<_> = async {
        let id = booking_id(req)?;
        Ok(get_service_from_depot(depot)?.get(id).await?)
    }
    .await;
    respond(res, StatusCode::OK, result);
}

/// ## Summary
/// POST /recurring-bookings/{id}/pause
///
/// ## Errors
/// Returns HTTP 409 unless the booking is active.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
pub async fn pause_booking(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result: AppResult<_> = async {
        let id = booking_id(req)?;
        Ok(get_service_from_depot(depot)?.pause(id).await?)
    }
    .await;
    respond(res, StatusCode::OK, result);
}

/// ## Summary
/// POST /recurring-bookings/{id}/resume
///
/// ## Errors
/// Returns HTTP 409 unless the booking is paused.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
pub async fn resume_booking(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result: AppResult<_> = async {
        let id = booking_id(req)?;
        Ok(get_service_from_depot(depot)?.resume(id).await?)
    }
    .await;
    respond(res, StatusCode::OK, result);
}

/// ## Summary
/// POST /recurring-bookings/{id}/cancel
///
/// ## Errors
/// Returns HTTP 409 if the booking is already completed or cancelled.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
pub async fn cancel_booking(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result: AppResult<_> = async {
        let id = booking_id(req)?;
        Ok(get_service_from_depot(depot)?.cancel(id).await?)
    }
    .await;
    respond(res, StatusCode::OK, result);
}

/// ## Summary
/// POST /recurring-bookings/{id}/generate-next - Materialize the next
/// occurrence and move the pointer.
///
/// ## Errors
/// Returns HTTP 409 if the booking is not active or was modified
/// concurrently, and HTTP 400 if its exceptions are invalid.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
pub async fn generate_next(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result: AppResult<Advanced> = async {
        let id = booking_id(req)?;
        Ok(get_service_from_depot(depot)?.generate_next(id).await?)
    }
    .await;
    respond(res, StatusCode::OK, result);
}
