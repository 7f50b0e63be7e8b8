use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, handler};

use cadence_service::booking::NewRecurrenceException;
use cadence_service::recurrence::RecurrenceException;

use super::types::{booking_id, path_date, respond};
use crate::error::{AppError, AppResult};
use crate::service_handler::get_service_from_depot;

/// ## Summary
/// GET /recurring-bookings/{id}/exceptions
///
/// ## Errors
/// Returns HTTP 404 if the booking does not exist.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
pub async fn list_exceptions(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result: AppResult<_> = async {
        let id = booking_id(req)?;
        Ok(get_service_from_depot(depot)?.list_exceptions(id).await?)
    }
    .await;
    respond(res, StatusCode::OK, result);
}

/// ## Summary
/// PUT /recurring-bookings/{id}/exceptions/{date} - Create or replace the
/// exception for one scheduled date.
///
/// ## Errors
/// Returns HTTP 400 if the exception is inconsistent or not on the booking's
/// schedule, and HTTP 409 if the booking is completed or cancelled.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
pub async fn put_exception(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = put(req, depot).await;
    respond(res, StatusCode::OK, result);
}

async fn put(req: &mut Request, depot: &Depot) -> AppResult<RecurrenceException> {
    let id = booking_id(req)?;
    let date = path_date(req, "date")?;
    let request: NewRecurrenceException = req.parse_json().await.map_err(|e| {
        tracing::debug!(error = ?e, "Failed to parse exception request");
        AppError::BadRequest(format!("Invalid request body: {e}"))
    })?;
    Ok(get_service_from_depot(depot)?
        .put_exception(id, date, request)
        .await?)
}

/// ## Summary
/// DELETE /recurring-bookings/{id}/exceptions/{date}
///
/// ## Errors
/// Returns HTTP 404 if there is no exception on that date.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
pub async fn delete_exception(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result: AppResult<()> = async {
        let id = booking_id(req)?;
        let date = path_date(req, "date")?;
        Ok(get_service_from_depot(depot)?
            .remove_exception(id, date)
            .await?)
    }
    .await;

    match result {
        Ok(()) => {
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(err) => err.write_to(res),
    }
}
