use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, handler};

use super::types::{booking_id, query_date, respond};
use crate::error::AppResult;
use crate::service_handler::get_service_from_depot;

/// ## Summary
/// GET /recurring-bookings/{id}/occurrences?from=YYYY-MM-DD&to=YYYY-MM-DD
///
/// Previews the occurrences in `[from, to)` without materializing them.
///
/// ## Errors
/// Returns HTTP 400 for missing or malformed dates or `from` after `to`.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
pub async fn preview_occurrences(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result: AppResult<_> = async {
        let id = booking_id(req)?;
        let from = query_date(req, "from")?;
        let to = query_date(req, "to")?;
        Ok(get_service_from_depot(depot)?.preview(id, from, to).await?)
    }
    .await;
    respond(res, StatusCode::OK, result);
}

/// ## Summary
/// GET /recurring-bookings/{id}/occurrences/materialized
///
/// ## Errors
/// Returns HTTP 404 if the booking does not exist.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
pub async fn list_materialized(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result: AppResult<_> = async {
        let id = booking_id(req)?;
        Ok(get_service_from_depot(depot)?.list_occurrences(id).await?)
    }
    .await;
    respond(res, StatusCode::OK, result);
}
