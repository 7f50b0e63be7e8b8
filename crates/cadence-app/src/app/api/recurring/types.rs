use chrono::NaiveDate;
use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Request, Response};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Parses the `{id}` path segment.
pub(super) fn booking_id(req: &Request) -> AppResult<Uuid> {
    let raw = req
        .param::<String>("id")
        .ok_or_else(|| AppError::BadRequest("missing booking id".to_string()))?;
    Uuid::parse_str(&raw)
        .map_err(|e| AppError::BadRequest(format!("invalid booking id {raw:?}: {e}")))
}

/// Parses a `YYYY-MM-DD` path segment.
pub(super) fn path_date(req: &Request, name: &str) -> AppResult<NaiveDate> {
    let raw = req
        .param::<String>(name)
        .ok_or_else(|| AppError::BadRequest(format!("missing {name}")))?;
    parse_date(name, &raw)
}

/// Parses a required `YYYY-MM-DD` query parameter.
pub(super) fn query_date(req: &Request, name: &str) -> AppResult<NaiveDate> {
    let raw = req
        .query::<String>(name)
        .ok_or_else(|| AppError::BadRequest(format!("missing query parameter {name}")))?;
    parse_date(name, &raw)
}

fn parse_date(name: &str, raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| AppError::BadRequest(format!("invalid {name} {raw:?}: {e}")))
}

/// Renders `body` as JSON with `status`, or the error response.
pub(super) fn respond<T>(res: &mut Response, status: StatusCode, result: AppResult<T>)
where
    T: Serialize + Send,
{
    match result {
        Ok(body) => {
            res.status_code(status);
            res.render(Json(body));
        }
        Err(err) => err.write_to(res),
    }
}
