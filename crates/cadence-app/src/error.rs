use cadence_core::error::CoreError;
use cadence_service::error::{ErrorKind, ServiceError};
use salvo::http::StatusCode;
use salvo::writing::Json;
use serde::Serialize;
use thiserror::Error;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    CoreError(#[from] CoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::ServiceError(err) => match err.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::State | ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::CoreError(CoreError::InvalidFrequency(_) | CoreError::ParseError(_))
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::CoreError(CoreError::ConfigError(_) | CoreError::InvariantViolation(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// ## Summary
    /// Writes the status and an `{"error": ...}` body to the response.
    ///
    /// Server errors are logged and answered with a generic message.
    pub fn write_to(&self, res: &mut salvo::Response) {
        let status = self.status_code();
        let error = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
            self.to_string()
        };
        res.status_code(status);
        res.render(Json(ErrorResponse { error }));
    }
}
