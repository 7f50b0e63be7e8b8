use cadence_core::error::CoreError;
use cadence_core::types::BookingStatus;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Service layer errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    CoreError(#[from] CoreError),

    #[error("Recurring booking {booking_id}: invalid exception on {date}: {reason}")]
    InvalidException {
        booking_id: Uuid,
        date: NaiveDate,
        reason: String,
    },

    #[error("Recurring booking {booking_id}: an exception already exists on {date}")]
    DuplicateException { booking_id: Uuid, date: NaiveDate },

    #[error("Recurring booking {booking_id} is {status}; cannot {action}")]
    InvalidState {
        booking_id: Uuid,
        status: BookingStatus,
        action: &'static str,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

/// Coarse classification used by callers to pick a user-facing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    State,
    NotFound,
    Conflict,
    Internal,
}

impl ServiceError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::CoreError(CoreError::InvalidFrequency(_) | CoreError::ParseError(_))
            | Self::InvalidException { .. }
            | Self::DuplicateException { .. }
            | Self::ValidationError(_) => ErrorKind::Validation,
            Self::InvalidState { .. } => ErrorKind::State,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::CoreError(CoreError::ConfigError(_) | CoreError::InvariantViolation(_))
            | Self::InvariantViolation(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn booking_not_found(id: Uuid) -> Self {
        Self::NotFound(format!("recurring booking {id}"))
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
