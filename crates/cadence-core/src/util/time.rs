//! Wall-clock `HH:MM` helpers.
//!
//! ## Summary
//! Booking start times are stored and exchanged as `HH:MM` strings. These
//! helpers parse and format them and provide serde adapters for model fields.

use chrono::{NaiveTime, Timelike};

use crate::error::{CoreError, CoreResult};

/// ## Summary
/// Parses a wall-clock time in `HH:MM` form.
///
/// A trailing `:SS` component is accepted when it is `00`.
///
/// ## Errors
/// Returns `CoreError::ParseError` if the input is not a valid time of day
/// or carries non-zero seconds.
pub fn parse_hhmm(value: &str) -> CoreResult<NaiveTime> {
    let trimmed = value.trim();
    let parsed = NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_err| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|err| CoreError::ParseError(format!("invalid time {value:?}: {err}")))?;

    if parsed.second() != 0 || parsed.nanosecond() != 0 {
        return Err(CoreError::ParseError(format!(
            "invalid time {value:?}: seconds are not supported"
        )));
    }

    Ok(parsed)
}

/// Formats a wall-clock time as `HH:MM`.
#[must_use]
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Serde adapter for `NaiveTime` fields stored as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    /// ## Errors
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hhmm(*time))
    }

    /// ## Errors
    /// Returns a deserializer error if the value is not a valid `HH:MM` string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional `NaiveTime` fields stored as `HH:MM`.
pub mod hhmm_option {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    /// ## Errors
    /// Propagates serializer errors.
    #[expect(
        clippy::ref_option,
        reason = "serde's serialize_with passes a reference to the field"
    )]
    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => serializer.serialize_some(&super::format_hhmm(*time)),
            None => serializer.serialize_none(),
        }
    }

    /// ## Errors
    /// Returns a deserializer error if a present value is not a valid `HH:MM` string.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| super::parse_hhmm(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}
