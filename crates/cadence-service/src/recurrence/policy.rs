use cadence_core::config::RecurrenceConfig;

use super::exception::ExceptionAction;

/// Tunable rules applied while walking a booking's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionPolicy {
    /// Whether a skipped date uses up one of `max_occurrences`.
    pub skip_consumes_slot: bool,
    /// Whether a cancelled date uses up one of `max_occurrences`.
    pub cancel_consumes_slot: bool,
    /// Upper bound on grid dates walked by a single call.
    pub max_candidates: u32,
}

impl Default for ExpansionPolicy {
    fn default() -> Self {
        Self::from(&RecurrenceConfig::default())
    }
}

impl From<&RecurrenceConfig> for ExpansionPolicy {
    fn from(config: &RecurrenceConfig) -> Self {
        Self {
            skip_consumes_slot: config.skip_consumes_slot,
            cancel_consumes_slot: config.cancel_consumes_slot,
            max_candidates: config.max_candidates,
        }
    }
}

impl ExpansionPolicy {
    /// Whether consuming a grid date with the given exception counts toward
    /// `max_occurrences`. Plain and rescheduled dates always do.
    #[must_use]
    pub const fn consumes_slot(self, action: Option<&ExceptionAction>) -> bool {
        match action {
            None | Some(ExceptionAction::Reschedule { .. }) => true,
            Some(ExceptionAction::Skip) => self.skip_consumes_slot,
            Some(ExceptionAction::Cancel) => self.cancel_consumes_slot,
        }
    }
}
