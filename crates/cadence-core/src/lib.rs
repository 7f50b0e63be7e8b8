//! Shared configuration, types and errors for the Cadence recurring booking service.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
pub mod util;
