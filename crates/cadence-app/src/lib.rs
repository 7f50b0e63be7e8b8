//! HTTP surface for the recurring booking service.

pub mod app;
pub mod config;
pub mod error;
pub mod service_handler;
