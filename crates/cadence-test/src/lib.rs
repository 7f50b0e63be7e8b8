//! Cadence recurring booking service - integration test support.
//!
//! This crate re-exports the workspace crates so integration tests can use
//! `cadence_test::` paths.

pub mod component {
    pub use cadence_core::{constants, error as core_error, types, util};
    pub use cadence_service::{booking, error, notify, recurrence, store};

    // Re-export config from both core and app
    pub mod config {
        pub use cadence_app::config::{ConfigHandler, get_config_from_depot};
        pub use cadence_core::config::*;
    }
}

// Re-export top-level modules for convenience
pub mod app {
    pub use cadence_app::error;
    pub use cadence_app::service_handler;

    pub mod api {
        pub use cadence_app::app::api::*;
    }
}
