//! Recurring booking domain logic.
//!
//! The [`recurrence`] module is pure: it takes fully loaded records and
//! returns plain data. Persistence, notification and the read-advance-commit
//! unit of work live in [`store`], [`notify`] and [`booking`].

pub mod booking;
pub mod error;
pub mod notify;
pub mod recurrence;
pub mod store;
