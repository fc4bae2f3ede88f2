//! Background Tasks Module
//!
//! Contains background tasks that run periodically for the lifetime of the
//! cache.
//!
//! # Tasks
//! - Refresh: offers every resident entry to the registered revalidator at
//!   configured intervals

mod refresh;

pub use refresh::spawn_refresh_task;
