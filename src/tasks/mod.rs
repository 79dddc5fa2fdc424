//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod tick_driver;
pub mod snapshot_log;

// Re-export main functions
pub use tick_driver::tick_driver_task;
pub use snapshot_log::snapshot_log_task;
