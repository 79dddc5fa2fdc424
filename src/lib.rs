//! Countdown Timer - a countdown engine with an HTTP control surface
//! 
//! The engine keeps the interval configuration and the live countdown,
//! recomputing the remaining time from absolute timestamps on every
//! periodic wake-up. The HTTP layer is a thin presentation adapter over it.

pub mod config;
pub mod clock;
pub mod scheduler;
pub mod state;
pub mod format;
pub mod view;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, TimerEngine};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
