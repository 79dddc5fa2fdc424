//! State management module
//! 
//! This module contains the countdown engine, its configuration and run
//! state, and the shared application state wrapping it.

pub mod interval;
pub mod run_state;
pub mod engine;
pub mod timer_state;
pub mod app_state;

// Re-export main types
pub use interval::{FieldInput, Interval, Repetitions};
pub use run_state::{Countdown, RunState};
pub use engine::{TickOutcome, TimerEngine, DEFAULT_UPDATE_RATE};
pub use timer_state::TimerSnapshot;
pub use app_state::{AppState, LiveEngine};
