//! Periodic wake-up sources
//!
//! The engine registers one periodic wake-up per countdown and keeps the
//! returned [`TickHandle`] in its run state. Every wake-up is identified by
//! the [`SessionId`] of the registration that produced it, so deliveries that
//! arrive after the registration was cancelled can be told apart.

pub mod manual;
pub mod runtime;

use std::{fmt, time::Duration};

pub use manual::ManualScheduler;
pub use runtime::TokioScheduler;

/// Identifies a single periodic registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cancellation handle for a periodic registration.
///
/// Deliberately not `Clone`: whoever holds it is the only one able to cancel.
#[derive(Debug, PartialEq, Eq)]
pub struct TickHandle {
    session: SessionId,
}

impl TickHandle {
    pub fn new(session: SessionId) -> Self {
        Self { session }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }
}

/// Source of periodic wake-ups
pub trait Scheduler {
    /// Register a wake-up that fires every `every` until cancelled
    fn schedule_periodic(&mut self, every: Duration) -> TickHandle;

    /// Stop all future wake-ups of the given registration
    fn cancel(&mut self, handle: TickHandle);
}
