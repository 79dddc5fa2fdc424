//! Scheduler that never fires on its own

use std::time::Duration;
use tracing::debug;

use super::{Scheduler, SessionId, TickHandle};

/// Records registrations and cancellations; ticks are delivered by the caller
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    active: Vec<(SessionId, Duration)>,
    cancelled: Vec<SessionId>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registrations that have not been cancelled yet
    pub fn active(&self) -> Vec<SessionId> {
        self.active.iter().map(|(session, _)| *session).collect()
    }

    /// Period of an active registration
    pub fn period_of(&self, session: SessionId) -> Option<Duration> {
        self.active
            .iter()
            .find(|(id, _)| *id == session)
            .map(|(_, every)| *every)
    }

    /// Registrations cancelled so far, in cancellation order
    pub fn cancelled(&self) -> &[SessionId] {
        &self.cancelled
    }

    pub fn is_active(&self, session: SessionId) -> bool {
        self.active.iter().any(|(id, _)| *id == session)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_periodic(&mut self, every: Duration) -> TickHandle {
        let session = SessionId::new(self.next_id);
        self.next_id += 1;
        self.active.push((session, every));
        debug!("Manual wake-up {} registered every {:?}", session, every);
        TickHandle::new(session)
    }

    fn cancel(&mut self, handle: TickHandle) {
        let session = handle.session();
        self.active.retain(|(id, _)| *id != session);
        self.cancelled.push(session);
        debug!("Manual wake-up {} cancelled", session);
    }
}
