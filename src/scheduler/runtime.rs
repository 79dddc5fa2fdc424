//! Tokio-backed periodic wake-ups

use std::{collections::HashMap, time::Duration};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, warn};

use super::{Scheduler, SessionId, TickHandle};

/// Shortest period a registration is allowed to tick at
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Spawns one tokio task per registration.
///
/// Each task sends its [`SessionId`] down the tick channel whenever its
/// interval fires. Cancelling aborts the task; anything it already queued is
/// left for the receiver to discard.
#[derive(Debug)]
pub struct TokioScheduler {
    tick_tx: mpsc::UnboundedSender<SessionId>,
    tasks: HashMap<SessionId, JoinHandle<()>>,
    next_id: u64,
}

impl TokioScheduler {
    /// Create a scheduler together with the receiving end of its tick channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SessionId>) {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            tick_tx,
            tasks: HashMap::new(),
            next_id: 0,
        };
        (scheduler, tick_rx)
    }

    /// Number of registrations whose task is still alive
    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_periodic(&mut self, every: Duration) -> TickHandle {
        // interval_at panics on a zero period
        let every = every.max(MIN_PERIOD);
        let session = SessionId::new(self.next_id);
        self.next_id += 1;

        let tick_tx = self.tick_tx.clone();
        let task = tokio::spawn(async move {
            // First wake-up one full period after registration
            let mut ticker = interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if tick_tx.send(session).is_err() {
                    warn!("Tick channel closed, stopping wake-up {}", session);
                    break;
                }
            }
        });

        debug!("Wake-up {} registered every {:?}", session, every);
        self.tasks.insert(session, task);
        TickHandle::new(session)
    }

    fn cancel(&mut self, handle: TickHandle) {
        let session = handle.session();
        match self.tasks.remove(&session) {
            Some(task) => {
                task.abort();
                debug!("Wake-up {} cancelled", session);
            }
            None => debug!("Wake-up {} was not registered", session),
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
