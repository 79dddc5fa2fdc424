//! Clock sources used by the timer engine

use std::{
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
    time::Instant,
};
use chrono::{DateTime, TimeDelta, Utc};

/// Supplies the current wall-clock time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time that never goes backwards.
///
/// The wall clock is read once at construction; later readings add the
/// monotonic time elapsed since then, so clock adjustments do not move it.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    anchor: DateTime<Utc>,
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            anchor: Utc::now(),
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        self.anchor + TimeDelta::from_std(self.started.elapsed()).unwrap_or_else(|_| TimeDelta::zero())
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same underlying time, so a handle kept outside the engine
/// can advance the clock the engine reads from.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    /// Create a clock positioned at the UNIX epoch
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock positioned at `millis` since the UNIX epoch
    pub fn at_millis(millis: i64) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(millis)),
        }
    }

    /// Move the clock forward by `delta`
    pub fn advance(&self, delta: TimeDelta) {
        self.millis.fetch_add(delta.num_milliseconds(), Ordering::SeqCst);
    }

    /// Jump to an absolute position in milliseconds since the epoch
    pub fn set_millis(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}
