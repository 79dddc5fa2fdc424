//! Live countdown state

use chrono::{DateTime, TimeDelta, Utc};

use crate::scheduler::{SessionId, TickHandle};

/// Either nothing is counting down, or a full countdown is in progress
#[derive(Debug, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running(Countdown),
}

impl RunState {
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running(_))
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        match self {
            RunState::Running(countdown) => Some(countdown),
            RunState::Idle => None,
        }
    }
}

/// Timestamps of an active countdown and the wake-up driving it
#[derive(Debug)]
pub struct Countdown {
    start_time: DateTime<Utc>,
    current_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    time_remaining: TimeDelta,
    handle: TickHandle,
}

impl Countdown {
    /// Begin counting `duration` down from `now`
    pub fn begin(now: DateTime<Utc>, duration: TimeDelta, handle: TickHandle) -> Self {
        Self {
            start_time: now,
            current_time: now,
            end_time: now + duration,
            time_remaining: duration,
            handle,
        }
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn current_time(&self) -> DateTime<Utc> {
        self.current_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn time_remaining(&self) -> TimeDelta {
        self.time_remaining
    }

    pub fn session(&self) -> SessionId {
        self.handle.session()
    }

    /// Time left at `now`; may be zero or negative
    pub fn remaining_at(&self, now: DateTime<Utc>) -> TimeDelta {
        self.end_time - now
    }

    /// Record a tick observed at `now`
    pub(crate) fn advance_to(&mut self, now: DateTime<Utc>) {
        self.current_time = now;
        self.time_remaining = self.remaining_at(now);
    }

    pub(crate) fn into_handle(self) -> TickHandle {
        self.handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    #[test]
    fn test_begin_sets_end_time() {
        let handle = TickHandle::new(SessionId::new(3));
        let countdown = Countdown::begin(at(1_000), TimeDelta::seconds(5), handle);

        assert_eq!(countdown.start_time(), at(1_000));
        assert_eq!(countdown.current_time(), at(1_000));
        assert_eq!(countdown.end_time(), at(6_000));
        assert_eq!(countdown.time_remaining(), TimeDelta::seconds(5));
        assert_eq!(countdown.session(), SessionId::new(3));
    }

    #[test]
    fn test_advance_recomputes_from_end_time() {
        let handle = TickHandle::new(SessionId::new(0));
        let mut countdown = Countdown::begin(at(0), TimeDelta::seconds(5), handle);

        // Irregular delivery: remaining always derives from absolute time
        countdown.advance_to(at(1_300));
        assert_eq!(countdown.time_remaining(), TimeDelta::milliseconds(3_700));
        countdown.advance_to(at(4_100));
        assert_eq!(countdown.time_remaining(), TimeDelta::milliseconds(900));
        assert_eq!(countdown.remaining_at(at(6_000)), TimeDelta::seconds(-1));
    }

    #[test]
    fn test_idle_has_no_countdown() {
        let state = RunState::default();
        assert!(!state.is_running());
        assert!(state.countdown().is_none());
    }
}
