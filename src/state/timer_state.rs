//! Published timer snapshot

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use super::{Interval, Repetitions};

/// Point-in-time view of the engine handed to readers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub minutes: Option<u8>,
    pub seconds: Option<u8>,
    pub repetitions: Option<u32>,
    pub running: bool,
    pub remaining_ms: Option<i64>,
}

impl TimerSnapshot {
    pub fn new(interval: Interval, repetitions: Repetitions, remaining: Option<TimeDelta>) -> Self {
        Self {
            minutes: interval.minutes(),
            seconds: interval.seconds(),
            repetitions: repetitions.count(),
            running: remaining.is_some(),
            remaining_ms: remaining.map(|r| r.num_milliseconds()),
        }
    }

    /// Snapshot of a freshly created engine
    pub fn idle() -> Self {
        Self::new(Interval::unset(), Repetitions::default(), None)
    }

    pub fn interval(&self) -> Interval {
        let mut interval = Interval::unset();
        if let Some(minutes) = self.minutes {
            interval.set_minutes(i64::from(minutes).into());
        }
        if let Some(seconds) = self.seconds {
            interval.set_seconds(i64::from(seconds).into());
        }
        interval
    }

    /// Remaining time, only while running
    pub fn remaining(&self) -> Option<TimeDelta> {
        if self.running {
            self.remaining_ms.map(TimeDelta::milliseconds)
        } else {
            None
        }
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FieldInput;

    #[test]
    fn test_idle_snapshot() {
        let snapshot = TimerSnapshot::idle();
        assert!(!snapshot.running);
        assert_eq!(snapshot.repetitions, Some(1));
        assert_eq!(snapshot.remaining(), None);
        assert!(snapshot.interval().is_unset());
    }

    #[test]
    fn test_running_snapshot_round_trips_interval() {
        let mut interval = Interval::unset();
        interval.set_minutes(FieldInput::Value(3));
        let snapshot = TimerSnapshot::new(interval, Repetitions::default(), Some(TimeDelta::seconds(42)));

        assert!(snapshot.running);
        assert_eq!(snapshot.remaining_ms, Some(42_000));
        assert_eq!(snapshot.interval(), interval);
        assert_eq!(snapshot.interval().seconds(), None);
    }

    #[test]
    fn test_deserialized_snapshot_interval_is_validated() {
        let snapshot: TimerSnapshot = serde_json::from_str(
            r#"{"minutes":200,"seconds":30,"repetitions":1,"running":false,"remaining_ms":null}"#,
        )
        .unwrap();

        let interval = snapshot.interval();
        assert_eq!(interval.minutes(), None);
        assert_eq!(interval.seconds(), Some(30));
        assert_eq!(interval.duration(), TimeDelta::seconds(30));
    }
}
