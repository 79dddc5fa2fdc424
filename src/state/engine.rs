//! Countdown state machine

use std::{mem, time::Duration};
use chrono::TimeDelta;
use tracing::{debug, info, warn};

use super::{Countdown, FieldInput, Interval, Repetitions, RunState, TimerSnapshot};
use crate::{
    clock::Clock,
    scheduler::{Scheduler, SessionId},
};

/// Default cadence of countdown wake-ups
pub const DEFAULT_UPDATE_RATE: Duration = Duration::from_millis(1000);

/// Result of delivering a wake-up to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The wake-up did not belong to the running countdown
    Ignored,
    /// Still counting down, with this much time left
    Running(TimeDelta),
    /// Reached zero; the engine is idle again
    Expired,
}

/// Owns the interval configuration, repetitions and the live countdown
#[derive(Debug)]
pub struct TimerEngine<C, S> {
    clock: C,
    scheduler: S,
    update_rate: Duration,
    interval: Interval,
    repetitions: Repetitions,
    run_state: RunState,
}

impl<C: Clock, S: Scheduler> TimerEngine<C, S> {
    /// A zero update rate falls back to [`DEFAULT_UPDATE_RATE`]
    pub fn new(clock: C, scheduler: S, update_rate: Duration) -> Self {
        let update_rate = if update_rate.is_zero() {
            warn!("Update rate must be positive, using {:?}", DEFAULT_UPDATE_RATE);
            DEFAULT_UPDATE_RATE
        } else {
            update_rate
        };

        Self {
            clock,
            scheduler,
            update_rate,
            interval: Interval::unset(),
            repetitions: Repetitions::default(),
            run_state: RunState::Idle,
        }
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn repetitions(&self) -> Repetitions {
        self.repetitions
    }

    pub fn run_state(&self) -> &RunState {
        &self.run_state
    }

    pub fn update_rate(&self) -> Duration {
        self.update_rate
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn is_running(&self) -> bool {
        self.run_state.is_running()
    }

    /// Remaining time of the running countdown
    pub fn time_remaining(&self) -> Option<TimeDelta> {
        self.run_state.countdown().map(Countdown::time_remaining)
    }

    /// Start counting down the configured interval.
    ///
    /// A running countdown is replaced; its wake-ups are cancelled before new
    /// ones are registered. An interval of zero length leaves the engine idle
    /// and returns `None`.
    pub fn start(&mut self) -> Option<SessionId> {
        self.stop();

        let duration = self.interval.duration();
        if duration <= TimeDelta::zero() {
            info!("Interval is empty, nothing to count down");
            return None;
        }

        let now = self.clock.now();
        let handle = self.scheduler.schedule_periodic(self.update_rate);
        let session = handle.session();
        self.run_state = RunState::Running(Countdown::begin(now, duration, handle));

        info!(
            "Countdown {} started for {} (update rate {:?})",
            session, self.interval, self.update_rate
        );
        Some(session)
    }

    /// Advance the countdown on a wake-up from `session`.
    ///
    /// Wake-ups that do not belong to the running countdown change nothing.
    /// Reaching zero stops the countdown before anything is published.
    pub fn tick(&mut self, session: SessionId) -> TickOutcome {
        let now = self.clock.now();

        let remaining = match &mut self.run_state {
            RunState::Running(countdown) if countdown.session() == session => {
                let remaining = countdown.remaining_at(now);
                if remaining > TimeDelta::zero() {
                    countdown.advance_to(now);
                }
                remaining
            }
            _ => {
                debug!("Ignoring stale wake-up {}", session);
                return TickOutcome::Ignored;
            }
        };

        if remaining <= TimeDelta::zero() {
            info!("Countdown {} reached zero", session);
            self.stop();
            return TickOutcome::Expired;
        }

        debug!(
            "Countdown {} tick, {}ms remaining",
            session,
            remaining.num_milliseconds()
        );
        TickOutcome::Running(remaining)
    }

    /// Cancel the running countdown, if any. Returns whether one was running.
    pub fn stop(&mut self) -> bool {
        match mem::take(&mut self.run_state) {
            RunState::Running(countdown) => {
                let session = countdown.session();
                self.scheduler.cancel(countdown.into_handle());
                info!("Countdown {} stopped", session);
                true
            }
            RunState::Idle => false,
        }
    }

    pub fn set_minutes(&mut self, input: FieldInput) -> bool {
        let accepted = self.interval.set_minutes(input);
        if !accepted {
            debug!("Rejected minutes input {:?}", input);
        }
        accepted
    }

    pub fn set_seconds(&mut self, input: FieldInput) -> bool {
        let accepted = self.interval.set_seconds(input);
        if !accepted {
            debug!("Rejected seconds input {:?}", input);
        }
        accepted
    }

    pub fn set_repetitions(&mut self, input: FieldInput) -> bool {
        let accepted = self.repetitions.set(input);
        if !accepted {
            debug!("Rejected repetitions input {:?}", input);
        }
        accepted
    }

    /// Reset the configuration for the next start; a running countdown keeps going
    pub fn clear_interval(&mut self) {
        self.interval = Interval::unset();
        self.repetitions = Repetitions::default();
        debug!("Interval configuration cleared");
    }

    /// Read-only view of the current state
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::new(self.interval, self.repetitions, self.time_remaining())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::ManualClock, scheduler::ManualScheduler};

    type TestEngine = TimerEngine<ManualClock, ManualScheduler>;

    fn engine_with(minutes: i64, seconds: i64) -> (TestEngine, ManualClock) {
        let clock = ManualClock::new();
        let mut engine = TimerEngine::new(clock.clone(), ManualScheduler::new(), DEFAULT_UPDATE_RATE);
        assert!(engine.set_minutes(FieldInput::Value(minutes)));
        assert!(engine.set_seconds(FieldInput::Value(seconds)));
        (engine, clock)
    }

    #[test]
    fn test_initial_state() {
        let engine = TimerEngine::new(ManualClock::new(), ManualScheduler::new(), DEFAULT_UPDATE_RATE);

        assert!(!engine.is_running());
        assert!(engine.interval().is_unset());
        assert_eq!(engine.repetitions().count(), Some(1));
        assert_eq!(engine.time_remaining(), None);
    }

    #[test]
    fn test_five_second_countdown() {
        let (mut engine, clock) = engine_with(0, 5);
        let session = engine.start().unwrap();

        assert_eq!(engine.time_remaining(), Some(TimeDelta::seconds(5)));
        assert_eq!(engine.scheduler().period_of(session), Some(Duration::from_millis(1000)));

        for expected in [4000, 3000, 2000, 1000] {
            clock.advance(TimeDelta::milliseconds(1000));
            assert_eq!(
                engine.tick(session),
                TickOutcome::Running(TimeDelta::milliseconds(expected))
            );
            assert_eq!(engine.time_remaining(), Some(TimeDelta::milliseconds(expected)));
        }

        clock.advance(TimeDelta::milliseconds(1000));
        assert_eq!(engine.tick(session), TickOutcome::Expired);
        assert!(!engine.is_running());
        assert!(engine.scheduler().active().is_empty());
        assert_eq!(engine.scheduler().cancelled(), &[session]);
    }

    #[test]
    fn test_remaining_after_single_tick() {
        for (minutes, seconds, delta) in [(0, 30, 250), (1, 0, 1000), (59, 59, 7_123), (2, 15, 1)] {
            let (mut engine, clock) = engine_with(minutes, seconds);
            let duration = engine.interval().duration();
            let session = engine.start().unwrap();

            clock.advance(TimeDelta::milliseconds(delta));
            engine.tick(session);

            assert_eq!(
                engine.time_remaining(),
                Some(duration - TimeDelta::milliseconds(delta))
            );
        }
    }

    #[test]
    fn test_late_tick_past_end_expires() {
        let (mut engine, clock) = engine_with(0, 2);
        let session = engine.start().unwrap();

        clock.advance(TimeDelta::milliseconds(3_500));
        assert_eq!(engine.tick(session), TickOutcome::Expired);
        assert_eq!(engine.time_remaining(), None);
    }

    #[test]
    fn test_stale_ticks_after_stop_are_ignored() {
        let (mut engine, clock) = engine_with(0, 10);
        let session = engine.start().unwrap();
        clock.advance(TimeDelta::milliseconds(1000));
        engine.tick(session);

        assert!(engine.stop());
        let before = engine.snapshot();

        for _ in 0..3 {
            clock.advance(TimeDelta::milliseconds(1000));
            assert_eq!(engine.tick(session), TickOutcome::Ignored);
        }
        assert_eq!(engine.snapshot(), before);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (mut engine, _clock) = engine_with(0, 10);
        engine.start().unwrap();

        assert!(engine.stop());
        let once = engine.snapshot();
        let cancelled = engine.scheduler().cancelled().len();

        assert!(!engine.stop());
        assert_eq!(engine.snapshot(), once);
        assert_eq!(engine.scheduler().cancelled().len(), cancelled);
    }

    #[test]
    fn test_restart_replaces_previous_countdown() {
        let (mut engine, clock) = engine_with(0, 10);
        let first = engine.start().unwrap();
        clock.advance(TimeDelta::milliseconds(4000));
        engine.tick(first);

        let second = engine.start().unwrap();
        assert_ne!(first, second);
        assert_eq!(engine.scheduler().active(), vec![second]);
        assert_eq!(engine.scheduler().cancelled(), &[first]);
        assert_eq!(engine.time_remaining(), Some(TimeDelta::seconds(10)));

        clock.advance(TimeDelta::milliseconds(1000));
        assert_eq!(engine.tick(first), TickOutcome::Ignored);
        assert_eq!(
            engine.tick(second),
            TickOutcome::Running(TimeDelta::milliseconds(9000))
        );
    }

    #[test]
    fn test_start_with_empty_interval_stays_idle() {
        let mut engine = TimerEngine::new(ManualClock::new(), ManualScheduler::new(), DEFAULT_UPDATE_RATE);

        assert_eq!(engine.start(), None);
        assert!(!engine.is_running());
        assert!(engine.scheduler().active().is_empty());
    }

    #[test]
    fn test_out_of_range_input_is_rejected() {
        let (mut engine, _clock) = engine_with(5, 30);

        assert!(!engine.set_minutes(FieldInput::Value(60)));
        assert!(!engine.set_minutes(FieldInput::Value(-1)));
        assert!(!engine.set_seconds(FieldInput::Value(75)));
        assert_eq!(engine.interval().minutes(), Some(5));
        assert_eq!(engine.interval().seconds(), Some(30));

        assert!(engine.set_minutes(FieldInput::Value(59)));
        assert_eq!(engine.interval().minutes(), Some(59));
    }

    #[test]
    fn test_clear_interval_keeps_running_countdown() {
        let (mut engine, clock) = engine_with(1, 0);
        engine.set_repetitions(FieldInput::Value(3));
        let session = engine.start().unwrap();

        engine.clear_interval();
        assert!(engine.interval().is_unset());
        assert_eq!(engine.repetitions().count(), Some(1));
        assert!(engine.is_running());

        clock.advance(TimeDelta::milliseconds(1000));
        assert_eq!(
            engine.tick(session),
            TickOutcome::Running(TimeDelta::milliseconds(59_000))
        );
    }

    #[test]
    fn test_zero_update_rate_falls_back_to_default() {
        let mut engine = TimerEngine::new(ManualClock::new(), ManualScheduler::new(), Duration::ZERO);
        assert_eq!(engine.update_rate(), DEFAULT_UPDATE_RATE);

        engine.set_seconds(FieldInput::Value(3));
        let session = engine.start().unwrap();
        assert_eq!(engine.scheduler().period_of(session), Some(DEFAULT_UPDATE_RATE));
    }

    #[test]
    fn test_custom_update_rate_is_registered() {
        let clock = ManualClock::new();
        let mut engine = TimerEngine::new(clock, ManualScheduler::new(), Duration::from_millis(250));
        engine.set_seconds(FieldInput::Value(1));

        let session = engine.start().unwrap();
        assert_eq!(engine.scheduler().period_of(session), Some(Duration::from_millis(250)));
    }
}
