//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};

use super::{FieldInput, TickOutcome, TimerEngine, TimerSnapshot};
use crate::{
    clock::SystemClock,
    config::TimerSettings,
    format::DisplayFormat,
    scheduler::{SessionId, TokioScheduler},
    view::TimerView,
};

/// Engine running against the wall clock and tokio wake-ups
pub type LiveEngine = TimerEngine<SystemClock, TokioScheduler>;

/// Shared state behind the HTTP surface and the tick driver.
///
/// Every engine operation goes through the one mutex, so ticks and user
/// actions are applied one at a time.
#[derive(Debug)]
pub struct AppState {
    /// The countdown engine
    pub engine: Arc<Mutex<LiveEngine>>,
    /// Presentation settings
    pub display_format: DisplayFormat,
    pub form_open: Arc<Mutex<bool>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for snapshot updates
    pub snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    /// Create the state together with the receiver of scheduler wake-ups
    pub fn new(
        port: u16,
        host: String,
        settings: TimerSettings,
    ) -> (Self, mpsc::UnboundedReceiver<SessionId>) {
        let (scheduler, tick_rx) = TokioScheduler::new();
        let mut engine = TimerEngine::new(SystemClock::new(), scheduler, settings.update_rate);

        if let Some(minutes) = settings.minutes {
            engine.set_minutes(FieldInput::Value(i64::from(minutes)));
        }
        if let Some(seconds) = settings.seconds {
            engine.set_seconds(FieldInput::Value(i64::from(seconds)));
        }
        if let Some(repetitions) = settings.repetitions {
            engine.set_repetitions(FieldInput::Value(i64::from(repetitions)));
        }

        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());

        let state = Self {
            engine: Arc::new(Mutex::new(engine)),
            display_format: settings.display_format,
            form_open: Arc::new(Mutex::new(false)),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        };
        (state, tick_rx)
    }

    /// Run an engine operation and publish the resulting snapshot
    pub fn with_engine<F, R>(&self, action: Option<&str>, operation: F) -> Result<(R, TimerSnapshot), String>
    where
        F: FnOnce(&mut LiveEngine) -> R,
    {
        let mut engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;

        let result = operation(&mut *engine);
        let snapshot = engine.snapshot();

        // Publish under the engine lock so watchers always end on the latest state
        self.snapshot_tx.send_replace(snapshot.clone());
        drop(engine);

        if let Some(action) = action {
            self.record_action(action);
        }

        Ok((result, snapshot))
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Start (or restart) the countdown
    pub fn start(&self) -> Result<TimerSnapshot, String> {
        self.with_engine(Some("start"), |engine| engine.start())
            .map(|(_, snapshot)| snapshot)
    }

    /// Stop the countdown
    pub fn stop(&self) -> Result<TimerSnapshot, String> {
        self.with_engine(Some("stop"), |engine| engine.stop())
            .map(|(_, snapshot)| snapshot)
    }

    /// Deliver a scheduler wake-up
    pub fn tick(&self, session: SessionId) -> Result<TickOutcome, String> {
        self.with_engine(None, |engine| engine.tick(session))
            .map(|(outcome, _)| outcome)
    }

    pub fn set_minutes(&self, input: FieldInput) -> Result<TimerSnapshot, String> {
        self.with_engine(Some("set-minutes"), |engine| engine.set_minutes(input))
            .map(|(_, snapshot)| snapshot)
    }

    pub fn set_seconds(&self, input: FieldInput) -> Result<TimerSnapshot, String> {
        self.with_engine(Some("set-seconds"), |engine| engine.set_seconds(input))
            .map(|(_, snapshot)| snapshot)
    }

    pub fn set_repetitions(&self, input: FieldInput) -> Result<TimerSnapshot, String> {
        self.with_engine(Some("set-repetitions"), |engine| engine.set_repetitions(input))
            .map(|(_, snapshot)| snapshot)
    }

    /// Reset the interval configuration
    pub fn clear_interval(&self) -> Result<TimerSnapshot, String> {
        self.with_engine(Some("clear"), |engine| engine.clear_interval())
            .map(|(_, snapshot)| snapshot)
    }

    /// Get current timer snapshot
    pub fn get_snapshot(&self) -> Result<TimerSnapshot, String> {
        self.engine.lock()
            .map(|engine| engine.snapshot())
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    /// Flip the settings form between open and closed
    pub fn toggle_form(&self) -> Result<bool, String> {
        let mut form_open = self.form_open.lock()
            .map_err(|e| format!("Failed to lock form state: {}", e))?;
        *form_open = !*form_open;
        Ok(*form_open)
    }

    pub fn close_form(&self) -> Result<(), String> {
        let mut form_open = self.form_open.lock()
            .map_err(|e| format!("Failed to lock form state: {}", e))?;
        *form_open = false;
        Ok(())
    }

    pub fn is_form_open(&self) -> Result<bool, String> {
        self.form_open.lock()
            .map(|open| *open)
            .map_err(|e| format!("Failed to lock form state: {}", e))
    }

    /// Render the presentation view of a snapshot
    pub fn render(&self, snapshot: &TimerSnapshot) -> Result<TimerView, String> {
        Ok(TimerView::render(snapshot, &self.display_format, self.is_form_open()?))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
