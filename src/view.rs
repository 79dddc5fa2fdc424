//! Presentation read model

use serde::{Deserialize, Serialize};

use crate::{format::DisplayFormat, state::TimerSnapshot};

/// What a client renders: the big readout plus the interval and repeat labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerView {
    /// Remaining time while running, otherwise the configured interval
    pub display: String,
    pub interval: String,
    pub repetitions: String,
    pub running: bool,
    pub form_open: bool,
}

impl TimerView {
    pub fn render(snapshot: &TimerSnapshot, format: &DisplayFormat, form_open: bool) -> Self {
        let interval = format.format_duration(snapshot.interval().duration());
        let display = match snapshot.remaining() {
            Some(remaining) => format.format_duration(remaining),
            None => interval.clone(),
        };

        Self {
            display,
            interval,
            repetitions: snapshot
                .repetitions
                .map(|count| count.to_string())
                .unwrap_or_default(),
            running: snapshot.running,
            form_open,
        }
    }
}
