//! Display formatting for countdown durations

use std::{fmt, str::FromStr};
use chrono::{
    format::{Item, StrftimeItems},
    DateTime, TimeDelta, Utc,
};

/// Pattern used when none is configured: minutes and seconds
pub const DEFAULT_DISPLAY_FORMAT: &str = "%M:%S";

/// A validated chrono strftime pattern.
///
/// Durations are rendered as a time of day counted from the UTC epoch, so
/// `%M:%S` on 65 seconds yields `01:05`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFormat {
    pattern: String,
}

impl DisplayFormat {
    pub fn new(pattern: &str) -> Result<Self, String> {
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(format!("Invalid display format: {}", pattern));
        }
        Ok(Self {
            pattern: pattern.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Render a duration; negative durations render as zero
    pub fn format_duration(&self, duration: TimeDelta) -> String {
        let millis = duration.num_milliseconds().max(0);
        let as_time = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default();
        as_time.format(&self.pattern).to_string()
    }
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_DISPLAY_FORMAT.to_string(),
        }
    }
}

impl FromStr for DisplayFormat {
    type Err = String;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        Self::new(pattern)
    }
}

impl fmt::Display for DisplayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
