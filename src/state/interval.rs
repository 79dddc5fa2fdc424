//! Countdown configuration: interval and repetitions

use std::{fmt, num::ParseIntError, str::FromStr};
use chrono::TimeDelta;
use serde::Serialize;

/// Largest accepted value for either interval field
pub const FIELD_MAX: i64 = 59;

/// Raw value coming from a form field.
///
/// A blank field is a distinct state from an explicit zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldInput {
    Blank,
    Value(i64),
}

impl FromStr for FieldInput {
    type Err = ParseIntError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(FieldInput::Blank);
        }
        trimmed.parse::<i64>().map(FieldInput::Value)
    }
}

impl From<i64> for FieldInput {
    fn from(value: i64) -> Self {
        FieldInput::Value(value)
    }
}

/// Configured countdown duration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Interval {
    minutes: Option<u8>,
    seconds: Option<u8>,
}

impl Interval {
    /// Interval with both fields unset
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn minutes(&self) -> Option<u8> {
        self.minutes
    }

    pub fn seconds(&self) -> Option<u8> {
        self.seconds
    }

    pub fn is_unset(&self) -> bool {
        self.minutes.is_none() && self.seconds.is_none()
    }

    /// Set minutes; returns false and leaves the field alone when out of range
    pub fn set_minutes(&mut self, input: FieldInput) -> bool {
        match validate_field(input) {
            Some(value) => {
                self.minutes = value;
                true
            }
            None => false,
        }
    }

    /// Set seconds; returns false and leaves the field alone when out of range
    pub fn set_seconds(&mut self, input: FieldInput) -> bool {
        match validate_field(input) {
            Some(value) => {
                self.seconds = value;
                true
            }
            None => false,
        }
    }

    /// Total length of the interval, unset fields counting as zero
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.minutes.unwrap_or(0)))
            + TimeDelta::seconds(i64::from(self.seconds.unwrap_or(0)))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}",
            self.minutes.unwrap_or(0),
            self.seconds.unwrap_or(0)
        )
    }
}

/// `Some(new field value)` when accepted, `None` when rejected
fn validate_field(input: FieldInput) -> Option<Option<u8>> {
    match input {
        FieldInput::Blank => Some(None),
        FieldInput::Value(value) if (0..=FIELD_MAX).contains(&value) => Some(Some(value as u8)),
        FieldInput::Value(_) => None,
    }
}

/// Number of times the countdown is meant to repeat.
///
/// Only tracked for display: nothing restarts a countdown automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Repetitions(Option<u32>);

impl Repetitions {
    pub fn count(&self) -> Option<u32> {
        self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_none()
    }

    /// Accepts any non-negative count or a blank field
    pub fn set(&mut self, input: FieldInput) -> bool {
        match input {
            FieldInput::Blank => {
                self.0 = None;
                true
            }
            FieldInput::Value(value) if value >= 0 => match u32::try_from(value) {
                Ok(count) => {
                    self.0 = Some(count);
                    true
                }
                Err(_) => false,
            },
            FieldInput::Value(_) => false,
        }
    }
}

impl Default for Repetitions {
    fn default() -> Self {
        Self(Some(1))
    }
}

impl fmt::Display for Repetitions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(count) => write!(f, "{}", count),
            None => Ok(()),
        }
    }
}
