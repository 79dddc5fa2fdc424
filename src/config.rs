//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::{
    format::{DisplayFormat, DEFAULT_DISPLAY_FORMAT},
    state::DEFAULT_UPDATE_RATE,
};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "countdown-timer")]
#[command(about = "A countdown timer controlled over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Milliseconds between countdown updates
    #[arg(short, long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub update_rate: u64,

    /// chrono strftime pattern used to display durations
    #[arg(short, long, default_value = DEFAULT_DISPLAY_FORMAT)]
    pub display_format: String,

    /// Initial interval minutes
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=59))]
    pub minutes: Option<u8>,

    /// Initial interval seconds
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=59))]
    pub seconds: Option<u8>,

    /// Initial repetition count
    #[arg(short, long)]
    pub repetitions: Option<u32>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Timer settings derived from the command line
#[derive(Debug, Clone)]
pub struct TimerSettings {
    pub update_rate: Duration,
    pub display_format: DisplayFormat,
    pub minutes: Option<u8>,
    pub seconds: Option<u8>,
    pub repetitions: Option<u32>,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            update_rate: DEFAULT_UPDATE_RATE,
            display_format: DisplayFormat::default(),
            minutes: None,
            seconds: None,
            repetitions: None,
        }
    }
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Validate and collect the timer settings
    pub fn timer_settings(&self) -> Result<TimerSettings, String> {
        Ok(TimerSettings {
            update_rate: Duration::from_millis(self.update_rate),
            display_format: DisplayFormat::new(&self.display_format)?,
            minutes: self.minutes,
            seconds: self.seconds,
            repetitions: self.repetitions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        Config::try_parse_from(std::iter::once("countdown-timer").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.address(), "0.0.0.0:20554");
        assert_eq!(config.log_level(), "info");

        let settings = config.timer_settings().unwrap();
        assert_eq!(settings.update_rate, DEFAULT_UPDATE_RATE);
        assert_eq!(settings.display_format, DisplayFormat::default());
        assert_eq!(settings.minutes, None);
        assert_eq!(settings.repetitions, None);
    }

    #[test]
    fn test_initial_interval() {
        let config = parse(&["--seconds", "5", "--minutes", "1", "-r", "3", "-v"]).unwrap();
        let settings = config.timer_settings().unwrap();

        assert_eq!(settings.minutes, Some(1));
        assert_eq!(settings.seconds, Some(5));
        assert_eq!(settings.repetitions, Some(3));
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn test_out_of_range_arguments_are_rejected() {
        assert!(parse(&["--minutes", "60"]).is_err());
        assert!(parse(&["--update-rate", "0"]).is_err());
        assert!(parse(&["--repetitions", "-1"]).is_err());
    }

    #[test]
    fn test_zero_repetitions_are_accepted() {
        let config = parse(&["--repetitions", "0"]).unwrap();
        assert_eq!(config.timer_settings().unwrap().repetitions, Some(0));
    }

    #[test]
    fn test_invalid_display_format() {
        let config = parse(&["--display-format", "%Q"]).unwrap();
        assert!(config.timer_settings().is_err());
    }
}
