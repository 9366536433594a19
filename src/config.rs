//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "meeting-timer")]
#[command(about = "A countdown timer controller for meetings and webinars")]
#[command(version)]
pub struct Config {
    /// Settings file to load lazily at startup and save back to
    #[arg(value_name = "SETTINGS_FILE")]
    pub settings_file: Option<PathBuf>,

    /// Port to bind the control server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Timer refresh period in milliseconds
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
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

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["meeting-timer"]).unwrap();
        assert_eq!(config.settings_file, None);
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn settings_file_and_flags() {
        let config = Config::try_parse_from([
            "meeting-timer",
            "webinar.mt",
            "--port",
            "8080",
            "--tick-ms",
            "250",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.settings_file, Some(PathBuf::from("webinar.mt")));
        assert_eq!(config.port, 8080);
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn zero_tick_is_rejected() {
        assert!(Config::try_parse_from(["meeting-timer", "--tick-ms", "0"]).is_err());
    }
}
