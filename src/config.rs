/// Startup configuration
///
/// Every option can be given as a flag or through the environment. A `.env`
/// file in the working directory is read before parsing.

use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;

use crate::feed::{SearchCursor, DEFAULT_FEED_URL};
use crate::translate::DEFAULT_TRANSLATE_URL;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max lookback days must be at least 1")]
    ZeroLookback,

    #[error("request timeout must be at least 1 second")]
    ZeroTimeout,

    #[error("API key must not be empty")]
    EmptyApiKey,
}

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Browse space-themed Astronomy Pictures of the Day", long_about = None)]
pub struct Config {
    /// API key for the picture feed
    #[arg(long, env = "APOD_API_KEY", default_value = "DEMO_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Picture feed endpoint
    #[arg(long, env = "APOD_FEED_URL", default_value = DEFAULT_FEED_URL)]
    pub feed_url: String,

    /// How many days one search may walk back before giving up
    #[arg(long, env = "APOD_MAX_LOOKBACK_DAYS", default_value_t = 30)]
    pub max_lookback_days: u32,

    /// Timeout for every HTTP request, in seconds
    #[arg(long, env = "APOD_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,

    /// Translation endpoint
    #[arg(long, env = "APOD_TRANSLATE_URL", default_value = DEFAULT_TRANSLATE_URL)]
    pub translate_url: String,

    /// Language code of the feed text
    #[arg(long, env = "APOD_SOURCE_LANG", default_value = "en")]
    pub source_lang: String,

    /// Language code to translate titles and explanations into
    #[arg(long, env = "APOD_TARGET_LANG", default_value = "es")]
    pub target_lang: String,

    /// Show the feed text as published
    #[arg(long, env = "APOD_NO_TRANSLATE")]
    pub no_translate: bool,

    /// First day to search from, YYYY-MM-DD (defaults to today)
    #[arg(long, env = "APOD_START_DATE")]
    pub start_date: Option<NaiveDate>,
}

/// Read `.env` from the working directory into the environment.
///
/// A missing file is not an error; anything else (unreadable or malformed
/// file) is handed back so it can be logged once tracing is up.
pub fn load_dotenv() -> Option<dotenvy::Error> {
    unexpected_env_error(dotenvy::dotenv().map(|_| ()))
}

fn unexpected_env_error(result: Result<(), dotenvy::Error>) -> Option<dotenvy::Error> {
    match result {
        Err(err) if !err.not_found() => Some(err),
        _ => None,
    }
}

impl Config {
    /// Parse flags and environment
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_lookback_days == 0 {
            return Err(ConfigError::ZeroLookback);
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Where the first search starts
    pub fn initial_cursor(&self) -> SearchCursor {
        self.start_date
            .map_or_else(SearchCursor::today, SearchCursor::starting_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let argv = std::iter::once("apod-viewer").chain(args.iter().copied());
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_start_date_sets_cursor() {
        let config = parse(&["--start-date", "2023-12-25", "--api-key", "abc"]);

        assert_eq!(
            config.initial_cursor().date(),
            NaiveDate::from_ymd_opt(2023, 12, 25).unwrap()
        );
        assert_eq!(config.api_key, "abc");
    }

    #[test]
    fn test_bad_start_date_is_rejected() {
        let argv = ["apod-viewer", "--start-date", "25/12/2023"];
        assert!(Config::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_zero_lookback_is_invalid() {
        let config = parse(&["--max-lookback-days", "0", "--api-key", "abc"]);
        assert_eq!(config.validate(), Err(ConfigError::ZeroLookback));
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let config = parse(&["--timeout-secs", "0", "--api-key", "abc", "--max-lookback-days", "3"]);
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn test_blank_api_key_is_invalid() {
        let config = parse(&["--api-key", "  ", "--max-lookback-days", "3", "--timeout-secs", "5"]);
        assert_eq!(config.validate(), Err(ConfigError::EmptyApiKey));
    }

    #[test]
    fn test_missing_env_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = dotenvy::from_path(dir.path().join(".env")).map(|_| ());
        assert!(unexpected_env_error(result).is_none());
    }

    #[test]
    fn test_malformed_env_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "NOT A VALID LINE\n").unwrap();

        let result = dotenvy::from_path(&path).map(|_| ());
        assert!(unexpected_env_error(result).is_some());
    }

    #[test]
    fn test_explicit_values_validate() {
        let config = parse(&["--api-key", "abc", "--max-lookback-days", "7", "--timeout-secs", "5"]);

        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }
}
