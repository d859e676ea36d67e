use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("invalid unit: must be one of: raw, bytes")]
    Unit,
}

/// How magnitudes (current, total, speed) are printed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, clap::ValueEnum,
)]
pub enum Unit {
    /// Plain decimal counts.
    #[default]
    #[serde(rename = "raw")]
    Raw,
    /// Byte counts scaled with K/M/G/... suffixes.
    #[serde(rename = "bytes")]
    Bytes,
}

impl FromStr for Unit {
    type Err = ValueError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Unit::Raw),
            "bytes" => Ok(Unit::Bytes),
            _ => Err(ValueError::Unit),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Raw => write!(f, "raw"),
            Unit::Bytes => write!(f, "bytes"),
        }
    }
}

/// Which annotations are drawn after the bar.
///
/// Every combination is valid. An enabled annotation is still skipped when the value
/// behind it is not meaningful yet (no speed sample, remaining time at 0%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayOptions {
    /// `current/total`
    pub progress: bool,
    pub percent: bool,
    pub speed: bool,
    pub used_time: bool,
    pub remaining_time: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            progress: true,
            percent: false,
            speed: false,
            used_time: false,
            remaining_time: false,
        }
    }
}

impl DisplayOptions {
    /// Every annotation enabled.
    pub const fn all() -> Self {
        Self {
            progress: true,
            percent: true,
            speed: true,
            used_time: true,
            remaining_time: true,
        }
    }

    /// Bare bar, no annotations.
    pub const fn none() -> Self {
        Self {
            progress: false,
            percent: false,
            speed: false,
            used_time: false,
            remaining_time: false,
        }
    }

    pub const fn with_progress(mut self, flag: bool) -> Self {
        self.progress = flag;
        self
    }

    pub const fn with_percent(mut self, flag: bool) -> Self {
        self.percent = flag;
        self
    }

    pub const fn with_speed(mut self, flag: bool) -> Self {
        self.speed = flag;
        self
    }

    pub const fn with_used_time(mut self, flag: bool) -> Self {
        self.used_time = flag;
        self
    }

    pub const fn with_remaining_time(mut self, flag: bool) -> Self {
        self.remaining_time = flag;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_from_str() {
        assert_eq!("raw".parse::<Unit>(), Ok(Unit::Raw));
        assert_eq!(" Bytes ".parse::<Unit>(), Ok(Unit::Bytes));
        assert_eq!("kb".parse::<Unit>(), Err(ValueError::Unit));
        assert_eq!(Unit::Bytes.to_string(), "bytes");
    }

    #[test]
    fn test_display_options_defaults() {
        let options = DisplayOptions::default();
        assert!(options.progress);
        assert!(!options.percent);
        assert!(!options.speed);
        assert!(!options.used_time);
        assert!(!options.remaining_time);

        let options = DisplayOptions::none().with_percent(true).with_speed(true);
        assert!(!options.progress);
        assert!(options.percent);
        assert!(options.speed);
    }

    #[test]
    fn test_display_options_serde() {
        let options: DisplayOptions =
            serde_json::from_str(r#"{"percent": true, "remainingTime": true}"#).unwrap();
        assert_eq!(
            options,
            DisplayOptions::default()
                .with_percent(true)
                .with_remaining_time(true)
        );

        let json = serde_json::to_string(&DisplayOptions::all()).unwrap();
        assert!(json.contains("\"usedTime\":true"));
    }
}
