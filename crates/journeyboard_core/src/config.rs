//! Board configuration loaded from TOML.
//!
//! # Invariants
//! - Every field has a default; an empty document is a valid config.
//! - The adjusted-now offset is not configurable (see `clock`).

use crate::locale::Locale;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Calendar length in days past the start date (inclusive walk).
pub const DEFAULT_JOURNEY_DAYS: u32 = 380;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;
/// Matches the common 5 MiB per-origin browser storage budget.
pub const DEFAULT_STORAGE_QUOTA_BYTES: usize = 5 * 1024 * 1024;
const MIN_TICK_INTERVAL_MS: u64 = 100;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config syntax: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    /// Countdown target instant.
    pub target_date: DateTime<Utc>,
    /// Countdown anchor. `None` anchors on the first calendar day.
    pub start_date: Option<NaiveDate>,
    pub journey_days: u32,
    /// Locale seeded into storage when no preference exists yet.
    pub default_locale: Locale,
    pub tick_interval_ms: u64,
    /// Per-value byte limit enforced by the storage backend.
    pub storage_quota_bytes: Option<usize>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            target_date: default_target_date(),
            start_date: None,
            journey_days: DEFAULT_JOURNEY_DAYS,
            default_locale: Locale::default(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            storage_quota_bytes: Some(DEFAULT_STORAGE_QUOTA_BYTES),
        }
    }
}

impl BoardConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.journey_days == 0 {
            return Err(ConfigError::Invalid(
                "journey_days must be at least 1".to_string(),
            ));
        }
        if self.tick_interval_ms < MIN_TICK_INTERVAL_MS {
            return Err(ConfigError::Invalid(format!(
                "tick_interval_ms must be at least {MIN_TICK_INTERVAL_MS}, got {}",
                self.tick_interval_ms
            )));
        }
        Ok(())
    }
}

fn default_target_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 25, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{BoardConfig, ConfigError, DEFAULT_JOURNEY_DAYS};
    use crate::locale::Locale;
    use chrono::NaiveDate;

    #[test]
    fn empty_document_yields_defaults() {
        let config = BoardConfig::from_toml_str("").unwrap();
        assert_eq!(config, BoardConfig::default());
        assert_eq!(config.journey_days, DEFAULT_JOURNEY_DAYS);
        assert_eq!(config.default_locale, Locale::Ru);
        assert_eq!(config.target_date.to_rfc3339(), "2026-05-25T00:00:00+00:00");
    }

    #[test]
    fn parses_explicit_fields() {
        let config = BoardConfig::from_toml_str(
            r#"
            target_date = "2027-01-01T00:00:00Z"
            start_date = "2025-12-01"
            default_locale = "en"
            tick_interval_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.default_locale, Locale::En);
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2025, 12, 1));
        assert_eq!(config.tick_interval_ms, 500);
    }

    #[test]
    fn rejects_zero_journey_and_fast_ticks() {
        let err = BoardConfig::from_toml_str("journey_days = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = BoardConfig::from_toml_str("tick_interval_ms = 5").unwrap_err();
        assert!(err.to_string().contains("tick_interval_ms"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = BoardConfig::from_toml_str("colour = \"red\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = BoardConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
