//! Engine configuration

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use nudgewealth_types::UserProfile;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tunables of the evaluation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Percent of the limit above which a transaction is nudged
    pub nudge_threshold_percent: Decimal,
    /// Offset of the user's local time from UTC, in minutes
    pub utc_offset_minutes: i32,
    /// Prefix for amounts in messages
    pub currency_symbol: String,
    /// Profile sent with redirect requests
    pub user_profile: UserProfile,
    /// How many recent transactions accompany a nudge request
    pub recent_window: usize,
    /// Optional market commentary passed to the advisor
    pub market_conditions: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            nudge_threshold_percent: Decimal::from(80),
            utc_offset_minutes: 0,
            currency_symbol: "₹".to_string(),
            user_profile: UserProfile::default(),
            recent_window: 5,
            market_conditions: None,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `NUDGEWEALTH_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(threshold) = env_parse("NUDGEWEALTH_NUDGE_THRESHOLD") {
            config.nudge_threshold_percent = threshold;
        }
        if let Some(offset) = env_parse("NUDGEWEALTH_UTC_OFFSET_MINUTES") {
            config.utc_offset_minutes = offset;
        }
        if let Ok(symbol) = std::env::var("NUDGEWEALTH_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }
        if let Some(window) = env_parse("NUDGEWEALTH_RECENT_WINDOW") {
            config.recent_window = window;
        }
        config
    }

    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn with_user_profile(mut self, profile: UserProfile) -> Self {
        self.user_profile = profile;
        self
    }

    /// Validate the configured offset once; out-of-range values fall back to UTC
    pub fn local_clock(&self) -> LocalClock {
        match FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)) {
            Some(offset) => LocalClock::new(offset),
            None => {
                tracing::warn!(
                    minutes = self.utc_offset_minutes,
                    "UTC offset out of range, using UTC"
                );
                LocalClock::default()
            }
        }
    }
}

/// The user's wall clock, as a resolved UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalClock {
    offset: FixedOffset,
}

impl LocalClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Local wall-clock hour of a timestamp
    pub fn hour(&self, at: DateTime<Utc>) -> u32 {
        at.with_timezone(&self.offset).hour()
    }

    /// Local calendar date of a timestamp
    pub fn date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }
}

impl Default for LocalClock {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_clock_applies_offset() {
        let at: DateTime<Utc> = "2024-05-01T18:30:00Z".parse().unwrap();
        let ist = EngineConfig::default()
            .with_utc_offset_minutes(330)
            .local_clock();
        assert_eq!(ist.hour(at), 0);
        assert_eq!(ist.date(at), NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(EngineConfig::default().local_clock().hour(at), 18);
    }

    #[test]
    fn test_absurd_offset_falls_back_to_utc() {
        let clock = EngineConfig::default()
            .with_utc_offset_minutes(100_000)
            .local_clock();
        assert_eq!(clock, LocalClock::default());
        assert_eq!(clock.offset(), Utc.fix());

        let clock = EngineConfig::default()
            .with_utc_offset_minutes(i32::MIN)
            .local_clock();
        assert_eq!(clock.offset(), Utc.fix());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"currency_symbol": "$"}"#).unwrap();
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.nudge_threshold_percent, Decimal::from(80));
        assert_eq!(config.recent_window, 5);
    }
}
