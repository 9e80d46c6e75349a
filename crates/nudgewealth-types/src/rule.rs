//! Spending rule types
//!
//! A rule is the per-category limit plus an optional time lock. At most one
//! rule exists per category; `current` is a cache of the category's counted
//! spend and is always recomputable from the transaction log.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{percent_of, NudgeError, Result, RuleId, MAX_AMOUNT};

/// Hour range `[start, end)` during which a time lock blocks spending.
///
/// When `start > end` the window wraps past midnight (22 → 6 covers
/// 22:00-05:59). `start == end` is an empty window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 2]", into = "[u8; 2]")]
pub struct HourWindow {
    pub start: u8,
    pub end: u8,
}

impl HourWindow {
    pub fn new(start: u8, end: u8) -> Self {
        Self { start, end }
    }

    /// Whether the local hour falls inside the window
    pub fn contains(&self, hour: u32) -> bool {
        let (start, end) = (u32::from(self.start), u32::from(self.end));
        if start > end {
            hour >= start || hour < end
        } else {
            hour >= start && hour < end
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.start > 23 || self.end > 23 {
            return Err(NudgeError::InvalidRule {
                reason: format!(
                    "time lock hours must be within 0..=23, got [{}, {}]",
                    self.start, self.end
                ),
            });
        }
        Ok(())
    }
}

impl From<[u8; 2]> for HourWindow {
    fn from([start, end]: [u8; 2]) -> Self {
        Self { start, end }
    }
}

impl From<HourWindow> for [u8; 2] {
    fn from(window: HourWindow) -> Self {
        [window.start, window.end]
    }
}

/// Time lock configuration of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeLock {
    #[serde(rename = "timeLockEnabled", default)]
    pub enabled: bool,
    #[serde(rename = "timeLockRange", default)]
    pub window: HourWindow,
}

impl TimeLock {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn between(start: u8, end: u8) -> Self {
        Self {
            enabled: true,
            window: HourWindow::new(start, end),
        }
    }

    /// Whether a transaction at this local hour is locked out
    pub fn blocks(&self, hour: u32) -> bool {
        self.enabled && self.window.contains(hour)
    }
}

/// A stored spending rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingRule {
    #[serde(default)]
    pub id: RuleId,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub limit: Decimal,
    /// Cached counted spend for the category
    #[serde(with = "rust_decimal::serde::float", default)]
    pub current: Decimal,
    #[serde(flatten)]
    pub time_lock: TimeLock,
}

impl SpendingRule {
    /// Share of the limit consumed by `current`, in percent
    pub fn percent_used(&self) -> Option<Decimal> {
        percent_of(self.current, self.limit)
    }

    pub fn is_over_limit(&self) -> bool {
        self.current > self.limit
    }

    /// Remaining headroom, never negative
    pub fn remaining(&self) -> Decimal {
        (self.limit - self.current).max(Decimal::ZERO)
    }
}

/// A rule as created by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSpendingRule {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub limit: Decimal,
    #[serde(flatten)]
    pub time_lock: TimeLock,
}

impl NewSpendingRule {
    pub fn new(category: impl Into<String>, limit: Decimal) -> Self {
        Self {
            category: category.into(),
            limit,
            time_lock: TimeLock::disabled(),
        }
    }

    pub fn with_time_lock(mut self, start: u8, end: u8) -> Self {
        self.time_lock = TimeLock::between(start, end);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_category(&self.category)?;
        validate_limit(self.limit)?;
        self.time_lock.window.validate()
    }
}

/// Partial update of a rule; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub limit: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_lock_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_lock_range: Option<HourWindow>,
}

impl RulePatch {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.limit.is_none()
            && self.time_lock_enabled.is_none()
            && self.time_lock_range.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        if let Some(limit) = self.limit {
            validate_limit(limit)?;
        }
        if let Some(window) = &self.time_lock_range {
            window.validate()?;
        }
        Ok(())
    }

    /// Apply onto a rule in place
    pub fn apply(&self, rule: &mut SpendingRule) {
        if let Some(category) = &self.category {
            rule.category = category.trim().to_string();
        }
        if let Some(limit) = self.limit {
            rule.limit = limit;
        }
        if let Some(enabled) = self.time_lock_enabled {
            rule.time_lock.enabled = enabled;
        }
        if let Some(window) = self.time_lock_range {
            rule.time_lock.window = window;
        }
    }
}

fn validate_category(category: &str) -> Result<()> {
    if category.trim().is_empty() {
        return Err(NudgeError::InvalidRule {
            reason: "category must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_limit(limit: Decimal) -> Result<()> {
    if limit < Decimal::ZERO {
        return Err(NudgeError::InvalidRule {
            reason: format!("limit must not be negative, got {limit}"),
        });
    }
    if limit > MAX_AMOUNT {
        return Err(NudgeError::InvalidRule {
            reason: format!("limit must not exceed {MAX_AMOUNT}, got {limit}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_overnight_window_wraps() {
        let window = HourWindow::new(22, 6);
        assert!(window.contains(22));
        assert!(window.contains(23));
        assert!(window.contains(0));
        assert!(window.contains(5));
        assert!(!window.contains(6));
        assert!(!window.contains(21));
    }

    #[test]
    fn test_daytime_window_is_half_open() {
        let window = HourWindow::new(9, 17);
        assert!(!window.contains(8));
        assert!(window.contains(9));
        assert!(window.contains(16));
        assert!(!window.contains(17));
    }

    #[test]
    fn test_equal_bounds_is_empty() {
        let window = HourWindow::new(0, 0);
        assert!((0..24).all(|h| !window.contains(h)));
    }

    #[test]
    fn test_disabled_lock_never_blocks() {
        let lock = TimeLock {
            enabled: false,
            window: HourWindow::new(0, 23),
        };
        assert!(!lock.blocks(12));
    }

    #[test]
    fn test_reads_original_rule_record() {
        let json = r#"{
            "id": "rule-1",
            "category": "Food Delivery",
            "limit": 2000,
            "current": 570,
            "timeLockEnabled": true,
            "timeLockRange": [22, 6]
        }"#;
        let rule: SpendingRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.id.as_str(), "rule-1");
        assert_eq!(rule.limit, dec!(2000));
        assert_eq!(rule.current, dec!(570));
        assert_eq!(rule.time_lock, TimeLock::between(22, 6));

        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["timeLockRange"], serde_json::json!([22, 6]));
    }

    #[test]
    fn test_rejects_out_of_range_hours() {
        let rule = NewSpendingRule::new("Shopping", dec!(5000)).with_time_lock(25, 6);
        assert!(matches!(rule.validate(), Err(NudgeError::InvalidRule { .. })));
    }

    #[test]
    fn test_rejects_negative_limit() {
        let rule = NewSpendingRule::new("Shopping", dec!(-1));
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_rejects_limit_above_max() {
        let rule = NewSpendingRule::new("Shopping", MAX_AMOUNT + dec!(1));
        assert!(matches!(rule.validate(), Err(NudgeError::InvalidRule { .. })));
        assert!(NewSpendingRule::new("Shopping", MAX_AMOUNT).validate().is_ok());

        let patch = RulePatch {
            limit: Some(dec!(70000000000000000000000000000)),
            ..RulePatch::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_patch_merges_only_present_fields() {
        let mut rule = SpendingRule {
            id: RuleId::new("rule-2"),
            category: "Shopping".to_string(),
            limit: dec!(5000),
            current: dec!(2500),
            time_lock: TimeLock::disabled(),
        };
        let patch: RulePatch =
            serde_json::from_str(r#"{"limit": 6000, "timeLockEnabled": true, "timeLockRange": [1, 5]}"#)
                .unwrap();
        patch.apply(&mut rule);

        assert_eq!(rule.category, "Shopping");
        assert_eq!(rule.limit, dec!(6000));
        assert_eq!(rule.current, dec!(2500));
        assert!(rule.time_lock.blocks(3));
    }
}
