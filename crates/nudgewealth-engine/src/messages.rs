//! Templated messages attached to blocked and nudged transactions
//!
//! These are used as-is when no advisor is configured or the advisor fails,
//! and wrap the advisor's recommended action when it succeeds.

use nudgewealth_types::HourWindow;
use rust_decimal::{Decimal, RoundingStrategy};

/// Formats user-facing messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFormatter {
    currency_symbol: String,
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::new("₹")
    }
}

impl MessageFormatter {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
        }
    }

    /// `₹70.00`
    pub fn amount(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{}{:.2}", self.currency_symbol, rounded)
    }

    pub fn time_lock(&self, window: HourWindow) -> String {
        format!(
            "Transaction blocked due to time lock ({:02}:00 - {:02}:00).",
            window.start, window.end
        )
    }

    pub fn time_lock_with_action(&self, action: &str) -> String {
        format!("Transaction blocked due to time lock. {}", action.trim())
    }

    pub fn over_limit(&self, excess: Decimal) -> String {
        format!(
            "Spending limit exceeded by {}. Consider redirecting to savings.",
            self.amount(excess)
        )
    }

    pub fn over_limit_with_action(&self, action: &str) -> String {
        format!("Spending limit exceeded. {}", action.trim())
    }

    pub fn nudge(&self, category: &str, percentage: Decimal) -> String {
        let whole = percentage.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        format!("You're approaching your {category} limit ({whole}% used).")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_time_lock_message() {
        let fmt = MessageFormatter::default();
        assert_eq!(
            fmt.time_lock(HourWindow::new(22, 6)),
            "Transaction blocked due to time lock (22:00 - 06:00)."
        );
        assert_eq!(
            fmt.time_lock_with_action("Move it to your Liquid Savings Pot."),
            "Transaction blocked due to time lock. Move it to your Liquid Savings Pot."
        );
    }

    #[test]
    fn test_over_limit_message() {
        let fmt = MessageFormatter::default();
        assert_eq!(
            fmt.over_limit(dec!(70)),
            "Spending limit exceeded by ₹70.00. Consider redirecting to savings."
        );
        assert_eq!(
            MessageFormatter::new("$").over_limit(dec!(12.345)),
            "Spending limit exceeded by $12.35. Consider redirecting to savings."
        );
    }

    #[test]
    fn test_nudge_message_rounds_percentage() {
        let fmt = MessageFormatter::default();
        assert_eq!(
            fmt.nudge("Food Delivery", dec!(85)),
            "You're approaching your Food Delivery limit (85% used)."
        );
        assert_eq!(
            fmt.nudge("Shopping", dec!(84.5)),
            "You're approaching your Shopping limit (85% used)."
        );
    }
}
