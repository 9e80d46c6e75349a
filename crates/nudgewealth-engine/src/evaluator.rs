//! Rule Evaluator - decides the outcome of a single transaction
//!
//! The evaluator is pure: it sees the amount, the local hour and the rule
//! (with `current` already refreshed from the log) and returns an
//! [`Evaluation`]. Persisting the outcome is the engine's job.
//!
//! Order of checks:
//! 1. No rule for the category: completed
//! 2. Time lock covering the hour: blocked, the whole amount is redirected
//! 3. Projected spend above the limit: blocked, the overshoot is redirected
//! 4. Projected spend above the nudge threshold: pending
//! 5. Otherwise: completed

use nudgewealth_types::{percent_of, SpendingRule, TransactionStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Why money was redirected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    TimeLock,
    OverLimit,
}

/// Advisory call the engine should attempt for this outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdvisoryNeed {
    /// Ask where the redirected amount should go
    Redirect { amount: Decimal, reason: BlockReason },
    /// Ask for a nudge message
    Nudge,
}

/// Outcome of evaluating one transaction against its rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub status: TransactionStatus,
    pub redirected_amount: Option<Decimal>,
    /// Category spend if the transaction were counted
    pub projected: Decimal,
    /// `projected` as a percentage of the limit; `None` without a rule or
    /// with a zero limit
    pub percentage: Option<Decimal>,
    /// Category spend after posting; `None` without a rule
    pub rule_total_after: Option<Decimal>,
    pub advisory: Option<AdvisoryNeed>,
}

impl Evaluation {
    pub fn is_blocked(&self) -> bool {
        self.status == TransactionStatus::Blocked
    }

    pub fn block_reason(&self) -> Option<BlockReason> {
        match self.advisory {
            Some(AdvisoryNeed::Redirect { reason, .. }) => Some(reason),
            _ => None,
        }
    }
}

/// Pure limit and time-lock evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleEvaluator {
    nudge_threshold_percent: Decimal,
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self::new(Decimal::from(80))
    }
}

impl RuleEvaluator {
    pub fn new(nudge_threshold_percent: Decimal) -> Self {
        Self {
            nudge_threshold_percent,
        }
    }

    pub fn nudge_threshold_percent(&self) -> Decimal {
        self.nudge_threshold_percent
    }

    /// `projected / limit > threshold / 100`, compared without dividing
    /// while the products fit
    fn above_threshold(&self, projected: Decimal, limit: Decimal) -> bool {
        let scaled = projected.checked_mul(Decimal::ONE_HUNDRED);
        let bound = self.nudge_threshold_percent.checked_mul(limit);
        match (scaled, bound) {
            (Some(scaled), Some(bound)) => scaled > bound,
            (None, Some(_)) => true,
            (Some(_), None) => false,
            (None, None) => {
                percent_of(projected, limit).is_some_and(|pct| pct > self.nudge_threshold_percent)
            }
        }
    }

    /// Evaluate `amount` at `local_hour` against `rule`
    pub fn evaluate(
        &self,
        amount: Decimal,
        local_hour: u32,
        rule: Option<&SpendingRule>,
    ) -> Evaluation {
        let Some(rule) = rule else {
            return Evaluation {
                status: TransactionStatus::Completed,
                redirected_amount: None,
                projected: amount,
                percentage: None,
                rule_total_after: None,
                advisory: None,
            };
        };

        let current = rule.current;
        let projected = current.saturating_add(amount);
        let percentage = percent_of(projected, rule.limit);

        if rule.time_lock.blocks(local_hour) {
            return Evaluation {
                status: TransactionStatus::Blocked,
                redirected_amount: Some(amount),
                projected,
                percentage,
                rule_total_after: Some(current),
                advisory: Some(AdvisoryNeed::Redirect {
                    amount,
                    reason: BlockReason::TimeLock,
                }),
            };
        }

        if projected > rule.limit {
            let excess = projected.saturating_sub(rule.limit);
            return Evaluation {
                status: TransactionStatus::Blocked,
                redirected_amount: Some(excess),
                projected,
                percentage,
                rule_total_after: Some(current),
                advisory: Some(AdvisoryNeed::Redirect {
                    amount: excess,
                    reason: BlockReason::OverLimit,
                }),
            };
        }

        let nudged = self.above_threshold(projected, rule.limit);
        let (status, advisory) = if nudged {
            (TransactionStatus::Pending, Some(AdvisoryNeed::Nudge))
        } else {
            (TransactionStatus::Completed, None)
        };

        Evaluation {
            status,
            redirected_amount: None,
            projected,
            percentage,
            rule_total_after: Some(projected),
            advisory,
        }
    }
}
