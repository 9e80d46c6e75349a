//! Advisory contract consumed by the evaluation engine
//!
//! Both calls are best-effort: the engine treats any [`AdvisorError`] as
//! "use the templated message" and never lets it change an outcome.

use async_trait::async_trait;
use nudgewealth_types::{InvestmentOption, UserProfile};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::LlmError;

/// Errors produced by an advisor
#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Malformed advisor output: {message}")]
    MalformedOutput { message: String },

    #[error("Advisor output rejected: {reason}")]
    Rejected { reason: String },
}

/// Ask where blocked money should go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectRequest {
    /// Amount to redirect (the overshoot, or the full amount for time locks)
    #[serde(with = "rust_decimal::serde::float")]
    pub excess_amount: Decimal,
    pub spending_category: String,
    pub user_profile: UserProfile,
    /// Candidate destinations; the advisor must pick one of these
    pub available_options: Vec<InvestmentOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_conditions: Option<String>,
}

/// Where blocked money should go, and why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectRecommendation {
    /// e.g. "Invest in Nifty 50 Index Fund"
    pub recommended_action: String,
    pub recommendation_rationale: String,
    pub investment_option: InvestmentOption,
    #[serde(with = "rust_decimal::serde::float")]
    pub redirect_amount: Decimal,
}

/// A recent transaction shown to the advisor for context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSpend {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub merchant: String,
}

/// Ask for a nudge on a transaction near its category limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NudgeRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub transaction_amount: Decimal,
    pub transaction_category: String,
    /// Category spend before this transaction
    #[serde(with = "rust_decimal::serde::float")]
    pub current_spending: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub spending_limit: Decimal,
    #[serde(default)]
    pub recent_transactions: Vec<RecentSpend>,
    #[serde(default)]
    pub user_financial_goals: Vec<String>,
    #[serde(default)]
    pub investment_opportunities: Vec<InvestmentOption>,
}

impl NudgeRequest {
    /// Category spend if the transaction goes through
    pub fn projected_spending(&self) -> Decimal {
        self.current_spending.saturating_add(self.transaction_amount)
    }
}

/// A personalised nudge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingNudge {
    pub nudge_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    #[serde(default)]
    pub is_over_limit: bool,
}

/// Source of advisory messages
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Advisor name for logs
    fn name(&self) -> &str;

    /// Recommend a destination for a blocked amount
    async fn recommend_redirect(
        &self,
        request: &RedirectRequest,
    ) -> Result<RedirectRecommendation, AdvisorError>;

    /// Produce a nudge for a transaction approaching its limit
    async fn spending_nudge(&self, request: &NudgeRequest) -> Result<SpendingNudge, AdvisorError>;
}
