//! Transaction types for NudgeWealth
//!
//! A transaction is created on submission, receives its final status from the
//! evaluation engine exactly once, and is never mutated afterwards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TransactionId;

/// Outcome of evaluating a transaction against its category rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Allowed without comment
    Completed,
    /// Allowed, but close to the limit; carries a nudge
    Pending,
    /// Refused; some or all of the amount is redirected to savings
    Blocked,
}

impl TransactionStatus {
    /// Whether the amount contributes to the category's running total
    pub fn counts_toward_limit(&self) -> bool {
        matches!(self, Self::Completed | Self::Pending)
    }

    /// Parse the lowercase wire name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "completed" => Some(Self::Completed),
            "pending" => Some(Self::Pending),
            "blocked" => Some(Self::Blocked),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: TransactionId,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub merchant: String,
    pub date: DateTime<Utc>,
    pub status: TransactionStatus,
    /// Portion diverted to savings when blocked
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub redirected_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nudge_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Whether the amount contributes to the category's running total
    pub fn is_counted(&self) -> bool {
        self.status.counts_toward_limit()
    }

    /// Redirected amount, zero when nothing was diverted
    pub fn saved(&self) -> Decimal {
        match self.status {
            TransactionStatus::Blocked => self.redirected_amount.unwrap_or_default(),
            _ => Decimal::ZERO,
        }
    }

    /// Case-insensitive match against merchant and category
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.merchant.to_lowercase().contains(&needle)
            || self.category.to_lowercase().contains(&needle)
    }
}

/// A transaction as submitted, before evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub merchant: String,
    /// Submission time; the engine stamps `now` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl NewTransaction {
    pub fn new(category: impl Into<String>, amount: Decimal, merchant: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            amount,
            merchant: merchant.into(),
            date: None,
        }
    }

    pub fn at(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}

/// Filter for history listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionFilter {
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(status) = self.status {
            if txn.status != status {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => txn.matches_search(needle),
            _ => true,
        }
    }
}
