//! Spending Analytics - dashboard figures over the transaction log
//!
//! Spending counts completed and pending transactions; "saved" is the
//! redirected amount of blocked ones. Calendar boundaries (day, week
//! starting Sunday, month) are taken in the configured local time.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc};
use nudgewealth_types::{percent_of, saturating_sum, SpendingRule, Transaction, TransactionStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger;

/// Longest trend that will be computed; longer requests are clamped
pub const MAX_TREND_DAYS: u32 = 366;

/// One day of the spending trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub spending: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub saved: Decimal,
}

/// A category's share of total spending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
}

/// Headline figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spending: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_saved: Decimal,
    pub blocked_count: usize,
    /// Transactions that went through with a nudge
    pub nudged_count: usize,
    pub rules_over_limit: usize,
}

/// Spending totals for the current day, week and month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSpending {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub daily: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub weekly: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly: Decimal,
}

/// Snapshot of the log and rules, evaluated relative to `now`
///
/// Pending transactions went through with a nudge, so every total here
/// includes them. Totals are higher than a sum over completed transactions
/// alone whenever anything is pending.
#[derive(Debug, Clone)]
pub struct SpendingAnalytics {
    transactions: Vec<Transaction>,
    rules: Vec<SpendingRule>,
    offset: FixedOffset,
    today: NaiveDate,
}

impl SpendingAnalytics {
    pub fn new(
        transactions: Vec<Transaction>,
        rules: Vec<SpendingRule>,
        offset: FixedOffset,
        now: DateTime<Utc>,
    ) -> Self {
        let today = now.with_timezone(&offset).date_naive();
        Self {
            transactions,
            rules,
            offset,
            today,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn local_date(&self, txn: &Transaction) -> NaiveDate {
        txn.date.with_timezone(&self.offset).date_naive()
    }

    fn spending_since(&self, start: NaiveDate, category: Option<&str>) -> Decimal {
        saturating_sum(
            self.transactions
                .iter()
                .filter(|t| t.is_counted())
                .filter(|t| category.map_or(true, |c| t.category == c))
                .filter(|t| self.local_date(t) >= start)
                .map(|t| t.amount),
        )
    }

    /// Spending since the first of the current month
    pub fn monthly_spending(&self, category: Option<&str>) -> Decimal {
        let start = self.today.with_day(1).unwrap_or(self.today);
        self.spending_since(start, category)
    }

    /// Spending since the most recent Sunday
    pub fn weekly_spending(&self, category: Option<&str>) -> Decimal {
        let days_since_sunday = i64::from(self.today.weekday().num_days_from_sunday());
        self.spending_since(self.today - Duration::days(days_since_sunday), category)
    }

    /// Spending since local midnight
    pub fn daily_spending(&self, category: Option<&str>) -> Decimal {
        self.spending_since(self.today, category)
    }

    pub fn period_spending(&self, category: Option<&str>) -> PeriodSpending {
        PeriodSpending {
            category: category.map(str::to_string),
            daily: self.daily_spending(category),
            weekly: self.weekly_spending(category),
            monthly: self.monthly_spending(category),
        }
    }

    /// Per-day spending and savings for the last `days` days, oldest first.
    ///
    /// `days` is clamped to `1..=MAX_TREND_DAYS`.
    pub fn spending_trend(&self, days: u32) -> Vec<TrendPoint> {
        let days = days.clamp(1, MAX_TREND_DAYS);
        let mut by_day: HashMap<NaiveDate, (Decimal, Decimal)> = HashMap::new();
        for txn in &self.transactions {
            let entry = by_day.entry(self.local_date(txn)).or_default();
            if txn.is_counted() {
                entry.0 = entry.0.saturating_add(txn.amount);
            }
            entry.1 = entry.1.saturating_add(txn.saved());
        }

        (0..i64::from(days))
            .rev()
            .filter_map(|back| self.today.checked_sub_signed(Duration::days(back)))
            .map(|date| {
                let (spending, saved) = by_day.get(&date).copied().unwrap_or_default();
                TrendPoint {
                    date,
                    spending,
                    saved,
                }
            })
            .collect()
    }

    /// Counted spend per category, largest first
    pub fn category_breakdown(&self) -> Vec<CategoryShare> {
        let totals = ledger::category_totals(&self.transactions);
        let grand_total = saturating_sum(totals.values().copied());

        let mut shares: Vec<CategoryShare> = totals
            .into_iter()
            .map(|(category, amount)| CategoryShare {
                percentage: percent_of(amount, grand_total)
                    .map(|pct| pct.round_dp(2))
                    .unwrap_or_default(),
                category,
                amount,
            })
            .collect();
        shares.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });
        shares
    }

    pub fn overview(&self) -> Overview {
        let totals = ledger::category_totals(&self.transactions);
        let rules_over_limit = self
            .rules
            .iter()
            .filter(|r| totals.get(&r.category).copied().unwrap_or_default() > r.limit)
            .count();

        Overview {
            total_spending: saturating_sum(
                self.transactions
                    .iter()
                    .filter(|t| t.is_counted())
                    .map(|t| t.amount),
            ),
            total_saved: saturating_sum(self.transactions.iter().map(Transaction::saved)),
            blocked_count: self
                .transactions
                .iter()
                .filter(|t| t.status == TransactionStatus::Blocked)
                .count(),
            nudged_count: self
                .transactions
                .iter()
                .filter(|t| t.status == TransactionStatus::Pending)
                .count(),
            rules_over_limit,
        }
    }
}
