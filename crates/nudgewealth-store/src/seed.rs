//! Demo fixtures written into an empty store
//!
//! Transactions are dated relative to "now" so the analytics views have
//! recent data. Rules get ids `rule-N`, investment options `investment-N`.

use chrono::{Duration, Utc};
use nudgewealth_types::{
    InvestmentOption, OptionId, OptionKind, RiskLevel, RuleId, SpendingRule, TimeLock,
    Transaction, TransactionId, TransactionStatus, INVESTMENT_OPTIONS, RULES, TRANSACTIONS,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::typed::to_document;
use crate::{RecordStore, Result};

/// Which collections were seeded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub transactions: bool,
    pub rules: bool,
    pub investment_options: bool,
}

impl SeedReport {
    pub fn any(&self) -> bool {
        self.transactions || self.rules || self.investment_options
    }
}

/// Seed every collection that has never been written
pub async fn seed_if_empty<S: RecordStore + ?Sized>(store: &S) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if !store.has_collection(TRANSACTIONS).await? {
        let docs = demo_transactions()
            .iter()
            .map(|t| to_document(t, TRANSACTIONS))
            .collect::<Result<Vec<_>>>()?;
        store.replace_collection(TRANSACTIONS, docs).await?;
        report.transactions = true;
    }

    if !store.has_collection(RULES).await? {
        let docs = demo_rules()
            .iter()
            .map(|r| to_document(r, RULES))
            .collect::<Result<Vec<_>>>()?;
        store.replace_collection(RULES, docs).await?;
        report.rules = true;
    }

    if !store.has_collection(INVESTMENT_OPTIONS).await? {
        let docs = demo_investment_options()
            .iter()
            .map(|o| to_document(o, INVESTMENT_OPTIONS))
            .collect::<Result<Vec<_>>>()?;
        store.replace_collection(INVESTMENT_OPTIONS, docs).await?;
        report.investment_options = true;
    }

    if report.any() {
        tracing::info!(?report, backend = store.name(), "seeded demo data");
    }
    Ok(report)
}

fn demo_transaction(
    id: &str,
    category: &str,
    amount: Decimal,
    merchant: &str,
    days_ago: i64,
    status: TransactionStatus,
    redirected: Option<Decimal>,
) -> Transaction {
    Transaction {
        id: TransactionId::new(id),
        category: category.to_string(),
        amount,
        merchant: merchant.to_string(),
        date: Utc::now() - Duration::days(days_ago),
        status,
        redirected_amount: redirected,
        nudge_message: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn demo_transactions() -> Vec<Transaction> {
    use TransactionStatus::{Blocked, Completed};
    vec![
        demo_transaction("1", "Food Delivery", dec!(450), "Swiggy", 1, Completed, None),
        demo_transaction("2", "Shopping", dec!(2500), "Amazon", 2, Completed, None),
        demo_transaction("3", "Entertainment", dec!(999), "Netflix", 3, Completed, None),
        demo_transaction("4", "Food Delivery", dec!(120), "Zomato", 3, Completed, None),
        demo_transaction("5", "Transport", dec!(350), "Uber", 4, Completed, None),
        demo_transaction("6", "Food Delivery", dec!(850), "Zomato", 0, Blocked, Some(dec!(850))),
        demo_transaction("7", "Shopping", dec!(4500), "Myntra", 0, Blocked, Some(dec!(2000))),
        demo_transaction("8", "Transport", dec!(150), "Ola", 5, Completed, None),
        demo_transaction("9", "Food Delivery", dec!(300), "Blinkit", 6, Completed, None),
        demo_transaction("10", "Entertainment", dec!(500), "PVR Cinemas", 7, Completed, None),
    ]
}

/// Fixture rules; `current` is derived from the fixture transaction log
pub fn demo_rules() -> Vec<SpendingRule> {
    let transactions = demo_transactions();
    let mut rules = vec![
        SpendingRule {
            id: RuleId::new("rule-1"),
            category: "Food Delivery".to_string(),
            limit: dec!(2000),
            current: Decimal::ZERO,
            time_lock: TimeLock::between(22, 6),
        },
        SpendingRule {
            id: RuleId::new("rule-2"),
            category: "Shopping".to_string(),
            limit: dec!(5000),
            current: Decimal::ZERO,
            time_lock: TimeLock::disabled(),
        },
        SpendingRule {
            id: RuleId::new("rule-3"),
            category: "Entertainment".to_string(),
            limit: dec!(1500),
            current: Decimal::ZERO,
            time_lock: TimeLock::disabled(),
        },
    ];
    for rule in &mut rules {
        rule.current = transactions
            .iter()
            .filter(|t| t.category == rule.category && t.is_counted())
            .map(|t| t.amount)
            .sum();
    }
    rules
}

pub fn demo_investment_options() -> Vec<InvestmentOption> {
    vec![
        InvestmentOption {
            id: OptionId::new("investment-1"),
            name: "Nifty 50 Index Fund".to_string(),
            kind: OptionKind::Investment,
            risk_level: RiskLevel::Medium,
            expected_return: "12-15%".to_string(),
            description: "Low-cost tracker for India's top 50 companies.".to_string(),
        },
        InvestmentOption {
            id: OptionId::new("investment-2"),
            name: "Liquid Savings Pot".to_string(),
            kind: OptionKind::Savings,
            risk_level: RiskLevel::VeryLow,
            expected_return: "5.5%".to_string(),
            description: "Highly liquid savings for emergency use.".to_string(),
        },
        InvestmentOption {
            id: OptionId::new("investment-3"),
            name: "Digital Gold".to_string(),
            kind: OptionKind::Investment,
            risk_level: RiskLevel::Medium,
            expected_return: "9-11%".to_string(),
            description: "Physical gold-backed digital investment.".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[tokio::test]
    async fn test_seed_only_fills_missing_collections() {
        let store = MemoryStore::new();
        store.replace_collection(RULES, Vec::new()).await.unwrap();

        let report = seed_if_empty(&store).await.unwrap();
        assert!(report.transactions);
        assert!(!report.rules);
        assert!(report.investment_options);
        assert!(store.collection(RULES).await.unwrap().is_empty());
        assert_eq!(store.collection(TRANSACTIONS).await.unwrap().len(), 10);

        let again = seed_if_empty(&store).await.unwrap();
        assert!(!again.any());
    }

    #[test]
    fn test_seeded_rule_totals_match_fixture_log() {
        let totals: Vec<_> = demo_rules().into_iter().map(|r| r.current).collect();
        assert_eq!(totals, vec![dec!(870), dec!(2500), dec!(1499)]);
    }
}
