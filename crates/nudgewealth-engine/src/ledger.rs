//! Category totals derived from the transaction log

use std::collections::HashMap;

use nudgewealth_types::{saturating_sum, Transaction};
use rust_decimal::Decimal;

/// Counted spend of one category
pub fn category_spending(transactions: &[Transaction], category: &str) -> Decimal {
    saturating_sum(
        transactions
            .iter()
            .filter(|t| t.is_counted() && t.category == category)
            .map(|t| t.amount),
    )
}

/// Counted spend of every category that has any
pub fn category_totals(transactions: &[Transaction]) -> HashMap<String, Decimal> {
    let mut totals: HashMap<String, Decimal> = HashMap::new();
    for txn in transactions.iter().filter(|t| t.is_counted()) {
        let total = totals.entry(txn.category.clone()).or_default();
        *total = total.saturating_add(txn.amount);
    }
    totals
}

/// Newest first; ties broken by id so the order is stable
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use nudgewealth_types::{TransactionId, TransactionStatus};
    use rust_decimal_macros::dec;

    fn txn(id: &str, category: &str, amount: Decimal, status: TransactionStatus) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            category: category.to_string(),
            amount,
            merchant: "Shop".to_string(),
            date: "2024-05-01T12:00:00Z".parse().unwrap(),
            status,
            redirected_amount: None,
            nudge_message: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_blocked_transactions_never_count() {
        let log = vec![
            txn("1", "Shopping", dec!(100), TransactionStatus::Completed),
            txn("2", "Shopping", dec!(50), TransactionStatus::Pending),
            txn("3", "Shopping", dec!(999), TransactionStatus::Blocked),
            txn("4", "Food Delivery", dec!(20), TransactionStatus::Completed),
        ];
        assert_eq!(category_spending(&log, "Shopping"), dec!(150));
        assert_eq!(category_spending(&log, "Travel"), dec!(0));

        let totals = category_totals(&log);
        assert_eq!(totals.get("Shopping"), Some(&dec!(150)));
        assert_eq!(totals.get("Food Delivery"), Some(&dec!(20)));
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let log = vec![
            txn("1", "Shopping", Decimal::MAX, TransactionStatus::Completed),
            txn("2", "Shopping", Decimal::MAX, TransactionStatus::Pending),
        ];
        assert_eq!(category_spending(&log, "Shopping"), Decimal::MAX);
        assert_eq!(category_totals(&log).get("Shopping"), Some(&Decimal::MAX));
    }
}
