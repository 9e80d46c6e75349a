//! Transaction commands - submit and browse history

use chrono::{DateTime, Utc};
use colored::*;
use nudgewealth_types::{NewTransaction, TransactionFilter, TransactionStatus};
use rust_decimal::Decimal;

use super::Engine;
use crate::display;

/// Evaluate and record a transaction
pub async fn submit(
    engine: &Engine,
    category: String,
    amount: Decimal,
    merchant: String,
    at: Option<DateTime<Utc>>,
) -> anyhow::Result<()> {
    let mut new_txn = NewTransaction::new(category, amount, merchant);
    new_txn.date = at;

    let txn = engine.submit(new_txn).await?;
    let symbol = &engine.config().currency_symbol;

    display::section("Transaction");
    match txn.status {
        TransactionStatus::Completed => display::success("Completed"),
        TransactionStatus::Pending => display::warning("Pending - approaching the limit"),
        TransactionStatus::Blocked => display::error("Blocked"),
    }
    display::kv("ID", txn.id.as_str());
    display::kv("Category", &txn.category);
    display::kv("Merchant", &txn.merchant);
    display::kv("Amount", &display::money(symbol, txn.amount));
    if let Some(redirected) = txn.redirected_amount {
        display::kv("Redirected", &display::money(symbol, redirected));
    }
    if let Some(message) = &txn.nudge_message {
        println!();
        println!("  {}", message.bright_white().italic());
    }
    println!();
    Ok(())
}

/// Print the newest transactions
pub async fn history(
    engine: &Engine,
    status: Option<TransactionStatus>,
    search: Option<String>,
    limit: usize,
) -> anyhow::Result<()> {
    let filter = TransactionFilter {
        status,
        search,
        limit: Some(limit),
    };
    let txns = engine.transactions(&filter).await?;

    display::section("Transaction History");
    if txns.is_empty() {
        display::info("No transactions found");
        return Ok(());
    }
    let symbol = &engine.config().currency_symbol;
    for txn in &txns {
        display::transaction_row(symbol, txn);
    }
    println!();
    println!("  {}", format!("{} shown", txns.len()).bright_black());
    Ok(())
}
