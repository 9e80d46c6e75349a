//! Display utilities for the CLI

use colored::*;
use nudgewealth_types::{Transaction, TransactionStatus};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", "━".repeat(60).bright_black());
    println!(" {}", title.bright_white().bold());
    println!("{}", "━".repeat(60).bright_black());
}

/// Print a success message
pub fn success(message: &str) {
    println!("  {} {}", "✓".bright_green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("  {} {}", "✗".bright_red(), message.bright_red());
}

/// Print an info message
pub fn info(message: &str) {
    println!("  {} {}", "→".bright_blue(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("  {} {}", "⚠".yellow(), message.yellow());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("      {}: {}", key, value.bright_cyan());
}

/// Amount with currency symbol and two decimals
pub fn money(symbol: &str, amount: Decimal) -> String {
    format!("{}{:.2}", symbol, amount.round_dp(2))
}

/// Colored status label
pub fn status(status: TransactionStatus) -> ColoredString {
    match status {
        TransactionStatus::Completed => "completed".bright_green(),
        TransactionStatus::Pending => "pending".yellow(),
        TransactionStatus::Blocked => "blocked".bright_red(),
    }
}

/// Text bar of `width` cells filled to `percent`
pub fn bar(percent: Decimal, width: usize) -> String {
    let clamped = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let filled = (clamped * Decimal::from(width) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// One history line
pub fn transaction_row(symbol: &str, txn: &Transaction) {
    println!(
        "  {}  {:<16} {:<18} {:>12}  {}",
        txn.date.format("%Y-%m-%d %H:%M").to_string().bright_black(),
        txn.category,
        txn.merchant,
        money(symbol, txn.amount),
        status(txn.status)
    );
    if let Some(message) = &txn.nudge_message {
        println!("      {}", message.italic());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money("₹", dec!(70)), "₹70.00");
        assert_eq!(money("$", dec!(1.005)), "$1.00");
    }

    #[test]
    fn test_bar_is_clamped() {
        assert_eq!(bar(dec!(50), 10), "█████░░░░░");
        assert_eq!(bar(dec!(150), 4), "████");
        assert_eq!(bar(dec!(-5), 4), "░░░░");
    }
}
