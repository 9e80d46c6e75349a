//! NudgeWealth Types - Canonical domain types for spending control
//!
//! This crate contains the foundational types shared by the store, the
//! advisory layer and the evaluation engine:
//!
//! - Identity types (`TransactionId`, `RuleId`, `OptionId`)
//! - Transactions and their three terminal statuses
//! - Per-category spending rules with optional time locks
//! - Investment options and the user profile handed to the advisor
//!
//! Amounts are `rust_decimal::Decimal` so limit arithmetic is exact. The
//! serialized form uses camelCase keys and plain JSON numbers, matching the
//! record format of the collections on disk.

pub mod amount;
pub mod error;
pub mod identity;
pub mod investment;
pub mod rule;
pub mod transaction;

pub use amount::{percent_of, saturating_sum, MAX_AMOUNT};
pub use error::*;
pub use identity::*;
pub use investment::*;
pub use rule::*;
pub use transaction::*;

pub use rust_decimal::Decimal;

/// Collection holding transaction records
pub const TRANSACTIONS: &str = "transactions";

/// Collection holding spending rules
pub const RULES: &str = "rules";

/// Collection holding the investment option catalog
pub const INVESTMENT_OPTIONS: &str = "investment_options";
