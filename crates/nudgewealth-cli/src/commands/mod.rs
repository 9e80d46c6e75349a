//! Subcommand implementations

use nudgewealth_engine::TransactionEngine;
use nudgewealth_store::FileStore;

pub mod data;
pub mod reports;
pub mod rules;
pub mod transactions;

/// Engine over the on-disk collections
pub type Engine = TransactionEngine<FileStore>;
