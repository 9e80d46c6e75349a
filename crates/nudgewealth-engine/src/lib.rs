//! NudgeWealth Engine - transaction evaluation and spending control
//!
//! Every incoming transaction is checked against the rule for its category:
//!
//! - **Time locks** block spending in a category during configured hours;
//!   the whole amount is redirected
//! - **Limits** block the part of a transaction that would overshoot the
//!   category limit; the overshoot is redirected
//! - **Nudges** mark transactions that bring a category above 80% of its
//!   limit as `pending`, with a message encouraging reconsideration
//!
//! The advisor is optional. Without one, or when it fails, messages come
//! from [`messages::MessageFormatter`] and the outcome is the same.
//!
//! ```ignore
//! let store = Arc::new(MemoryStore::new());
//! let engine = TransactionEngine::new(store, EngineConfig::default());
//! let txn = engine
//!     .submit(NewTransaction::new("Food Delivery", dec!(450), "Swiggy"))
//!     .await?;
//! ```

pub mod analytics;
pub mod config;
pub mod engine;
pub mod evaluator;
pub mod ledger;
pub mod messages;
pub mod rules;

pub use analytics::{CategoryShare, Overview, PeriodSpending, SpendingAnalytics, TrendPoint};
pub use config::{EngineConfig, LocalClock};
pub use engine::TransactionEngine;
pub use evaluator::{AdvisoryNeed, BlockReason, Evaluation, RuleEvaluator};
pub use messages::MessageFormatter;
pub use rules::RuleBook;
