//! NudgeWealth CLI - spending control from the terminal
//!
//! Operates directly on the JSON collections in the data directory, so the
//! CLI and a running server see the same records.
//!
//! # Quick Start
//!
//! ```bash
//! nudgewealth seed
//! nudgewealth rules list
//! nudgewealth submit -c "Food Delivery" -a 450 -m Swiggy
//! nudgewealth history --status blocked
//! nudgewealth summary
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use nudgewealth_advisor::{LlmAdvisor, LlmRouter, ProviderKind};
use nudgewealth_engine::{EngineConfig, TransactionEngine};
use nudgewealth_store::FileStore;
use nudgewealth_types::{HourWindow, TransactionStatus};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod display;

use commands::{data, reports, rules, transactions};

/// NudgeWealth CLI - Spending limits, time locks and nudges
#[derive(Parser)]
#[command(name = "nudgewealth")]
#[command(version)]
#[command(about = "Evaluate spending against category limits and time locks", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory holding the JSON collections
    #[arg(long, global = true, env = "NUDGEWEALTH_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Use templated messages only, never call a model
    #[arg(long, global = true)]
    offline: bool,

    /// Local time offset from UTC in minutes (e.g. 330 for IST)
    #[arg(long, global = true, env = "NUDGEWEALTH_UTC_OFFSET_MINUTES", allow_hyphen_values = true)]
    utc_offset: Option<i32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a transaction for evaluation
    Submit {
        /// Spending category
        #[arg(short, long)]
        category: String,

        /// Amount
        #[arg(short, long)]
        amount: Decimal,

        /// Merchant name
        #[arg(short, long)]
        merchant: String,

        /// Timestamp (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },

    /// Show transaction history, newest first
    History {
        /// Only transactions with this status
        #[arg(short, long, value_parser = parse_status)]
        status: Option<TransactionStatus>,

        /// Case-insensitive match on merchant or category
        #[arg(long)]
        search: Option<String>,

        /// Maximum rows
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Manage spending rules
    Rules {
        #[command(subcommand)]
        action: RuleCommands,
    },

    /// Recompute every rule's running total from the log
    Reconcile,

    /// Spending overview and per-rule progress
    Summary {
        /// Restrict period totals to one category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Daily spending and savings
    Trend {
        /// Number of days to show
        #[arg(short, long, default_value = "7", value_parser = clap::value_parser!(u32).range(1..=366))]
        days: u32,
    },

    /// Write demo data into empty collections
    Seed,

    /// Delete every collection
    Reset {
        /// Skip the confirmation guard
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum RuleCommands {
    /// List rules with their progress
    List,

    /// Create a rule for a category
    Add {
        #[arg(short, long)]
        category: String,

        #[arg(short, long)]
        limit: Decimal,

        /// Time lock window as START-END hours, e.g. 22-6
        #[arg(long, value_parser = parse_window)]
        lock: Option<HourWindow>,
    },

    /// Change an existing rule
    Set {
        /// Rule id
        id: String,

        #[arg(long)]
        category: Option<String>,

        #[arg(short, long)]
        limit: Option<Decimal>,

        /// Time lock window as START-END hours; enables the lock
        #[arg(long, value_parser = parse_window, conflicts_with = "unlock")]
        lock: Option<HourWindow>,

        /// Disable the time lock
        #[arg(long)]
        unlock: bool,
    },

    /// Delete a rule
    Remove {
        /// Rule id
        id: String,
    },
}

fn parse_status(s: &str) -> Result<TransactionStatus, String> {
    TransactionStatus::parse(s)
        .ok_or_else(|| format!("unknown status '{s}' (completed, pending, blocked)"))
}

fn parse_window(s: &str) -> Result<HourWindow, String> {
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| format!("expected START-END, got '{s}'"))?;
    let start: u8 = start
        .trim()
        .parse()
        .map_err(|_| format!("invalid start hour '{start}'"))?;
    let end: u8 = end
        .trim()
        .parse()
        .map_err(|_| format!("invalid end hour '{end}'"))?;
    let window = HourWindow::new(start, end);
    window.validate().map_err(|e| e.to_string())?;
    Ok(window)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let store = Arc::new(FileStore::open(&cli.data_dir).await?);
    let mut config = EngineConfig::from_env();
    if let Some(offset) = cli.utc_offset {
        config.utc_offset_minutes = offset;
    }

    let mut engine = TransactionEngine::new(store, config);
    if !cli.offline {
        let router = LlmRouter::from_env();
        if router.kind() != ProviderKind::Deterministic {
            engine = engine.with_advisor(Arc::new(LlmAdvisor::new(router)));
        }
    }

    let result = match cli.command {
        Commands::Submit {
            category,
            amount,
            merchant,
            at,
        } => transactions::submit(&engine, category, amount, merchant, at).await,
        Commands::History {
            status,
            search,
            limit,
        } => transactions::history(&engine, status, search, limit).await,
        Commands::Rules { action } => match action {
            RuleCommands::List => rules::list(&engine).await,
            RuleCommands::Add {
                category,
                limit,
                lock,
            } => rules::add(&engine, category, limit, lock).await,
            RuleCommands::Set {
                id,
                category,
                limit,
                lock,
                unlock,
            } => rules::set(&engine, &id, category, limit, lock, unlock).await,
            RuleCommands::Remove { id } => rules::remove(&engine, &id).await,
        },
        Commands::Reconcile => rules::reconcile(&engine).await,
        Commands::Summary { category } => reports::summary(&engine, category.as_deref()).await,
        Commands::Trend { days } => reports::trend(&engine, days).await,
        Commands::Seed => data::seed(&engine).await,
        Commands::Reset { yes } => data::reset(&engine, yes).await,
    };

    if let Err(e) = &result {
        display::error(&e.to_string());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window() {
        assert_eq!(parse_window("22-6").unwrap(), HourWindow::new(22, 6));
        assert_eq!(parse_window(" 9 - 17 ").unwrap(), HourWindow::new(9, 17));
        assert!(parse_window("22").is_err());
        assert!(parse_window("22-24").is_err());
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("Blocked").unwrap(), TransactionStatus::Blocked);
        assert!(parse_status("refunded").is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_trend_days_bounded() {
        let cli = Cli::try_parse_from(["nudgewealth", "trend", "--days", "30"]).unwrap();
        assert!(matches!(cli.command, Commands::Trend { days: 30 }));
        assert!(Cli::try_parse_from(["nudgewealth", "trend", "--days", "200000000"]).is_err());
        assert!(Cli::try_parse_from(["nudgewealth", "trend", "--days", "0"]).is_err());
    }
}
