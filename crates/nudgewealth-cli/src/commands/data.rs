//! Data commands - seed and reset the collections

use colored::*;
use nudgewealth_store::{seed_if_empty, RecordStore};

use super::Engine;
use crate::display;

pub async fn seed(engine: &Engine) -> anyhow::Result<()> {
    let report = seed_if_empty(engine.store().as_ref()).await?;
    if !report.any() {
        display::info("Every collection already has data; nothing seeded");
        return Ok(());
    }
    for (name, seeded) in [
        ("transactions", report.transactions),
        ("rules", report.rules),
        ("investment options", report.investment_options),
    ] {
        if seeded {
            display::success(&format!("Seeded {name}"));
        }
    }
    let rewritten = engine.reconcile_rules().await?;
    if rewritten > 0 {
        display::info(&format!("{rewritten} rule total(s) refreshed"));
    }
    display::kv("Data directory", &engine.store().dir().display().to_string());
    Ok(())
}

pub async fn reset(engine: &Engine, yes: bool) -> anyhow::Result<()> {
    if !yes {
        display::warning("This deletes every transaction, rule and investment option.");
        println!("  Re-run with {} to confirm.", "--yes".bright_cyan());
        return Ok(());
    }
    engine.store().clear_all().await?;
    display::success("All collections deleted");
    Ok(())
}
