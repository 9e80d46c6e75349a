//! Rule commands - manage category limits and time locks

use colored::*;
use nudgewealth_types::{HourWindow, NewSpendingRule, RulePatch, SpendingRule};
use rust_decimal::Decimal;

use super::Engine;
use crate::display;

fn print_rule(symbol: &str, rule: &SpendingRule) {
    let percent = rule.percent_used().unwrap_or(if rule.current.is_zero() {
        Decimal::ZERO
    } else {
        Decimal::ONE_HUNDRED
    });
    let headline = format!(
        "{:<16} {} / {}",
        rule.category,
        display::money(symbol, rule.current),
        display::money(symbol, rule.limit)
    );
    if rule.is_over_limit() {
        println!("  {}", headline.bright_red());
    } else {
        println!("  {}", headline.bright_white());
    }
    println!(
        "      {} {}%  {}",
        display::bar(percent, 24),
        percent.round_dp(0),
        rule.id.as_str().bright_black()
    );
    if rule.time_lock.enabled {
        let window = rule.time_lock.window;
        println!(
            "      {}",
            format!("locked {:02}:00 - {:02}:00", window.start, window.end).yellow()
        );
    }
}

pub async fn list(engine: &Engine) -> anyhow::Result<()> {
    let rules = engine.rules().list().await?;

    display::section("Spending Rules");
    if rules.is_empty() {
        display::info("No rules yet. Add one with `nudgewealth rules add`.");
        return Ok(());
    }
    for rule in &rules {
        print_rule(&engine.config().currency_symbol, rule);
    }
    Ok(())
}

pub async fn add(
    engine: &Engine,
    category: String,
    limit: Decimal,
    lock: Option<HourWindow>,
) -> anyhow::Result<()> {
    let mut new_rule = NewSpendingRule::new(category, limit);
    if let Some(window) = lock {
        new_rule = new_rule.with_time_lock(window.start, window.end);
    }
    let rule = engine.rules().create(new_rule).await?;

    display::success(&format!("Rule created for {}", rule.category.bright_cyan()));
    print_rule(&engine.config().currency_symbol, &rule);
    Ok(())
}

pub async fn set(
    engine: &Engine,
    id: &str,
    category: Option<String>,
    limit: Option<Decimal>,
    lock: Option<HourWindow>,
    unlock: bool,
) -> anyhow::Result<()> {
    let patch = RulePatch {
        category,
        limit,
        time_lock_enabled: if unlock {
            Some(false)
        } else {
            lock.map(|_| true)
        },
        time_lock_range: lock,
    };
    if patch.is_empty() {
        display::warning("Nothing to change");
        return Ok(());
    }
    let rule = engine.rules().update(id, patch).await?;

    display::success(&format!("Rule {} updated", id.bright_cyan()));
    print_rule(&engine.config().currency_symbol, &rule);
    Ok(())
}

pub async fn remove(engine: &Engine, id: &str) -> anyhow::Result<()> {
    engine.rules().delete(id).await?;
    display::success(&format!("Rule {} deleted", id.bright_cyan()));
    Ok(())
}

pub async fn reconcile(engine: &Engine) -> anyhow::Result<()> {
    let rewritten = engine.reconcile_rules().await?;
    if rewritten == 0 {
        display::success("All rules already match the transaction log");
    } else {
        display::success(&format!("{rewritten} rule(s) refreshed from the transaction log"));
    }
    Ok(())
}
