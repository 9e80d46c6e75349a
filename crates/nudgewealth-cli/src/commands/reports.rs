//! Report commands - overview and trend

use colored::*;

use super::Engine;
use crate::display;

pub async fn summary(engine: &Engine, category: Option<&str>) -> anyhow::Result<()> {
    let analytics = engine.analytics().await?;
    let symbol = &engine.config().currency_symbol;

    let overview = analytics.overview();
    display::section("Overview");
    display::kv("Total spending", &display::money(symbol, overview.total_spending));
    display::kv("Saved by redirects", &display::money(symbol, overview.total_saved));
    display::kv("Blocked", &overview.blocked_count.to_string());
    display::kv("Nudged", &overview.nudged_count.to_string());
    if overview.rules_over_limit > 0 {
        display::warning(&format!("{} rule(s) over limit", overview.rules_over_limit));
    }

    let periods = analytics.period_spending(category);
    display::section(&match category {
        Some(category) => format!("Spending - {category}"),
        None => "Spending".to_string(),
    });
    display::kv("Today", &display::money(symbol, periods.daily));
    display::kv("This week", &display::money(symbol, periods.weekly));
    display::kv("This month", &display::money(symbol, periods.monthly));

    let breakdown = analytics.category_breakdown();
    if !breakdown.is_empty() {
        display::section("By Category");
        for share in breakdown {
            println!(
                "  {:<16} {:>12}  {} {}%",
                share.category,
                display::money(symbol, share.amount),
                display::bar(share.percentage, 20),
                share.percentage.round_dp(1)
            );
        }
    }
    Ok(())
}

pub async fn trend(engine: &Engine, days: u32) -> anyhow::Result<()> {
    let analytics = engine.analytics().await?;
    let symbol = &engine.config().currency_symbol;

    display::section(&format!("Last {days} days"));
    for point in analytics.spending_trend(days) {
        println!(
            "  {}  spent {:>12}  saved {:>12}",
            point.date.to_string().bright_black(),
            display::money(symbol, point.spending),
            display::money(symbol, point.saved).bright_green()
        );
    }
    Ok(())
}
