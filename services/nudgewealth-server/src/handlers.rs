//! Request handlers

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use chrono::Utc;
use futures::Stream;
use nudgewealth_engine::analytics::MAX_TREND_DAYS;
use nudgewealth_engine::{CategoryShare, Overview, PeriodSpending, TrendPoint};
use nudgewealth_types::{
    InvestmentOption, NewSpendingRule, NewTransaction, RulePatch, SpendingRule, Transaction,
    TransactionFilter,
};
use serde::Deserialize;
use tokio::sync::broadcast;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Health
// ============================================================================

pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let engine = &state.engine;
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "store": engine.store().name(),
        "advisor": engine.has_advisor(),
        "uptime_seconds": (Utc::now() - state.started_at).num_seconds(),
    }))
}

// ============================================================================
// Transactions
// ============================================================================

pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<TransactionFilter>,
) -> ApiResult<Json<Vec<Transaction>>> {
    Ok(Json(state.engine.transactions(&filter).await?))
}

pub async fn submit_transaction(
    State(state): State<Arc<AppState>>,
    Json(new_txn): Json<NewTransaction>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let txn = state.engine.submit(new_txn).await?;
    Ok((StatusCode::CREATED, Json(txn)))
}

pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Transaction>> {
    Ok(Json(state.engine.transaction(&id).await?))
}

// ============================================================================
// Rules
// ============================================================================

pub async fn list_rules(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<SpendingRule>>> {
    Ok(Json(state.engine.rules().list().await?))
}

pub async fn create_rule(
    State(state): State<Arc<AppState>>,
    Json(new_rule): Json<NewSpendingRule>,
) -> ApiResult<(StatusCode, Json<SpendingRule>)> {
    let rule = state.engine.rules().create(new_rule).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

pub async fn update_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<RulePatch>,
) -> ApiResult<Json<SpendingRule>> {
    Ok(Json(state.engine.rules().update(&id, patch).await?))
}

pub async fn delete_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.engine.rules().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reconcile_rules(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<serde_json::Value>> {
    let rewritten = state.engine.reconcile_rules().await?;
    Ok(Json(serde_json::json!({ "rewritten": rewritten })))
}

// ============================================================================
// Analytics
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    #[serde(default = "default_trend_days")]
    pub days: u32,
}

fn default_trend_days() -> u32 {
    7
}

#[derive(Debug, Deserialize)]
pub struct SpendingQuery {
    pub category: Option<String>,
}

pub async fn overview(State(state): State<Arc<AppState>>) -> ApiResult<Json<Overview>> {
    Ok(Json(state.engine.analytics().await?.overview()))
}

pub async fn trend(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrendQuery>,
) -> ApiResult<Json<Vec<TrendPoint>>> {
    if query.days == 0 || query.days > MAX_TREND_DAYS {
        return Err(ApiError::BadRequest(format!(
            "days must be between 1 and {MAX_TREND_DAYS}"
        )));
    }
    Ok(Json(state.engine.analytics().await?.spending_trend(query.days)))
}

pub async fn breakdown(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<CategoryShare>>> {
    Ok(Json(state.engine.analytics().await?.category_breakdown()))
}

pub async fn spending(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SpendingQuery>,
) -> ApiResult<Json<PeriodSpending>> {
    let analytics = state.engine.analytics().await?;
    Ok(Json(analytics.period_spending(query.category.as_deref())))
}

pub async fn investment_options(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<InvestmentOption>>> {
    Ok(Json(state.engine.investment_options().await?))
}

// ============================================================================
// SSE Event Stream
// ============================================================================

pub async fn events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.engine.subscribe();

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    yield Ok(Event::default()
                        .event(event.event_type())
                        .data(serde_json::to_string(&event).unwrap_or_default()));
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "event subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
