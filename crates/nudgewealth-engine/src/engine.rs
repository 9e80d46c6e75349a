//! Transaction Engine - evaluates, annotates and records transactions
//!
//! ```text
//! submit ──► rule for category ──► spend recomputed from log ──► evaluate
//!                                                                   │
//!        ┌──────────────── advisor (optional, falls back) ◄─────────┘
//!        ▼
//!   persist transaction ──► refresh rule.current ──► store events
//! ```
//!
//! The engine never trusts a rule's cached `current`; the log is the source
//! of truth and the cache is rewritten after every post.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use nudgewealth_advisor::{Advisor, NudgeRequest, RecentSpend, RedirectRequest};
use nudgewealth_store::{typed, RecordStore, StoreEvent};
use nudgewealth_types::{
    HourWindow, InvestmentOption, NewTransaction, NudgeError, Result, SpendingRule, Transaction,
    TransactionFilter, TransactionId, INVESTMENT_OPTIONS, MAX_AMOUNT, RULES, TRANSACTIONS,
};
use rust_decimal::Decimal;
use tokio::sync::broadcast;

use crate::analytics::SpendingAnalytics;
use crate::config::{EngineConfig, LocalClock};
use crate::evaluator::{AdvisoryNeed, BlockReason, Evaluation, RuleEvaluator};
use crate::ledger;
use crate::messages::MessageFormatter;
use crate::rules::RuleBook;

/// The transaction evaluation engine
pub struct TransactionEngine<S: RecordStore + ?Sized> {
    store: Arc<S>,
    rules: RuleBook<S>,
    advisor: Option<Arc<dyn Advisor>>,
    config: EngineConfig,
    clock: LocalClock,
    evaluator: RuleEvaluator,
    messages: MessageFormatter,
}

impl<S: RecordStore + ?Sized> TransactionEngine<S> {
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        Self {
            rules: RuleBook::new(Arc::clone(&store)),
            evaluator: RuleEvaluator::new(config.nudge_threshold_percent),
            messages: MessageFormatter::new(config.currency_symbol.clone()),
            clock: config.local_clock(),
            store,
            advisor: None,
            config,
        }
    }

    /// Enrich blocked and nudged transactions with an advisor
    pub fn with_advisor(mut self, advisor: Arc<dyn Advisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn rules(&self) -> &RuleBook<S> {
        &self.rules
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn has_advisor(&self) -> bool {
        self.advisor.is_some()
    }

    /// Subscribe to store changes
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.store.subscribe()
    }

    /// Validate and process a user-submitted transaction, dated now unless
    /// a date is given
    pub async fn submit(&self, mut new_txn: NewTransaction) -> Result<Transaction> {
        new_txn.category = new_txn.category.trim().to_string();
        new_txn.merchant = new_txn.merchant.trim().to_string();

        if new_txn.category.is_empty() {
            return Err(NudgeError::InvalidTransaction {
                reason: "category must not be empty".to_string(),
            });
        }
        if new_txn.amount < Decimal::ZERO {
            return Err(NudgeError::InvalidTransaction {
                reason: format!("amount must not be negative, got {}", new_txn.amount),
            });
        }
        if new_txn.amount > MAX_AMOUNT {
            return Err(NudgeError::InvalidTransaction {
                reason: format!("amount must not exceed {MAX_AMOUNT}, got {}", new_txn.amount),
            });
        }
        if new_txn.date.is_none() {
            new_txn.date = Some(Utc::now());
        }

        self.process(new_txn).await
    }

    /// Evaluate a transaction against its category rule and record it
    pub async fn process(&self, new_txn: NewTransaction) -> Result<Transaction> {
        let date = new_txn.date.unwrap_or_else(Utc::now);

        let _guard = self.rules.write_lock().lock().await;
        let log: Vec<Transaction> = typed::load_all(self.store.as_ref(), TRANSACTIONS).await?;

        let rules: Vec<SpendingRule> = typed::load_all(self.store.as_ref(), RULES).await?;
        let mut rule = rules.into_iter().find(|r| r.category == new_txn.category);
        let cached_current = rule.as_ref().map(|r| r.current);
        if let Some(rule) = rule.as_mut() {
            rule.current = ledger::category_spending(&log, &rule.category);
        }

        let local_hour = self.clock.hour(date);
        let evaluation = self
            .evaluator
            .evaluate(new_txn.amount, local_hour, rule.as_ref());

        let nudge_message = match (rule.as_ref(), evaluation.advisory) {
            (Some(rule), Some(need)) => {
                Some(self.annotate(&new_txn, rule, &evaluation, need, &log).await)
            }
            _ => None,
        };

        let mut txn = Transaction {
            id: TransactionId::default(),
            category: new_txn.category,
            amount: new_txn.amount,
            merchant: new_txn.merchant,
            date,
            status: evaluation.status,
            redirected_amount: evaluation.redirected_amount,
            nudge_message,
            created_at: None,
            updated_at: None,
        };
        let id = typed::insert(self.store.as_ref(), TRANSACTIONS, &txn).await?;
        txn.id = TransactionId::new(id);

        if let (Some(rule), Some(total)) = (rule.as_ref(), evaluation.rule_total_after) {
            if cached_current != Some(total) {
                self.rules.store_current(rule.id.as_str(), total).await?;
            }
        }

        tracing::info!(
            transaction_id = %txn.id,
            category = %txn.category,
            amount = %txn.amount,
            status = %txn.status,
            redirected = ?txn.redirected_amount,
            "transaction processed"
        );

        let stored = typed::load_one(self.store.as_ref(), TRANSACTIONS, txn.id.as_str()).await?;
        Ok(stored.unwrap_or(txn))
    }

    async fn annotate(
        &self,
        new_txn: &NewTransaction,
        rule: &SpendingRule,
        evaluation: &Evaluation,
        need: AdvisoryNeed,
        log: &[Transaction],
    ) -> String {
        match need {
            AdvisoryNeed::Redirect { amount, reason } => {
                let action = self.recommended_action(&new_txn.category, amount).await;
                self.redirect_message(reason, amount, rule.time_lock.window, action)
            }
            AdvisoryNeed::Nudge => {
                if let Some(message) = self.advisor_nudge(new_txn, rule, log).await {
                    return message;
                }
                self.messages.nudge(
                    &new_txn.category,
                    evaluation.percentage.unwrap_or_default(),
                )
            }
        }
    }

    fn redirect_message(
        &self,
        reason: BlockReason,
        amount: Decimal,
        window: HourWindow,
        action: Option<String>,
    ) -> String {
        match (reason, action) {
            (BlockReason::TimeLock, Some(action)) => self.messages.time_lock_with_action(&action),
            (BlockReason::TimeLock, None) => self.messages.time_lock(window),
            (BlockReason::OverLimit, Some(action)) => {
                self.messages.over_limit_with_action(&action)
            }
            (BlockReason::OverLimit, None) => self.messages.over_limit(amount),
        }
    }

    async fn recommended_action(&self, category: &str, amount: Decimal) -> Option<String> {
        let advisor = self.advisor.as_ref()?;
        let request = RedirectRequest {
            excess_amount: amount,
            spending_category: category.to_string(),
            user_profile: self.config.user_profile.clone(),
            available_options: self.catalog().await,
            market_conditions: self.config.market_conditions.clone(),
        };
        match advisor.recommend_redirect(&request).await {
            Ok(recommendation) => Some(recommendation.recommended_action),
            Err(e) => {
                tracing::warn!(advisor = advisor.name(), error = %e, "redirect recommendation failed, using template");
                None
            }
        }
    }

    async fn advisor_nudge(
        &self,
        new_txn: &NewTransaction,
        rule: &SpendingRule,
        log: &[Transaction],
    ) -> Option<String> {
        let advisor = self.advisor.as_ref()?;

        let mut recent = log.to_vec();
        ledger::sort_newest_first(&mut recent);
        let recent_transactions = recent
            .into_iter()
            .take(self.config.recent_window)
            .map(|t| RecentSpend {
                category: t.category,
                amount: t.amount,
                merchant: t.merchant,
            })
            .collect();

        let request = NudgeRequest {
            transaction_amount: new_txn.amount,
            transaction_category: new_txn.category.clone(),
            current_spending: rule.current,
            spending_limit: rule.limit,
            recent_transactions,
            user_financial_goals: self.config.user_profile.financial_goals.clone(),
            investment_opportunities: self.catalog().await,
        };
        match advisor.spending_nudge(&request).await {
            Ok(nudge) => Some(nudge.nudge_message),
            Err(e) => {
                tracing::warn!(advisor = advisor.name(), error = %e, "spending nudge failed, using template");
                None
            }
        }
    }

    async fn catalog(&self) -> Vec<InvestmentOption> {
        match self.investment_options().await {
            Ok(options) => options,
            Err(e) => {
                tracing::warn!(error = %e, "could not load investment options");
                Vec::new()
            }
        }
    }

    /// The investment option catalog
    pub async fn investment_options(&self) -> Result<Vec<InvestmentOption>> {
        Ok(typed::load_all(self.store.as_ref(), INVESTMENT_OPTIONS).await?)
    }

    /// Counted spend of a category
    pub async fn category_spending(&self, category: &str) -> Result<Decimal> {
        let log: Vec<Transaction> = typed::load_all(self.store.as_ref(), TRANSACTIONS).await?;
        Ok(ledger::category_spending(&log, category))
    }

    /// Rewrite every rule's `current` from the log; returns how many changed
    pub async fn reconcile_rules(&self) -> Result<usize> {
        self.rules.reconcile().await
    }

    /// Transaction history, newest first
    pub async fn transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let mut log: Vec<Transaction> = typed::load_all(self.store.as_ref(), TRANSACTIONS).await?;
        log.retain(|t| filter.matches(t));
        ledger::sort_newest_first(&mut log);
        if let Some(limit) = filter.limit {
            log.truncate(limit);
        }
        Ok(log)
    }

    pub async fn transaction(&self, id: &str) -> Result<Transaction> {
        typed::load_one(self.store.as_ref(), TRANSACTIONS, id)
            .await?
            .ok_or_else(|| NudgeError::TransactionNotFound {
                transaction_id: id.to_string(),
            })
    }

    /// Analytics relative to the current time
    pub async fn analytics(&self) -> Result<SpendingAnalytics> {
        self.analytics_at(Utc::now()).await
    }

    pub async fn analytics_at(&self, now: DateTime<Utc>) -> Result<SpendingAnalytics> {
        let log: Vec<Transaction> = typed::load_all(self.store.as_ref(), TRANSACTIONS).await?;
        let rules = self.rules.list().await?;
        Ok(SpendingAnalytics::new(log, rules, self.clock.offset(), now))
    }
}
