//! Model-backed advisor
//!
//! Prompts ask for a single JSON object. The reply is parsed and checked by
//! the [`AdvisoryGuard`] before it is returned.

use async_trait::async_trait;
use std::fmt::Write;

use crate::advisor::*;
use crate::guard::AdvisoryGuard;
use crate::router::LlmRouter;
use crate::types::CompletionRequest;

const REDIRECT_SYSTEM: &str = "You are a financial advisor inside a personal spending app. \
A purchase was blocked and the user can redirect the money instead. \
Pick exactly one of the listed options that fits the user's risk tolerance and goals.";

const NUDGE_SYSTEM: &str = "You are a financial wellness assistant inside a personal spending app. \
Write a short, friendly nudge about a purchase that brings a category close to its limit. \
Encourage the user to reconsider without being judgemental.";

/// Advisor backed by an [`LlmRouter`]
#[derive(Clone)]
pub struct LlmAdvisor {
    router: LlmRouter,
    guard: AdvisoryGuard,
    temperature: f32,
    max_tokens: u32,
}

impl LlmAdvisor {
    pub fn new(router: LlmRouter) -> Self {
        Self {
            router,
            guard: AdvisoryGuard::new(),
            temperature: 0.4,
            max_tokens: 512,
        }
    }

    /// Advisor over the provider selected by `NUDGEWEALTH_LLM_PROVIDER`
    pub fn from_env() -> Self {
        Self::new(LlmRouter::from_env())
    }

    pub fn with_guard(mut self, guard: AdvisoryGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn router(&self) -> &LlmRouter {
        &self.router
    }

    async fn ask(&self, system: &str, prompt: String) -> Result<String, AdvisorError> {
        let request = CompletionRequest::new(system, prompt)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
            .with_json_mode();
        let response = self.router.complete(request).await?;
        Ok(response.content)
    }
}

fn redirect_prompt(request: &RedirectRequest) -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "Excess amount: {}", request.excess_amount);
    let _ = writeln!(prompt, "Spending category: {}", request.spending_category);
    let _ = writeln!(
        prompt,
        "Risk tolerance: {}",
        request.user_profile.risk_tolerance
    );
    let _ = writeln!(
        prompt,
        "Financial goals: {}",
        request.user_profile.financial_goals.join(", ")
    );
    if let Some(conditions) = &request.market_conditions {
        let _ = writeln!(prompt, "Market conditions: {conditions}");
    }
    let _ = writeln!(prompt, "\nAvailable options:");
    for option in &request.available_options {
        let _ = writeln!(
            prompt,
            "- {} ({}, risk: {}, expected return: {}): {}",
            option.name, option.kind, option.risk_level, option.expected_return, option.description
        );
    }
    let _ = writeln!(
        prompt,
        "\nRespond with JSON: {{\"recommendedAction\": string, \"recommendationRationale\": string, \
         \"investmentOption\": {{\"name\", \"type\", \"riskLevel\", \"expectedReturn\", \"description\"}}, \
         \"redirectAmount\": number}}. redirectAmount must not exceed {}.",
        request.excess_amount
    );
    prompt
}

fn nudge_prompt(request: &NudgeRequest) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "Transaction: {} in {}",
        request.transaction_amount, request.transaction_category
    );
    let _ = writeln!(
        prompt,
        "Spent so far: {} of a {} limit (would become {})",
        request.current_spending,
        request.spending_limit,
        request.projected_spending()
    );
    if !request.recent_transactions.is_empty() {
        let _ = writeln!(prompt, "Recent transactions:");
        for spend in &request.recent_transactions {
            let _ = writeln!(
                prompt,
                "- {} at {} ({})",
                spend.amount, spend.merchant, spend.category
            );
        }
    }
    if !request.user_financial_goals.is_empty() {
        let _ = writeln!(
            prompt,
            "Financial goals: {}",
            request.user_financial_goals.join(", ")
        );
    }
    if !request.investment_opportunities.is_empty() {
        let names: Vec<&str> = request
            .investment_opportunities
            .iter()
            .map(|o| o.name.as_str())
            .collect();
        let _ = writeln!(prompt, "Savings options: {}", names.join(", "));
    }
    let _ = writeln!(
        prompt,
        "\nRespond with JSON: {{\"nudgeMessage\": string, \"suggestedAction\": string, \"isOverLimit\": boolean}}."
    );
    prompt
}

#[async_trait]
impl Advisor for LlmAdvisor {
    fn name(&self) -> &str {
        self.router.provider().name()
    }

    async fn recommend_redirect(
        &self,
        request: &RedirectRequest,
    ) -> Result<RedirectRecommendation, AdvisorError> {
        let raw = self.ask(REDIRECT_SYSTEM, redirect_prompt(request)).await?;
        let recommendation: RedirectRecommendation = self.guard.parse_json(&raw)?;
        self.guard
            .validate_recommendation(request, &recommendation)?;
        tracing::debug!(
            action = %recommendation.recommended_action,
            amount = %recommendation.redirect_amount,
            "redirect recommendation accepted"
        );
        Ok(recommendation)
    }

    async fn spending_nudge(&self, request: &NudgeRequest) -> Result<SpendingNudge, AdvisorError> {
        let raw = self.ask(NUDGE_SYSTEM, nudge_prompt(request)).await?;
        let nudge: SpendingNudge = self.guard.parse_json(&raw)?;
        self.guard.validate_nudge(&nudge)?;
        Ok(nudge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LlmError, ProviderKind};
    use nudgewealth_types::UserProfile;
    use rust_decimal_macros::dec;

    fn nudge_request() -> NudgeRequest {
        NudgeRequest {
            transaction_amount: dec!(200),
            transaction_category: "Shopping".to_string(),
            current_spending: dec!(1500),
            spending_limit: dec!(2000),
            recent_transactions: vec![RecentSpend {
                category: "Shopping".to_string(),
                amount: dec!(1500),
                merchant: "Myntra".to_string(),
            }],
            user_financial_goals: UserProfile::default().financial_goals,
            investment_opportunities: vec![],
        }
    }

    #[test]
    fn test_nudge_prompt_mentions_projection() {
        let prompt = nudge_prompt(&nudge_request());
        assert!(prompt.contains("would become 1700"));
        assert!(prompt.contains("Myntra"));
        assert!(prompt.contains("Emergency Fund"));
    }

    #[tokio::test]
    async fn test_deterministic_router_fails_over() {
        let advisor = LlmAdvisor::new(LlmRouter::from_kind(ProviderKind::Deterministic));
        let result = advisor.spending_nudge(&nudge_request()).await;
        assert!(matches!(
            result,
            Err(AdvisorError::Llm(LlmError::ProviderNotAvailable { .. }))
        ));
    }
}
