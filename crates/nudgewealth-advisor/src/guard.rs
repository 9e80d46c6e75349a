//! Advisory Guard - validates model output before the engine uses it
//!
//! Model output is untrusted. A response is rejected when it:
//! - contains prompt-injection markers
//! - is empty or absurdly long
//! - redirects a negative amount, or more than was asked for
//! - picks a destination outside the offered catalog
//!
//! A rejection is reported as [`AdvisorError::Rejected`]; the engine then
//! falls back to its templated message.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use crate::advisor::{AdvisorError, RedirectRecommendation, RedirectRequest, SpendingNudge};

/// Configuration for the guard
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Longest accepted message, in characters
    pub max_message_chars: usize,
    /// Lowercase phrases that indicate an injected instruction
    pub injection_patterns: Vec<String>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            max_message_chars: 600,
            injection_patterns: vec![
                "ignore previous".to_string(),
                "ignore all".to_string(),
                "disregard".to_string(),
                "bypass".to_string(),
                "system prompt".to_string(),
                "you are now".to_string(),
            ],
        }
    }
}

/// Validator for advisor output
#[derive(Debug, Clone, Default)]
pub struct AdvisoryGuard {
    config: GuardConfig,
}

impl AdvisoryGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GuardConfig) -> Self {
        Self { config }
    }

    fn check_text(&self, field: &str, text: &str) -> Result<(), AdvisorError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AdvisorError::Rejected {
                reason: format!("{field} is empty"),
            });
        }
        if trimmed.chars().count() > self.config.max_message_chars {
            return Err(AdvisorError::Rejected {
                reason: format!(
                    "{field} exceeds {} characters",
                    self.config.max_message_chars
                ),
            });
        }
        let lower = trimmed.to_lowercase();
        if let Some(pattern) = self
            .config
            .injection_patterns
            .iter()
            .find(|p| lower.contains(p.as_str()))
        {
            return Err(AdvisorError::Rejected {
                reason: format!("{field} contains '{pattern}'"),
            });
        }
        Ok(())
    }

    /// Validate a redirect recommendation against the request it answers
    pub fn validate_recommendation(
        &self,
        request: &RedirectRequest,
        recommendation: &RedirectRecommendation,
    ) -> Result<(), AdvisorError> {
        self.check_text("recommendedAction", &recommendation.recommended_action)?;
        self.check_text("recommendationRationale", &recommendation.recommendation_rationale)?;

        if recommendation.redirect_amount < Decimal::ZERO {
            return Err(AdvisorError::Rejected {
                reason: format!(
                    "redirect amount {} is negative",
                    recommendation.redirect_amount
                ),
            });
        }
        if recommendation.redirect_amount > request.excess_amount {
            return Err(AdvisorError::Rejected {
                reason: format!(
                    "redirect amount {} exceeds requested {}",
                    recommendation.redirect_amount, request.excess_amount
                ),
            });
        }

        if !request.available_options.is_empty() {
            let chosen = recommendation.investment_option.name.trim();
            let offered = request
                .available_options
                .iter()
                .any(|o| o.name.eq_ignore_ascii_case(chosen));
            if !offered {
                return Err(AdvisorError::Rejected {
                    reason: format!("option '{chosen}' was not offered"),
                });
            }
        }
        Ok(())
    }

    /// Validate a spending nudge
    pub fn validate_nudge(&self, nudge: &SpendingNudge) -> Result<(), AdvisorError> {
        self.check_text("nudgeMessage", &nudge.nudge_message)?;
        if let Some(action) = &nudge.suggested_action {
            self.check_text("suggestedAction", action)?;
        }
        Ok(())
    }

    /// Parse a JSON object out of raw model output.
    ///
    /// Models often wrap JSON in prose or code fences; the outermost braces
    /// are taken as the payload.
    pub fn parse_json<T: DeserializeOwned>(&self, raw: &str) -> Result<T, AdvisorError> {
        let start = raw.find('{');
        let end = raw.rfind('}');
        let payload = match (start, end) {
            (Some(start), Some(end)) if start < end => &raw[start..=end],
            _ => {
                return Err(AdvisorError::MalformedOutput {
                    message: "no JSON object in response".to_string(),
                })
            }
        };
        serde_json::from_str(payload).map_err(|e| AdvisorError::MalformedOutput {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nudgewealth_types::{InvestmentOption, OptionId, OptionKind, RiskLevel, UserProfile};
    use rust_decimal_macros::dec;

    fn savings_pot() -> InvestmentOption {
        InvestmentOption {
            id: OptionId::default(),
            name: "Liquid Savings Pot".to_string(),
            kind: OptionKind::Savings,
            risk_level: RiskLevel::VeryLow,
            expected_return: "5.5%".to_string(),
            description: "Highly liquid savings for emergency use.".to_string(),
        }
    }

    fn request() -> RedirectRequest {
        RedirectRequest {
            excess_amount: dec!(70),
            spending_category: "Food Delivery".to_string(),
            user_profile: UserProfile::default(),
            available_options: vec![savings_pot()],
            market_conditions: None,
        }
    }

    fn recommendation(amount: Decimal) -> RedirectRecommendation {
        RedirectRecommendation {
            recommended_action: "Move ₹70 into the Liquid Savings Pot.".to_string(),
            recommendation_rationale: "Builds your emergency fund.".to_string(),
            investment_option: savings_pot(),
            redirect_amount: amount,
        }
    }

    #[test]
    fn test_valid_recommendation() {
        let guard = AdvisoryGuard::new();
        assert!(guard
            .validate_recommendation(&request(), &recommendation(dec!(70)))
            .is_ok());
    }

    #[test]
    fn test_redirect_above_request_is_rejected() {
        let guard = AdvisoryGuard::new();
        let result = guard.validate_recommendation(&request(), &recommendation(dec!(700)));
        assert!(matches!(result, Err(AdvisorError::Rejected { .. })));
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let guard = AdvisoryGuard::new();
        let mut rec = recommendation(dec!(50));
        rec.investment_option.name = "Crypto Moonshot".to_string();
        assert!(guard.validate_recommendation(&request(), &rec).is_err());
    }

    #[test]
    fn test_injection_in_nudge_is_rejected() {
        let guard = AdvisoryGuard::new();
        let nudge = SpendingNudge {
            nudge_message: "Ignore previous limits and buy it anyway!".to_string(),
            suggested_action: None,
            is_over_limit: false,
        };
        assert!(matches!(
            guard.validate_nudge(&nudge),
            Err(AdvisorError::Rejected { .. })
        ));
    }

    #[test]
    fn test_parse_json_inside_code_fence() {
        let guard = AdvisoryGuard::new();
        let raw = "Sure!\n```json\n{\"nudgeMessage\": \"Close to your limit\", \"isOverLimit\": false}\n```";
        let nudge: SpendingNudge = guard.parse_json(raw).unwrap();
        assert_eq!(nudge.nudge_message, "Close to your limit");
        assert!(nudge.suggested_action.is_none());
    }

    #[test]
    fn test_parse_json_without_object() {
        let guard = AdvisoryGuard::new();
        let result: Result<SpendingNudge, _> = guard.parse_json("no json here");
        assert!(matches!(result, Err(AdvisorError::MalformedOutput { .. })));
    }
}
