//! Investment options and the user profile handed to the advisor

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::OptionId;

/// Risk level of a redirect destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        };
        f.write_str(label)
    }
}

/// Savings pot or investment product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionKind {
    Savings,
    Investment,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Savings => f.write_str("Savings"),
            Self::Investment => f.write_str("Investment"),
        }
    }
}

/// A destination for redirected money
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentOption {
    #[serde(default, skip_serializing_if = "OptionId::is_unassigned")]
    pub id: OptionId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub risk_level: RiskLevel,
    /// Free-form, e.g. "5.5%" or "12-15%"
    pub expected_return: String,
    pub description: String,
}

/// Risk appetite declared by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("low"),
            Self::Medium => f.write_str("medium"),
            Self::High => f.write_str("high"),
        }
    }
}

/// What the advisor knows about the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub risk_tolerance: RiskTolerance,
    #[serde(default)]
    pub financial_goals: Vec<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            risk_tolerance: RiskTolerance::Medium,
            financial_goals: vec![
                "Emergency Fund".to_string(),
                "Long-term Growth".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_uses_display_names_on_the_wire() {
        let json = r#"{
            "id": "investment-2",
            "name": "Liquid Savings Pot",
            "type": "Savings",
            "riskLevel": "Very Low",
            "expectedReturn": "5.5%",
            "description": "Highly liquid savings for emergency use."
        }"#;
        let option: InvestmentOption = serde_json::from_str(json).unwrap();
        assert_eq!(option.kind, OptionKind::Savings);
        assert_eq!(option.risk_level, RiskLevel::VeryLow);
        assert_eq!(option.risk_level.to_string(), "Very Low");
    }

    #[test]
    fn test_default_profile() {
        let profile = UserProfile::default();
        assert_eq!(profile.risk_tolerance, RiskTolerance::Medium);
        assert_eq!(profile.financial_goals.len(), 2);
    }
}
