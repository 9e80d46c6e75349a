//! Identity types for NudgeWealth
//!
//! Record ids are assigned by the store as opaque strings (`rule-1` for
//! seeded rules, `<millis>-<suffix>` for inserted documents). The wrappers
//! keep transaction and rule ids from being mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate ID types with common implementations
macro_rules! define_id_type {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an existing id string
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw id
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the store has not assigned an id yet
            pub fn is_unassigned(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id_type!(TransactionId, "Identifier of a stored transaction");
define_id_type!(RuleId, "Identifier of a stored spending rule");
define_id_type!(OptionId, "Identifier of a stored investment option");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = RuleId::new("rule-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"rule-1\"");

        let back: RuleId = serde_json::from_str("\"rule-2\"").unwrap();
        assert_eq!(back.as_str(), "rule-2");
    }

    #[test]
    fn test_default_id_is_unassigned() {
        assert!(TransactionId::default().is_unassigned());
        assert!(!TransactionId::from("1").is_unassigned());
    }
}
