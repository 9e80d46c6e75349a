//! Rule Book - management of per-category spending rules
//!
//! At most one rule exists per category. Returned rules always carry a
//! `current` recomputed from the transaction log.

use std::sync::Arc;

use nudgewealth_store::{typed, RecordStore};
use nudgewealth_types::{
    NewSpendingRule, NudgeError, Result, RulePatch, SpendingRule, Transaction, RULES,
    TRANSACTIONS,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::ledger;

#[derive(Serialize)]
struct CurrentPatch {
    #[serde(with = "rust_decimal::serde::float")]
    current: Decimal,
}

/// CRUD over the rules collection
pub struct RuleBook<S: RecordStore + ?Sized> {
    store: Arc<S>,
    /// Serialises read-check-write sequences on rules and the log
    write_lock: Arc<Mutex<()>>,
}

impl<S: RecordStore + ?Sized> Clone for RuleBook<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            write_lock: Arc::clone(&self.write_lock),
        }
    }
}

impl<S: RecordStore + ?Sized> RuleBook<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub(crate) fn write_lock(&self) -> &Arc<Mutex<()>> {
        &self.write_lock
    }

    async fn load_rules(&self) -> Result<Vec<SpendingRule>> {
        Ok(typed::load_all(self.store.as_ref(), RULES).await?)
    }

    async fn load_log(&self) -> Result<Vec<Transaction>> {
        Ok(typed::load_all(self.store.as_ref(), TRANSACTIONS).await?)
    }

    /// All rules with `current` refreshed from the log
    pub async fn list(&self) -> Result<Vec<SpendingRule>> {
        let mut rules = self.load_rules().await?;
        let totals = ledger::category_totals(&self.load_log().await?);
        for rule in &mut rules {
            rule.current = totals.get(&rule.category).copied().unwrap_or_default();
        }
        Ok(rules)
    }

    pub async fn get(&self, id: &str) -> Result<SpendingRule> {
        let mut rule: SpendingRule = typed::load_one(self.store.as_ref(), RULES, id)
            .await?
            .ok_or_else(|| NudgeError::RuleNotFound {
                rule_id: id.to_string(),
            })?;
        rule.current = ledger::category_spending(&self.load_log().await?, &rule.category);
        Ok(rule)
    }

    /// The rule governing `category`, if any
    pub async fn find_by_category(&self, category: &str) -> Result<Option<SpendingRule>> {
        let rule = self
            .load_rules()
            .await?
            .into_iter()
            .find(|r| r.category == category);
        match rule {
            Some(mut rule) => {
                rule.current = ledger::category_spending(&self.load_log().await?, category);
                Ok(Some(rule))
            }
            None => Ok(None),
        }
    }

    pub async fn create(&self, new_rule: NewSpendingRule) -> Result<SpendingRule> {
        new_rule.validate()?;
        let category = new_rule.category.trim().to_string();

        let _guard = self.write_lock.lock().await;
        if self.load_rules().await?.iter().any(|r| r.category == category) {
            return Err(NudgeError::DuplicateRule { category });
        }

        let mut rule = SpendingRule {
            id: Default::default(),
            current: ledger::category_spending(&self.load_log().await?, &category),
            category,
            limit: new_rule.limit,
            time_lock: new_rule.time_lock,
        };
        let id = typed::insert(self.store.as_ref(), RULES, &rule).await?;
        rule.id = id.into();

        tracing::info!(rule_id = %rule.id, category = %rule.category, limit = %rule.limit, "spending rule created");
        Ok(rule)
    }

    pub async fn update(&self, id: &str, patch: RulePatch) -> Result<SpendingRule> {
        patch.validate()?;

        let guard = self.write_lock.lock().await;
        let rules = self.load_rules().await?;
        let mut rule = rules
            .iter()
            .find(|r| r.id.as_str() == id)
            .cloned()
            .ok_or_else(|| NudgeError::RuleNotFound {
                rule_id: id.to_string(),
            })?;
        if patch.is_empty() {
            drop(guard);
            return self.get(id).await;
        }

        patch.apply(&mut rule);
        let clash = rules
            .iter()
            .any(|r| r.id.as_str() != id && r.category == rule.category);
        if clash {
            return Err(NudgeError::DuplicateRule {
                category: rule.category,
            });
        }

        rule.current = ledger::category_spending(&self.load_log().await?, &rule.category);
        let mut doc = typed::to_document(&rule, RULES)?;
        doc.remove("id");
        self.store.update(RULES, id, doc).await?;

        tracing::info!(rule_id = %id, category = %rule.category, limit = %rule.limit, "spending rule updated");
        Ok(rule)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if !self.store.delete(RULES, id).await? {
            return Err(NudgeError::RuleNotFound {
                rule_id: id.to_string(),
            });
        }
        tracing::info!(rule_id = %id, "spending rule deleted");
        Ok(())
    }

    /// Rewrite every stale `current`; returns how many rules changed.
    /// Callers must hold the write lock.
    pub(crate) async fn reconcile_locked(&self) -> Result<usize> {
        let totals = ledger::category_totals(&self.load_log().await?);
        let mut rewritten = 0;
        for rule in self.load_rules().await? {
            let total = totals.get(&rule.category).copied().unwrap_or_default();
            if rule.current != total {
                self.store_current(rule.id.as_str(), total).await?;
                rewritten += 1;
            }
        }
        Ok(rewritten)
    }

    /// Recompute every rule's `current` from the log
    pub async fn reconcile(&self) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let rewritten = self.reconcile_locked().await?;
        tracing::info!(rewritten, "rules reconciled with transaction log");
        Ok(rewritten)
    }

    pub(crate) async fn store_current(&self, id: &str, current: Decimal) -> Result<()> {
        let doc = typed::to_document(&CurrentPatch { current }, RULES)?;
        self.store.update(RULES, id, doc).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nudgewealth_store::MemoryStore;
    use nudgewealth_types::HourWindow;
    use rust_decimal_macros::dec;

    fn book() -> RuleBook<MemoryStore> {
        RuleBook::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let rules = book();
        let created = rules
            .create(NewSpendingRule::new("  Shopping ", dec!(5000)))
            .await
            .unwrap();
        assert!(!created.id.is_unassigned());
        assert_eq!(created.category, "Shopping");

        let found = rules.find_by_category("Shopping").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(rules.find_by_category("Travel").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_category_rejected() {
        let rules = book();
        rules
            .create(NewSpendingRule::new("Shopping", dec!(5000)))
            .await
            .unwrap();
        let err = rules
            .create(NewSpendingRule::new("Shopping", dec!(100)))
            .await
            .unwrap_err();
        assert!(matches!(err, NudgeError::DuplicateRule { .. }));
    }

    #[tokio::test]
    async fn test_invalid_rules_rejected() {
        let rules = book();
        let negative = rules
            .create(NewSpendingRule::new("Shopping", dec!(-1)))
            .await;
        assert!(matches!(negative, Err(NudgeError::InvalidRule { .. })));

        let bad_hours = rules
            .create(NewSpendingRule::new("Shopping", dec!(10)).with_time_lock(22, 24))
            .await;
        assert!(matches!(bad_hours, Err(NudgeError::InvalidRule { .. })));
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let rules = book();
        let rule = rules
            .create(NewSpendingRule::new("Food Delivery", dec!(2000)))
            .await
            .unwrap();

        let updated = rules
            .update(
                rule.id.as_str(),
                RulePatch {
                    limit: Some(dec!(2500)),
                    time_lock_enabled: Some(true),
                    time_lock_range: Some(HourWindow::new(22, 6)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.limit, dec!(2500));
        assert!(updated.time_lock.blocks(23));

        let stored = rules.get(rule.id.as_str()).await.unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_rename_into_existing_category_rejected() {
        let rules = book();
        rules
            .create(NewSpendingRule::new("Shopping", dec!(5000)))
            .await
            .unwrap();
        let food = rules
            .create(NewSpendingRule::new("Food Delivery", dec!(2000)))
            .await
            .unwrap();

        let err = rules
            .update(
                food.id.as_str(),
                RulePatch {
                    category: Some("Shopping".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, NudgeError::DuplicateRule { .. }));
    }

    #[tokio::test]
    async fn test_delete_unknown_rule() {
        let rules = book();
        assert!(matches!(
            rules.delete("rule-404").await,
            Err(NudgeError::RuleNotFound { .. })
        ));
        assert!(matches!(
            rules.update("rule-404", RulePatch::default()).await,
            Err(NudgeError::RuleNotFound { .. })
        ));
    }
}
