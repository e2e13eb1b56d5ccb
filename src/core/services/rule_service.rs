//! Business logic helpers for managing recurrence rules.

use tracing::info;
use uuid::Uuid;

use crate::domain::{NewRule, RecurrenceRule};
use crate::errors::{CalendarError, Result};
use crate::ledger::Frequency;
use crate::storage::CalendarStore;

/// Result of deleting a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDeletion {
    pub rule_id: Uuid,
    /// Unconfirmed instances removed alongside the rule.
    pub removed_instances: usize,
}

/// Provides validated create/list/delete helpers for recurrence rules.
pub struct RuleService;

impl RuleService {
    /// Validates and stores a new rule. Unknown frequencies are rejected here; rules
    /// that reach storage some other way are skipped at projection time instead.
    pub fn add(store: &dyn CalendarStore, owner: &str, fields: NewRule) -> Result<RecurrenceRule> {
        if !fields.frequency.is_recognized() {
            let known: Vec<String> = Frequency::KNOWN.iter().map(Frequency::to_string).collect();
            return Err(CalendarError::InvalidInput(format!(
                "unknown frequency `{}`, expected one of {}",
                fields.frequency,
                known.join(", ")
            )));
        }
        let rule = RecurrenceRule::new(owner, fields)?;
        store.insert_rule(owner, &rule)?;
        Ok(rule)
    }

    pub fn list(store: &dyn CalendarStore, owner: &str) -> Result<Vec<RecurrenceRule>> {
        let mut rules = store.load_rules(owner)?;
        rules.sort_by_key(|rule| rule.start_date);
        Ok(rules)
    }

    /// Deletes the rule. With `delete_unconfirmed`, its not yet confirmed instances go
    /// too; confirmed ones always stay and keep their dangling rule reference.
    pub fn delete(
        store: &dyn CalendarStore,
        owner: &str,
        rule_id: Uuid,
        delete_unconfirmed: bool,
    ) -> Result<RuleDeletion> {
        if !store.delete_rule(owner, rule_id)? {
            return Err(CalendarError::RuleNotFound(rule_id));
        }
        let removed_instances = if delete_unconfirmed {
            store.delete_unconfirmed_for_rule(owner, rule_id)?
        } else {
            0
        };
        info!(owner, %rule_id, removed_instances, "rule deleted");
        Ok(RuleDeletion {
            rule_id,
            removed_instances,
        })
    }
}
