//! Per-owner records and the uniqueness rules every backend enforces.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Category, RecurrenceRule, Settings, TransactionInstance};
use crate::errors::{CalendarError, Result};

pub const OWNER_SCHEMA_VERSION: u8 = 1;

/// Everything stored for one owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnerData {
    #[serde(default = "OwnerData::schema_version")]
    pub schema_version: u8,
    pub owner: String,
    #[serde(default)]
    pub settings: Option<Settings>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub rules: Vec<RecurrenceRule>,
    #[serde(default)]
    pub instances: Vec<TransactionInstance>,
}

impl OwnerData {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            schema_version: OWNER_SCHEMA_VERSION,
            owner: owner.into(),
            ..Self::default()
        }
    }

    fn schema_version() -> u8 {
        OWNER_SCHEMA_VERSION
    }

    pub fn last_generated_date(&self, rule_id: Uuid) -> Option<NaiveDate> {
        self.instances
            .iter()
            .filter(|i| i.rule_id == Some(rule_id))
            .map(|i| i.date)
            .max()
    }

    /// Inserts `instance`, failing with `Conflict` if its rule already has one that day.
    pub fn insert_instance(&mut self, instance: TransactionInstance) -> Result<()> {
        self.check_rule_slot(&instance)?;
        self.instances.push(instance);
        Ok(())
    }

    pub fn update_instance(&mut self, instance: TransactionInstance) -> Result<()> {
        self.check_rule_slot(&instance)?;
        let slot = self
            .instances
            .iter_mut()
            .find(|i| i.id == instance.id)
            .ok_or(CalendarError::InstanceNotFound(instance.id))?;
        *slot = instance;
        Ok(())
    }

    pub fn remove_instance(&mut self, id: Uuid) -> bool {
        let before = self.instances.len();
        self.instances.retain(|i| i.id != id);
        before != self.instances.len()
    }

    pub fn insert_rule(&mut self, rule: RecurrenceRule) -> Result<()> {
        if self.rules.iter().any(|r| r.id == rule.id) {
            return Err(CalendarError::InvalidInput(format!(
                "rule {} already exists",
                rule.id
            )));
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn remove_rule(&mut self, rule_id: Uuid) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.id != rule_id);
        before != self.rules.len()
    }

    pub fn remove_unconfirmed_for_rule(&mut self, rule_id: Uuid) -> usize {
        let before = self.instances.len();
        self.instances
            .retain(|i| !(i.rule_id == Some(rule_id) && !i.confirmed));
        before - self.instances.len()
    }

    pub fn save_category(&mut self, category: Category) {
        match self.categories.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => *existing = category,
            None => self.categories.push(category),
        }
    }

    /// Instances dated on or after `from`, by date and then insertion order.
    pub fn instances_from(&self, from: NaiveDate) -> Vec<TransactionInstance> {
        let mut selected: Vec<_> = self
            .instances
            .iter()
            .filter(|i| i.date >= from)
            .cloned()
            .collect();
        selected.sort_by_key(|i| i.date);
        selected
    }

    fn check_rule_slot(&self, instance: &TransactionInstance) -> Result<()> {
        let Some(rule_id) = instance.rule_id else {
            return Ok(());
        };
        let taken = self
            .instances
            .iter()
            .any(|i| i.id != instance.id && i.rule_id == Some(rule_id) && i.date == instance.date);
        if taken {
            return Err(CalendarError::Conflict {
                rule_id,
                date: instance.date,
            });
        }
        Ok(())
    }
}
