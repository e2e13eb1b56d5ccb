//! Business logic helpers for one-off and projected transactions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{InstancePatch, TransactionInstance};
use crate::errors::{CalendarError, Result};
use crate::storage::CalendarStore;

/// Provides validated CRUD helpers for transaction instances.
pub struct InstanceService;

impl InstanceService {
    /// Records a one-off transaction that is not tied to any rule.
    pub fn add_one_off(
        store: &dyn CalendarStore,
        owner: &str,
        date: NaiveDate,
        amount: Decimal,
        confirmed: bool,
        description: Option<String>,
        category_id: Option<Uuid>,
    ) -> Result<TransactionInstance> {
        let mut instance = TransactionInstance::one_off(owner, date, amount, confirmed);
        instance.description = description;
        instance.category_id = category_id;
        store.persist_instance(owner, &instance)?;
        Ok(instance)
    }

    pub fn get(store: &dyn CalendarStore, owner: &str, id: Uuid) -> Result<TransactionInstance> {
        store
            .load_instance(owner, id)?
            .ok_or(CalendarError::InstanceNotFound(id))
    }

    /// Applies `patch` and stores the result.
    ///
    /// Instances generated from a rule stay on that rule's date chain, so a patch
    /// moving one to another date is rejected.
    pub fn update(
        store: &dyn CalendarStore,
        owner: &str,
        id: Uuid,
        patch: InstancePatch,
    ) -> Result<TransactionInstance> {
        let mut instance = Self::get(store, owner, id)?;
        if let (Some(rule_id), Some(date)) = (instance.rule_id, patch.date) {
            if date != instance.date {
                return Err(CalendarError::InvalidInput(format!(
                    "instance {} belongs to rule {} and cannot move from {} to {}",
                    instance.id, rule_id, instance.date, date
                )));
            }
        }
        patch.apply(&mut instance);
        store.update_instance(owner, &instance)?;
        Ok(instance)
    }

    /// Marks an estimate as having actually happened, optionally with the real amount.
    pub fn confirm(
        store: &dyn CalendarStore,
        owner: &str,
        id: Uuid,
        actual_amount: Option<Decimal>,
    ) -> Result<TransactionInstance> {
        Self::update(
            store,
            owner,
            id,
            InstancePatch {
                amount: actual_amount,
                confirmed: Some(true),
                ..InstancePatch::default()
            },
        )
    }

    pub fn delete(store: &dyn CalendarStore, owner: &str, id: Uuid) -> Result<()> {
        if store.delete_instance(owner, id)? {
            Ok(())
        } else {
            Err(CalendarError::InstanceNotFound(id))
        }
    }
}
