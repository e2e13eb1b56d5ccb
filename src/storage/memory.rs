use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Category, RecurrenceRule, Settings, TransactionInstance};
use crate::errors::{CalendarError, Result};

use super::{ensure_owned, CalendarStore, OwnerData};

/// In-process store keeping every owner's records behind one lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    owners: RwLock<HashMap<String, OwnerData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, OwnerData>>> {
        self.owners
            .read()
            .map_err(|_| CalendarError::Storage("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, OwnerData>>> {
        self.owners
            .write()
            .map_err(|_| CalendarError::Storage("memory store lock poisoned".into()))
    }

    fn view<T>(&self, owner: &str, f: impl FnOnce(&OwnerData) -> T) -> Result<T> {
        let owners = self.read()?;
        match owners.get(owner) {
            Some(data) => Ok(f(data)),
            None => Ok(f(&OwnerData::new(owner))),
        }
    }

    fn modify<T>(&self, owner: &str, f: impl FnOnce(&mut OwnerData) -> Result<T>) -> Result<T> {
        let mut owners = self.write()?;
        let data = owners
            .entry(owner.to_string())
            .or_insert_with(|| OwnerData::new(owner));
        f(data)
    }
}

impl CalendarStore for MemoryStore {
    fn load_rules(&self, owner: &str) -> Result<Vec<RecurrenceRule>> {
        self.view(owner, |data| data.rules.clone())
    }

    fn last_generated_date(&self, owner: &str, rule_id: Uuid) -> Result<Option<NaiveDate>> {
        self.view(owner, |data| data.last_generated_date(rule_id))
    }

    fn persist_instance(&self, owner: &str, instance: &TransactionInstance) -> Result<()> {
        ensure_owned(owner, &instance.owner)?;
        self.modify(owner, |data| data.insert_instance(instance.clone()))
    }

    fn load_settings(&self, owner: &str) -> Result<Option<Settings>> {
        self.view(owner, |data| data.settings)
    }

    fn load_instances_from(
        &self,
        owner: &str,
        from: NaiveDate,
    ) -> Result<Vec<TransactionInstance>> {
        self.view(owner, |data| data.instances_from(from))
    }

    fn save_settings(&self, owner: &str, settings: &Settings) -> Result<()> {
        self.modify(owner, |data| {
            data.settings = Some(*settings);
            Ok(())
        })
    }

    fn insert_rule(&self, owner: &str, rule: &RecurrenceRule) -> Result<()> {
        ensure_owned(owner, &rule.owner)?;
        self.modify(owner, |data| data.insert_rule(rule.clone()))
    }

    fn delete_rule(&self, owner: &str, rule_id: Uuid) -> Result<bool> {
        self.modify(owner, |data| Ok(data.remove_rule(rule_id)))
    }

    fn delete_unconfirmed_for_rule(&self, owner: &str, rule_id: Uuid) -> Result<usize> {
        self.modify(owner, |data| Ok(data.remove_unconfirmed_for_rule(rule_id)))
    }

    fn load_instance(&self, owner: &str, id: Uuid) -> Result<Option<TransactionInstance>> {
        self.view(owner, |data| {
            data.instances.iter().find(|i| i.id == id).cloned()
        })
    }

    fn update_instance(&self, owner: &str, instance: &TransactionInstance) -> Result<()> {
        ensure_owned(owner, &instance.owner)?;
        self.modify(owner, |data| data.update_instance(instance.clone()))
    }

    fn delete_instance(&self, owner: &str, id: Uuid) -> Result<bool> {
        self.modify(owner, |data| Ok(data.remove_instance(id)))
    }

    fn load_categories(&self, owner: &str) -> Result<Vec<Category>> {
        self.view(owner, |data| data.categories.clone())
    }

    fn save_category(&self, owner: &str, category: &Category) -> Result<()> {
        ensure_owned(owner, &category.owner)?;
        self.modify(owner, |data| {
            data.save_category(category.clone());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn owners_do_not_see_each_other() {
        let store = MemoryStore::new();
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        store
            .persist_instance("alice", &TransactionInstance::one_off("alice", day, dec!(5), true))
            .unwrap();
        assert_eq!(store.load_instances_from("alice", day).unwrap().len(), 1);
        assert!(store.load_instances_from("bob", day).unwrap().is_empty());
    }

    #[test]
    fn rejects_records_for_another_owner() {
        let store = MemoryStore::new();
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = store
            .persist_instance("alice", &TransactionInstance::one_off("bob", day, dec!(5), true))
            .unwrap_err();
        assert!(matches!(err, CalendarError::InvalidInput(_)));
    }
}
