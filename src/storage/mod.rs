pub mod json_backend;
pub mod memory;
pub mod owner_data;

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Category, RecurrenceRule, Settings, TransactionInstance};
use crate::errors::{CalendarError, Result};

pub use json_backend::JsonStore;
pub use memory::MemoryStore;
pub use owner_data::OwnerData;

/// Persistence collaborator used by the engine and services.
///
/// Every call is scoped to one owner. `persist_instance` must reject a second
/// instance for the same rule and date with [`CalendarError::Conflict`]; that is
/// the only guard against double generation.
pub trait CalendarStore: Send + Sync {
    fn load_rules(&self, owner: &str) -> Result<Vec<RecurrenceRule>>;
    fn last_generated_date(&self, owner: &str, rule_id: Uuid) -> Result<Option<NaiveDate>>;
    fn persist_instance(&self, owner: &str, instance: &TransactionInstance) -> Result<()>;
    fn load_settings(&self, owner: &str) -> Result<Option<Settings>>;
    /// Instances dated on or after `from`, ordered by date.
    fn load_instances_from(&self, owner: &str, from: NaiveDate)
        -> Result<Vec<TransactionInstance>>;

    fn save_settings(&self, owner: &str, settings: &Settings) -> Result<()>;
    fn insert_rule(&self, owner: &str, rule: &RecurrenceRule) -> Result<()>;
    /// Returns whether a rule was removed.
    fn delete_rule(&self, owner: &str, rule_id: Uuid) -> Result<bool>;
    /// Removes the unconfirmed instances generated by `rule_id`, returning how many.
    fn delete_unconfirmed_for_rule(&self, owner: &str, rule_id: Uuid) -> Result<usize>;
    fn load_instance(&self, owner: &str, id: Uuid) -> Result<Option<TransactionInstance>>;
    fn update_instance(&self, owner: &str, instance: &TransactionInstance) -> Result<()>;
    fn delete_instance(&self, owner: &str, id: Uuid) -> Result<bool>;
    fn load_categories(&self, owner: &str) -> Result<Vec<Category>>;
    fn save_category(&self, owner: &str, category: &Category) -> Result<()>;

    /// Writes a batch of projected instances, counting conflicts as already present.
    ///
    /// Stores that can write a batch in one pass override this.
    fn persist_projected(
        &self,
        owner: &str,
        instances: &[TransactionInstance],
    ) -> Result<PersistOutcome> {
        let mut outcome = PersistOutcome::default();
        for instance in instances {
            outcome.record(self.persist_instance(owner, instance))?;
        }
        Ok(outcome)
    }

    fn load_instances_on(&self, owner: &str, date: NaiveDate) -> Result<Vec<TransactionInstance>> {
        Ok(self
            .load_instances_from(owner, date)?
            .into_iter()
            .take_while(|i| i.date == date)
            .collect())
    }
}

/// Counts from [`CalendarStore::persist_projected`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PersistOutcome {
    pub created: usize,
    pub already_present: usize,
}

impl PersistOutcome {
    /// Folds one write result in. `Conflict` is counted; any other error is returned.
    pub fn record(&mut self, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => self.created += 1,
            Err(CalendarError::Conflict { rule_id, date }) => {
                debug!(%rule_id, %date, "instance already present");
                self.already_present += 1;
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }
}

/// Rejects records whose owner differs from the owner the call is scoped to.
pub(crate) fn ensure_owned(owner: &str, record_owner: &str) -> Result<()> {
    if owner != record_owner {
        return Err(CalendarError::InvalidInput(format!(
            "record belongs to `{}`, not `{}`",
            record_owner, owner
        )));
    }
    Ok(())
}
