//! Concrete dated transactions, either one-off entries or projected rule occurrences.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;
use crate::domain::rule::RecurrenceRule;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionInstance {
    pub id: Uuid,
    pub owner: String,
    /// Originating rule. A lookup key only; the rule may since have been deleted.
    #[serde(default)]
    pub rule_id: Option<Uuid>,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: Decimal,
    /// `true` once the transaction actually happened, `false` for estimates.
    pub confirmed: bool,
}

impl TransactionInstance {
    pub fn one_off(
        owner: impl Into<String>,
        date: NaiveDate,
        amount: Decimal,
        confirmed: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: owner.into(),
            rule_id: None,
            date,
            category_id: None,
            description: None,
            amount,
            confirmed,
        }
    }

    /// Unconfirmed placeholder for `rule` on `date`.
    pub fn projected(rule: &RecurrenceRule, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: rule.owner.clone(),
            rule_id: Some(rule.id),
            date,
            category_id: rule.category_id,
            description: rule.description.clone(),
            amount: rule.amount,
            confirmed: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn is_credit(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

/// Field changes applied by `InstanceService::update`. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstancePatch {
    pub date: Option<NaiveDate>,
    pub category_id: Option<Option<Uuid>>,
    pub description: Option<Option<String>>,
    pub amount: Option<Decimal>,
    pub confirmed: Option<bool>,
}

impl InstancePatch {
    pub fn apply(self, instance: &mut TransactionInstance) {
        if let Some(date) = self.date {
            instance.date = date;
        }
        if let Some(category_id) = self.category_id {
            instance.category_id = category_id;
        }
        if let Some(description) = self.description {
            instance.description = description;
        }
        if let Some(amount) = self.amount {
            instance.amount = amount;
        }
        if let Some(confirmed) = self.confirmed {
            instance.confirmed = confirmed;
        }
    }
}

impl Identifiable for TransactionInstance {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Owned for TransactionInstance {
    fn owner(&self) -> &str {
        &self.owner
    }
}

impl Displayable for TransactionInstance {
    fn display_label(&self) -> String {
        let status = if self.confirmed { "actual" } else { "estimated" };
        format!(
            "{} {} {} [{}]",
            self.date,
            self.description.as_deref().unwrap_or("(no description)"),
            self.amount,
            status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rule::NewRule;
    use crate::ledger::Frequency;
    use rust_decimal_macros::dec;

    #[test]
    fn projected_instance_copies_rule_fields_and_is_unconfirmed() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let category = Uuid::new_v4();
        let rule = RecurrenceRule::new(
            "owner",
            NewRule::new(dec!(-50), Frequency::Monthly, start)
                .with_description("Rent")
                .with_category(category),
        )
        .unwrap();

        let instance = TransactionInstance::projected(&rule, start);
        assert_eq!(instance.rule_id, Some(rule.id));
        assert_eq!(instance.amount, dec!(-50));
        assert_eq!(instance.category_id, Some(category));
        assert_eq!(instance.description.as_deref(), Some("Rent"));
        assert!(!instance.confirmed);
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut instance =
            TransactionInstance::one_off("owner", date, dec!(12.5), false).with_description("Gift");
        InstancePatch {
            confirmed: Some(true),
            description: Some(None),
            ..InstancePatch::default()
        }
        .apply(&mut instance);
        assert!(instance.confirmed);
        assert_eq!(instance.description, None);
        assert_eq!(instance.amount, dec!(12.5));
        assert_eq!(instance.date, date);
    }
}
