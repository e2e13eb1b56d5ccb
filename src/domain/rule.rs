//! Recurring transaction templates.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;
use crate::errors::{CalendarError, Result};
use crate::ledger::Frequency;

/// A recurring income or expense that the projector expands into dated instances.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub id: Uuid,
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: Decimal,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Caller-supplied fields for a rule that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRule {
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub amount: Decimal,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl NewRule {
    pub fn new(amount: Decimal, frequency: Frequency, start_date: NaiveDate) -> Self {
        Self {
            category_id: None,
            description: None,
            amount,
            frequency,
            start_date,
            end_date: None,
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

    pub fn ending(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }
}

impl RecurrenceRule {
    /// Builds a rule for `owner`, rejecting zero amounts and inverted date bounds.
    pub fn new(owner: impl Into<String>, fields: NewRule) -> Result<Self> {
        let rule = Self {
            id: Uuid::new_v4(),
            owner: owner.into(),
            category_id: fields.category_id,
            description: fields.description,
            amount: fields.amount,
            frequency: fields.frequency,
            start_date: fields.start_date,
            end_date: fields.end_date,
        };
        rule.validate()?;
        Ok(rule)
    }

    pub fn validate(&self) -> Result<()> {
        if self.amount.is_zero() {
            return Err(CalendarError::InvalidInput(
                "rule amount must be non-zero".into(),
            ));
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(CalendarError::InvalidInput(format!(
                    "rule end date {} precedes start date {}",
                    end, self.start_date
                )));
            }
        }
        Ok(())
    }

    /// Last date the rule may produce an instance on, given a projection horizon.
    pub fn effective_end(&self, horizon: NaiveDate) -> NaiveDate {
        match self.end_date {
            Some(end) if end < horizon => end,
            _ => horizon,
        }
    }
}

impl Identifiable for RecurrenceRule {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Owned for RecurrenceRule {
    fn owner(&self) -> &str {
        &self.owner
    }
}

impl Displayable for RecurrenceRule {
    fn display_label(&self) -> String {
        let description = self.description.as_deref().unwrap_or("(no description)");
        match self.end_date {
            Some(end) => format!(
                "{} {} {} from {} until {}",
                description, self.amount, self.frequency, self.start_date, end
            ),
            None => format!(
                "{} {} {} from {}",
                description, self.amount, self.frequency, self.start_date
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_zero_amount() {
        let err = RecurrenceRule::new(
            "owner",
            NewRule::new(dec!(0), Frequency::Monthly, date(2024, 1, 1)),
        )
        .expect_err("zero amount must be rejected");
        assert!(matches!(err, CalendarError::InvalidInput(_)));
    }

    #[test]
    fn rejects_end_before_start() {
        let fields =
            NewRule::new(dec!(-10), Frequency::Weekly, date(2024, 3, 1)).ending(date(2024, 2, 1));
        assert!(RecurrenceRule::new("owner", fields).is_err());
    }

    #[test]
    fn effective_end_is_earlier_of_horizon_and_end_date() {
        let fields =
            NewRule::new(dec!(5), Frequency::Daily, date(2024, 1, 1)).ending(date(2024, 1, 10));
        let rule = RecurrenceRule::new("owner", fields).unwrap();
        assert_eq!(rule.effective_end(date(2024, 2, 1)), date(2024, 1, 10));
        assert_eq!(rule.effective_end(date(2024, 1, 5)), date(2024, 1, 5));
    }
}
