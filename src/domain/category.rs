//! Domain types representing transaction categories.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// Labels rules and transactions for reporting. Categories are referenced by id only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub owner: String,
    pub name: String,
    pub kind: CategoryKind,
}

impl Category {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: owner.into(),
            name: name.into(),
            kind,
        }
    }

    /// Categories every new owner starts with.
    pub fn defaults_for(owner: &str) -> Vec<Category> {
        [
            ("Paycheck", CategoryKind::Credit),
            ("Rent", CategoryKind::Debit),
            ("Groceries", CategoryKind::Debit),
            ("Utilities", CategoryKind::Debit),
            ("Other", CategoryKind::Debit),
        ]
        .into_iter()
        .map(|(name, kind)| Category::new(owner, name, kind))
        .collect()
    }
}

impl Identifiable for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Owned for Category {
    fn owner(&self) -> &str {
        &self.owner
    }
}

impl Displayable for Category {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Credit,
    Debit,
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryKind::Credit => "credit",
            CategoryKind::Debit => "debit",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_one_credit_and_four_debits() {
        let defaults = Category::defaults_for("alice@example.com");
        assert_eq!(defaults.len(), 5);
        assert_eq!(
            defaults
                .iter()
                .filter(|c| c.kind == CategoryKind::Credit)
                .count(),
            1
        );
        assert!(defaults.iter().all(|c| c.owner == "alice@example.com"));
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&CategoryKind::Debit).unwrap();
        assert_eq!(json, "\"debit\"");
    }
}
