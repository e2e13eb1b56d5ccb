use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-owner anchor for balance projection. Dates before `start_date` are settled history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub start_balance: Decimal,
    pub start_date: NaiveDate,
}

impl Settings {
    pub fn new(start_balance: Decimal, start_date: NaiveDate) -> Self {
        Self {
            start_balance,
            start_date,
        }
    }

    /// Settings a freshly registered owner starts with.
    pub fn opening(today: NaiveDate) -> Self {
        Self::new(Decimal::ZERO, today)
    }

    pub fn is_tracked(&self, date: NaiveDate) -> bool {
        date >= self.start_date
    }
}
