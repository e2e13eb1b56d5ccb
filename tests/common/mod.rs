#![allow(dead_code)]

use cashflow_core::{
    core::services::{RuleService, SettingsService},
    domain::{NewRule, RecurrenceRule},
    ledger::Frequency,
    storage::MemoryStore,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub const OWNER: &str = "alice@example.com";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Store with settings for [`OWNER`] starting on `start` with `balance`.
pub fn store_with_settings(balance: Decimal, start: NaiveDate) -> MemoryStore {
    let store = MemoryStore::new();
    SettingsService::update(&store, OWNER, balance, start).expect("save settings");
    store
}

pub fn add_rule(
    store: &MemoryStore,
    amount: Decimal,
    frequency: Frequency,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> RecurrenceRule {
    let mut fields = NewRule::new(amount, frequency, start);
    fields.end_date = end;
    RuleService::add(store, OWNER, fields).expect("add rule")
}
