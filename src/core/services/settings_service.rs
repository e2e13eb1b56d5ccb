use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::{Category, Settings};
use crate::errors::{CalendarError, Result};
use crate::storage::CalendarStore;

pub struct SettingsService;

impl SettingsService {
    pub fn get(store: &dyn CalendarStore, owner: &str) -> Result<Settings> {
        store
            .load_settings(owner)?
            .ok_or_else(|| CalendarError::MissingSettings(owner.to_string()))
    }

    pub fn update(
        store: &dyn CalendarStore,
        owner: &str,
        start_balance: Decimal,
        start_date: NaiveDate,
    ) -> Result<Settings> {
        let settings = Settings::new(start_balance, start_date);
        store.save_settings(owner, &settings)?;
        Ok(settings)
    }

    /// Registers `owner` on first sight: zero balance starting `today` plus the default
    /// categories. Returns the settings in effect and whether they were just created.
    pub fn ensure_owner(
        store: &dyn CalendarStore,
        owner: &str,
        today: NaiveDate,
    ) -> Result<(Settings, bool)> {
        if let Some(existing) = store.load_settings(owner)? {
            return Ok((existing, false));
        }
        let settings = Settings::opening(today);
        store.save_settings(owner, &settings)?;
        for category in Category::defaults_for(owner) {
            store.save_category(owner, &category)?;
        }
        info!(owner, start_date = %today, "registered new owner");
        Ok((settings, true))
    }
}
