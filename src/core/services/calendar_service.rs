//! Runs the projector against storage and builds calendar views from stored state.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use tracing::{debug, info};

use crate::domain::{DateWindow, DaySummary, TransactionInstance};
use crate::errors::{CalendarError, Result};
use crate::ledger::{aggregate, project, SkippedRule};
use crate::storage::CalendarStore;

/// Outcome of a projection run for one owner.
#[derive(Debug)]
pub struct ProjectionReport {
    pub horizon: NaiveDate,
    /// Instances newly written to storage.
    pub created: usize,
    /// Instances storage already held for the same rule and date.
    pub already_present: usize,
    pub skipped: Vec<SkippedRule>,
}

pub struct CalendarService;

impl CalendarService {
    /// Materializes every missing rule instance for `owner` up to `horizon`.
    ///
    /// Rules with an unknown frequency are reported in `skipped`; storage conflicts
    /// count as already present. Any other storage failure is returned as is.
    pub fn run_projection(
        store: &dyn CalendarStore,
        owner: &str,
        horizon: NaiveDate,
    ) -> Result<ProjectionReport> {
        let rules = store.load_rules(owner)?;
        let mut watermarks = HashMap::with_capacity(rules.len());
        for rule in &rules {
            if let Some(last) = store.last_generated_date(owner, rule.id)? {
                watermarks.insert(rule.id, last);
            }
        }

        let projection = project(&rules, |id| watermarks.get(&id).copied(), horizon);

        let outcome = store.persist_projected(owner, &projection.instances)?;
        let report = ProjectionReport {
            horizon,
            created: outcome.created,
            already_present: outcome.already_present,
            skipped: projection.skipped,
        };

        info!(
            owner,
            %horizon,
            created = report.created,
            skipped = report.skipped.len(),
            "projection finished"
        );
        Ok(report)
    }

    /// Daily summaries for `view_start..=view_end` from the currently stored state.
    ///
    /// An owner without settings gets an empty series.
    pub fn compute_calendar(
        store: &dyn CalendarStore,
        owner: &str,
        view_start: NaiveDate,
        view_end: NaiveDate,
    ) -> Result<Vec<DaySummary>> {
        let window = DateWindow::new(view_start, view_end)?;
        let Some(settings) = store.load_settings(owner)? else {
            debug!(owner, "no settings, returning empty calendar");
            return Ok(Vec::new());
        };
        let instances = store.load_instances_from(owner, settings.start_date)?;
        let days = aggregate(&settings, &instances, window);
        debug!(
            owner,
            start = %window.start,
            end = %window.end,
            days = days.len(),
            "calendar computed"
        );
        Ok(days)
    }

    /// Projects up to `view_end + buffer_days`, then computes the calendar for the view.
    pub fn refresh_calendar(
        store: &dyn CalendarStore,
        owner: &str,
        view_start: NaiveDate,
        view_end: NaiveDate,
        buffer_days: u32,
    ) -> Result<Vec<DaySummary>> {
        DateWindow::new(view_start, view_end)?;
        let horizon = view_end
            .checked_add_signed(Duration::days(i64::from(buffer_days)))
            .ok_or_else(|| {
                CalendarError::InvalidInput(format!(
                    "projection horizon overflows: {} + {} days",
                    view_end, buffer_days
                ))
            })?;
        Self::run_projection(store, owner, horizon)?;
        Self::compute_calendar(store, owner, view_start, view_end)
    }

    /// Stored transactions dated `date`.
    pub fn day_detail(
        store: &dyn CalendarStore,
        owner: &str,
        date: NaiveDate,
    ) -> Result<Vec<TransactionInstance>> {
        store.load_instances_on(owner, date)
    }

    /// Same as [`CalendarService::compute_calendar`] but reports missing settings as an error.
    pub fn compute_calendar_strict(
        store: &dyn CalendarStore,
        owner: &str,
        view_start: NaiveDate,
        view_end: NaiveDate,
    ) -> Result<Vec<DaySummary>> {
        if store.load_settings(owner)?.is_none() {
            return Err(CalendarError::MissingSettings(owner.to_string()));
        }
        Self::compute_calendar(store, owner, view_start, view_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewRule, RecurrenceRule, Settings};
    use crate::ledger::Frequency;
    use crate::storage::MemoryStore;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn calendar_is_empty_without_settings() {
        let store = MemoryStore::new();
        let days =
            CalendarService::compute_calendar(&store, "nobody", date(2024, 1, 1), date(2024, 1, 31))
                .unwrap();
        assert!(days.is_empty());
        let err = CalendarService::compute_calendar_strict(
            &store,
            "nobody",
            date(2024, 1, 1),
            date(2024, 1, 31),
        )
        .unwrap_err();
        assert!(matches!(err, CalendarError::MissingSettings(_)));
    }

    #[test]
    fn refresh_projects_past_the_view() {
        let store = MemoryStore::new();
        store
            .save_settings("owner", &Settings::new(dec!(0), date(2024, 1, 1)))
            .unwrap();
        let rule = RecurrenceRule::new(
            "owner",
            NewRule::new(dec!(10), Frequency::Weekly, date(2024, 1, 1)),
        )
        .unwrap();
        store.insert_rule("owner", &rule).unwrap();

        let days = CalendarService::refresh_calendar(
            &store,
            "owner",
            date(2024, 1, 1),
            date(2024, 1, 7),
            14,
        )
        .unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(
            store.last_generated_date("owner", rule.id).unwrap(),
            Some(date(2024, 1, 15))
        );
    }

    #[test]
    fn inverted_view_is_rejected() {
        let store = MemoryStore::new();
        let err =
            CalendarService::compute_calendar(&store, "owner", date(2024, 2, 1), date(2024, 1, 1))
                .unwrap_err();
        assert!(matches!(err, CalendarError::InvalidInput(_)));
    }
}
