use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Fixed-interval cadence of a recurrence rule.
///
/// Values read from storage that match none of the known cadences are kept as
/// [`Frequency::Unrecognized`] so the rule can be reported and skipped instead of
/// failing the whole load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    Daily,
    Weekly,
    BiWeekly,
    Monthly,
    BiMonthly,
    Unrecognized(String),
}

impl Frequency {
    pub const KNOWN: [Frequency; 5] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::BiWeekly,
        Frequency::Monthly,
        Frequency::BiMonthly,
    ];

    /// Advances `from` by one period. Returns `None` for unrecognized cadences and
    /// when the result would fall outside the representable date range.
    ///
    /// Month steps keep the day of month and clamp to the last day of shorter
    /// months. Clamping is applied to the previous date, so a rule starting on
    /// Jan 31 yields Feb 29 (2024) and then Mar 29.
    pub fn step(&self, from: NaiveDate) -> Option<NaiveDate> {
        match self {
            Frequency::Daily => from.checked_add_signed(Duration::days(1)),
            Frequency::Weekly => from.checked_add_signed(Duration::weeks(1)),
            Frequency::BiWeekly => from.checked_add_signed(Duration::weeks(2)),
            Frequency::Monthly => shift_month(from, 1),
            Frequency::BiMonthly => shift_month(from, 2),
            Frequency::Unrecognized(_) => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Frequency::Unrecognized(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::BiWeekly => "bi-weekly",
            Frequency::Monthly => "monthly",
            Frequency::BiMonthly => "bi-monthly",
            Frequency::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for Frequency {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Frequency::Daily,
            "weekly" => Frequency::Weekly,
            "bi-weekly" | "biweekly" => Frequency::BiWeekly,
            "monthly" => Frequency::Monthly,
            "bi-monthly" | "bimonthly" => Frequency::BiMonthly,
            _ => Frequency::Unrecognized(value),
        }
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for Frequency {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Frequency::from(s.to_string()))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    let day = date.day().min(days_in_month(year, month as u32)?);
    NaiveDate::from_ymd_opt(year, month as u32, day)
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    first_next.pred_opt().map(|last| last.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fixed_day_steps() {
        let start = date(2024, 12, 28);
        assert_eq!(Frequency::Daily.step(start), Some(date(2024, 12, 29)));
        assert_eq!(Frequency::Weekly.step(start), Some(date(2025, 1, 4)));
        assert_eq!(Frequency::BiWeekly.step(start), Some(date(2025, 1, 11)));
    }

    #[test]
    fn monthly_preserves_day_of_month() {
        assert_eq!(
            Frequency::Monthly.step(date(2024, 1, 15)),
            Some(date(2024, 2, 15))
        );
        assert_eq!(
            Frequency::BiMonthly.step(date(2024, 11, 15)),
            Some(date(2025, 1, 15))
        );
    }

    #[test]
    fn monthly_clamps_to_month_end_and_keeps_clamped_day() {
        let jan_31 = date(2024, 1, 31);
        let feb = Frequency::Monthly.step(jan_31).unwrap();
        assert_eq!(feb, date(2024, 2, 29));
        assert_eq!(Frequency::Monthly.step(feb), Some(date(2024, 3, 29)));
        assert_eq!(
            Frequency::Monthly.step(date(2023, 1, 31)),
            Some(date(2023, 2, 28))
        );
        assert_eq!(
            Frequency::BiMonthly.step(date(2024, 12, 31)),
            Some(date(2025, 2, 28))
        );
    }

    #[test]
    fn unrecognized_frequency_never_steps() {
        let freq = Frequency::from("fortnightly".to_string());
        assert_eq!(freq, Frequency::Unrecognized("fortnightly".into()));
        assert!(!freq.is_recognized());
        assert_eq!(freq.step(date(2024, 1, 1)), None);
    }

    #[test]
    fn serializes_with_canonical_names() {
        let json = serde_json::to_string(&Frequency::BiWeekly).unwrap();
        assert_eq!(json, "\"bi-weekly\"");
        let parsed: Frequency = serde_json::from_str("\"bi-monthly\"").unwrap();
        assert_eq!(parsed, Frequency::BiMonthly);
        let raw: Frequency = serde_json::from_str("\"yearly\"").unwrap();
        assert_eq!(raw.to_string(), "yearly");
    }
}
