//! Folds dated instances into a gap-free daily credit/debit/balance series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::{DateWindow, DaySummary, Settings, TransactionInstance};

#[derive(Debug, Clone, Copy)]
struct Bucket {
    credits: Decimal,
    debits: Decimal,
    all_confirmed: bool,
}

impl Default for Bucket {
    fn default() -> Self {
        Self {
            credits: Decimal::ZERO,
            debits: Decimal::ZERO,
            all_confirmed: true,
        }
    }
}

impl Bucket {
    fn add(&mut self, instance: &TransactionInstance) {
        if instance.is_credit() {
            self.credits += instance.amount;
        } else {
            self.debits += instance.amount;
        }
        self.all_confirmed &= instance.confirmed;
    }

    fn net(&self) -> Decimal {
        self.credits + self.debits
    }
}

/// Builds one [`DaySummary`] per day of `window`.
///
/// `instances` should hold everything dated on or after `settings.start_date`; order
/// does not matter. Instances before the start date or after the window end are
/// ignored. Balances for days before the start date are zero, and those days are
/// always reported as actual.
pub fn aggregate(
    settings: &Settings,
    instances: &[TransactionInstance],
    window: DateWindow,
) -> Vec<DaySummary> {
    let buckets = bucket_by_day(settings, instances, window.end);

    let mut balance = settings.start_balance
        + buckets
            .range(..window.start)
            .map(|(_, bucket)| bucket.net())
            .sum::<Decimal>();

    window
        .days()
        .map(|date| {
            let bucket = buckets.get(&date).copied().unwrap_or_default();
            let net_change = bucket.net();
            let tracked = settings.is_tracked(date);
            let day_balance = if tracked {
                balance += net_change;
                balance
            } else {
                Decimal::ZERO
            };
            DaySummary {
                date,
                credits: bucket.credits,
                debits: bucket.debits,
                net_change,
                balance: day_balance,
                is_actual: !tracked || bucket.all_confirmed,
            }
        })
        .collect()
}

fn bucket_by_day(
    settings: &Settings,
    instances: &[TransactionInstance],
    until: NaiveDate,
) -> BTreeMap<NaiveDate, Bucket> {
    let mut buckets: BTreeMap<NaiveDate, Bucket> = BTreeMap::new();
    for instance in instances
        .iter()
        .filter(|i| settings.is_tracked(i.date) && i.date <= until)
    {
        buckets.entry(instance.date).or_default().add(instance);
    }
    buckets
}
