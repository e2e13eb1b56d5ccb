//! Expands recurrence rules into the transaction instances that do not exist yet.
//!
//! Projection resumes from a per-rule watermark (the last date already generated),
//! so running it again with the same horizon produces nothing new.

use chrono::NaiveDate;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{RecurrenceRule, TransactionInstance};
use crate::errors::{CalendarError, Result};

/// Output of a projection pass over a set of rules.
#[derive(Debug, Default)]
pub struct Projection {
    pub instances: Vec<TransactionInstance>,
    pub skipped: Vec<SkippedRule>,
}

/// A rule that could not be projected. Its siblings are unaffected.
#[derive(Debug)]
pub struct SkippedRule {
    pub rule_id: Uuid,
    pub reason: CalendarError,
}

/// Projects every rule up to `horizon`.
///
/// `last_generated` reports the watermark for a rule id, or `None` when the rule
/// has never produced an instance.
pub fn project<F>(rules: &[RecurrenceRule], mut last_generated: F, horizon: NaiveDate) -> Projection
where
    F: FnMut(Uuid) -> Option<NaiveDate>,
{
    let mut projection = Projection::default();
    for rule in rules {
        match project_rule(rule, last_generated(rule.id), horizon) {
            Ok(instances) => projection.instances.extend(instances),
            Err(reason) => {
                warn!(rule_id = %rule.id, error = %reason, "skipping rule during projection");
                projection.skipped.push(SkippedRule {
                    rule_id: rule.id,
                    reason,
                });
            }
        }
    }
    projection
}

/// Instances of `rule` dated after `last_generated` (or from its start date) up to
/// the earlier of `horizon` and the rule's end date.
pub fn project_rule(
    rule: &RecurrenceRule,
    last_generated: Option<NaiveDate>,
    horizon: NaiveDate,
) -> Result<Vec<TransactionInstance>> {
    if !rule.frequency.is_recognized() {
        return Err(CalendarError::UnknownFrequency {
            rule_id: rule.id,
            value: rule.frequency.to_string(),
        });
    }

    let mut cursor = match last_generated {
        None => rule.start_date,
        Some(last) => match rule.frequency.step(last) {
            Some(next) => next,
            None => return Ok(Vec::new()),
        },
    };
    let end = rule.effective_end(horizon);

    let mut instances = Vec::new();
    while cursor <= end {
        if cursor >= rule.start_date {
            instances.push(TransactionInstance::projected(rule, cursor));
        }
        cursor = match rule.frequency.step(cursor) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(instances)
}
