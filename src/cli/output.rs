use colored::Colorize;
use rust_decimal::Decimal;

use crate::core::services::ProjectionReport;
use crate::domain::{
    Category, DaySummary, Displayable, RecurrenceRule, Settings, TransactionInstance,
};

fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

pub fn render_calendar(days: &[DaySummary]) -> String {
    if days.is_empty() {
        return "No calendar data: settings have not been initialized.".into();
    }
    let mut lines = vec![format!(
        "{:<10}  {:>12}  {:>12}  {:>12}  {:>14}  {}",
        "Date", "Credits", "Debits", "Net", "Balance", "Status"
    )];
    for day in days {
        let status = if day.is_actual {
            "actual".green()
        } else {
            "estimated".yellow()
        };
        let balance = money(day.balance);
        let balance = if day.balance < Decimal::ZERO {
            balance.red()
        } else {
            balance.normal()
        };
        lines.push(format!(
            "{:<10}  {:>12}  {:>12}  {:>12}  {:>14}  {}",
            day.date.to_string(),
            money(day.credits),
            money(day.debits),
            money(day.net_change),
            balance,
            status
        ));
    }
    lines.join("\n")
}

pub fn render_rules(rules: &[RecurrenceRule]) -> String {
    if rules.is_empty() {
        return "No recurring rules.".into();
    }
    rules
        .iter()
        .map(|rule| format!("{}  {}", rule.id, rule.display_label()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_instances(instances: &[TransactionInstance]) -> String {
    if instances.is_empty() {
        return "No transactions.".into();
    }
    instances
        .iter()
        .map(|instance| format!("{}  {}", instance.id, instance.display_label()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_settings(settings: &Settings, categories: &[Category]) -> String {
    let mut lines = vec![
        format!("Start balance: {}", money(settings.start_balance)),
        format!("Start date:    {}", settings.start_date),
    ];
    if !categories.is_empty() {
        let labels: Vec<String> = categories.iter().map(Displayable::display_label).collect();
        lines.push(format!("Categories:    {}", labels.join(", ")));
    }
    lines.join("\n")
}

pub fn render_projection(report: &ProjectionReport) -> String {
    let mut lines = vec![format!(
        "Projected through {}: {} created, {} already present.",
        report.horizon, report.created, report.already_present
    )];
    for skipped in &report.skipped {
        lines.push(format!(
            "{} rule {}: {}",
            "skipped".yellow(),
            skipped.rule_id,
            skipped.reason
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn calendar_rows_show_two_decimal_places() {
        colored::control::set_override(false);
        let day = DaySummary {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            credits: dec!(0),
            debits: dec!(-50),
            net_change: dec!(-50),
            balance: dec!(50),
            is_actual: false,
        };
        let table = render_calendar(&[day]);
        assert!(table.contains("2024-01-01"));
        assert!(table.contains("-50.00"));
        assert!(table.contains("50.00"));
        assert!(table.contains("estimated"));
    }

    #[test]
    fn empty_calendar_explains_itself() {
        assert!(render_calendar(&[]).contains("settings"));
    }
}
