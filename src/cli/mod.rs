//! Command line front-end over the JSON store.

pub mod output;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::{Config, ConfigManager};
use crate::core::services::{CalendarService, InstanceService, RuleService, SettingsService};
use crate::domain::NewRule;
use crate::errors::{CalendarError, Result};
use crate::ledger::Frequency;
use crate::storage::{CalendarStore, JsonStore};

#[derive(Debug, Parser)]
#[command(name = "cashflow_cli", version, about = "Recurring cash-flow calendar")]
pub struct Cli {
    /// Owner whose data is read and written. Falls back to `default_owner` in the config.
    #[arg(long, global = true)]
    pub owner: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create default settings and categories for the owner if missing.
    Init {
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    #[command(subcommand)]
    Settings(SettingsCommand),
    #[command(subcommand)]
    Rule(RuleCommand),
    #[command(subcommand)]
    Txn(TxnCommand),
    /// Generate missing rule instances up to the horizon.
    Project {
        #[arg(long)]
        horizon: NaiveDate,
    },
    /// Print the daily balance calendar for a date range.
    Calendar {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        /// Skip the projection pass and show stored state only.
        #[arg(long)]
        no_refresh: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    Show,
    Set {
        #[arg(long, allow_negative_numbers = true)]
        balance: Decimal,
        #[arg(long)]
        start: NaiveDate,
    },
}

#[derive(Debug, Subcommand)]
pub enum RuleCommand {
    Add(RuleArgs),
    List,
    Delete {
        id: Uuid,
        /// Also remove the rule's unconfirmed instances.
        #[arg(long)]
        cascade: bool,
    },
}

#[derive(Debug, Args)]
pub struct RuleArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub amount: Decimal,
    /// daily, weekly, bi-weekly, monthly or bi-monthly.
    #[arg(long)]
    pub frequency: String,
    #[arg(long)]
    pub start: NaiveDate,
    #[arg(long)]
    pub end: Option<NaiveDate>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<Uuid>,
}

#[derive(Debug, Subcommand)]
pub enum TxnCommand {
    Add {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, allow_negative_numbers = true)]
        amount: Decimal,
        #[arg(long)]
        confirmed: bool,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<Uuid>,
    },
    Confirm {
        id: Uuid,
        /// Actual amount, when it differs from the estimate.
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<Decimal>,
    },
    Delete {
        id: Uuid,
    },
    /// List the transactions on one day.
    Day {
        date: NaiveDate,
    },
}

/// Parses process arguments and runs the selected command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let manager = ConfigManager::new()?;
    let config = manager.load()?;
    let store = JsonStore::new(Some(manager.data_dir(&config)))?;
    let output = execute(&store, &config, cli)?;
    println!("{output}");
    Ok(())
}

/// Runs one command against `store`, returning the text to print.
pub fn execute(store: &dyn CalendarStore, config: &Config, cli: Cli) -> Result<String> {
    let owner = cli
        .owner
        .or_else(|| config.default_owner.clone())
        .ok_or_else(|| {
            CalendarError::InvalidInput(
                "no owner given; pass --owner or set default_owner in the config".into(),
            )
        })?;
    let owner = owner.as_str();

    match cli.command {
        Command::Init { today } => {
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let (settings, created) = SettingsService::ensure_owner(store, owner, today)?;
            let categories = store.load_categories(owner)?;
            let headline = if created {
                format!("Initialized owner `{owner}`.")
            } else {
                format!("Owner `{owner}` already initialized.")
            };
            Ok(format!(
                "{headline}\n{}",
                output::render_settings(&settings, &categories)
            ))
        }
        Command::Settings(SettingsCommand::Show) => {
            let settings = SettingsService::get(store, owner)?;
            let categories = store.load_categories(owner)?;
            Ok(output::render_settings(&settings, &categories))
        }
        Command::Settings(SettingsCommand::Set { balance, start }) => {
            let settings = SettingsService::update(store, owner, balance, start)?;
            Ok(output::render_settings(&settings, &[]))
        }
        Command::Rule(RuleCommand::Add(args)) => {
            let rule = RuleService::add(store, owner, new_rule(args))?;
            Ok(format!("Added rule {}", rule.id))
        }
        Command::Rule(RuleCommand::List) => {
            Ok(output::render_rules(&RuleService::list(store, owner)?))
        }
        Command::Rule(RuleCommand::Delete { id, cascade }) => {
            let deletion = RuleService::delete(store, owner, id, cascade)?;
            Ok(format!(
                "Deleted rule {} ({} unconfirmed transaction(s) removed)",
                deletion.rule_id, deletion.removed_instances
            ))
        }
        Command::Txn(TxnCommand::Add {
            date,
            amount,
            confirmed,
            description,
            category,
        }) => {
            let instance = InstanceService::add_one_off(
                store,
                owner,
                date,
                amount,
                confirmed,
                description,
                category,
            )?;
            Ok(format!("Added transaction {}", instance.id))
        }
        Command::Txn(TxnCommand::Confirm { id, amount }) => {
            let instance = InstanceService::confirm(store, owner, id, amount)?;
            Ok(format!("Confirmed transaction {}", instance.id))
        }
        Command::Txn(TxnCommand::Delete { id }) => {
            InstanceService::delete(store, owner, id)?;
            Ok(format!("Deleted transaction {id}"))
        }
        Command::Txn(TxnCommand::Day { date }) => Ok(output::render_instances(
            &CalendarService::day_detail(store, owner, date)?,
        )),
        Command::Project { horizon } => {
            let report = CalendarService::run_projection(store, owner, horizon)?;
            Ok(output::render_projection(&report))
        }
        Command::Calendar {
            from,
            to,
            no_refresh,
        } => {
            let days = if no_refresh {
                CalendarService::compute_calendar(store, owner, from, to)?
            } else {
                CalendarService::refresh_calendar(
                    store,
                    owner,
                    from,
                    to,
                    config.projection_buffer_days,
                )?
            };
            Ok(output::render_calendar(&days))
        }
    }
}

fn new_rule(args: RuleArgs) -> NewRule {
    NewRule {
        category_id: args.category,
        description: args.description,
        amount: args.amount,
        frequency: Frequency::from(args.frequency),
        start_date: args.start,
        end_date: args.end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn run(store: &MemoryStore, args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("cashflow_cli").chain(args.iter().copied()))
            .expect("arguments parse");
        execute(store, &Config::default(), cli)
    }

    #[test]
    fn missing_owner_is_reported() {
        let store = MemoryStore::new();
        let err = run(&store, &["rule", "list"]).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidInput(_)));
    }

    #[test]
    fn negative_amounts_parse() {
        let store = MemoryStore::new();
        run(
            &store,
            &[
                "--owner", "alice", "rule", "add", "--amount", "-50", "--frequency", "monthly",
                "--start", "2024-01-01",
            ],
        )
        .unwrap();
        let rules = store.load_rules("alice").unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].amount, Decimal::new(-50, 0));
    }

    #[test]
    fn default_owner_from_config_is_used() {
        let store = MemoryStore::new();
        let config = Config {
            default_owner: Some("bob".into()),
            ..Config::default()
        };
        let cli = Cli::try_parse_from(["cashflow_cli", "init", "--today", "2024-01-01"]).unwrap();
        let text = execute(&store, &config, cli).unwrap();
        assert!(text.contains("Initialized owner `bob`"));
        assert!(store.load_settings("bob").unwrap().is_some());
    }
}
