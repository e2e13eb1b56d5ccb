use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Error type shared by the projection engine, services, and storage backends.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Rule {rule_id} has unrecognized frequency `{value}`")]
    UnknownFrequency { rule_id: Uuid, value: String },
    #[error("No settings found for owner `{0}`")]
    MissingSettings(String),
    #[error("An instance of rule {rule_id} already exists on {date}")]
    Conflict { rule_id: Uuid, date: NaiveDate },
    #[error("Rule not found: {0}")]
    RuleNotFound(Uuid),
    #[error("Transaction not found: {0}")]
    InstanceNotFound(Uuid),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CalendarError>;

impl CalendarError {
    /// Returns true when the error reports an already existing rule instance.
    pub fn is_conflict(&self) -> bool {
        matches!(self, CalendarError::Conflict { .. })
    }
}

impl From<std::io::Error> for CalendarError {
    fn from(err: std::io::Error) -> Self {
        CalendarError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CalendarError {
    fn from(err: serde_json::Error) -> Self {
        CalendarError::Storage(err.to_string())
    }
}
