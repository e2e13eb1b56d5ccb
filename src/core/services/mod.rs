pub mod calendar_service;
pub mod instance_service;
pub mod rule_service;
pub mod settings_service;

pub use calendar_service::{CalendarService, ProjectionReport};
pub use instance_service::InstanceService;
pub use rule_service::{RuleDeletion, RuleService};
pub use settings_service::SettingsService;
