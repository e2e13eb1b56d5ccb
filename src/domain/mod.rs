pub mod calendar;
pub mod category;
pub mod common;
pub mod instance;
pub mod rule;
pub mod settings;

pub use calendar::{DateWindow, DaySummary};
pub use category::{Category, CategoryKind};
pub use common::{Displayable, Identifiable, Owned};
pub use instance::{InstancePatch, TransactionInstance};
pub use rule::{NewRule, RecurrenceRule};
pub use settings::Settings;
