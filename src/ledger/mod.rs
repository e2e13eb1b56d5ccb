//! The projection and aggregation engine: pure functions over domain values.

pub mod aggregator;
pub mod frequency;
pub mod projector;

pub use aggregator::aggregate;
pub use frequency::Frequency;
pub use projector::{project, project_rule, Projection, SkippedRule};
