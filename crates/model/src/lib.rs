pub mod command;
pub mod error;
pub mod planner;
pub mod report;
pub mod server;
pub mod stage;
pub mod stats;

/// Free-form JSON object as emitted by the server (filters, key patterns, sort specs).
pub type Document = serde_json::Map<String, serde_json::Value>;

pub use error::ExplainError;
pub use report::ExplainReport;
pub use stage::{IndexKind, PlanStage, StageName};
