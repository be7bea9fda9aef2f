//! NullAudit Domain Layer
//!
//! This crate contains the domain model for the NullAudit mock audit service.
//! It defines the records the stores hold, the rules for moving a review task
//! through its lifecycle, and the trait through which all synthetic data enters.
//!
//! ## Key Concepts
//!
//! - **ReviewTask**: an automated finding waiting for a human decision
//! - **Feedback**: the decision, recorded once when a task completes
//! - **LogEntry**: one line in the bounded activity log
//! - **DataSource**: where mock tasks, logs and dashboard numbers come from
//!
//! ## Architecture
//!
//! - No I/O, no randomness, no global state
//! - Storage lives in nullaudit-store
//! - Mock generation lives in nullaudit-mock, behind [`traits::DataSource`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dashboard;
pub mod feedback;
pub mod log;
pub mod task;
pub mod traits;

// Re-exports for convenience
pub use dashboard::{
    AgentState, AgentStatus, Attestation, AttestationStatus, DashboardStats, ScanFinding,
    ScanReport, TimelinePoint, VulnerabilityBreakdown,
};
pub use feedback::{Feedback, FeedbackAction, ANONYMOUS_REVIEWER};
pub use log::{LogEntry, LogQuery, LogType, DEFAULT_QUERY_LIMIT};
pub use task::{
    FindingPayload, Priority, ReviewTask, TaskContext, TaskId, TaskMetadata, TaskStatus, TaskType,
};
pub use traits::DataSource;
