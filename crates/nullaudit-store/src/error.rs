//! Error types for store operations

use nullaudit_domain::TaskStatus;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No task with this id
    #[error("Task not found: {0}")]
    NotFound(String),

    /// A request field is missing or invalid
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Wire name of the offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// The operation would move a task backwards in its lifecycle
    #[error("Task {id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Task id
        id: String,
        /// Current status
        from: &'static str,
        /// Requested status
        to: &'static str,
    },
}

impl StoreError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        StoreError::Validation {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn transition(id: &str, from: TaskStatus, to: TaskStatus) -> Self {
        StoreError::InvalidTransition {
            id: id.to_string(),
            from: from.as_str(),
            to: to.as_str(),
        }
    }
}
