//! Error types.

use thiserror::Error;

/// Errors raised while wiring a drag controller to its environment.
///
/// The drag path itself never fails: a sample that cannot be applied is
/// skipped. These errors only surface from setup calls.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DragError {
    #[error("Failed to attach pointer listeners: {0}")]
    ListenerAttach(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for drag setup operations.
pub type DragResult<T> = Result<T, DragError>;
