//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid message role: {0}")]
    InvalidRole(String),

    #[error("Duplicate result for backend {0}")]
    DuplicateResult(String),

    #[error("Backend {0} is not part of this batch")]
    UnknownIdentity(String),
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        DomainError::InvalidArgument(msg.into())
    }
}
