//! Backend client port
//!
//! Defines the interface for sending one message sequence to one model
//! endpoint. Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use panel_domain::{BackendIdentity, FailureKind, Message};
use thiserror::Error;

/// Errors a single backend call can fail with
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Request timed out: {0}")]
    Timeout(String),
}

impl BackendError {
    /// The failure category recorded in a batch for this error
    pub fn kind(&self) -> FailureKind {
        match self {
            BackendError::Network(_) => FailureKind::Network,
            BackendError::Auth(_) => FailureKind::Auth,
            BackendError::Upstream(_) => FailureKind::Upstream,
            BackendError::Timeout(_) => FailureKind::Timeout,
        }
    }
}

/// One model endpoint
///
/// Clients are stateless per call: the same client may serve several
/// concurrent calls and be reused across rounds. A client makes exactly one
/// attempt per call.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// The identity this client answers as
    fn identity(&self) -> &BackendIdentity;

    /// Send a non-empty message sequence and return the generated text
    async fn complete(&self, messages: &[Message]) -> Result<String, BackendError>;
}
