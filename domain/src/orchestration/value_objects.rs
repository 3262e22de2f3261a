//! Orchestration value objects - immutable per-backend results.

use crate::core::identity::BackendIdentity;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Why a backend produced no answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Transport-level failure (DNS, connect, reset)
    Network,
    /// The endpoint rejected the credential
    Auth,
    /// The endpoint answered with an error or an unusable body
    Upstream,
    /// The round deadline or the request timeout expired first
    Timeout,
    /// The backend task ended without reporting anything
    Terminated,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Network => "network",
            FailureKind::Auth => "auth",
            FailureKind::Upstream => "upstream",
            FailureKind::Timeout => "timeout",
            FailureKind::Terminated => "terminated",
        }
    }
}

/// Result of one backend in one fan-out round
///
/// When `succeeded` is false, `text` holds the failure reason instead of an
/// answer. A failed result never carries partial output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResult {
    /// The backend that produced this result
    pub identity: BackendIdentity,
    /// Answer text, or the failure reason
    pub text: String,
    /// Whether the backend answered
    pub succeeded: bool,
    /// Failure category, set only on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    /// Wall time of the backend call, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
}

impl CompletionResult {
    /// Creates a successful result.
    pub fn success(identity: BackendIdentity, text: impl Into<String>) -> Self {
        Self {
            identity,
            text: text.into(),
            succeeded: true,
            failure: None,
            elapsed_ms: None,
        }
    }

    /// Creates a failed result carrying a human-readable reason.
    pub fn failure(identity: BackendIdentity, kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            identity,
            text: reason.into(),
            succeeded: false,
            failure: Some(kind),
            elapsed_ms: None,
        }
    }

    /// Creates the result recorded for a backend still running at the round deadline.
    pub fn timed_out(identity: BackendIdentity, deadline: Duration) -> Self {
        let reason = format!(
            "timed out: no response within the {:.1}s round deadline",
            deadline.as_secs_f64()
        );
        Self::failure(identity, FailureKind::Timeout, reason)
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed_ms = Some(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Returns `true` if this result is a timeout failure.
    pub fn is_timeout(&self) -> bool {
        self.failure == Some(FailureKind::Timeout)
    }

    /// The failure reason, if any.
    pub fn failure_reason(&self) -> Option<&str> {
        (!self.succeeded).then_some(self.text.as_str())
    }
}
