//! Backend identity value object

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

use super::error::DomainError;

/// Opaque name of one backend within a round (Value Object)
///
/// Identities are the join key between fan-out results and the judge's
/// ranking entries, so they must be unique within a batch. Comparison is
/// exact; no case folding or trimming happens after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendIdentity(String);

impl BackendIdentity {
    /// Create an identity, rejecting blank names.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_argument("backend identity cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BackendIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for BackendIdentity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Borrow<str> for BackendIdentity {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BackendIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_trims_whitespace() {
        let id = BackendIdentity::new("  worker-A ").unwrap();
        assert_eq!(id.as_str(), "worker-A");
        assert_eq!(id.to_string(), "worker-A");
    }

    #[test]
    fn test_blank_identity_rejected() {
        assert!(BackendIdentity::new("").is_err());
        assert!(BackendIdentity::new("   ").is_err());
        assert!("".parse::<BackendIdentity>().is_err());
    }

    #[test]
    fn test_identity_serializes_as_string() {
        let id: BackendIdentity = "gemma3:12b".parse().unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"gemma3:12b\"");
    }
}
