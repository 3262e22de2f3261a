//! Backend configuration value object

use crate::core::error::DomainError;
use crate::core::identity::BackendIdentity;
use secrecy::{ExposeSecret, SecretString};

/// Immutable description of one model endpoint (Value Object)
///
/// Built once at startup and handed to the client that owns it. The
/// credential is kept behind [`SecretString`] so `Debug` output and logs
/// never show it.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    identity: BackendIdentity,
    model: String,
    credential: SecretString,
    base_url: Option<String>,
}

impl BackendConfig {
    /// Create a config whose model name equals its identity.
    pub fn new(identity: BackendIdentity, credential: impl Into<String>) -> Self {
        let model = identity.as_str().to_string();
        Self {
            identity,
            model,
            credential: SecretString::new(credential.into()),
            base_url: None,
        }
    }

    /// Override the model name sent on the wire.
    pub fn with_model(mut self, model: impl Into<String>) -> Result<Self, DomainError> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(DomainError::invalid_argument(format!(
                "model name for backend {} cannot be empty",
                self.identity
            )));
        }
        self.model = model;
        Ok(self)
    }

    /// Point the backend at a non-default endpoint.
    ///
    /// A trailing slash is removed so paths can be appended uniformly.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let url = base_url.into();
        self.base_url = Some(url.trim_end_matches('/').to_string());
        self
    }

    pub fn identity(&self) -> &BackendIdentity {
        &self.identity
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn credential(&self) -> &SecretString {
        &self.credential
    }

    /// Whether a credential was supplied at all (local servers often need none).
    pub fn has_credential(&self) -> bool {
        !self.credential.expose_secret().is_empty()
    }
}
