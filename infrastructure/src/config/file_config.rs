//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain/application
//! types only after [`FileConfig::validate`] passes.

use panel_application::DispatchParams;
use panel_domain::{BackendConfig, BackendIdentity};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

/// Environment variable read when a backend names none
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Model used as judge when the config has no `[judge]` section
pub const DEFAULT_JUDGE_MODEL: &str = "gpt-4o-mini";

/// Placeholder shown instead of inline keys by `--show-config`
const REDACTED: &str = "<redacted>";

/// Configuration validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("no backends configured; add at least one [[backends]] entry")]
    NoBackends,

    #[error("{section}: identity cannot be empty")]
    EmptyIdentity { section: String },

    #[error("{section}: model name cannot be empty")]
    EmptyModel { section: String },

    #[error("backend {0} is configured more than once")]
    DuplicateIdentity(String),

    #[error("no credential for {identity}: set {env} or api_key (or allow_missing_key = true)")]
    MissingCredential { identity: String, env: String },

    #[error("unknown backend {0} requested; configured backends: {1}")]
    UnknownBackend(String, String),

    #[error("dispatch.max_concurrency cannot be 0")]
    ZeroConcurrency,

    #[error("dispatch.deadline_seconds cannot be 0")]
    ZeroDeadline,

    #[error("dispatch.request_timeout_seconds cannot be 0")]
    ZeroRequestTimeout,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Fan-out settings
    pub dispatch: FileDispatchConfig,
    /// The judge endpoint
    pub judge: FileJudgeConfig,
    /// Endpoints that answer the question
    pub backends: Vec<FileBackendConfig>,
}

/// `[dispatch]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDispatchConfig {
    pub max_concurrency: usize,
    /// Deadline for the whole fan-out round
    pub deadline_seconds: u64,
    /// Transport timeout for a single HTTP request
    pub request_timeout_seconds: u64,
}

impl Default for FileDispatchConfig {
    fn default() -> Self {
        let params = DispatchParams::default();
        Self {
            max_concurrency: params.max_concurrency,
            deadline_seconds: params.deadline.as_secs(),
            request_timeout_seconds: 120,
        }
    }
}

impl FileDispatchConfig {
    pub fn to_params(&self) -> DispatchParams {
        DispatchParams::default()
            .with_max_concurrency(self.max_concurrency)
            .with_deadline(Duration::from_secs(self.deadline_seconds))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// One `[[backends]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// Name the backend is reported and ranked under
    pub identity: String,
    /// Model name sent on the wire (defaults to `identity`)
    pub model: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Inline API key (takes precedence over `api_key_env`)
    pub api_key: Option<String>,
    /// OpenAI-compatible endpoint (defaults to api.openai.com)
    pub base_url: Option<String>,
    /// Accept an empty credential (local servers such as Ollama)
    pub allow_missing_key: bool,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            identity: String::new(),
            model: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            api_key: None,
            base_url: None,
            allow_missing_key: false,
        }
    }
}

impl FileBackendConfig {
    pub fn named(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            ..Default::default()
        }
    }

    fn check(&self, section: &str) -> Result<(), ConfigValidationError> {
        if self.identity.trim().is_empty() {
            return Err(ConfigValidationError::EmptyIdentity {
                section: section.to_string(),
            });
        }
        if self.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyModel {
                section: format!("{} ({})", section, self.identity.trim()),
            });
        }
        Ok(())
    }

    /// Resolve the credential and build the domain config.
    ///
    /// `lookup` reads an environment variable; it is injected so resolution
    /// can be exercised without touching the process environment.
    pub fn resolve_with<F>(&self, lookup: F) -> Result<BackendConfig, ConfigValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let identity = BackendIdentity::new(self.identity.as_str()).map_err(|_| {
            ConfigValidationError::EmptyIdentity {
                section: "backend".to_string(),
            }
        })?;

        let credential = match self.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => key.to_string(),
            None => match lookup(self.api_key_env.as_str()).filter(|k| !k.trim().is_empty()) {
                Some(key) => key,
                None if self.allow_missing_key => String::new(),
                None => {
                    return Err(ConfigValidationError::MissingCredential {
                        identity: identity.to_string(),
                        env: self.api_key_env.clone(),
                    });
                }
            },
        };

        let mut config = BackendConfig::new(identity, credential);
        if let Some(model) = &self.model {
            config = config
                .with_model(model.trim())
                .map_err(|_| ConfigValidationError::EmptyModel {
                    section: self.identity.clone(),
                })?;
        }
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.trim());
        }
        Ok(config)
    }

    pub fn resolve(&self) -> Result<BackendConfig, ConfigValidationError> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    fn redacted(&self) -> Self {
        Self {
            api_key: self.api_key.as_ref().map(|_| REDACTED.to_string()),
            ..self.clone()
        }
    }
}

/// `[judge]` section (same shape as a backend entry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileJudgeConfig(pub FileBackendConfig);

impl Default for FileJudgeConfig {
    fn default() -> Self {
        Self(FileBackendConfig::named(DEFAULT_JUDGE_MODEL))
    }
}

impl FileConfig {
    /// Reject configurations that cannot run a round.
    ///
    /// Credentials are not checked here; they depend on the environment and
    /// are resolved in [`FileBackendConfig::resolve`].
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.dispatch.max_concurrency == 0 {
            return Err(ConfigValidationError::ZeroConcurrency);
        }
        if self.dispatch.deadline_seconds == 0 {
            return Err(ConfigValidationError::ZeroDeadline);
        }
        if self.dispatch.request_timeout_seconds == 0 {
            return Err(ConfigValidationError::ZeroRequestTimeout);
        }

        self.judge.0.check("judge")?;

        if self.backends.is_empty() {
            return Err(ConfigValidationError::NoBackends);
        }
        let mut seen = HashSet::new();
        for backend in &self.backends {
            backend.check("backends")?;
            let name = backend.identity.trim();
            if !seen.insert(name) {
                return Err(ConfigValidationError::DuplicateIdentity(name.to_string()));
            }
        }
        Ok(())
    }

    /// Keep only the named backends, in the order they appear in the config.
    pub fn restrict_backends(&mut self, names: &[String]) -> Result<(), ConfigValidationError> {
        if names.is_empty() {
            return Ok(());
        }
        for name in names {
            if !self.backends.iter().any(|b| b.identity.trim() == name.trim()) {
                let known = self
                    .backends
                    .iter()
                    .map(|b| b.identity.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(ConfigValidationError::UnknownBackend(name.clone(), known));
            }
        }
        self.backends
            .retain(|b| names.iter().any(|n| n.trim() == b.identity.trim()));
        Ok(())
    }

    /// Replace the judge's model, keeping its credential settings.
    pub fn set_judge_model(&mut self, model: &str) {
        self.judge.0.identity = model.to_string();
        self.judge.0.model = None;
    }

    /// Copy of this config safe to print (inline keys masked)
    pub fn redacted(&self) -> Self {
        Self {
            dispatch: self.dispatch.clone(),
            judge: FileJudgeConfig(self.judge.0.redacted()),
            backends: self.backends.iter().map(FileBackendConfig::redacted).collect(),
        }
    }
}
