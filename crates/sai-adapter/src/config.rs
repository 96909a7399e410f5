//! Process-wide adapter configuration.
//!
//! Loaded once at startup from the environment and treated as read-only for
//! the process lifetime. Request-handling code receives the config by `Arc`
//! and never reads ambient globals.

use sai_types::{ConfigError, SaiError};
use std::fs;

/// Default per-HTTP-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;
/// Default number of connect-level transport retries.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default streaming slice size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 50;

/// Immutable configuration for the SAI adapter.
#[derive(Debug, Clone)]
pub struct SaiConfig {
    /// Upstream template id, addressed in the request path.
    pub template_id: String,
    /// Base URL of the SAI service.
    pub base_url: String,
    /// Default key credential, if configured.
    pub api_key: Option<String>,
    /// Default cookie credential, if configured.
    pub cookie: Option<String>,
    /// Per-HTTP-call timeout in seconds.
    pub timeout_secs: u64,
    /// Connect-level transport retries per attempt.
    pub max_retries: u32,
    /// Enables payload-level debug logging.
    pub verbose_logging: bool,
    /// Streaming slice size in characters.
    pub chunk_size: usize,
}

impl SaiConfig {
    /// Load the configuration from environment variables.
    ///
    /// Credentials may be supplied directly (`SAI_KEY`, `SAI_COOKIE`) or as
    /// a path to a secret file (`SAI_KEY_FILE`, `SAI_COOKIE_FILE`), in which
    /// case the file's trimmed contents are used. The direct value wins when
    /// both are set.
    pub fn from_env() -> Result<Self, SaiError> {
        let config = Self {
            template_id: env_var("SAI_TEMPLATE_ID").unwrap_or_default(),
            base_url: env_var("SAI_URL").unwrap_or_default(),
            api_key: credential_from_env("SAI_KEY", "SAI_KEY_FILE")?,
            cookie: credential_from_env("SAI_COOKIE", "SAI_COOKIE_FILE")?,
            timeout_secs: env_parsed("REQUEST_TIMEOUT").unwrap_or(DEFAULT_TIMEOUT_SECS),
            max_retries: env_parsed("MAX_RETRIES").unwrap_or(DEFAULT_MAX_RETRIES),
            verbose_logging: env_var("VERBOSE_LOGGING")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            chunk_size: env_parsed("CHUNK_SIZE").unwrap_or(DEFAULT_CHUNK_SIZE),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the required fields. Called at process startup.
    pub fn validate(&self) -> Result<(), SaiError> {
        if self.template_id.trim().is_empty() {
            return Err(ConfigError::MissingTemplateId.into());
        }
        if self.base_url.trim().is_empty() {
            return Err(SaiError::Config(ConfigError::ValidationError {
                field: "base_url".to_string(),
                message: "SAI_URL is not configured".to_string(),
            }));
        }
        if self.api_key.is_none() && self.cookie.is_none() {
            return Err(ConfigError::MissingCredentials.into());
        }
        if self.chunk_size == 0 {
            return Err(SaiError::Config(ConfigError::ValidationError {
                field: "chunk_size".to_string(),
                message: "CHUNK_SIZE must be at least 1".to_string(),
            }));
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    env_var(name).and_then(|v| v.trim().parse().ok())
}

/// Resolve a credential from a direct env var or a secret-file env var.
fn credential_from_env(direct: &str, file: &str) -> Result<Option<String>, SaiError> {
    if let Some(value) = env_var(direct) {
        return Ok(Some(value));
    }
    match env_var(file) {
        Some(path) => read_secret_file(&path).map(Some),
        None => Ok(None),
    }
}

/// Read a secret file and return its trimmed contents.
pub(crate) fn read_secret_file(path: &str) -> Result<String, SaiError> {
    let contents =
        fs::read_to_string(path).map_err(|e| ConfigError::from_io_error(path, &e))?;
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        return Err(SaiError::Config(ConfigError::SecretFile {
            path: path.to_string(),
            message: "secret file is empty".to_string(),
        }));
    }
    Ok(trimmed.to_string())
}
