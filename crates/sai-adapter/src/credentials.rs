//! Per-request credential resolution.
//!
//! Chooses between a caller-supplied credential (carried in the inbound
//! metadata bag) and the process-wide defaults. Exactly one credential is
//! attached to any outbound call, never both schemes at once.

use crate::config::SaiConfig;
use sai_types::{ConfigError, SaiError};
use serde_json::Value;

/// Placeholder value some framework configurations send instead of a real
/// key. Treated as absent (case-insensitive).
pub const CREDENTIAL_PLACEHOLDER: &str = "raspberry";

/// Substring marking a caller-supplied value as a cookie rather than a key.
pub const COOKIE_MARKER: &str = "Cookies";

/// The two mutually exclusive upstream authentication schemes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Sent as the `X-Api-Key` header.
    Key(String),
    /// Sent as the `Cookie` header.
    Cookie(String),
}

impl Credential {
    /// The scheme of this credential, for logging and diagnostics.
    pub fn kind(&self) -> CredentialKind {
        match self {
            Self::Key(_) => CredentialKind::Key,
            Self::Cookie(_) => CredentialKind::Cookie,
        }
    }

    /// The raw header value.
    pub fn value(&self) -> &str {
        match self {
            Self::Key(v) | Self::Cookie(v) => v,
        }
    }
}

/// Credential scheme without the secret value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// API key scheme.
    Key,
    /// Cookie scheme.
    Cookie,
}

impl std::fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key => write!(f, "API Key"),
            Self::Cookie => write!(f, "Cookie"),
        }
    }
}

/// Extract a caller-supplied credential from the inbound metadata bag.
///
/// Two equally weighted locations are checked: `api_key` at the top level,
/// then `optional_params.api_key`. The first one found wins.
pub fn caller_credential(params: &Value) -> Option<String> {
    params
        .get("api_key")
        .and_then(Value::as_str)
        .or_else(|| {
            params.get("optional_params").and_then(|p| p.get("api_key")).and_then(Value::as_str)
        })
        .map(str::to_string)
}

/// Resolve the credential to use for one request.
///
/// A caller-supplied value is rejected (treated as absent) when it is empty
/// after trimming or equal to the placeholder. An accepted value containing
/// [`COOKIE_MARKER`] is cookie-typed, otherwise key-typed. Without a usable
/// caller value, falls back to the default key, then the default cookie.
pub fn resolve(caller: Option<&str>, config: &SaiConfig) -> Result<Credential, SaiError> {
    if let Some(raw) = caller {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case(CREDENTIAL_PLACEHOLDER) {
            let credential = if trimmed.contains(COOKIE_MARKER) {
                Credential::Cookie(trimmed.to_string())
            } else {
                Credential::Key(trimmed.to_string())
            };
            tracing::debug!("Using caller-supplied credential | Kind: {}", credential.kind());
            return Ok(credential);
        }
    }

    if let Some(key) = &config.api_key {
        Ok(Credential::Key(key.clone()))
    } else if let Some(cookie) = &config.cookie {
        Ok(Credential::Cookie(cookie.clone()))
    } else {
        Err(ConfigError::MissingCredentials.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};
    use serde_json::json;

    fn config(api_key: Option<&str>, cookie: Option<&str>) -> SaiConfig {
        SaiConfig {
            template_id: "tmpl".to_string(),
            base_url: "https://sai.internal".to_string(),
            api_key: api_key.map(str::to_string),
            cookie: cookie.map(str::to_string),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            verbose_logging: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    #[test]
    fn test_caller_credential_top_level_wins() {
        let params = json!({
            "api_key": "top",
            "optional_params": { "api_key": "nested" }
        });
        assert_eq!(caller_credential(&params).unwrap(), "top");
    }

    #[test]
    fn test_caller_credential_nested_location() {
        let params = json!({ "optional_params": { "api_key": "nested" } });
        assert_eq!(caller_credential(&params).unwrap(), "nested");
    }

    #[test]
    fn test_caller_credential_absent() {
        assert_eq!(caller_credential(&json!({})), None);
        assert_eq!(caller_credential(&json!({ "api_key": 42 })), None);
    }

    #[test]
    fn test_cookie_marker_classifies_as_cookie() {
        let cred = resolve(Some("Cookies: session=abc"), &config(Some("k"), None)).unwrap();
        assert_eq!(cred, Credential::Cookie("Cookies: session=abc".to_string()));
    }

    #[test]
    fn test_plain_value_classifies_as_key() {
        let cred = resolve(Some("sk-live-1234"), &config(None, Some("c"))).unwrap();
        assert_eq!(cred, Credential::Key("sk-live-1234".to_string()));
    }

    #[test]
    fn test_placeholder_is_absent_any_case_and_whitespace() {
        for value in ["raspberry", "RASPBERRY", "RaspBerry", "  raspberry  "] {
            let cred = resolve(Some(value), &config(Some("default-key"), None)).unwrap();
            assert_eq!(cred, Credential::Key("default-key".to_string()));
        }
    }

    #[test]
    fn test_empty_value_falls_back_to_default() {
        let cred = resolve(Some("   "), &config(Some("default-key"), None)).unwrap();
        assert_eq!(cred, Credential::Key("default-key".to_string()));
    }

    #[test]
    fn test_default_key_preferred_over_default_cookie() {
        let cred = resolve(None, &config(Some("k"), Some("c"))).unwrap();
        assert_eq!(cred.kind(), CredentialKind::Key);
    }

    #[test]
    fn test_default_cookie_when_no_key() {
        let cred = resolve(None, &config(None, Some("c"))).unwrap();
        assert_eq!(cred.kind(), CredentialKind::Cookie);
    }

    #[test]
    fn test_no_credential_anywhere_is_config_error() {
        let err = resolve(None, &config(None, None)).unwrap_err();
        assert_eq!(err, SaiError::Config(ConfigError::MissingCredentials));
    }
}
