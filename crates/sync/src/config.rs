//! Sync configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOWCASE_DATA_DIR` - Local cache directory (default: `.showcase`)
//! - `SHOWCASE_PUBLIC_ENDPOINT_URL` - Overrides the compiled-in public document URL
//! - `SHOWCASE_PUBLIC_API_KEY` - Overrides the compiled-in public read key
//! - `SHOWCASE_PUBLIC_ENABLED` - Overrides whether visitors fetch at all
//! - `SHOWCASE_FETCH_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `SHOWCASE_PUBLISH_WARN_KB` - Payload size needing extra confirmation (default: 500)
//!
//! The same `SHOWCASE_PUBLIC_*` names are read at build time to produce the
//! compiled-in public config (see [`PublicReadConfig::compiled`]).

use std::path::PathBuf;
use std::time::Duration;

use secrecy::ExposeSecret;
use showcase_core::CloudSettings;
use thiserror::Error;
use url::Url;

use crate::orchestrator::DEFAULT_PUBLISH_WARN_KB;
use crate::settings::PublicReadConfig;

const DEFAULT_DATA_DIR: &str = ".showcase";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example-key",
    "xxx",
    "todo",
    "insert",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid endpoint URL {0:?}: {1}")]
    InvalidEndpoint(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Runtime configuration for a sync session.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Directory for the local cache
    pub data_dir: PathBuf,
    /// Public read config used by anonymous visitors
    pub public: PublicReadConfig,
    /// Per-request timeout for the document store
    pub fetch_timeout: Duration,
    /// Publishing above this size (KB) needs explicit confirmation
    pub publish_warn_kb: f64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            public: PublicReadConfig::compiled(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            publish_warn_kb: DEFAULT_PUBLISH_WARN_KB,
        }
    }
}

impl SyncConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("SHOWCASE_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let fetch_timeout = match lookup("SHOWCASE_FETCH_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("SHOWCASE_FETCH_TIMEOUT_SECS".to_string(), e.to_string())
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidEnvVar(
                        "SHOWCASE_FETCH_TIMEOUT_SECS".to_string(),
                        "must be at least 1".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        };

        let publish_warn_kb = match lookup("SHOWCASE_PUBLISH_WARN_KB") {
            Some(raw) => {
                let kb = raw.trim().parse::<f64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("SHOWCASE_PUBLISH_WARN_KB".to_string(), e.to_string())
                })?;
                if !kb.is_finite() || kb <= 0.0 {
                    return Err(ConfigError::InvalidEnvVar(
                        "SHOWCASE_PUBLISH_WARN_KB".to_string(),
                        "must be a positive number".to_string(),
                    ));
                }
                kb
            }
            None => DEFAULT_PUBLISH_WARN_KB,
        };

        let public = public_from_lookup(&lookup)?;

        Ok(Self {
            data_dir,
            public,
            fetch_timeout,
            publish_warn_kb,
        })
    }
}

/// Runtime override of the public config, or the compiled-in one.
fn public_from_lookup<F>(lookup: &F) -> Result<PublicReadConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(endpoint) = lookup("SHOWCASE_PUBLIC_ENDPOINT_URL") else {
        return Ok(PublicReadConfig::compiled());
    };

    let enabled = match lookup("SHOWCASE_PUBLIC_ENABLED") {
        Some(raw) => parse_flag(&raw).ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "SHOWCASE_PUBLIC_ENABLED".to_string(),
                format!("expected true/false, got {raw:?}"),
            )
        })?,
        None => !endpoint.trim().is_empty(),
    };

    let mut settings = CloudSettings::new(
        endpoint,
        lookup("SHOWCASE_PUBLIC_API_KEY").unwrap_or_default(),
    );
    settings.enabled = enabled;

    if settings.is_usable() {
        validate_endpoint(&settings.endpoint_url)?;
    }
    if settings.has_api_key() {
        validate_key_not_placeholder(settings.api_key.expose_secret(), "SHOWCASE_PUBLIC_API_KEY")?;
    }

    Ok(PublicReadConfig::new(settings))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a boolean flag the way shell users write them.
pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Validate that an endpoint is an absolute http(s) URL.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEndpoint` if the URL does not parse or uses
/// another scheme.
pub fn validate_endpoint(endpoint: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(endpoint.trim())
        .map_err(|e| ConfigError::InvalidEndpoint(endpoint.to_string(), e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEndpoint(
            endpoint.to_string(),
            format!("unsupported scheme `{other}`"),
        )),
    }
}

/// Reject keys that are obviously template text.
fn validate_key_not_placeholder(key: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = key.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SyncConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".showcase"));
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert!((config.publish_warn_kb - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_public_override() {
        let config = SyncConfig::from_lookup(lookup_from(&[
            ("SHOWCASE_PUBLIC_ENDPOINT_URL", "https://api.store/b/X"),
            ("SHOWCASE_PUBLIC_API_KEY", "$2a$10$readOnlyKeyValue"),
        ]))
        .unwrap();
        let public = config.public.settings();
        assert!(public.is_usable());
        assert_eq!(public.endpoint_url, "https://api.store/b/X");
        assert_eq!(public.api_key.expose_secret(), "$2a$10$readOnlyKeyValue");
    }

    #[test]
    fn test_public_can_be_disabled() {
        let config = SyncConfig::from_lookup(lookup_from(&[
            ("SHOWCASE_PUBLIC_ENDPOINT_URL", "https://api.store/b/X"),
            ("SHOWCASE_PUBLIC_ENABLED", "false"),
        ]))
        .unwrap();
        assert!(!config.public.settings().is_usable());
    }

    #[test]
    fn test_invalid_timeout() {
        let err = SyncConfig::from_lookup(lookup_from(&[("SHOWCASE_FETCH_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref name, _) if name == "SHOWCASE_FETCH_TIMEOUT_SECS"));

        assert!(SyncConfig::from_lookup(lookup_from(&[("SHOWCASE_FETCH_TIMEOUT_SECS", "0")])).is_err());
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(SyncConfig::from_lookup(lookup_from(&[("SHOWCASE_PUBLISH_WARN_KB", "-1")])).is_err());
        let config =
            SyncConfig::from_lookup(lookup_from(&[("SHOWCASE_PUBLISH_WARN_KB", "250.5")])).unwrap();
        assert!((config.publish_warn_kb - 250.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_placeholder_key_rejected() {
        let err = SyncConfig::from_lookup(lookup_from(&[
            ("SHOWCASE_PUBLIC_ENDPOINT_URL", "https://api.store/b/X"),
            ("SHOWCASE_PUBLIC_API_KEY", "your-read-key"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        let err = SyncConfig::from_lookup(lookup_from(&[(
            "SHOWCASE_PUBLIC_ENDPOINT_URL",
            "ftp://api.store/b/X",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint(_, _)));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_validate_endpoint() {
        assert!(validate_endpoint("https://api.jsonbin.io/v3/b/abc").is_ok());
        assert!(validate_endpoint("not a url").is_err());
    }
}
