//! Remote document store settings.
//!
//! The same shape is used for the public read config baked into the build
//! and for the admin's local override. Which one is which is decided by the
//! sync crate; this type only carries the values.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Where the catalog document lives and how to authenticate against it.
///
/// Stored under the `cloudSettings` key as
/// `{"enabled": bool, "endpointUrl": string, "apiKey": string}`.
/// The API key is redacted from `Debug` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudSettings {
    #[serde(default)]
    pub enabled: bool,
    /// Full document URL, e.g. `https://api.jsonbin.io/v3/b/<BIN_ID>`.
    #[serde(default)]
    pub endpoint_url: String,
    #[serde(default = "empty_secret", with = "secret_string")]
    pub api_key: SecretString,
}

impl CloudSettings {
    /// Create enabled settings for an endpoint.
    #[must_use]
    pub fn new(endpoint_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            enabled: true,
            endpoint_url: endpoint_url.into(),
            api_key: SecretString::from(api_key.into()),
        }
    }

    /// Settings that never touch the network.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            endpoint_url: String::new(),
            api_key: empty_secret(),
        }
    }

    /// Enabled with a non-empty endpoint.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.endpoint_url.trim().is_empty()
    }

    /// Whether a key was provided at all.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }

    /// Endpoint with surrounding whitespace and trailing slashes removed.
    #[must_use]
    pub fn normalized_endpoint(&self) -> &str {
        self.endpoint_url.trim().trim_end_matches('/')
    }

    /// Whether two settings point at the same document.
    #[must_use]
    pub fn targets_same_document(&self, other: &Self) -> bool {
        self.normalized_endpoint() == other.normalized_endpoint()
    }
}

impl Default for CloudSettings {
    fn default() -> Self {
        Self::disabled()
    }
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

/// Serde adapter for keys that must round-trip through local storage.
mod secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(secret.expose_secret())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
        String::deserialize(deserializer).map(SecretString::from)
    }
}
