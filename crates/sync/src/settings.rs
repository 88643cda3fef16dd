//! Which `CloudSettings` govern a session.
//!
//! Two independent instances exist and never share storage:
//!
//! - [`PublicReadConfig`] is baked into the build and used by every visitor.
//!   Only a read-scoped access key belongs in it.
//! - [`AdminLocalConfig`] lives in the admin's local cache under
//!   [`CLOUD_SETTINGS_KEY`] and is what publishes go through.
//!
//! [`resolve`] picks the one that drives the startup fetch.

use showcase_core::CloudSettings;
use tracing::{debug, warn};

use crate::cache::{CLOUD_SETTINGS_KEY, CacheError, LocalStore};
use crate::config::parse_flag;

/// Read config compiled into the artifact.
#[derive(Debug, Clone, Default)]
pub struct PublicReadConfig(CloudSettings);

impl PublicReadConfig {
    #[must_use]
    pub const fn new(settings: CloudSettings) -> Self {
        Self(settings)
    }

    /// The config captured from `SHOWCASE_PUBLIC_*` at build time.
    ///
    /// Without an endpoint the public read path is disabled and visitors see
    /// the local cache or the built-in catalog.
    #[must_use]
    pub fn compiled() -> Self {
        let endpoint = option_env!("SHOWCASE_PUBLIC_ENDPOINT_URL").unwrap_or_default();
        let api_key = option_env!("SHOWCASE_PUBLIC_API_KEY").unwrap_or_default();
        let enabled = option_env!("SHOWCASE_PUBLIC_ENABLED")
            .and_then(parse_flag)
            .unwrap_or(!endpoint.trim().is_empty());

        let mut settings = CloudSettings::new(endpoint, api_key);
        settings.enabled = enabled;
        Self(settings)
    }

    #[must_use]
    pub const fn settings(&self) -> &CloudSettings {
        &self.0
    }
}

/// The admin's own settings, persisted locally.
#[derive(Debug, Clone, Default)]
pub struct AdminLocalConfig(CloudSettings);

impl AdminLocalConfig {
    #[must_use]
    pub const fn new(settings: CloudSettings) -> Self {
        Self(settings)
    }

    /// Read the stored override.
    ///
    /// Returns `Ok(None)` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the entry cannot be read or does not parse.
    pub fn load<S: LocalStore>(store: &S) -> Result<Option<Self>, CacheError> {
        Ok(store.get_json::<CloudSettings>(CLOUD_SETTINGS_KEY)?.map(Self))
    }

    /// Persist as the override.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the entry cannot be written.
    pub fn save<S: LocalStore>(&self, store: &mut S) -> Result<(), CacheError> {
        store.set_json(CLOUD_SETTINGS_KEY, &self.0)
    }

    /// Remove the override so the public config applies again.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the entry cannot be removed.
    pub fn clear<S: LocalStore>(store: &mut S) -> Result<(), CacheError> {
        store.remove(CLOUD_SETTINGS_KEY)
    }

    #[must_use]
    pub const fn settings(&self) -> &CloudSettings {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> CloudSettings {
        self.0
    }
}

/// Where the resolved settings came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsSource {
    AdminOverride,
    PublicDefault,
}

/// Settings chosen for the startup fetch.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub settings: CloudSettings,
    pub source: SettingsSource,
}

/// Pick the settings for the startup fetch.
///
/// A stored admin override wins when it is enabled with an endpoint.
/// Otherwise the public config applies. An unreadable override is logged and
/// ignored.
pub fn resolve<S: LocalStore>(store: &S, public: &PublicReadConfig) -> ResolvedSettings {
    match AdminLocalConfig::load(store) {
        Ok(Some(admin)) if admin.settings().is_usable() => {
            debug!(endpoint = admin.settings().normalized_endpoint(), "Using admin settings override");
            return ResolvedSettings {
                settings: admin.into_inner(),
                source: SettingsSource::AdminOverride,
            };
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Ignoring unreadable admin settings"),
    }

    ResolvedSettings {
        settings: public.settings().clone(),
        source: SettingsSource::PublicDefault,
    }
}
