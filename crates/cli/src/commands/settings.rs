//! `showcase settings`

use secrecy::ExposeSecret;
use showcase_core::CloudSettings;
use tracing::warn;

use super::{CommandError, open_session};

/// Print the admin settings and the public config. Keys are never printed.
///
/// # Errors
///
/// Returns error if the stored settings cannot be read.
#[allow(clippy::print_stdout)]
pub fn show() -> Result<(), CommandError> {
    let sync = open_session()?;
    let admin = sync.admin_settings()?;

    println!("admin settings");
    print_settings(admin.settings());
    println!("public config (compiled in)");
    print_settings(sync.public_config().settings());
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_settings(settings: &CloudSettings) {
    println!("  enabled:  {}", settings.enabled);
    if settings.endpoint_url.trim().is_empty() {
        println!("  endpoint: (none)");
    } else {
        println!("  endpoint: {}", settings.normalized_endpoint());
    }
    println!("  key:      {}", describe_key(settings));
}

fn describe_key(settings: &CloudSettings) -> String {
    if settings.has_api_key() {
        format!("set ({} characters)", settings.api_key.expose_secret().chars().count())
    } else {
        "not set".to_string()
    }
}

/// Store admin settings.
///
/// # Errors
///
/// Returns error if the endpoint is not an http(s) URL or the settings
/// cannot be stored.
pub fn set(endpoint: String, key: String, enabled: bool) -> Result<(), CommandError> {
    let mut sync = open_session()?;
    let mut settings = CloudSettings::new(endpoint, key);
    settings.enabled = enabled;

    let mismatch = !settings.targets_same_document(sync.public_config().settings());
    sync.save_admin_settings(settings)?;

    if mismatch {
        warn!("Admin endpoint differs from the public endpoint; publishes will not reach visitors");
    }
    Ok(())
}

/// Remove admin settings.
///
/// # Errors
///
/// Returns error if the stored settings cannot be removed.
pub fn clear() -> Result<(), CommandError> {
    let mut sync = open_session()?;
    sync.clear_admin_settings()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_key_never_shows_the_key() {
        let settings = CloudSettings::new("https://api.store/b/X", "$2a$10$secret");
        let described = describe_key(&settings);
        assert!(!described.contains("secret"));
        assert_eq!(described, "set (13 characters)");
        assert_eq!(describe_key(&CloudSettings::disabled()), "not set");
    }
}
