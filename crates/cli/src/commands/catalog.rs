//! `showcase load`, `status`, `export` and `import`.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use showcase_core::import::{parse_cases, parse_products};
use showcase_core::{CaseStudy, Product};
use showcase_sync::cache::{CASES_KEY, PRODUCTS_KEY};
use showcase_sync::settings::resolve;
use showcase_sync::{LocalStore, SettingsSource, SyncStatus};
use tracing::{info, warn};

use super::prompt::confirm_or_assume;
use super::{CommandError, open_editing_session, open_session};

/// One of the two catalog collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Products,
    Cases,
}

/// Load the catalog the way a visitor does and report what was used.
///
/// # Errors
///
/// Returns error if configuration is invalid. Fetch failures are not errors.
#[allow(clippy::print_stdout)]
pub async fn load() -> Result<(), CommandError> {
    let mut sync = open_session()?;
    let status = sync.hydrate().await;

    match status {
        SyncStatus::Synced => info!("Loaded catalog from the remote document"),
        _ => warn!("Remote catalog unavailable, using local data"),
    }

    let snapshot = sync.snapshot();
    if snapshot.is_empty() {
        warn!("Catalog has no products or case studies");
    }
    println!("products: {}", snapshot.products.len());
    println!("cases:    {}", snapshot.cases.len());
    if let Some(at) = snapshot.last_updated_at() {
        println!("updated:  {}", at.to_rfc3339());
    }
    Ok(())
}

/// Print settings and cache contents without contacting the store.
///
/// # Errors
///
/// Returns error if configuration is invalid.
#[allow(clippy::print_stdout)]
pub fn status() -> Result<(), CommandError> {
    let sync = open_session()?;
    let store = sync.store();
    let resolved = resolve(store, sync.public_config());

    println!("data dir:         {}", store.dir().display());
    let public = sync.public_config().settings();
    if public.is_usable() {
        println!("public endpoint:  {}", public.normalized_endpoint());
    } else {
        println!("public endpoint:  (disabled)");
    }

    let admin = sync.admin_settings()?;
    let admin = admin.settings();
    if admin.is_usable() {
        println!("admin endpoint:   {}", admin.normalized_endpoint());
        if !admin.targets_same_document(public) {
            println!("                  differs from the public endpoint; visitors will not see publishes");
        }
    } else {
        println!("admin endpoint:   (not set)");
    }

    let source = match resolved.source {
        SettingsSource::AdminOverride => "admin settings",
        SettingsSource::PublicDefault => "public config",
    };
    println!("loads use:        {source}");

    match store.get_json::<Vec<Product>>(PRODUCTS_KEY) {
        Ok(Some(products)) => println!("cached products:  {}", products.len()),
        Ok(None) => println!("cached products:  none"),
        Err(e) => println!("cached products:  unreadable ({e})"),
    }
    match store.get_json::<Vec<CaseStudy>>(CASES_KEY) {
        Ok(Some(cases)) => println!("cached cases:     {}", cases.len()),
        Ok(None) => println!("cached cases:     none"),
        Err(e) => println!("cached cases:     unreadable ({e})"),
    }
    Ok(())
}

/// Write a collection, or the whole document when `target` is `None`, as
/// JSON to `output` or stdout.
///
/// # Errors
///
/// Returns error if the output cannot be written.
pub fn export(target: Option<Collection>, output: Option<&Path>) -> Result<(), CommandError> {
    let sync = open_editing_session()?;
    let json = match target {
        Some(Collection::Products) => sync.export_products()?,
        Some(Collection::Cases) => sync.export_cases()?,
        None => sync.export_all()?,
    };

    match output {
        Some(path) => {
            fs::write(path, &json)?;
            info!(path = %path.display(), "Exported");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

/// Replace a collection with the JSON array in `file`.
///
/// # Errors
///
/// Returns error if the file cannot be read or the import is rejected.
pub fn import(target: Collection, file: &Path, assume_yes: bool) -> Result<(), CommandError> {
    let json = fs::read_to_string(file).map_err(|source| CommandError::ReadFile {
        path: file.to_path_buf(),
        source,
    })?;

    // Validate before asking so the prompt can show the real count.
    let (count, noun) = match target {
        Collection::Products => (
            parse_products(&json).map_err(showcase_sync::SyncError::from)?.len(),
            "products",
        ),
        Collection::Cases => (
            parse_cases(&json).map_err(showcase_sync::SyncError::from)?.len(),
            "case studies",
        ),
    };

    let question = format!("Importing {count} {noun} will replace all current {noun}. Continue?");
    if !confirm_or_assume(&question, assume_yes)? {
        info!("Import cancelled");
        return Ok(());
    }

    let mut sync = open_editing_session()?;
    match target {
        Collection::Products => sync.import_products(&json)?,
        Collection::Cases => sync.import_cases(&json)?,
    };
    info!(count, "Imported {noun}");
    Ok(())
}
