//! Command implementations.
//!
//! Editing commands work on the local cache only and never fetch, so
//! unpublished edits survive until `publish`. Only `load` contacts the store
//! for reading.

pub mod catalog;
pub mod prompt;
pub mod publish;
pub mod records;
pub mod settings;

use std::io;
use std::path::PathBuf;

use showcase_sync::{ConfigError, FileStore, SyncConfig, SyncError, SyncOrchestrator};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Environment configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A sync operation failed.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// An input file could not be read.
    #[error("Could not read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The terminal or an output file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Open a file-backed session from the environment.
fn open_session() -> Result<SyncOrchestrator<FileStore>, CommandError> {
    let config = SyncConfig::from_env()?;
    tracing::debug!(data_dir = %config.data_dir.display(), "Opening session");
    Ok(SyncOrchestrator::from_config(&config)?)
}

/// Open a session and load the local cache without fetching.
fn open_editing_session() -> Result<SyncOrchestrator<FileStore>, CommandError> {
    let mut sync = open_session()?;
    sync.hydrate_from_cache();
    Ok(sync)
}
