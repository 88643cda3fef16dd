//! Showcase Sync - Keeps the catalog in step with a hosted JSON document.
//!
//! Visitors read one remote document with a read-scoped key baked into the
//! build; the admin edits locally and publishes the whole document back with
//! their own key. The local cache keeps the last-known-good catalog so an
//! offline or misconfigured store never leaves a visitor with nothing.
//!
//! # Modules
//!
//! - [`store`] - HTTP client for the document store, with key-header negotiation
//! - [`settings`] - Public vs. admin settings and which one governs a load
//! - [`cache`] - Local key-value persistence
//! - [`orchestrator`] - Startup hydrate, admin mutations, and guarded publish
//! - [`payload`] - Serialized size and heaviest-record reporting
//! - [`config`] - Environment-driven runtime configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use showcase_sync::{AutoApprove, SyncConfig, SyncOrchestrator};
//!
//! let config = SyncConfig::from_env()?;
//! let mut sync = SyncOrchestrator::from_config(&config)?;
//! sync.hydrate().await;
//! sync.publish(&mut AutoApprove).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod payload;
pub mod settings;
pub mod store;

pub use cache::{CacheError, FileStore, LocalStore, MemoryStore};
pub use config::{ConfigError, SyncConfig};
pub use error::{Result, SyncError};
pub use orchestrator::{
    AutoApprove, CancelReason, PublishGate, PublishOutcome, PublishStatus, PublishSummary,
    SyncOrchestrator, SyncStatus,
};
pub use payload::{PayloadReport, PayloadSize};
pub use settings::{AdminLocalConfig, PublicReadConfig, ResolvedSettings, SettingsSource};
pub use store::{DocumentStoreClient, StoreError};
