//! Error types for sync operations.

use showcase_core::{CaseStudyId, ImportError, ProductId};
use thiserror::Error;

use crate::cache::CacheError;
use crate::config::ConfigError;
use crate::store::StoreError;

/// Errors surfaced to the admin by the orchestrator.
///
/// Visitor-facing load failures never become a `SyncError`; they fall back
/// to the local cache instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Publishing needs enabled admin settings with an endpoint.
    #[error("cloud sync is not configured: set an endpoint URL and key in the admin settings")]
    NotConfigured,

    /// The document store rejected or never received the publish.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The local cache could not be read or written.
    #[error("local cache error: {0}")]
    Cache(#[from] CacheError),

    /// Settings failed validation.
    #[error("invalid settings: {0}")]
    Config(#[from] ConfigError),

    /// An import was rejected; nothing was changed.
    #[error("import rejected: {0}")]
    Import(#[from] ImportError),

    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("case study not found: {0}")]
    CaseStudyNotFound(CaseStudyId),

    #[error("a product with id {0} already exists")]
    DuplicateProduct(ProductId),

    #[error("a case study with id {0} already exists")]
    DuplicateCaseStudy(CaseStudyId),

    /// Export or size measurement could not serialize the catalog.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
