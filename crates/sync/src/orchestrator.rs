//! Session state and the load/mutate/publish flow.
//!
//! [`SyncOrchestrator`] owns the in-memory catalog for one session. It
//! hydrates from the remote document (falling back to the local cache),
//! mirrors every admin mutation into the cache, and runs the guarded publish
//! flow through a [`PublishGate`].
//!
//! Everything that touches state takes `&mut self`, so a fetch and a publish
//! can never overlap within a session.

use serde_json::Value as JsonValue;
use showcase_core::import::{parse_cases, parse_products};
use showcase_core::{AppData, CaseStudy, CaseStudyId, CloudSettings, Product, ProductId};
use tracing::{debug, info, instrument, warn};

use crate::cache::{CASES_KEY, CacheError, FileStore, LocalStore, PRODUCTS_KEY};
use crate::config::{SyncConfig, validate_endpoint};
use crate::error::{Result, SyncError};
use crate::payload::{PayloadReport, PayloadSize};
use crate::settings::{AdminLocalConfig, PublicReadConfig, SettingsSource, resolve};
use crate::store::{DocumentStoreClient, decode_records};

/// Default size above which a publish needs explicit confirmation.
pub const DEFAULT_PUBLISH_WARN_KB: f64 = 500.0;

/// How many records the large-payload report lists.
const HEAVIEST_RECORDS: usize = 5;

// =============================================================================
// Status
// =============================================================================

/// Startup load progress. Terminal once `Synced` or `FallbackToCache`;
/// later hydrate calls in the same session are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Uninitialized,
    Fetching,
    /// The remote document was adopted.
    Synced,
    /// Data came from the local cache or the built-in catalog.
    FallbackToCache,
}

/// Publish progress. Returns to `Publishing` on the next attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStatus {
    Idle,
    Publishing,
    Published,
    Failed,
    Cancelled,
}

/// Which confirmation the admin declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    LargePayload,
    EndpointMismatch,
    NotConfirmed,
}

/// Result of a publish that did not error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Published { endpoint: String, size: PayloadSize },
    Cancelled(CancelReason),
}

/// What is about to be overwritten, for the final confirmation.
#[derive(Debug, Clone)]
pub struct PublishSummary {
    pub endpoint: String,
    pub products: usize,
    pub cases: usize,
    pub size: PayloadSize,
}

// =============================================================================
// PublishGate
// =============================================================================

/// Admin confirmations asked during [`SyncOrchestrator::publish`].
///
/// Returning `false` from any method cancels the publish.
pub trait PublishGate {
    /// The payload is above the warning threshold.
    fn confirm_large_payload(&mut self, report: &PayloadReport, threshold_kb: f64) -> bool;

    /// The admin endpoint is not the one visitors read from, so visitors
    /// will not see this publish.
    fn acknowledge_endpoint_mismatch(&mut self, admin: &CloudSettings, public: &CloudSettings) -> bool;

    /// Last chance before the remote document is replaced.
    fn confirm_overwrite(&mut self, summary: &PublishSummary) -> bool;
}

/// Accepts every prompt. For `--yes` and scripted use.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

impl PublishGate for AutoApprove {
    fn confirm_large_payload(&mut self, _report: &PayloadReport, _threshold_kb: f64) -> bool {
        true
    }

    fn acknowledge_endpoint_mismatch(&mut self, _admin: &CloudSettings, _public: &CloudSettings) -> bool {
        true
    }

    fn confirm_overwrite(&mut self, _summary: &PublishSummary) -> bool {
        true
    }
}

// =============================================================================
// SyncOrchestrator
// =============================================================================

/// One session's catalog state.
pub struct SyncOrchestrator<S: LocalStore> {
    store: S,
    client: DocumentStoreClient,
    public: PublicReadConfig,
    publish_warn_kb: f64,
    products: Vec<Product>,
    cases: Vec<CaseStudy>,
    last_updated: i64,
    sync_status: SyncStatus,
    publish_status: PublishStatus,
}

impl SyncOrchestrator<FileStore> {
    /// Build a file-backed orchestrator from runtime configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        let client = DocumentStoreClient::new(config.fetch_timeout)?;
        Ok(
            Self::new(FileStore::new(&config.data_dir), client, config.public.clone())
                .with_publish_threshold(config.publish_warn_kb),
        )
    }
}

impl<S: LocalStore> SyncOrchestrator<S> {
    /// Start with the built-in catalog. Call [`hydrate`](Self::hydrate) next.
    #[must_use]
    pub fn new(store: S, client: DocumentStoreClient, public: PublicReadConfig) -> Self {
        let defaults = showcase_core::defaults::default_catalog();
        Self {
            store,
            client,
            public,
            publish_warn_kb: DEFAULT_PUBLISH_WARN_KB,
            products: defaults.products,
            cases: defaults.cases,
            last_updated: defaults.last_updated,
            sync_status: SyncStatus::Uninitialized,
            publish_status: PublishStatus::Idle,
        }
    }

    #[must_use]
    pub fn with_publish_threshold(mut self, kb: f64) -> Self {
        self.publish_warn_kb = kb;
        self
    }

    // -------------------------------------------------------------------------
    // Startup
    // -------------------------------------------------------------------------

    /// Load the catalog for this session.
    ///
    /// Tries the remote document first when the resolved settings allow it;
    /// a fetched document replaces both collections and is written to the
    /// cache. Otherwise each collection is read from the cache on its own,
    /// and one that is missing or unreadable keeps its current value.
    #[instrument(skip(self))]
    pub async fn hydrate(&mut self) -> SyncStatus {
        if self.is_hydrated() {
            debug!(status = ?self.sync_status, "Already hydrated");
            return self.sync_status;
        }

        let resolved = resolve(&self.store, &self.public);

        if resolved.settings.is_usable() {
            self.sync_status = SyncStatus::Fetching;
            debug!(source = ?resolved.source, "Fetching remote catalog");

            let fetched = self
                .client
                .fetch_document(resolved.settings.endpoint_url.trim(), &resolved.settings.api_key)
                .await;

            if let Some(document) = fetched {
                self.adopt(document);
                let admin_override = resolved.source == SettingsSource::AdminOverride;
                info!(
                    products = self.products.len(),
                    cases = self.cases.len(),
                    admin_override,
                    "Synced with remote catalog"
                );
                self.sync_status = SyncStatus::Synced;
                return self.sync_status;
            }
        } else {
            debug!("Cloud sync disabled, using local data");
        }

        self.hydrate_from_cache()
    }

    /// Load from the local cache only, without contacting the store.
    ///
    /// Editing sessions use this so unpublished local edits are not replaced
    /// by the remote document.
    pub fn hydrate_from_cache(&mut self) -> SyncStatus {
        if self.is_hydrated() {
            return self.sync_status;
        }
        self.load_cached();
        self.sync_status = SyncStatus::FallbackToCache;
        self.sync_status
    }

    const fn is_hydrated(&self) -> bool {
        matches!(self.sync_status, SyncStatus::Synced | SyncStatus::FallbackToCache)
    }

    fn adopt(&mut self, document: AppData) {
        self.products = document.products;
        self.cases = document.cases;
        self.last_updated = document.last_updated;

        if let Err(e) = self.persist_products() {
            warn!(error = %e, "Could not cache fetched products");
        }
        if let Err(e) = self.persist_cases() {
            warn!(error = %e, "Could not cache fetched cases");
        }
    }

    fn load_cached(&mut self) {
        match self.store.get_json::<Vec<JsonValue>>(PRODUCTS_KEY) {
            Ok(Some(entries)) => self.products = decode_records(entries, "product"),
            Ok(None) => debug!("No cached products"),
            Err(e) => warn!(error = %e, "Ignoring unreadable cached products"),
        }
        match self.store.get_json::<Vec<JsonValue>>(CASES_KEY) {
            Ok(Some(entries)) => self.cases = decode_records(entries, "case study"),
            Ok(None) => debug!("No cached cases"),
            Err(e) => warn!(error = %e, "Ignoring unreadable cached cases"),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn cases(&self) -> &[CaseStudy] {
        &self.cases
    }

    /// Publish time of the adopted or last published document (epoch ms).
    #[must_use]
    pub const fn last_updated(&self) -> i64 {
        self.last_updated
    }

    #[must_use]
    pub const fn sync_status(&self) -> SyncStatus {
        self.sync_status
    }

    #[must_use]
    pub const fn publish_status(&self) -> PublishStatus {
        self.publish_status
    }

    #[must_use]
    pub const fn public_config(&self) -> &PublicReadConfig {
        &self.public
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The full document as it would be published.
    #[must_use]
    pub fn snapshot(&self) -> AppData {
        AppData::new(self.products.clone(), self.cases.clone(), self.last_updated)
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    /// A placeholder record with a fresh id, not yet added.
    #[must_use]
    pub fn new_product() -> Product {
        Product::placeholder()
    }

    /// Append a product.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::DuplicateProduct` if the id is taken, or a cache
    /// error if the collection cannot be persisted.
    pub fn add_product(&mut self, product: Product) -> Result<()> {
        if self.products.iter().any(|p| p.id == product.id) {
            return Err(SyncError::DuplicateProduct(product.id));
        }
        debug!(id = %product.id, "Adding product");
        self.products.push(product);
        self.persist_products()?;
        Ok(())
    }

    /// Replace the product with the same id.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::ProductNotFound` if no product has that id, or a
    /// cache error if the collection cannot be persisted.
    pub fn update_product(&mut self, product: Product) -> Result<()> {
        let slot = self
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| SyncError::ProductNotFound(product.id.clone()))?;
        *slot = product;
        self.persist_products()?;
        Ok(())
    }

    /// Remove a product and return it.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::ProductNotFound` if no product has that id, or a
    /// cache error if the collection cannot be persisted.
    pub fn delete_product(&mut self, id: &ProductId) -> Result<Product> {
        let index = self
            .products
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| SyncError::ProductNotFound(id.clone()))?;
        let removed = self.products.remove(index);
        debug!(id = %id, "Deleted product");
        self.persist_products()?;
        Ok(removed)
    }

    /// Replace every product with a validated JSON array.
    ///
    /// Returns the number of imported products.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Import` without touching state if the input is
    /// rejected, or a cache error if the collection cannot be persisted.
    pub fn import_products(&mut self, json: &str) -> Result<usize> {
        let products = parse_products(json)?;
        let count = products.len();
        self.products = products;
        info!(count, "Imported products");
        self.persist_products()?;
        Ok(count)
    }

    /// Products as a pretty JSON array that `import_products` accepts.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Serialize` if serialization fails.
    pub fn export_products(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.products)?)
    }

    // -------------------------------------------------------------------------
    // Case studies
    // -------------------------------------------------------------------------

    /// A placeholder record with a fresh id, not yet added.
    #[must_use]
    pub fn new_case_study() -> CaseStudy {
        CaseStudy::placeholder()
    }

    /// Append a case study.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::DuplicateCaseStudy` if the id is taken, or a cache
    /// error if the collection cannot be persisted.
    pub fn add_case_study(&mut self, case: CaseStudy) -> Result<()> {
        if self.cases.iter().any(|c| c.id == case.id) {
            return Err(SyncError::DuplicateCaseStudy(case.id));
        }
        debug!(id = %case.id, "Adding case study");
        self.cases.push(case);
        self.persist_cases()?;
        Ok(())
    }

    /// Replace the case study with the same id.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::CaseStudyNotFound` if no case study has that id,
    /// or a cache error if the collection cannot be persisted.
    pub fn update_case_study(&mut self, case: CaseStudy) -> Result<()> {
        let slot = self
            .cases
            .iter_mut()
            .find(|c| c.id == case.id)
            .ok_or_else(|| SyncError::CaseStudyNotFound(case.id.clone()))?;
        *slot = case;
        self.persist_cases()?;
        Ok(())
    }

    /// Remove a case study and return it.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::CaseStudyNotFound` if no case study has that id,
    /// or a cache error if the collection cannot be persisted.
    pub fn delete_case_study(&mut self, id: &CaseStudyId) -> Result<CaseStudy> {
        let index = self
            .cases
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| SyncError::CaseStudyNotFound(id.clone()))?;
        let removed = self.cases.remove(index);
        debug!(id = %id, "Deleted case study");
        self.persist_cases()?;
        Ok(removed)
    }

    /// Replace every case study with a validated JSON array.
    ///
    /// Returns the number of imported case studies.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Import` without touching state if the input is
    /// rejected, or a cache error if the collection cannot be persisted.
    pub fn import_cases(&mut self, json: &str) -> Result<usize> {
        let cases = parse_cases(json)?;
        let count = cases.len();
        self.cases = cases;
        info!(count, "Imported case studies");
        self.persist_cases()?;
        Ok(count)
    }

    /// Case studies as a pretty JSON array that `import_cases` accepts.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Serialize` if serialization fails.
    pub fn export_cases(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.cases)?)
    }

    /// The whole document as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Serialize` if serialization fails.
    pub fn export_all(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    fn persist_products(&mut self) -> std::result::Result<(), CacheError> {
        self.store.set_json(PRODUCTS_KEY, &self.products)
    }

    fn persist_cases(&mut self) -> std::result::Result<(), CacheError> {
        self.store.set_json(CASES_KEY, &self.cases)
    }

    // -------------------------------------------------------------------------
    // Admin settings
    // -------------------------------------------------------------------------

    /// The stored admin settings, or disabled settings if none are stored.
    ///
    /// # Errors
    ///
    /// Returns a cache error if the stored entry cannot be read or parsed.
    pub fn admin_settings(&self) -> Result<AdminLocalConfig> {
        Ok(AdminLocalConfig::load(&self.store)?.unwrap_or_default())
    }

    /// Validate and store the admin settings.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Config` if the settings are enabled with an
    /// endpoint that is not an http(s) URL, or a cache error if they cannot
    /// be stored.
    pub fn save_admin_settings(&mut self, settings: CloudSettings) -> Result<()> {
        if settings.enabled {
            validate_endpoint(&settings.endpoint_url)?;
        }
        AdminLocalConfig::new(settings).save(&mut self.store)?;
        info!("Saved admin settings");
        Ok(())
    }

    /// Drop the admin settings so the public config governs loads again.
    ///
    /// # Errors
    ///
    /// Returns a cache error if the entry cannot be removed.
    pub fn clear_admin_settings(&mut self) -> Result<()> {
        AdminLocalConfig::clear(&mut self.store)?;
        info!("Cleared admin settings");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Publish
    // -------------------------------------------------------------------------

    /// Replace the remote document with the current catalog.
    ///
    /// Asks `gate`, in order: to confirm a payload above the warning
    /// threshold, to acknowledge an admin endpoint that differs from the
    /// public one, and to confirm the overwrite. Any refusal cancels without
    /// a request.
    ///
    /// # Errors
    ///
    /// - `SyncError::NotConfigured` if the admin settings are missing,
    ///   unreadable, disabled or have no endpoint
    /// - `SyncError::Store` with the store's failure, unchanged
    #[instrument(skip(self, gate))]
    pub async fn publish<G>(&mut self, gate: &mut G) -> Result<PublishOutcome>
    where
        G: PublishGate + ?Sized,
    {
        // Same reading as `resolve`: an unreadable entry is no override.
        let admin = match AdminLocalConfig::load(&self.store) {
            Ok(admin) => admin.unwrap_or_default().into_inner(),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable admin settings");
                return Err(SyncError::NotConfigured);
            }
        };
        if !admin.is_usable() {
            return Err(SyncError::NotConfigured);
        }

        let data = AppData::stamped(self.products.clone(), self.cases.clone());
        let report = PayloadReport::build(&data, HEAVIEST_RECORDS)?;

        if report.size.exceeds_kb(self.publish_warn_kb) {
            warn!(size = %report.size, threshold_kb = self.publish_warn_kb, "Large publish payload");
            if !gate.confirm_large_payload(&report, self.publish_warn_kb) {
                return Ok(self.cancel(CancelReason::LargePayload));
            }
        }

        let public = self.public.settings();
        if !admin.targets_same_document(public) {
            warn!(
                admin_endpoint = admin.normalized_endpoint(),
                public_endpoint = public.normalized_endpoint(),
                "Admin endpoint differs from the public endpoint"
            );
            if !gate.acknowledge_endpoint_mismatch(&admin, public) {
                return Ok(self.cancel(CancelReason::EndpointMismatch));
            }
        }

        let endpoint = admin.endpoint_url.trim().to_string();
        let summary = PublishSummary {
            endpoint: endpoint.clone(),
            products: data.products.len(),
            cases: data.cases.len(),
            size: report.size,
        };
        if !gate.confirm_overwrite(&summary) {
            return Ok(self.cancel(CancelReason::NotConfirmed));
        }

        self.publish_status = PublishStatus::Publishing;
        match self.client.publish_document(&endpoint, &admin.api_key, &data).await {
            Ok(()) => {
                self.last_updated = data.last_updated;
                self.publish_status = PublishStatus::Published;
                Ok(PublishOutcome::Published {
                    endpoint,
                    size: report.size,
                })
            }
            Err(e) => {
                self.publish_status = PublishStatus::Failed;
                Err(e.into())
            }
        }
    }

    fn cancel(&mut self, reason: CancelReason) -> PublishOutcome {
        info!(reason = ?reason, "Publish cancelled");
        self.publish_status = PublishStatus::Cancelled;
        PublishOutcome::Cancelled(reason)
    }
}
