//! Integration tests for Showcase sync.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p showcase-integration-tests
//! ```
//!
//! No external services are needed: [`MockDocumentStore`] serves stateful
//! documents ("bins") from a local `wiremock` server that enforces the same
//! key rules as the hosted store.
//!
//! # Test Categories
//!
//! - `sync_round_trip` - Publish then fetch through both key headers
//! - `staging_divergence` - Admin and public endpoints pointing at different bins
//! - `cache_fallback` - File-backed cache when the store is unreachable

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde_json::{Value as JsonValue, json};
use showcase_core::CloudSettings;
use showcase_sync::{
    AdminLocalConfig, DocumentStoreClient, LocalStore, MemoryStore, PublicReadConfig,
    SyncOrchestrator,
};
use wiremock::matchers::path;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Read-scoped key; only valid in `X-Access-Key`.
pub const READ_KEY: &str = "$2a$10$visitor.read.access.key";

/// Full-access key; only valid in `X-Master-Key`.
pub const MASTER_KEY: &str = "$2a$10$admin.master.key";

/// Upload limit enforced by every mock bin.
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024;

const TIMEOUT: Duration = Duration::from_secs(5);

// =============================================================================
// Mock store
// =============================================================================

/// A local stand-in for the hosted document store.
pub struct MockDocumentStore {
    server: MockServer,
}

impl MockDocumentStore {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Create an empty bin at `/b/<id>`.
    pub async fn create_bin(&self, id: &str) -> HostedDocument {
        let bin = HostedDocument {
            url: format!("{}/b/{id}", self.server.uri()),
            state: Arc::new(Mutex::new(None)),
        };
        Mock::given(path(format!("/b/{id}")))
            .respond_with(bin.clone())
            .mount(&self.server)
            .await;
        bin
    }

    /// Number of requests the store has received so far.
    pub async fn request_count(&self) -> usize {
        self.server.received_requests().await.map_or(0, |r| r.len())
    }
}

/// One stored document and the URL that serves it.
#[derive(Clone)]
pub struct HostedDocument {
    url: String,
    state: Arc<Mutex<Option<JsonValue>>>,
}

impl HostedDocument {
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The stored document, if any has been written.
    #[must_use]
    pub fn document(&self) -> Option<JsonValue> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the stored document directly.
    pub fn seed(&self, document: JsonValue) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = Some(document);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Reader,
    Owner,
}

fn role_of(request: &Request) -> Option<Role> {
    let header = |name: &str| {
        request
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };
    if header("X-Master-Key").as_deref() == Some(MASTER_KEY) {
        return Some(Role::Owner);
    }
    if header("X-Access-Key").as_deref() == Some(READ_KEY) {
        return Some(Role::Reader);
    }
    None
}

fn error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "message": message }))
}

impl Respond for HostedDocument {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Some(role) = role_of(request) else {
            return error(401, "X-Master-Key or X-Access-Key is invalid");
        };

        match request.method.as_str() {
            "GET" => match self.document() {
                Some(record) => ResponseTemplate::new(200).set_body_json(json!({
                    "record": record,
                    "metadata": { "private": true }
                })),
                None => error(404, "Bin not found or it doesn't belong to your account"),
            },
            "PUT" => {
                if role != Role::Owner {
                    return error(403, "Access key does not have update permission");
                }
                if request.body.len() > MAX_UPLOAD_BYTES {
                    return error(413, "Request entity too large");
                }
                match serde_json::from_slice::<JsonValue>(&request.body) {
                    Ok(record) => {
                        self.seed(record.clone());
                        ResponseTemplate::new(200).set_body_json(json!({ "record": record }))
                    }
                    Err(_) => error(400, "Invalid JSON body"),
                }
            }
            _ => error(405, "Method not allowed"),
        }
    }
}

// =============================================================================
// Sessions
// =============================================================================

/// Public config pointing visitors at `document` with the read key.
#[must_use]
pub fn public_config(document: &HostedDocument) -> PublicReadConfig {
    PublicReadConfig::new(CloudSettings::new(document.url(), READ_KEY))
}

/// A store client with a short timeout.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn client() -> DocumentStoreClient {
    DocumentStoreClient::new(TIMEOUT).expect("HTTP client should build")
}

/// An anonymous visitor's session with an empty cache.
#[must_use]
pub fn visitor(public: &HostedDocument) -> SyncOrchestrator<MemoryStore> {
    SyncOrchestrator::new(MemoryStore::new(), client(), public_config(public))
}

/// An admin session publishing to `admin` with the master key, on `store`.
///
/// # Panics
///
/// Panics if the admin settings cannot be stored.
#[must_use]
#[allow(clippy::expect_used)]
pub fn admin<S: LocalStore>(
    mut store: S,
    admin: &HostedDocument,
    public: &HostedDocument,
) -> SyncOrchestrator<S> {
    AdminLocalConfig::new(CloudSettings::new(admin.url(), MASTER_KEY))
        .save(&mut store)
        .expect("admin settings should be stored");
    SyncOrchestrator::new(store, client(), public_config(public))
}
