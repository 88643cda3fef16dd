//! Remote document store client.
//!
//! Reads and writes one hosted JSON document (JSONBin-style API):
//!
//! - `GET <endpoint>` returns the document, optionally wrapped in `record`
//! - `PUT <endpoint>` replaces it wholesale
//!
//! Every request carries `Content-Type: application/json` and
//! `X-Bin-Versioning: false`. Keys are presented as `X-Access-Key` or
//! `X-Master-Key`, negotiated per request (see [`credential`]).
//!
//! Fetch failures are expected (offline visitors, rotated keys) and come
//! back as `None`. Publish failures are the admin's problem to fix and come
//! back as [`StoreError`].

pub mod credential;
pub mod envelope;

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use showcase_core::AppData;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::payload::PayloadSize;

pub use credential::{CredentialAttempt, CredentialNegotiation, KeyHeader};
pub use envelope::{DocumentError, decode_document, decode_records};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when publishing to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The document could not be serialized.
    #[error("could not serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The store answered 413.
    #[error(
        "upload failed: payload too large ({size}) for the store's limit; \
         remove some images or use smaller ones"
    )]
    PayloadTooLarge { size: PayloadSize },

    /// Any other non-success status, after credential negotiation.
    #[error("upload failed: {status} {reason}{}", format_store_message(.message))]
    Rejected {
        status: u16,
        reason: String,
        message: Option<String>,
    },
}

#[allow(clippy::ref_option)] // thiserror hands us a reference to the field
fn format_store_message(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map_or_else(String::new, |m| format!(" ({m})"))
}

/// Error body shape used by the store.
#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    message: Option<String>,
}

/// Client for one document store.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct DocumentStoreClient {
    client: reqwest::Client,
}

impl DocumentStoreClient {
    /// Create a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(timeout: Duration) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        // Versioning would turn every publish into a new revision.
        headers.insert("X-Bin-Versioning", HeaderValue::from_static("false"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch the catalog document.
    ///
    /// With an empty key a single unauthenticated GET is sent. Otherwise the
    /// key goes out as `X-Access-Key` first and, on 401/403, once more as
    /// `X-Master-Key`.
    ///
    /// Returns `None` on any failure: network error, timeout, non-success
    /// status, unparsable body, or a body without a `products` array.
    #[instrument(skip(self, api_key), fields(endpoint = %endpoint))]
    pub async fn fetch_document(&self, endpoint: &str, api_key: &SecretString) -> Option<AppData> {
        let response = if api_key.expose_secret().is_empty() {
            self.send(Method::GET, endpoint, api_key, None, None).await
        } else {
            self.send_negotiated(
                Method::GET,
                endpoint,
                api_key,
                CredentialNegotiation::read(),
                None,
            )
            .await
        };

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Document fetch failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Document store rejected fetch");
            return None;
        }

        let body: JsonValue = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Document body is not JSON");
                return None;
            }
        };

        match decode_document(body) {
            Ok(document) => {
                debug!(
                    products = document.products.len(),
                    cases = document.cases.len(),
                    "Fetched document"
                );
                Some(document)
            }
            Err(e) => {
                warn!(error = %e, "Fetched body is not a catalog document");
                None
            }
        }
    }

    /// Replace the remote document with `data`.
    ///
    /// The key goes out as `X-Master-Key` first and, on 401/403, once more as
    /// `X-Access-Key`.
    ///
    /// # Errors
    ///
    /// - `StoreError::PayloadTooLarge` on 413, naming the body size in KB
    /// - `StoreError::Rejected` on any other non-success status, with the
    ///   store's `message` when the body carries one
    /// - `StoreError::Http` if the request could not be completed
    #[instrument(skip(self, api_key, data), fields(endpoint = %endpoint))]
    pub async fn publish_document(
        &self,
        endpoint: &str,
        api_key: &SecretString,
        data: &AppData,
    ) -> Result<(), StoreError> {
        let body = serde_json::to_string(data)?;
        let size = PayloadSize::of_body(&body);

        let response = self
            .send_negotiated(
                Method::PUT,
                endpoint,
                api_key,
                CredentialNegotiation::write(),
                Some(&body),
            )
            .await?;

        let status = response.status();
        if status.is_success() {
            info!(size = %size, "Published document");
            return Ok(());
        }

        if status == StatusCode::PAYLOAD_TOO_LARGE {
            warn!(size = %size, "Document store rejected payload as too large");
            return Err(StoreError::PayloadTooLarge { size });
        }

        let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
        let message = response
            .json::<StoreErrorBody>()
            .await
            .ok()
            .and_then(|b| b.message);

        warn!(status = %status, message = ?message, "Document store rejected publish");
        Err(StoreError::Rejected {
            status: status.as_u16(),
            reason,
            message,
        })
    }

    /// Send with header negotiation; returns the final response.
    async fn send_negotiated(
        &self,
        method: Method,
        endpoint: &str,
        api_key: &SecretString,
        mut negotiation: CredentialNegotiation,
        body: Option<&str>,
    ) -> Result<Response, reqwest::Error> {
        let mut response = self
            .send(
                method.clone(),
                endpoint,
                api_key,
                negotiation.current().header(),
                body,
            )
            .await?;

        while let Some(header) = negotiation.advance(response.status()).header() {
            debug!(
                status = %response.status(),
                retry_header = header.name(),
                "Key rejected, retrying with the other key header"
            );
            response = self
                .send(method.clone(), endpoint, api_key, Some(header), body)
                .await?;
        }

        Ok(response)
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        api_key: &SecretString,
        header: Option<KeyHeader>,
        body: Option<&str>,
    ) -> Result<Response, reqwest::Error> {
        let mut request = self.client.request(method, endpoint);
        if let Some(header) = header {
            request = request.header(header.name(), api_key.expose_secret());
        }
        if let Some(body) = body {
            request = request.body(body.to_owned());
        }
        request.send().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use showcase_core::defaults::default_catalog;
    use wiremock::matchers::{body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client() -> DocumentStoreClient {
        DocumentStoreClient::new(Duration::from_secs(5)).unwrap()
    }

    fn key(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    fn doc_json() -> JsonValue {
        json!({
            "products": [{"id": "p1", "name": "Camera", "category": "Hardware"}],
            "cases": [{"id": "c1", "title": "Mall"}],
            "lastUpdated": 1_700_000_000_000_i64
        })
    }

    async fn request_count(server: &MockServer) -> usize {
        server.received_requests().await.map_or(0, |r| r.len())
    }

    #[tokio::test]
    async fn test_fetch_with_access_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/b/X"))
            .and(header("X-Access-Key", "readKey"))
            .and(header("X-Bin-Versioning", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "record": doc_json(),
                "metadata": {"private": true}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let doc = client()
            .fetch_document(&format!("{}/b/X", server.uri()), &key("readKey"))
            .await
            .unwrap();

        assert_eq!(doc.products.len(), 1);
        assert_eq!(doc.cases.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_retries_with_master_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header_exists("X-Access-Key"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(header("X-Master-Key", "masterKey"))
            .respond_with(ResponseTemplate::new(200).set_body_json(doc_json()))
            .expect(1)
            .mount(&server)
            .await;

        let doc = client()
            .fetch_document(&format!("{}/b/X", server.uri()), &key("masterKey"))
            .await;

        assert!(doc.is_some());
    }

    #[tokio::test]
    async fn test_fetch_gives_up_after_two_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let doc = client()
            .fetch_document(&format!("{}/b/X", server.uri()), &key("wrong"))
            .await;

        assert!(doc.is_none());
        assert_eq!(request_count(&server).await, 2);
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let doc = client()
            .fetch_document(&format!("{}/b/X", server.uri()), &key("readKey"))
            .await;

        assert!(doc.is_none());
        assert_eq!(request_count(&server).await, 1);
    }

    #[tokio::test]
    async fn test_fetch_without_key_is_unauthenticated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(doc_json()))
            .mount(&server)
            .await;

        let doc = client()
            .fetch_document(&format!("{}/b/X", server.uri()), &key(""))
            .await;
        assert!(doc.is_some());

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("X-Access-Key"));
        assert!(!requests[0].headers.contains_key("X-Master-Key"));
    }

    #[tokio::test]
    async fn test_fetch_rejects_body_without_products() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"record": {"items": []}})))
            .mount(&server)
            .await;

        let doc = client()
            .fetch_document(&format!("{}/b/X", server.uri()), &key("readKey"))
            .await;
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn test_fetch_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let doc = client()
            .fetch_document(&format!("{}/b/X", server.uri()), &key("readKey"))
            .await;
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_returns_none() {
        // Nothing listens on port 9 (discard) in the test environment.
        let doc = client()
            .fetch_document("http://127.0.0.1:9/b/X", &key("readKey"))
            .await;
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn test_fetch_timeout_returns_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(doc_json())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let slow = DocumentStoreClient::new(Duration::from_millis(300)).unwrap();
        let doc = slow
            .fetch_document(&format!("{}/b/X", server.uri()), &key("readKey"))
            .await;

        assert!(doc.is_none());
        assert_eq!(request_count(&server).await, 1);
    }

    #[tokio::test]
    async fn test_publish_uses_master_key() {
        let server = MockServer::start().await;
        let data = default_catalog();
        Mock::given(method("PUT"))
            .and(path("/b/X"))
            .and(header("X-Master-Key", "masterKey"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(&data))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"record": {}})))
            .expect(1)
            .mount(&server)
            .await;

        client()
            .publish_document(&format!("{}/b/X", server.uri()), &key("masterKey"), &data)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_publish_retries_with_access_key() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(header_exists("X-Master-Key"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(header("X-Access-Key", "writeScopedAccessKey"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let result = client()
            .publish_document(
                &format!("{}/b/X", server.uri()),
                &key("writeScopedAccessKey"),
                &default_catalog(),
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_publish_too_large_names_size() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(413))
            .mount(&server)
            .await;

        let data = default_catalog();
        let expected = PayloadSize::of(&data).unwrap();

        let err = client()
            .publish_document(&format!("{}/b/X", server.uri()), &key("masterKey"), &data)
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::PayloadTooLarge { size } if size == expected));
        assert!(err.to_string().contains(&expected.to_string()));
        assert!(err.to_string().contains("KB"));
    }

    #[tokio::test]
    async fn test_publish_error_includes_store_message() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"message": "Bin not found"})),
            )
            .mount(&server)
            .await;

        let err = client()
            .publish_document(
                &format!("{}/b/X", server.uri()),
                &key("masterKey"),
                &default_catalog(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "upload failed: 400 Bad Request (Bin not found)");
    }

    #[tokio::test]
    async fn test_publish_auth_failure_after_both_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid key"})),
            )
            .mount(&server)
            .await;

        let err = client()
            .publish_document(
                &format!("{}/b/X", server.uri()),
                &key("readOnly"),
                &default_catalog(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Rejected { status: 401, .. }));
        assert!(err.to_string().contains("Invalid key"));
        assert_eq!(request_count(&server).await, 2);
    }

    #[tokio::test]
    async fn test_publish_error_without_body_uses_status_text() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client()
            .publish_document(
                &format!("{}/b/X", server.uri()),
                &key("masterKey"),
                &default_catalog(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "upload failed: 503 Service Unavailable");
    }

    #[test]
    fn test_format_store_message() {
        assert_eq!(format_store_message(&None), "");
        assert_eq!(format_store_message(&Some("  ".to_string())), "");
        assert_eq!(format_store_message(&Some("boom".to_string())), " (boom)");
    }
}
