//! Response body normalization.
//!
//! Some stores return `{"record": <document>, "metadata": {...}}`, others
//! the document itself. The envelope wins when present and non-null.

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use showcase_core::AppData;
use thiserror::Error;
use tracing::warn;

/// Field some stores wrap the document in.
pub const ENVELOPE_FIELD: &str = "record";

/// Why a response body was not accepted as a catalog document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document has no `products` array")]
    MissingProducts,
}

/// Strip the envelope, if any.
#[must_use]
pub fn unwrap_envelope(root: JsonValue) -> JsonValue {
    match root {
        JsonValue::Object(mut map) => match map.remove(ENVELOPE_FIELD) {
            Some(record) if !record.is_null() => record,
            Some(_) | None => JsonValue::Object(map),
        },
        other => other,
    }
}

/// Normalize a response body into a catalog document.
///
/// The only hard requirement is an array-typed `products` field. Records
/// that still do not decode are skipped with a warning, a missing or
/// non-array `cases` reads as empty, and a missing `lastUpdated` reads as 0.
///
/// # Errors
///
/// Returns `DocumentError::MissingProducts` if the unwrapped body has no
/// array-typed `products` field.
pub fn decode_document(root: JsonValue) -> Result<AppData, DocumentError> {
    let JsonValue::Object(mut document) = unwrap_envelope(root) else {
        return Err(DocumentError::MissingProducts);
    };

    let Some(JsonValue::Array(products)) = document.remove("products") else {
        return Err(DocumentError::MissingProducts);
    };

    let cases = match document.remove("cases") {
        Some(JsonValue::Array(cases)) => cases,
        None | Some(JsonValue::Null) => Vec::new(),
        Some(_) => {
            warn!("Ignoring non-array `cases` field");
            Vec::new()
        }
    };

    let last_updated = document
        .get("lastUpdated")
        .and_then(JsonValue::as_i64)
        .unwrap_or_default();

    Ok(AppData::new(
        decode_records(products, "product"),
        decode_records(cases, "case study"),
        last_updated,
    ))
}

/// Decode each entry on its own, dropping the ones that do not fit `T`.
pub fn decode_records<T: DeserializeOwned>(entries: Vec<JsonValue>, kind: &str) -> Vec<T> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let id = entry.get("id").map(ToString::to_string);
            match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(kind, index, id = id.as_deref(), error = %e, "Skipping unreadable record");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product(id: &str) -> JsonValue {
        json!({"id": id, "name": "Camera", "category": "Hardware"})
    }

    #[test]
    fn test_envelope_is_preferred() {
        let body = json!({
            "record": {"products": [product("p1")], "cases": [], "lastUpdated": 7},
            "metadata": {"id": "bin", "private": true}
        });
        let doc = decode_document(body).unwrap();
        assert_eq!(doc.products.len(), 1);
        assert_eq!(doc.last_updated, 7);
    }

    #[test]
    fn test_raw_document_is_accepted() {
        let body = json!({"products": [product("p1"), product("p2")], "cases": []});
        let doc = decode_document(body).unwrap();
        assert_eq!(doc.products.len(), 2);
    }

    #[test]
    fn test_null_envelope_falls_back_to_root() {
        let body = json!({"record": null, "products": [], "cases": []});
        assert!(decode_document(body).is_ok());
    }

    #[test]
    fn test_missing_products_rejected() {
        let err = decode_document(json!({"record": {"cases": []}})).unwrap_err();
        assert!(matches!(err, DocumentError::MissingProducts));
    }

    #[test]
    fn test_products_must_be_array() {
        let err = decode_document(json!({"products": {"p1": {}}})).unwrap_err();
        assert!(matches!(err, DocumentError::MissingProducts));
    }

    #[test]
    fn test_null_cases_become_empty() {
        let doc = decode_document(json!({"products": [], "cases": null})).unwrap();
        assert!(doc.cases.is_empty());
    }

    #[test]
    fn test_non_object_root_rejected() {
        assert!(decode_document(json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_numeric_price_is_kept_as_text() {
        let body = json!({"products": [
            product("p1"),
            {"id": "p2", "name": "NVR", "price": 1999}
        ]});
        let doc = decode_document(body).unwrap();
        assert_eq!(doc.products.len(), 2);
        assert_eq!(doc.products[1].price, "1999");
    }

    #[test]
    fn test_null_features_read_as_empty() {
        let body = json!({"products": [{"id": "p1", "name": "Camera", "features": null}]});
        let doc = decode_document(body).unwrap();
        assert!(doc.products[0].features.is_empty());
    }

    #[test]
    fn test_case_without_title_is_loaded() {
        let body = json!({"products": [], "cases": [{"id": "c1", "description": "Rollout"}]});
        let doc = decode_document(body).unwrap();
        assert_eq!(doc.cases.len(), 1);
        assert_eq!(doc.cases[0].title, "");
    }

    #[test]
    fn test_unreadable_record_is_skipped() {
        let body = json!({"products": [
            {"name": "no id"},
            {"id": "p2", "name": "Food", "category": "Food"},
            product("p3")
        ]});
        let doc = decode_document(body).unwrap();
        assert_eq!(doc.products.len(), 1);
        assert_eq!(doc.products[0].id.as_str(), "p3");
    }

    #[test]
    fn test_non_array_cases_read_as_empty() {
        let doc = decode_document(json!({"products": [product("p1")], "cases": "none"})).unwrap();
        assert_eq!(doc.products.len(), 1);
        assert!(doc.cases.is_empty());
    }
}
