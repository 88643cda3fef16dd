//! The catalog document.
//!
//! [`AppData`] is the unit of synchronization: it is stored as one JSON
//! document in the remote store and replaced in full on every publish.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CaseStudy, Product, ProductCategory};

/// Everything the public site renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    pub products: Vec<Product>,
    #[serde(default)]
    pub cases: Vec<CaseStudy>,
    /// Milliseconds since the Unix epoch at publish time.
    #[serde(default)]
    pub last_updated: i64,
}

impl AppData {
    /// Create a document with an explicit timestamp.
    #[must_use]
    pub const fn new(products: Vec<Product>, cases: Vec<CaseStudy>, last_updated: i64) -> Self {
        Self {
            products,
            cases,
            last_updated,
        }
    }

    /// Create a document stamped with the current time.
    #[must_use]
    pub fn stamped(products: Vec<Product>, cases: Vec<CaseStudy>) -> Self {
        Self::new(products, cases, Utc::now().timestamp_millis())
    }

    /// The publish time, if the document carries one.
    #[must_use]
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        if self.last_updated <= 0 {
            return None;
        }
        DateTime::from_timestamp_millis(self.last_updated)
    }

    /// Products in one category, in document order.
    pub fn products_in(&self, category: ProductCategory) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |p| p.category == category)
    }

    /// Whether the document holds no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.cases.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cases_and_timestamp_default() {
        let doc: AppData = serde_json::from_str(r#"{"products":[]}"#).unwrap();
        assert!(doc.cases.is_empty());
        assert_eq!(doc.last_updated, 0);
        assert!(doc.last_updated_at().is_none());
    }

    #[test]
    fn test_missing_products_is_rejected() {
        assert!(serde_json::from_str::<AppData>(r#"{"cases":[]}"#).is_err());
    }

    #[test]
    fn test_stamped_document_has_timestamp() {
        let doc = AppData::stamped(Vec::new(), Vec::new());
        assert!(doc.last_updated > 0);
        assert!(doc.last_updated_at().is_some());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_serialized_field_names() {
        let doc = AppData::new(Vec::new(), Vec::new(), 42);
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["lastUpdated"], 42);
        assert!(value["products"].is_array());
        assert!(value["cases"].is_array());
    }
}
