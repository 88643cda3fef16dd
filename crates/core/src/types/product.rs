//! Catalog products.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::ProductId;
use super::de;

/// Top-level product grouping shown on the public catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProductCategory {
    #[default]
    Hardware,
    Software,
    Service,
}

impl ProductCategory {
    /// All categories, in catalog display order.
    pub const ALL: [Self; 3] = [Self::Hardware, Self::Software, Self::Service];

    /// The category name as stored in the document.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hardware => "Hardware",
            Self::Software => "Software",
            Self::Service => "Service",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid category: {s} (expected Hardware, Software or Service)"))
    }
}

/// A product shown in the catalog.
///
/// Only `id` is required when reading a document. Text fields read `null` or
/// a bare number (a numeric `price`, say) as text, so one hand-edited record
/// does not make the document unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable identifier, never reused.
    pub id: ProductId,
    /// SKU or model number.
    #[serde(default, deserialize_with = "de::text")]
    pub model: String,
    #[serde(default, deserialize_with = "de::text")]
    pub name: String,
    #[serde(default, deserialize_with = "de::or_default")]
    pub category: ProductCategory,
    /// Free-form grouping inside the category (e.g. "IPC", "NVR").
    #[serde(default, deserialize_with = "de::text")]
    pub sub_category: String,
    /// Display price. Not parsed; shown exactly as entered.
    #[serde(default, deserialize_with = "de::text")]
    pub price: String,
    #[serde(default, deserialize_with = "de::text")]
    pub description: String,
    /// Marketing highlights.
    #[serde(default, deserialize_with = "de::text_list")]
    pub features: Vec<String>,
    /// Technical specifications.
    #[serde(default, deserialize_with = "de::text_list")]
    pub specs: Vec<String>,
    /// Remote URL or an embedded `data:` image.
    #[serde(default, deserialize_with = "de::text")]
    pub image_url: String,
    /// Link to an external brochure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brochure_url: Option<String>,
}

impl Product {
    /// A new editor record with placeholder content and a fresh id.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            id: ProductId::generate(),
            model: "NEW-MODEL-001".to_string(),
            name: "New product".to_string(),
            category: ProductCategory::Hardware,
            sub_category: "Uncategorized".to_string(),
            price: "¥0.00".to_string(),
            description: "Enter a product description...".to_string(),
            features: vec!["Highlight 1".to_string(), "Highlight 2".to_string()],
            specs: vec!["Spec 1".to_string(), "Spec 2".to_string()],
            image_url: "https://picsum.photos/600/400".to_string(),
            brochure_url: None,
        }
    }

    /// The brochure link, if one is set and non-empty.
    #[must_use]
    pub fn brochure(&self) -> Option<&str> {
        self.brochure_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_uses_camel_case_fields() {
        let mut product = Product::placeholder();
        product.brochure_url = Some("https://example.com/b.pdf".to_string());
        let value = serde_json::to_value(&product).unwrap();

        assert!(value.get("subCategory").is_some());
        assert!(value.get("imageUrl").is_some());
        assert!(value.get("brochureUrl").is_some());
        assert!(value.get("sub_category").is_none());
    }

    #[test]
    fn test_missing_brochure_is_omitted() {
        let product = Product::placeholder();
        let value = serde_json::to_value(&product).unwrap();
        assert!(value.get("brochureUrl").is_none());
    }

    #[test]
    fn test_minimal_product_deserializes() {
        let product: Product =
            serde_json::from_str(r#"{"id":"p1","name":"Camera","category":"Service"}"#).unwrap();
        assert_eq!(product.id.as_str(), "p1");
        assert_eq!(product.category, ProductCategory::Service);
        assert!(product.features.is_empty());
        assert_eq!(product.brochure(), None);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let result =
            serde_json::from_str::<Product>(r#"{"id":"p1","name":"Camera","category":"Food"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_hand_edited_fields_are_tolerated() {
        let product: Product = serde_json::from_str(
            r#"{"id":"p2","name":"NVR","price":1999,"features":null,"specs":["8 ch",4],"category":null}"#,
        )
        .unwrap();
        assert_eq!(product.price, "1999");
        assert!(product.features.is_empty());
        assert_eq!(product.specs, ["8 ch", "4"]);
        assert_eq!(product.category, ProductCategory::Hardware);
    }

    #[test]
    fn test_product_without_name_reads_as_blank() {
        let product: Product = serde_json::from_str(r#"{"id":"p3"}"#).unwrap();
        assert_eq!(product.name, "");
    }

    #[test]
    fn test_product_without_id_is_rejected() {
        assert!(serde_json::from_str::<Product>(r#"{"name":"Camera"}"#).is_err());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("software".parse::<ProductCategory>(), Ok(ProductCategory::Software));
        assert_eq!(" Service ".parse::<ProductCategory>(), Ok(ProductCategory::Service));
        assert!("Food".parse::<ProductCategory>().is_err());
    }

    #[test]
    fn test_empty_brochure_is_treated_as_absent() {
        let mut product = Product::placeholder();
        product.brochure_url = Some(String::new());
        assert_eq!(product.brochure(), None);
    }
}
