//! Customer case studies.

use serde::{Deserialize, Serialize};

use super::CaseStudyId;
use super::de;

/// A customer success story shown below the catalog.
///
/// Only `id` is required when reading a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    pub id: CaseStudyId,
    #[serde(default, deserialize_with = "de::text")]
    pub title: String,
    #[serde(default, deserialize_with = "de::text")]
    pub description: String,
    #[serde(default, deserialize_with = "de::text")]
    pub image_url: String,
    /// Link to the full write-up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
}

impl CaseStudy {
    /// A new editor record with placeholder content and a fresh id.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            id: CaseStudyId::generate(),
            title: "New case study".to_string(),
            description: "Case description...".to_string(),
            image_url: "https://picsum.photos/600/300".to_string(),
            link_url: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_case_without_title_reads_as_blank() {
        let case: CaseStudy =
            serde_json::from_str(r#"{"id":"c1","description":null,"linkUrl":null}"#).unwrap();
        assert_eq!(case.title, "");
        assert_eq!(case.description, "");
        assert_eq!(case.link_url, None);
    }

    #[test]
    fn test_case_link_is_omitted_when_absent() {
        let value = serde_json::to_value(CaseStudy::placeholder()).unwrap();
        assert!(value.get("linkUrl").is_none());
        assert!(value.get("imageUrl").is_some());
    }
}
