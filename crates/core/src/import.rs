//! Bulk import validation.
//!
//! The admin editor accepts a pasted JSON array that replaces a whole
//! collection. Everything is checked before anything is returned, so a bad
//! import never leaves a collection half-replaced.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::types::{CaseStudy, Product};

/// Errors that can occur when validating an import.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The input is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level value is not an array.
    #[error("import data must be a JSON array")]
    NotAnArray,

    /// A required text field is missing or blank.
    #[error("entry {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    /// An entry has the right fields but the wrong shape.
    #[error("entry {index} is malformed: {source}")]
    Malformed {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Two entries share an id.
    #[error("duplicate id `{0}` in import")]
    DuplicateId(String),
}

/// Parse and validate a product import.
///
/// # Errors
///
/// Returns `ImportError` if the input is not a JSON array of products, if any
/// entry lacks a non-empty `id` or `name`, or if ids repeat.
pub fn parse_products(input: &str) -> Result<Vec<Product>, ImportError> {
    parse_records(input, &["id", "name"], |p: &Product| p.id.as_str())
}

/// Parse and validate a case study import.
///
/// # Errors
///
/// Returns `ImportError` if the input is not a JSON array of case studies, if
/// any entry lacks a non-empty `id` or `title`, or if ids repeat.
pub fn parse_cases(input: &str) -> Result<Vec<CaseStudy>, ImportError> {
    parse_records(input, &["id", "title"], |c: &CaseStudy| c.id.as_str())
}

fn parse_records<T, F>(
    input: &str,
    required: &[&'static str],
    id_of: F,
) -> Result<Vec<T>, ImportError>
where
    T: DeserializeOwned,
    F: Fn(&T) -> &str,
{
    let JsonValue::Array(entries) = serde_json::from_str::<JsonValue>(input)? else {
        return Err(ImportError::NotAnArray);
    };

    let mut records = Vec::with_capacity(entries.len());
    let mut seen = HashSet::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        for &field in required {
            let present = entry
                .get(field)
                .and_then(JsonValue::as_str)
                .is_some_and(|s| !s.trim().is_empty());
            if !present {
                return Err(ImportError::MissingField { index, field });
            }
        }

        let record: T = serde_json::from_value(entry)
            .map_err(|source| ImportError::Malformed { index, source })?;

        let id = id_of(&record).to_string();
        if !seen.insert(id.clone()) {
            return Err(ImportError::DuplicateId(id));
        }
        records.push(record);
    }

    Ok(records)
}
