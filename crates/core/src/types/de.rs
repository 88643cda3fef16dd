//! Tolerant field decoding for hand-edited documents.
//!
//! Remote documents and cached collections are edited outside this crate, so
//! display fields accept `null` and bare numbers instead of failing the whole
//! record. Serialization is unaffected.

use serde::de::{Error, Unexpected};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

fn scalar_text<E: Error>(value: JsonValue) -> Result<String, E> {
    match value {
        JsonValue::String(s) => Ok(s),
        JsonValue::Null => Ok(String::new()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        JsonValue::Array(_) => Err(E::invalid_type(Unexpected::Seq, &"a string")),
        JsonValue::Object(_) => Err(E::invalid_type(Unexpected::Map, &"a string")),
    }
}

/// A string, with `null` read as empty and numbers or booleans as their text.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_text(JsonValue::deserialize(deserializer)?)
}

/// A list of strings; `null` is an empty list.
pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match JsonValue::deserialize(deserializer)? {
        JsonValue::Null => Ok(Vec::new()),
        JsonValue::Array(items) => items.into_iter().map(scalar_text).collect(),
        JsonValue::String(s) => Err(D::Error::invalid_type(Unexpected::Str(&s), &"a list of strings")),
        _ => Err(D::Error::invalid_type(Unexpected::Other("scalar"), &"a list of strings")),
    }
}

/// Any `Default` value, with `null` read as the default.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
