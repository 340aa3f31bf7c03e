//! Deserializers that accept both the native and the legacy argument
//! encodings.
//!
//! Older histories store nested payloads as JSON-encoded strings
//! (`"addedComposition": "{\"name\":...}"`) and source id lists as a single
//! delimited string. Current output writes them natively.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Separator of source ids in the legacy single-string list encoding.
pub const SOURCE_ID_DELIMITER: char = ',';

/// A nested value given either natively or as a JSON-encoded string.
pub fn embedded<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => serde_json::from_str(&text)
            .map_err(|e| D::Error::custom(format!("malformed embedded payload: {e}"))),
        other => serde_json::from_value(other).map_err(D::Error::custom),
    }
}

/// A list of source ids given either as an array or a delimited string.
pub fn id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(split_ids(&text)),
        other => serde_json::from_value(other).map_err(D::Error::custom),
    }
}

fn split_ids(text: &str) -> Vec<String> {
    text.split(SOURCE_ID_DELIMITER)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
