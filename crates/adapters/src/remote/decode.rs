//! Payload decoding for remote attribute values.
//!
//! Scalars and sets are plain JSON. Maps arrive either as a JSON object
//! (`{"k": ["v"]}`) or as a list of entries (`[{"key": "k", "value": ["v"]}]`);
//! both decode to the same ordered map.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, BTreeSet};
use storage_proxy_shared::{ErrorEnvelope, Result};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringListMapWire {
    Object(BTreeMap<String, Vec<String>>),
    Entries(Vec<MapEntry>),
}

#[derive(Debug, Deserialize)]
struct MapEntry {
    key: String,
    value: Vec<String>,
}

/// Decode a JSON payload into `T`, mapping failures to `remote:decode`.
pub fn decode_json<T: DeserializeOwned>(path: &str, payload: &[u8]) -> Result<T> {
    serde_json::from_slice(payload).map_err(|error| {
        ErrorEnvelope::decode(format!("failed to decode response from {path}: {error}"))
            .with_metadata("path", path)
            .with_metadata("expected", std::any::type_name::<T>())
    })
}

/// Decode a JSON array of strings into a set.
pub fn decode_string_set(path: &str, payload: &[u8]) -> Result<BTreeSet<String>> {
    let values: Vec<String> = decode_json(path, payload)?;
    Ok(values.into_iter().collect())
}

/// Decode either map encoding into an ordered map.
///
/// Repeated keys in the entry-list form have their values concatenated.
pub fn decode_string_list_map(path: &str, payload: &[u8]) -> Result<BTreeMap<String, Vec<String>>> {
    match decode_json::<StringListMapWire>(path, payload)? {
        StringListMapWire::Object(map) => Ok(map),
        StringListMapWire::Entries(entries) => {
            let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for entry in entries {
                map.entry(entry.key).or_default().extend(entry.value);
            }
            Ok(map)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage_proxy_shared::ErrorCode;

    #[test]
    fn scalars_decode_by_requested_type() -> Result<()> {
        assert!(decode_json::<bool>("p", b"true")?);
        assert_eq!(decode_json::<i32>("p", b"-3")?, -3);
        assert_eq!(decode_json::<i64>("p", b"10000000000")?, 10_000_000_000);
        Ok(())
    }

    #[test]
    fn wrong_shape_is_a_decode_error() {
        let error = decode_json::<bool>("storage_proxy/hinted_handoff_enabled", b"\"yes\"")
            .unwrap_err();
        assert_eq!(error.code, ErrorCode::decode());
        assert_eq!(
            error.metadata.get("path").map(String::as_str),
            Some("storage_proxy/hinted_handoff_enabled")
        );

        let overflow = decode_json::<i32>("p", b"4294967296").unwrap_err();
        assert_eq!(overflow.code, ErrorCode::decode());
    }

    #[test]
    fn sets_are_sorted_and_deduplicated() -> Result<()> {
        let set = decode_string_set("p", br#"["dc2", "dc1", "dc2"]"#)?;
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["dc1", "dc2"]);
        Ok(())
    }

    #[test]
    fn maps_decode_from_both_encodings() -> Result<()> {
        let object = decode_string_list_map("p", br#"{"3.0.1": ["node1", "node2"]}"#)?;
        let entries = decode_string_list_map(
            "p",
            br#"[{"key": "3.0.1", "value": ["node1"]}, {"key": "3.0.1", "value": ["node2"]}]"#,
        )?;
        assert_eq!(object, entries);
        assert_eq!(
            object.get("3.0.1"),
            Some(&vec!["node1".to_string(), "node2".to_string()])
        );
        Ok(())
    }

    #[test]
    fn empty_payloads_decode_to_empty_collections() -> Result<()> {
        assert!(decode_string_set("p", b"[]")?.is_empty());
        assert!(decode_string_list_map("p", b"{}")?.is_empty());
        assert!(decode_string_list_map("p", b"[]")?.is_empty());
        Ok(())
    }
}
