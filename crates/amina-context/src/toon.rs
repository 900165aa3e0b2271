//! TOON (token-oriented object notation) encoding.
//!
//! The layout itself comes from the `toon-format` crate. This module only
//! prepares the JSON value: audit metadata is removed at every depth before
//! the value is handed to the encoder.

use serde_json::Value;

use crate::ContextError;

/// Audit metadata dropped from every object before encoding.
pub const AUDIT_KEYS: &[&str] = &["createdAt", "updatedAt"];

/// Remove `keys` from every object in `value`, recursively.
pub fn elide_keys(value: &mut Value, keys: &[&str]) {
    match value {
        Value::Object(map) => {
            map.retain(|k, _| !keys.contains(&k.as_str()));
            for child in map.values_mut() {
                elide_keys(child, keys);
            }
        }
        Value::Array(items) => {
            for item in items {
                elide_keys(item, keys);
            }
        }
        _ => {}
    }
}

/// Encode a JSON value as TOON text with audit keys elided.
pub fn encode_value(value: &Value) -> Result<String, ContextError> {
    let mut value = value.clone();
    elide_keys(&mut value, AUDIT_KEYS);
    toon_format::encode_default(&value).map_err(|e| ContextError::Encode(e.to_string()))
}
