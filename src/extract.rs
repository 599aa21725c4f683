//! Request data normalization.
//!
//! Adapters that read raw framework requests funnel everything through here:
//! query strings and form bodies become key/value pair lists, multi-valued
//! keys collapse to scalars or ordered sequences, and the three sources merge
//! under a fixed precedence.

use serde_json::Value;

/// The normalized field mapping a request reduces to.
///
/// Insertion order is preserved (`serde_json` is built with `preserve_order`)
/// so error detection order and merge precedence stay deterministic.
pub type RawData = serde_json::Map<String, Value>;

/// Parse a urlencoded query or form string into its raw pairs, duplicates
/// included.
pub fn parse_pairs(input: &str) -> Result<Vec<(String, String)>, serde_urlencoded::de::Error> {
    serde_urlencoded::from_str(input)
}

/// Collapse repeated keys: exactly one value stays a scalar, more than one
/// becomes an ordered sequence.
pub fn collapse(pairs: Vec<(String, String)>) -> RawData {
    let mut data = RawData::new();
    for (key, value) in pairs {
        let value = Value::String(value);
        match data.get_mut(&key) {
            None => {
                data.insert(key, value);
            }
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }
    data
}

/// Overlay `layer` onto `base`, overwriting colliding keys.
///
/// Callers apply layers lowest-priority first: query parameters, then form
/// fields, then the JSON body, so a field present in several sources takes
/// the JSON body's value.
pub fn overlay(base: &mut RawData, layer: RawData) {
    for (key, value) in layer {
        base.insert(key, value);
    }
}
