//! Depth-capped normalization of event data
//!
//! Outgoing event data must be plain JSON with bounded nesting. Values nested
//! deeper than [`MAX_DEPTH`] mapping/sequence levels are replaced with
//! [`DEPTH_MARKER`]. This is a depth cap, not cycle detection; the cap alone
//! guarantees termination.

use serde_json::{Map, Value};

/// Maximum nesting level before a subtree is cut off.
pub const MAX_DEPTH: usize = 10;

/// Sentinel substituted for subtrees past the depth cap.
pub const DEPTH_MARKER: &str = "<recursion too deep>";

/// Normalize every entry of a mapping iterated at nesting `level`.
///
/// The top-level event data map is level 0, so a value buried under eleven
/// nested mappings becomes the sentinel. Pure function.
pub fn normalize_map(map: &Map<String, Value>, level: usize) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), normalize_entry(value, level)))
        .collect()
}

/// Normalize a single value found at nesting `level`.
///
/// Primitives pass through unchanged; mappings and sequences recurse one
/// level deeper while `level < MAX_DEPTH`, and become the sentinel otherwise.
pub fn normalize_entry(value: &Value, level: usize) -> Value {
    match value {
        Value::Object(inner) => {
            if level < MAX_DEPTH {
                Value::Object(normalize_map(inner, level + 1))
            } else {
                Value::String(DEPTH_MARKER.to_string())
            }
        }
        Value::Array(items) => {
            if level < MAX_DEPTH {
                Value::Array(
                    items
                        .iter()
                        .map(|item| normalize_entry(item, level + 1))
                        .collect(),
                )
            } else {
                Value::String(DEPTH_MARKER.to_string())
            }
        }
        primitive => primitive.clone(),
    }
}
