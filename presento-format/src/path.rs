//! Dotted-path resolution into nested records
//!
//! A path such as `projects.0.name` walks mapping keys and sequence indices.
//! Resolution never fails: a missing key, an out-of-range index or an attempt
//! to descend into a scalar yields `None`, which callers surface as `null`.

use serde_json::Value;
use smallvec::SmallVec;

/// Segment separator inside a path
pub const PATH_SEPARATOR: char = '.';

/// Path that addresses the whole record
pub const WHOLE_RECORD: &str = ".";

/// Split a path into its non-empty segments
///
/// `""` and `"."` both produce no segments and therefore address the whole record.
pub fn segments(path: &str) -> SmallVec<[&str; 8]> {
    path.split(PATH_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Resolve `path` against `record`, borrowing the target value
pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    if record.is_null() {
        return None;
    }

    let mut current = record;
    for segment in segments(path) {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(sequence_index(segment)?)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Index addressed by `segment`, if it is a canonical decimal integer
///
/// `"+1"` and `"01"` are keys, not indices, so they miss on sequences.
fn sequence_index(segment: &str) -> Option<usize> {
    let canonical = segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if !canonical {
        return None;
    }
    segment.parse().ok()
}

/// Resolve `path` against `record`, returning `null` on any miss
pub fn resolve(record: &Value, path: &str) -> Value {
    lookup(record, path).cloned().unwrap_or(Value::Null)
}
