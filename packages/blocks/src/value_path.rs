//! # Value Paths
//!
//! Get/set/remove over a nested value bag addressed by dotted paths.
//!
//! - `person.name` descends mappings by key
//! - `tags.0` indexes into an array. Array descent happens only when the
//!   current value actually is an array; on a mapping `0` is an ordinary key.
//! - `tags[]` on the last segment appends instead of assigning
//!
//! A value that is absent or `null` counts as missing. Writes create missing
//! intermediate containers: an array when the following segment is an
//! integer, a mapping otherwise.

use crate::error::{value_kind, PathError};
use serde_json::{Map, Value};

/// Data edited by field blocks, separate from the block tree
pub type ValueBag = Value;

const APPEND_MARKER: &str = "[]";

/// How many `null`s a single write may pad onto the end of an array
pub const MAX_ARRAY_PADDING: usize = 1024;

fn parse_index(segment: &str) -> Option<usize> {
    segment.parse::<usize>().ok()
}

fn split_append(segment: &str) -> (&str, bool) {
    match segment.strip_suffix(APPEND_MARKER) {
        Some(stripped) => (stripped, true),
        None => (segment, false),
    }
}

/// Resolve `path`, or `None` when any segment is missing
pub fn get_value<'a>(bag: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    let mut current = bag;
    for segment in path.split('.') {
        current = match current {
            Value::Array(items) => items.get(parse_index(segment)?)?,
            Value::Object(map) => map.get(segment)?,
            _ => return None,
        };
        if current.is_null() {
            return None;
        }
    }

    Some(current)
}

/// Resolve `path`, returning `default` when it is missing
pub fn get_value_or(bag: &Value, path: &str, default: Value) -> Value {
    get_value(bag, path).cloned().unwrap_or(default)
}

/// Write `value` at `path`, creating intermediate containers as needed.
///
/// A trailing `[]` on the last segment appends to the array stored there (or
/// starts one when nothing is stored yet).
pub fn set_value(bag: &mut Value, path: &str, value: Value) -> Result<(), PathError> {
    if path.is_empty() {
        return Err(PathError::EmptyPath);
    }
    if bag.is_null() {
        *bag = Value::Object(Map::new());
    }

    let segments: Vec<&str> = path.split('.').collect();
    let mut current = bag;

    for (i, raw) in segments.iter().enumerate() {
        let (segment, append) = split_append(raw);
        let slot = child_slot(current, segment)?;

        match segments.get(i + 1) {
            Some(next) => {
                if slot.is_null() {
                    let (next, _) = split_append(next);
                    *slot = if parse_index(next).is_some() {
                        Value::Array(Vec::new())
                    } else {
                        Value::Object(Map::new())
                    };
                }
                current = slot;
            }
            None => {
                if append && slot.is_array() {
                    if let Some(items) = slot.as_array_mut() {
                        items.push(value);
                    }
                } else if append && slot.is_null() {
                    *slot = Value::Array(vec![value]);
                } else {
                    *slot = value;
                }
                return Ok(());
            }
        }
    }

    Ok(())
}

/// Mutable slot for `segment` inside `container`, inserting `null` when absent
fn child_slot<'a>(container: &'a mut Value, segment: &str) -> Result<&'a mut Value, PathError> {
    match container {
        Value::Object(map) => Ok(map.entry(segment.to_string()).or_insert(Value::Null)),
        Value::Array(items) => {
            let invalid = || PathError::InvalidIndex {
                segment: segment.to_string(),
            };
            let index = parse_index(segment).ok_or_else(invalid)?;
            if index >= items.len() {
                if index - items.len() > MAX_ARRAY_PADDING {
                    return Err(invalid());
                }
                let len = index.checked_add(1).ok_or_else(invalid)?;
                items.resize(len, Value::Null);
            }
            items.get_mut(index).ok_or_else(invalid)
        }
        other => Err(PathError::NotAContainer {
            segment: segment.to_string(),
            found: value_kind(other),
        }),
    }
}

/// Delete and return the value at `path`. Array elements after a removed
/// index shift down.
pub fn remove_value(bag: &mut Value, path: &str) -> Option<Value> {
    let segments: Vec<&str> = path.split('.').collect();
    let (last, parents) = segments.split_last()?;
    if last.is_empty() {
        return None;
    }

    let mut current = bag;
    for segment in parents {
        current = match current {
            Value::Array(items) => items.get_mut(parse_index(segment)?)?,
            Value::Object(map) => map.get_mut(*segment)?,
            _ => return None,
        };
    }

    match current {
        Value::Object(map) => map.remove(*last),
        Value::Array(items) => {
            let index = parse_index(last)?;
            (index < items.len()).then(|| items.remove(index))
        }
        _ => None,
    }
}
