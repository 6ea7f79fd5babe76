//! Response shape normalization.
//!
//! Collection endpoints answer with a bare array, a `{results, count}`
//! envelope, a single object, or `null`. Everything is folded into a
//! [`Collection`]; records that cannot be decoded at all are dropped with a
//! warning instead of failing the whole response.

use log::warn;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::Collection;
use crate::models::wire::value_to_i64;

/// Fold any collection response shape into items and a total count.
///
/// `count` falls back to the number of items when the envelope has none.
pub fn normalize_collection(value: Value) -> Collection<Value> {
    match value {
        Value::Array(items) => Collection::from_items(items),
        Value::Object(mut map) if map.contains_key("results") => {
            let count = map
                .get("count")
                .and_then(value_to_i64)
                .and_then(|c| usize::try_from(c).ok());
            let items = match map.remove("results") {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(single) => vec![single],
            };
            let total_count = count.unwrap_or(items.len());
            Collection::new(items, total_count)
        }
        Value::Object(map) => Collection::from_items(vec![Value::Object(map)]),
        Value::Null => Collection::empty(),
        other => {
            warn!("Unexpected collection response shape: {}", other);
            Collection::empty()
        }
    }
}

/// Normalize and decode a collection through its wire type `R`.
///
/// Skipped records are subtracted from the total so counts stay consistent
/// with what can actually be shown.
pub fn decode_collection<R, T>(value: Value, resource: &str) -> Collection<T>
where
    R: DeserializeOwned,
    T: From<R>,
{
    let raw = normalize_collection(value);
    let mut skipped = 0usize;
    let items: Vec<T> = raw
        .items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<R>(item) {
            Ok(decoded) => Some(T::from(decoded)),
            Err(e) => {
                skipped += 1;
                warn!("Skipping malformed {} record: {}", resource, e);
                None
            }
        })
        .collect();
    let total_count = raw.total_count.saturating_sub(skipped).max(items.len());
    Collection::new(items, total_count)
}

/// Decode a single resource, falling back to the wire type's defaults
pub fn decode_single<R, T>(value: Value, resource: &str) -> T
where
    R: DeserializeOwned + Default,
    T: From<R>,
{
    let raw = match value {
        Value::Null => R::default(),
        other => serde_json::from_value::<R>(other).unwrap_or_else(|e| {
            warn!("Malformed {} response, using defaults: {}", resource, e);
            R::default()
        }),
    };
    T::from(raw)
}
