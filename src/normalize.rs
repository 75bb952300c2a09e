/// Unit normalization for raw STN records.
///
/// The STN service wraps some scalar fields in single-element lists and
/// represents missing values as empty lists. Downstream consumers want flat
/// scalar records, so this module collapses that convention:
///
///   [x] -> x
///   []  -> null
///   anything else -> unchanged
///
/// Lists of two or more elements have not been observed in provider data;
/// they are passed through untouched rather than truncated or flattened.

use serde_json::Value;

use crate::model::{NormalizedRecord, RawRecord};

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Collapses a single value per the list-of-one / list-of-zero convention.
pub fn normalize_value(value: &Value) -> Value {
    match value {
        Value::Array(items) if items.len() == 1 => items[0].clone(),
        Value::Array(items) if items.is_empty() => Value::Null,
        other => other.clone(),
    }
}

/// Normalizes every field of a record. Total over any record whose values
/// are scalars or lists of scalars; never fails, never mutates its input.
pub fn normalize_record(record: &RawRecord) -> NormalizedRecord {
    record
        .iter()
        .map(|(key, value)| (key.clone(), normalize_value(value)))
        .collect()
}

/// Normalizes an ordered sequence of records. Output order and length match
/// the input 1:1 — no record is dropped or reordered.
pub fn normalize_records(records: &[RawRecord]) -> Vec<NormalizedRecord> {
    records.iter().map(normalize_record).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
