/// Core data types for the STN / NFHL client.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond trivial accessors, no I/O, and no HTTP — only
/// types and the crate error taxonomy.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// A raw record as returned by the STN service: field name to scalar, or to a
/// list that in practice holds zero or one scalar.
pub type RawRecord = Map<String, Value>;

/// A flattened record: one-element lists collapsed to their element, empty
/// lists replaced by `Value::Null` (the missing-value sentinel).
pub type NormalizedRecord = Map<String, Value>;

/// EPSG code identifying a coordinate reference system.
pub type Epsg = u32;

/// A 2-D point in some coordinate reference system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A normalized record paired with its georeferenced location.
pub type GeoRecord = (NormalizedRecord, Point);

// ---------------------------------------------------------------------------
// Data types served by STN
// ---------------------------------------------------------------------------

/// The four record shapes served by the STN Flood Event Data API.
///
/// Endpoint names, accepted query parameters, and coordinate column names
/// for each variant live in `catalog`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Instruments,
    Peaks,
    Hwms,
    Sites,
}

impl DataType {
    pub const ALL: [DataType; 4] = [
        DataType::Instruments,
        DataType::Peaks,
        DataType::Hwms,
        DataType::Sites,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Instruments => "instruments",
            DataType::Peaks => "peaks",
            DataType::Hwms => "hwms",
            DataType::Sites => "sites",
        }
    }

    fn valid_names() -> Vec<String> {
        Self::ALL.iter().map(|d| d.as_str().to_string()).collect()
    }
}

impl std::str::FromStr for DataType {
    type Err = FloodDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instruments" => Ok(DataType::Instruments),
            "peaks" => Ok(DataType::Peaks),
            "hwms" => Ok(DataType::Hwms),
            "sites" => Ok(DataType::Sites),
            other => Err(FloodDataError::InvalidInput {
                given: other.to_string(),
                valid: DataType::valid_names(),
            }),
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Dictionary types
// ---------------------------------------------------------------------------

/// One reassembled entry of a data dictionary: a field name and its full
/// definition text (continuation rows already folded in).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryRow {
    pub field: String,
    pub definition: String,
}

// ---------------------------------------------------------------------------
// Query results
// ---------------------------------------------------------------------------

/// Result of an STN data query.
///
/// `hwms` and `sites` all-data queries (and every filtered query) carry
/// coordinate columns and come back georeferenced; `instruments` and `peaks`
/// all-data queries do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StnDataset {
    Table(Vec<NormalizedRecord>),
    GeoTable(Vec<GeoRecord>),
}

impl StnDataset {
    /// The normalized records, regardless of georeferencing.
    pub fn records(&self) -> Vec<&NormalizedRecord> {
        match self {
            StnDataset::Table(rows) => rows.iter().collect(),
            StnDataset::GeoTable(rows) => rows.iter().map(|(r, _)| r).collect(),
        }
    }

    /// The attached points, if this dataset is georeferenced.
    pub fn points(&self) -> Option<Vec<Point>> {
        match self {
            StnDataset::Table(_) => None,
            StnDataset::GeoTable(rows) => Some(rows.iter().map(|(_, p)| *p).collect()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            StnDataset::Table(rows) => rows.len(),
            StnDataset::GeoTable(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Opaque failure from a collaborator (HTTP retrieval, CRS transform).
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can arise when requesting or reshaping STN / NFHL data.
#[derive(Debug)]
pub enum FloodDataError {
    /// A data type, service, layer, or query-parameter key outside the fixed
    /// valid set. Raised before any I/O; lists the valid values.
    InvalidInput { given: String, valid: Vec<String> },
    /// An expected coordinate field was missing or non-numeric in the record
    /// at `index`.
    Schema { field: String, index: usize },
    /// A data dictionary began with a continuation row, leaving its
    /// definition text with no field to attach to.
    MalformedDictionary,
    /// The response body was not the documented array-of-objects shape.
    Parse(String),
    /// The retrieval or reprojection collaborator failed. Propagated
    /// unmodified: `Display` and `source()` defer to the inner error.
    Fetch(FetchError),
}

impl std::fmt::Display for FloodDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FloodDataError::InvalidInput { given, valid } => {
                write!(
                    f,
                    "given {} is invalid; valid options are: {}",
                    given,
                    valid.join(", ")
                )
            }
            FloodDataError::Schema { field, index } => {
                write!(
                    f,
                    "record {} has no numeric value for coordinate field '{}'",
                    index, field
                )
            }
            FloodDataError::MalformedDictionary => {
                write!(
                    f,
                    "data dictionary starts with a continuation row (empty field name)"
                )
            }
            FloodDataError::Parse(msg) => write!(f, "parse error: {}", msg),
            FloodDataError::Fetch(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for FloodDataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FloodDataError::Fetch(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<FetchError> for FloodDataError {
    fn from(err: FetchError) -> Self {
        FloodDataError::Fetch(err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_data_type_round_trips_through_from_str() {
        for dt in DataType::ALL {
            let parsed = DataType::from_str(dt.as_str()).expect("known name should parse");
            assert_eq!(parsed, dt);
        }
    }

    #[test]
    fn test_unknown_data_type_lists_valid_options() {
        let err = DataType::from_str("sensors").unwrap_err();
        match err {
            FloodDataError::InvalidInput { given, valid } => {
                assert_eq!(given, "sensors");
                assert_eq!(valid.len(), 4);
                assert!(valid.contains(&"hwms".to_string()));
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_input_display_includes_valid_set() {
        let err = DataType::from_str("bogus").unwrap_err();
        let msg = err.to_string();
        assert!(
            msg.contains("instruments") && msg.contains("sites"),
            "error message should list valid options, got: {}",
            msg
        );
    }

    #[test]
    fn test_fetch_error_display_is_passed_through() {
        let inner: FetchError = "HTTP error: 503".into();
        let err = FloodDataError::Fetch(inner);
        assert_eq!(err.to_string(), "HTTP error: 503");
    }

    #[test]
    fn test_dataset_accessors() {
        let mut rec = NormalizedRecord::new();
        rec.insert("hwm_id".to_string(), serde_json::json!(1));
        let point = Point { x: -89.0, y: 40.5 };

        let table = StnDataset::Table(vec![rec.clone()]);
        assert_eq!(table.len(), 1);
        assert!(table.points().is_none());

        let geo = StnDataset::GeoTable(vec![(rec, point)]);
        assert_eq!(geo.len(), 1);
        assert_eq!(geo.points(), Some(vec![point]));
        assert_eq!(geo.records().len(), 1);
    }
}
