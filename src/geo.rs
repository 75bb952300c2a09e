/// Geo-referencing of normalized records.
///
/// STN point data is served in WGS84 (EPSG:4326, `catalog::SERVICE_CRS`).
/// This module builds a point per record from named x/y fields and hands the
/// whole batch to a `Reproject` collaborator for transformation into the
/// requested output CRS. The CRS transform is the expensive step, so the
/// batch crosses the trait boundary exactly once per call — never per
/// record.

use serde_json::Value;

use crate::catalog::SERVICE_CRS;
use crate::model::{Epsg, FetchError, FloodDataError, GeoRecord, NormalizedRecord, Point};

// ---------------------------------------------------------------------------
// Reprojection seam
// ---------------------------------------------------------------------------

/// Collaborator capability: transform a batch of points between coordinate
/// reference systems. Implementations must preserve order and return one
/// output point per input point.
pub trait Reproject {
    fn reproject(&self, points: &[Point], from: Epsg, to: Epsg) -> Result<Vec<Point>, FetchError>;
}

/// The bundled no-op transformer. Passes points through when source and
/// target CRS agree and refuses otherwise; an actual transform requires a
/// caller-supplied `Reproject` implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityReprojector;

impl Reproject for IdentityReprojector {
    fn reproject(&self, points: &[Point], from: Epsg, to: Epsg) -> Result<Vec<Point>, FetchError> {
        if from != to {
            return Err(format!(
                "IdentityReprojector cannot transform EPSG:{} to EPSG:{}; supply a real Reproject implementation",
                from, to
            )
            .into());
        }
        Ok(points.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Coordinate extraction
// ---------------------------------------------------------------------------

/// The provider emits coordinates as JSON numbers on some endpoints and as
/// numeric strings on others; both are accepted.
fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Geo-attachment
// ---------------------------------------------------------------------------

/// Pairs each record with a point built from its `x_field`/`y_field` values,
/// reprojected from `source_crs` into `target_crs` in a single batched call.
///
/// `target_crs = None` defaults to `source_crs` (identity). Output order and
/// length match the input 1:1. A record with a missing or non-numeric
/// coordinate field fails the whole call with `FloodDataError::Schema` —
/// no partial output.
pub fn attach_geometry<P>(
    records: &[NormalizedRecord],
    x_field: &str,
    y_field: &str,
    source_crs: Epsg,
    target_crs: Option<Epsg>,
    reprojector: &P,
) -> Result<Vec<GeoRecord>, FloodDataError>
where
    P: Reproject + ?Sized,
{
    let target = target_crs.unwrap_or(source_crs);

    let mut points = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let x = record.get(x_field).and_then(coordinate).ok_or_else(|| {
            FloodDataError::Schema {
                field: x_field.to_string(),
                index,
            }
        })?;
        let y = record.get(y_field).and_then(coordinate).ok_or_else(|| {
            FloodDataError::Schema {
                field: y_field.to_string(),
                index,
            }
        })?;
        points.push(Point { x, y });
    }

    let projected = reprojector
        .reproject(&points, source_crs, target)
        .map_err(FloodDataError::Fetch)?;

    Ok(records.iter().cloned().zip(projected).collect())
}

/// Convenience wrapper for STN data: source CRS fixed at the service CRS.
pub fn attach_service_geometry<P>(
    records: &[NormalizedRecord],
    x_field: &str,
    y_field: &str,
    target_crs: Option<Epsg>,
    reprojector: &P,
) -> Result<Vec<GeoRecord>, FloodDataError>
where
    P: Reproject + ?Sized,
{
    attach_geometry(records, x_field, y_field, SERVICE_CRS, target_crs, reprojector)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    fn record(x: Value, y: Value) -> NormalizedRecord {
        let mut rec = NormalizedRecord::new();
        rec.insert("longitude_dd".to_string(), x);
        rec.insert("latitude_dd".to_string(), y);
        rec
    }

    /// Counts trait crossings so tests can pin the one-batch contract.
    struct CountingReprojector {
        calls: Cell<usize>,
    }

    impl CountingReprojector {
        fn new() -> Self {
            CountingReprojector { calls: Cell::new(0) }
        }
    }

    impl Reproject for CountingReprojector {
        fn reproject(
            &self,
            points: &[Point],
            _from: Epsg,
            _to: Epsg,
        ) -> Result<Vec<Point>, FetchError> {
            self.calls.set(self.calls.get() + 1);
            Ok(points.to_vec())
        }
    }

    #[test]
    fn test_attaches_one_point_per_record_in_order() {
        let records = vec![
            record(json!(-89.99), json!(40.56)),
            record(json!(-89.48), json!(40.92)),
            record(json!(-88.74), json!(41.33)),
        ];
        let geo = attach_service_geometry(
            &records,
            "longitude_dd",
            "latitude_dd",
            None,
            &IdentityReprojector,
        )
        .expect("all records carry coordinates");

        assert_eq!(geo.len(), records.len());
        assert_eq!(geo[0].1, Point { x: -89.99, y: 40.56 });
        assert_eq!(geo[2].1, Point { x: -88.74, y: 41.33 });
        assert_eq!(geo[1].0, records[1], "records must come back unmodified");
    }

    #[test]
    fn test_reprojects_in_a_single_batched_call() {
        let records: Vec<_> = (0..10)
            .map(|i| record(json!(-89.0 - i as f64), json!(40.0 + i as f64)))
            .collect();
        let counting = CountingReprojector::new();

        attach_service_geometry(&records, "longitude_dd", "latitude_dd", None, &counting)
            .expect("should succeed");

        assert_eq!(
            counting.calls.get(),
            1,
            "the point batch must cross the reprojection boundary exactly once"
        );
    }

    #[test]
    fn test_missing_x_field_is_a_schema_error() {
        let mut rec = NormalizedRecord::new();
        rec.insert("latitude_dd".to_string(), json!(40.5));
        let err = attach_service_geometry(
            &[rec],
            "longitude_dd",
            "latitude_dd",
            None,
            &IdentityReprojector,
        )
        .unwrap_err();

        match err {
            FloodDataError::Schema { field, index } => {
                assert_eq!(field, "longitude_dd");
                assert_eq!(index, 0);
            }
            other => panic!("expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_null_coordinate_is_a_schema_error() {
        // A de-listed empty list leaves null behind; a point cannot be built
        // from it.
        let records = vec![record(Value::Null, json!(40.5))];
        let err = attach_service_geometry(
            &records,
            "longitude_dd",
            "latitude_dd",
            None,
            &IdentityReprojector,
        )
        .unwrap_err();
        assert!(matches!(err, FloodDataError::Schema { index: 0, .. }));
    }

    #[test]
    fn test_error_names_failing_record_index() {
        let records = vec![
            record(json!(-89.0), json!(40.0)),
            record(json!("not a number"), json!(40.1)),
        ];
        let err = attach_service_geometry(
            &records,
            "longitude_dd",
            "latitude_dd",
            None,
            &IdentityReprojector,
        )
        .unwrap_err();
        assert!(
            matches!(err, FloodDataError::Schema { index: 1, .. }),
            "second record holds the bad coordinate, got {:?}",
            err
        );
    }

    #[test]
    fn test_string_coordinates_are_accepted() {
        let records = vec![record(json!("-89.6480"), json!("40.7050"))];
        let geo = attach_service_geometry(
            &records,
            "longitude_dd",
            "latitude_dd",
            None,
            &IdentityReprojector,
        )
        .unwrap();
        assert_eq!(geo[0].1, Point { x: -89.648, y: 40.705 });
    }

    #[test]
    fn test_identity_reprojector_refuses_cross_crs() {
        let records = vec![record(json!(-89.0), json!(40.0))];
        let err = attach_service_geometry(
            &records,
            "longitude_dd",
            "latitude_dd",
            Some(5070),
            &IdentityReprojector,
        )
        .unwrap_err();
        assert!(
            matches!(err, FloodDataError::Fetch(_)),
            "a cross-CRS request without a real transformer is a collaborator failure"
        );
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let geo = attach_service_geometry(
            &[],
            "longitude_dd",
            "latitude_dd",
            None,
            &IdentityReprojector,
        )
        .unwrap();
        assert!(geo.is_empty());
    }
}
