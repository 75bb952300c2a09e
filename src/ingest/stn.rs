/// USGS Short-Term Network (STN) Flood Event Data API client.
///
/// Wraps the four STN data types (instruments, peaks, hwms, sites) plus
/// their data dictionaries. Raw responses arrive as JSON arrays of records
/// whose fields may be wrapped in single- or zero-element lists; everything
/// returned from this module is already normalized to flat scalar records,
/// georeferenced where the schema carries coordinates.
///
/// API documentation: https://stn.wim.usgs.gov/STNServices/Documentation
/// Front-end: https://stn.wim.usgs.gov/STNWeb/#/

use std::collections::BTreeMap;

use serde_json::Value;

use crate::catalog::{
    all_data_endpoint, all_data_xy, dictionary_endpoint, filtered_endpoint, filtered_xy,
    validate_query_params, STN_DATA_DICTIONARY_URL, STN_SERVICE_URL,
};
use crate::dictionary::parse_data_dictionary;
use crate::geo::{attach_service_geometry, IdentityReprojector, Reproject};
use crate::logging::{self, DataSource};
use crate::model::{
    DataType, DictionaryRow, Epsg, FloodDataError, NormalizedRecord, RawRecord, StnDataset,
};
use crate::normalize::normalize_records;
use crate::retrieve::{HttpRetriever, QueryPairs, Retriever};

// ---------------------------------------------------------------------------
// Response reshaping
// ---------------------------------------------------------------------------

/// Every STN data endpoint documents its body as a JSON array of objects.
fn records_from_body(body: Value) -> Result<Vec<RawRecord>, FloodDataError> {
    let items = match body {
        Value::Array(items) => items,
        other => {
            return Err(FloodDataError::Parse(format!(
                "expected a JSON array of records, got {}",
                json_kind(&other)
            )));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(FloodDataError::Parse(format!(
                "expected a JSON object at index {}, got {}",
                index,
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Fetches one endpoint and normalizes every record, preserving order.
fn fetch_normalized<R>(
    retriever: &R,
    url: String,
    params: QueryPairs,
) -> Result<Vec<NormalizedRecord>, FloodDataError>
where
    R: Retriever + ?Sized,
{
    let mut bodies = retriever
        .retrieve_json(&[url], &[params])
        .map_err(FloodDataError::Fetch)?;
    let body = bodies
        .pop()
        .ok_or_else(|| FloodDataError::Parse("retriever returned no response".to_string()))?;
    let raw = records_from_body(body)?;
    Ok(normalize_records(&raw))
}

// ---------------------------------------------------------------------------
// Data dictionaries
// ---------------------------------------------------------------------------

/// Retrieves and reassembles the data dictionary for a data type.
pub fn data_dictionary<R>(
    retriever: &R,
    data_type: DataType,
) -> Result<Vec<DictionaryRow>, FloodDataError>
where
    R: Retriever + ?Sized,
{
    let url = format!("{}{}", STN_DATA_DICTIONARY_URL, dictionary_endpoint(data_type));
    let mut bodies = retriever
        .retrieve_text(&[url])
        .map_err(FloodDataError::Fetch)?;
    let body = bodies
        .pop()
        .ok_or_else(|| FloodDataError::Parse("retriever returned no response".to_string()))?;
    let entries = parse_data_dictionary(&body)?;
    logging::debug(
        DataSource::Stn,
        Some(data_type.as_str()),
        &format!("data dictionary has {} entries", entries.len()),
    );
    Ok(entries)
}

// ---------------------------------------------------------------------------
// All-data queries
// ---------------------------------------------------------------------------

/// Retrieves every record of a data type as a flat normalized list, without
/// geometry.
pub fn get_all_records<R>(
    retriever: &R,
    data_type: DataType,
) -> Result<Vec<NormalizedRecord>, FloodDataError>
where
    R: Retriever + ?Sized,
{
    let url = format!("{}{}", STN_SERVICE_URL, all_data_endpoint(data_type));
    let records = fetch_normalized(retriever, url, QueryPairs::new())?;
    logging::info(
        DataSource::Stn,
        Some(data_type.as_str()),
        &format!("retrieved {} records", records.len()),
    );
    Ok(records)
}

/// Retrieves every record of a data type, georeferenced where the all-data
/// schema carries coordinates (`hwms` and `sites`).
///
/// `crs = None` leaves the points in the service CRS (EPSG:4326).
pub fn get_all_data<R, P>(
    retriever: &R,
    reprojector: &P,
    data_type: DataType,
    crs: Option<Epsg>,
) -> Result<StnDataset, FloodDataError>
where
    R: Retriever + ?Sized,
    P: Reproject + ?Sized,
{
    let records = get_all_records(retriever, data_type)?;
    match all_data_xy(data_type) {
        None => Ok(StnDataset::Table(records)),
        Some((x_field, y_field)) => {
            let geo = attach_service_geometry(&records, x_field, y_field, crs, reprojector)?;
            Ok(StnDataset::GeoTable(geo))
        }
    }
}

// ---------------------------------------------------------------------------
// Filtered queries
// ---------------------------------------------------------------------------

/// Retrieves records matching the query parameters as a flat normalized
/// list, without geometry.
///
/// Parameter keys are validated against the data type's accepted set before
/// any request is issued.
pub fn get_filtered_records<R>(
    retriever: &R,
    data_type: DataType,
    query_params: &BTreeMap<String, String>,
) -> Result<Vec<NormalizedRecord>, FloodDataError>
where
    R: Retriever + ?Sized,
{
    validate_query_params(data_type, query_params)?;

    let url = format!("{}{}", STN_SERVICE_URL, filtered_endpoint(data_type));
    let params: QueryPairs = query_params
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let records = fetch_normalized(retriever, url, params)?;
    logging::info(
        DataSource::Stn,
        Some(data_type.as_str()),
        &format!("retrieved {} filtered records", records.len()),
    );
    Ok(records)
}

/// Retrieves records matching the query parameters, georeferenced. Every
/// filtered schema carries coordinates, so the result is always a
/// `GeoTable`.
pub fn get_filtered_data<R, P>(
    retriever: &R,
    reprojector: &P,
    data_type: DataType,
    query_params: &BTreeMap<String, String>,
    crs: Option<Epsg>,
) -> Result<StnDataset, FloodDataError>
where
    R: Retriever + ?Sized,
    P: Reproject + ?Sized,
{
    let records = get_filtered_records(retriever, data_type, query_params)?;
    let (x_field, y_field) = filtered_xy(data_type);
    let geo = attach_service_geometry(&records, x_field, y_field, crs, reprojector)?;
    Ok(StnDataset::GeoTable(geo))
}

// ---------------------------------------------------------------------------
// Convenience entry point
// ---------------------------------------------------------------------------

/// One-call retrieval with the bundled HTTP retriever: all data when
/// `query_params` is `None`, a filtered query otherwise. Points stay in the
/// service CRS.
pub fn stn_flood_event(
    data_type: DataType,
    query_params: Option<&BTreeMap<String, String>>,
) -> Result<StnDataset, FloodDataError> {
    let retriever = HttpRetriever::new().map_err(FloodDataError::Fetch)?;
    match query_params {
        None => get_all_data(&retriever, &IdentityReprojector, data_type, None),
        Some(params) => {
            get_filtered_data(&retriever, &IdentityReprojector, data_type, params, None)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FetchError;
    use serde_json::json;
    use std::cell::RefCell;

    /// Canned-response retriever that records every request it receives.
    struct MockRetriever {
        json_body: Value,
        text_body: String,
        requests: RefCell<Vec<(String, QueryPairs)>>,
    }

    impl MockRetriever {
        fn with_json(body: Value) -> Self {
            MockRetriever {
                json_body: body,
                text_body: String::new(),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn with_text(body: &str) -> Self {
            MockRetriever {
                json_body: Value::Null,
                text_body: body.to_string(),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl Retriever for MockRetriever {
        fn retrieve_json(
            &self,
            urls: &[String],
            per_url_params: &[QueryPairs],
        ) -> Result<Vec<Value>, FetchError> {
            for (url, params) in urls.iter().zip(per_url_params) {
                self.requests.borrow_mut().push((url.clone(), params.clone()));
            }
            Ok(vec![self.json_body.clone(); urls.len()])
        }

        fn retrieve_text(&self, urls: &[String]) -> Result<Vec<String>, FetchError> {
            for url in urls {
                self.requests.borrow_mut().push((url.clone(), QueryPairs::new()));
            }
            Ok(vec![self.text_body.clone(); urls.len()])
        }
    }

    #[test]
    fn test_get_all_data_instruments_is_a_plain_table() {
        let retriever = MockRetriever::with_json(json!([
            {"instrument_id": [101], "serial_number": "A-1", "interval": []},
            {"instrument_id": [102], "serial_number": "A-2", "interval": 15},
        ]));

        let dataset =
            get_all_data(&retriever, &IdentityReprojector, DataType::Instruments, None)
                .expect("canned response should parse");

        match dataset {
            StnDataset::Table(rows) => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0]["instrument_id"], json!(101), "list should be collapsed");
                assert_eq!(rows[0]["interval"], Value::Null, "empty list should become null");
                assert_eq!(rows[1]["interval"], json!(15));
            }
            other => panic!("instruments all-data is not georeferenced, got {:?}", other),
        }
    }

    #[test]
    fn test_get_all_data_hwms_is_georeferenced() {
        let retriever = MockRetriever::with_json(json!([
            {"hwm_id": 1, "longitude_dd": [-90.05], "latitude_dd": [38.62]},
            {"hwm_id": 2, "longitude_dd": -89.94, "latitude_dd": 38.71},
        ]));

        let dataset = get_all_data(&retriever, &IdentityReprojector, DataType::Hwms, None)
            .expect("canned response should parse");

        match dataset {
            StnDataset::GeoTable(rows) => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].1.x, -90.05);
                assert_eq!(rows[0].1.y, 38.62);
                assert_eq!(rows[1].0["hwm_id"], json!(2), "row order must be preserved");
            }
            other => panic!("hwms all-data should be georeferenced, got {:?}", other),
        }
    }

    #[test]
    fn test_all_data_hits_the_all_data_endpoint() {
        let retriever = MockRetriever::with_json(json!([]));
        get_all_records(&retriever, DataType::Peaks).unwrap();

        let requests = retriever.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].0,
            "https://stn.wim.usgs.gov/STNServices/PeakSummaries.json"
        );
        assert!(requests[0].1.is_empty(), "all-data queries carry no parameters");
    }

    #[test]
    fn test_filtered_query_passes_params_through() {
        let retriever = MockRetriever::with_json(json!([]));
        let mut params = BTreeMap::new();
        params.insert("States".to_string(), "SC, CA".to_string());
        params.insert("Event".to_string(), "Hurricane Harvey".to_string());

        get_filtered_records(&retriever, DataType::Hwms, &params).unwrap();

        let requests = retriever.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].0,
            "https://stn.wim.usgs.gov/STNServices/HWMs/FilteredHWMs.json"
        );
        assert!(requests[0]
            .1
            .contains(&("States".to_string(), "SC, CA".to_string())));
    }

    #[test]
    fn test_invalid_query_param_fails_before_any_request() {
        let retriever = MockRetriever::with_json(json!([]));
        let mut params = BTreeMap::new();
        params.insert("NotAKey".to_string(), "x".to_string());

        let err = get_filtered_records(&retriever, DataType::Sites, &params).unwrap_err();

        assert!(matches!(err, FloodDataError::InvalidInput { .. }));
        assert_eq!(
            retriever.request_count(),
            0,
            "validation must fail fast, before any network call"
        );
    }

    #[test]
    fn test_filtered_data_is_always_georeferenced() {
        let retriever = MockRetriever::with_json(json!([
            {"sensorType": "Pressure", "longitude": [-80.1], "latitude": [32.8]},
        ]));
        let params = BTreeMap::new();

        let dataset = get_filtered_data(
            &retriever,
            &IdentityReprojector,
            DataType::Instruments,
            &params,
            None,
        )
        .unwrap();

        match dataset {
            StnDataset::GeoTable(rows) => {
                assert_eq!(rows[0].1, crate::model::Point { x: -80.1, y: 32.8 });
            }
            other => panic!("filtered data should be georeferenced, got {:?}", other),
        }
    }

    #[test]
    fn test_non_array_body_is_a_parse_error() {
        let retriever = MockRetriever::with_json(json!({"message": "service unavailable"}));
        let err = get_all_records(&retriever, DataType::Sites).unwrap_err();
        match err {
            FloodDataError::Parse(msg) => {
                assert!(msg.contains("array"), "message should describe the shape, got: {}", msg)
            }
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_element_is_a_parse_error() {
        let retriever = MockRetriever::with_json(json!([{"ok": 1}, 42]));
        let err = get_all_records(&retriever, DataType::Sites).unwrap_err();
        assert!(matches!(err, FloodDataError::Parse(_)));
    }

    #[test]
    fn test_data_dictionary_fetches_and_reassembles() {
        let retriever = MockRetriever::with_text(
            "Field,Definition\nlatitude_dd,Latitude in\n,decimal degrees\n",
        );
        let entries = data_dictionary(&retriever, DataType::Hwms).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].field, "latitude_dd");
        assert_eq!(entries[0].definition, "Latitude in decimal degrees");

        let requests = retriever.requests.borrow();
        assert_eq!(
            requests[0].0,
            "https://stn.wim.usgs.gov/STNWeb/datadictionary/FilteredHWMs.csv"
        );
    }

    #[test]
    fn test_missing_coordinate_in_geo_type_surfaces_schema_error() {
        let retriever = MockRetriever::with_json(json!([
            {"site_id": 7, "latitude_dd": 40.0},
        ]));
        let err = get_all_data(&retriever, &IdentityReprojector, DataType::Sites, None)
            .unwrap_err();
        assert!(
            matches!(err, FloodDataError::Schema { index: 0, .. }),
            "missing longitude should be a schema error, got {:?}",
            err
        );
    }
}
