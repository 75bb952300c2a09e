//! Client library for two federal flood-data services: the USGS Short-Term
//! Network (STN) flood event API and the FEMA National Flood Hazard Layer
//! (NFHL) map services.
//!
//! The STN client returns flat, normalized records (the service's
//! single-element-list convention already collapsed), georeferenced where
//! the schema carries coordinates, and reassembles the ragged CSV data
//! dictionaries published alongside each data type. The NFHL side validates
//! service/layer selections against the fixed FEMA catalog.
//!
//! Transport and CRS transformation are pluggable: the `Retriever` and
//! `Reproject` traits let callers swap in their own HTTP stack or
//! coordinate transformer, while `HttpRetriever` and `IdentityReprojector`
//! cover the common case of synchronous fetches in the service CRS.
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use floodinfo_client::{stn_flood_event, DataType};
//!
//! let mut params = BTreeMap::new();
//! params.insert("States".to_string(), "SC, CA".to_string());
//! let hwms = stn_flood_event(DataType::Hwms, Some(&params))?;
//! println!("{} high-water marks", hwms.len());
//! # Ok::<(), floodinfo_client::FloodDataError>(())
//! ```

pub mod catalog;
pub mod dictionary;
pub mod geo;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod retrieve;

pub use catalog::{NfhlService, SERVICE_CRS};
pub use geo::{IdentityReprojector, Reproject};
pub use ingest::nfhl::NfhlLayer;
pub use ingest::stn::{
    data_dictionary, get_all_data, get_all_records, get_filtered_data, get_filtered_records,
    stn_flood_event,
};
pub use model::{
    DataType, DictionaryRow, Epsg, FloodDataError, GeoRecord, NormalizedRecord, Point, RawRecord,
    StnDataset,
};
pub use retrieve::{HttpRetriever, Retriever};
