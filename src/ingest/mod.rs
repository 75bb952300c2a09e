/// Per-source API clients.
///
/// One module per upstream data source:
/// - `stn` — USGS Short-Term Network flood event data (REST/JSON plus CSV
///   data dictionaries).
/// - `nfhl` — FEMA National Flood Hazard Layer map services.

pub mod nfhl;
pub mod stn;
