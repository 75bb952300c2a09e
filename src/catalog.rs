/// Service catalog for the STN and NFHL APIs.
///
/// Defines the canonical endpoint names, accepted query parameters, and
/// coordinate column names for each STN data type, plus the NFHL map-service
/// URLs and their layer lists. This is the single source of truth for
/// provider constants — all other modules should reference endpoints from
/// here rather than hardcoding URL fragments.
///
/// Everything in this module is immutable static configuration; there is no
/// runtime mutation and no I/O.

use std::collections::BTreeMap;

use crate::model::{DataType, Epsg, FloodDataError};

// ---------------------------------------------------------------------------
// STN service URLs
// ---------------------------------------------------------------------------

/// Base URL of the STN Flood Event Data RESTFUL service.
pub const STN_SERVICE_URL: &str = "https://stn.wim.usgs.gov/STNServices/";

/// Base URL of the STN data dictionary CSV files.
pub const STN_DATA_DICTIONARY_URL: &str = "https://stn.wim.usgs.gov/STNWeb/datadictionary/";

/// CRS of point data from the STN service. Per USGS, this is the CRS used
/// for visualization on the STN front-end (WGS84).
pub const SERVICE_CRS: Epsg = 4326;

// ---------------------------------------------------------------------------
// STN endpoint tables
// ---------------------------------------------------------------------------

/// Endpoint file for an all-data (unfiltered) query.
pub fn all_data_endpoint(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Instruments => "Instruments.json",
        DataType::Peaks => "PeakSummaries.json",
        DataType::Hwms => "HWMs.json",
        DataType::Sites => "Sites.json",
    }
}

/// Endpoint path for a filtered query.
pub fn filtered_endpoint(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Instruments => "Instruments/FilteredInstruments.json",
        DataType::Peaks => "PeakSummaries/FilteredPeaks.json",
        DataType::Hwms => "HWMs/FilteredHWMs.json",
        DataType::Sites => "Sites/FilteredSites.json",
    }
}

/// Data dictionary CSV file for a data type.
///
/// The lowercase `sites.csv` is not a typo; that is how the provider
/// publishes it.
pub fn dictionary_endpoint(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Instruments => "Instruments.csv",
        DataType::Peaks => "FilteredPeaks.csv",
        DataType::Hwms => "FilteredHWMs.csv",
        DataType::Sites => "sites.csv",
    }
}

/// Coordinate columns in all-data responses, where present. Instruments and
/// peaks all-data schemas carry no coordinates.
pub fn all_data_xy(data_type: DataType) -> Option<(&'static str, &'static str)> {
    match data_type {
        DataType::Instruments | DataType::Peaks => None,
        DataType::Hwms | DataType::Sites => Some(("longitude_dd", "latitude_dd")),
    }
}

/// Coordinate columns in filtered responses. Every filtered schema carries
/// coordinates, though the column names differ between data types.
pub fn filtered_xy(data_type: DataType) -> (&'static str, &'static str) {
    match data_type {
        DataType::Instruments => ("longitude", "latitude"),
        DataType::Peaks => ("longitude_dd", "latitude_dd"),
        DataType::Hwms => ("longitude", "latitude"),
        DataType::Sites => ("longitude_dd", "latitude_dd"),
    }
}

// ---------------------------------------------------------------------------
// STN query parameters
// ---------------------------------------------------------------------------

/// Accepted query-parameter keys for filtered queries, per data type.
pub fn allowed_query_params(data_type: DataType) -> &'static [&'static str] {
    match data_type {
        DataType::Instruments => &[
            "Event",
            "EventType",
            "EventStatus",
            "States",
            "County",
            "CurrentStatus",
            "CollectionCondition",
            "SensorType",
            "DeploymentType",
        ],
        DataType::Peaks => &[
            "Event",
            "EventType",
            "EventStatus",
            "States",
            "County",
            "StartDate",
            "EndDate",
        ],
        DataType::Hwms => &[
            "Event",
            "EventType",
            "EventStatus",
            "States",
            "County",
            "StartDate",
            "EndDate",
        ],
        DataType::Sites => &[
            "Event",
            "State",
            "SensorType",
            "NetworkName",
            "OPDefined",
            "HWMOnly",
            "HWMSurveyed",
            "SensorOnly",
            "RDGOnly",
            "HousingTypeOne",
            "HousingTypeSeven",
        ],
    }
}

/// Checks that every supplied key is accepted for the data type.
///
/// All-or-nothing: runs before any request is issued, so an invalid key
/// never costs a network call. The error lists the full accepted set.
pub fn validate_query_params(
    data_type: DataType,
    params: &BTreeMap<String, String>,
) -> Result<(), FloodDataError> {
    let allowed = allowed_query_params(data_type);
    if params.keys().any(|k| !allowed.contains(&k.as_str())) {
        return Err(FloodDataError::InvalidInput {
            given: "query_param".to_string(),
            valid: allowed.iter().map(|s| s.to_string()).collect(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// NFHL services
// ---------------------------------------------------------------------------

/// The FEMA National Flood Hazard Layer map services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NfhlService {
    /// Effective National Flood Hazard Layers.
    Nfhl,
    /// Preliminary Changes Since Last FIRM.
    PrelimCslf,
    /// Draft Changes Since Last FIRM.
    DraftCslf,
    /// Preliminary National Flood Hazard Layers.
    PrelimNfhl,
    /// Pending National Flood Hazard Layers.
    PendingNfhl,
    /// Draft National Flood Hazard Layers.
    DraftNfhl,
}

impl NfhlService {
    pub const ALL: [NfhlService; 6] = [
        NfhlService::Nfhl,
        NfhlService::PrelimCslf,
        NfhlService::DraftCslf,
        NfhlService::PrelimNfhl,
        NfhlService::PendingNfhl,
        NfhlService::DraftNfhl,
    ];

    /// Service name as the provider spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            NfhlService::Nfhl => "NFHL",
            NfhlService::PrelimCslf => "Prelim_CSLF",
            NfhlService::DraftCslf => "Draft_CSLF",
            NfhlService::PrelimNfhl => "Prelim_NFHL",
            NfhlService::PendingNfhl => "Pending_NFHL",
            NfhlService::DraftNfhl => "Draft_NFHL",
        }
    }

    /// MapServer base URL for this service.
    pub fn base_url(self) -> &'static str {
        match self {
            NfhlService::Nfhl => {
                "https://hazards.fema.gov/gis/nfhl/rest/services/public/NFHL/MapServer"
            }
            NfhlService::PrelimCslf => {
                "https://hazards.fema.gov/gis/nfhl/rest/services/CSLF/Prelim_CSLF/MapServer"
            }
            NfhlService::DraftCslf => {
                "https://hazards.fema.gov/gis/nfhl/rest/services/CSLF/Draft_CSLF/MapServer"
            }
            NfhlService::PrelimNfhl => {
                "https://hazards.fema.gov/gis/nfhl/rest/services/PrelimPending/Prelim_NFHL/MapServer"
            }
            NfhlService::PendingNfhl => {
                "https://hazards.fema.gov/gis/nfhl/rest/services/PrelimPending/Pending_NFHL/MapServer"
            }
            NfhlService::DraftNfhl => {
                "https://hazards.fema.gov/gis/nfhl/rest/services/AFHI/Draft_FIRM_DB/MapServer"
            }
        }
    }

    /// Layer names published by this service, lowercased as the provider
    /// lists them.
    pub fn valid_layers(self) -> &'static [&'static str] {
        match self {
            NfhlService::Nfhl => &[
                "nfhl availability",
                "firm panels",
                "lomrs",
                "lomas",
                "political jurisdictions",
                "profile baselines",
                "water lines",
                "cross-sections",
                "base flood elevations",
                "levees",
                "seclusion boundaries",
                "coastal transects",
                "transect baselines",
                "general structures",
                "river mile markers",
                "water areas",
                "plss",
                "limit of moderate wave action",
                "flood hazard boundaries",
                "flood hazard zones",
                "primary frontal dunes",
                "base index",
                "topographic low confidence areas",
                "datum conversion points",
                "coastal gages",
                "gages",
                "nodes",
                "high water marks",
                "station start points",
                "hydrologic reaches",
                "alluvial fans",
                "subbasins",
            ],
            NfhlService::PrelimCslf => &[
                "preliminary",
                "coastal high hazard area change",
                "floodway change",
                "special flood hazard area change",
                "non-special flood hazard area change",
            ],
            NfhlService::DraftCslf => &[
                "draft",
                "coastal high hazard area change",
                "floodway change",
                "special flood hazard area change",
                "non-special flood hazard area change",
            ],
            NfhlService::PrelimNfhl => &[
                "preliminary data availability",
                "preliminary firm panel index",
                "preliminary plss",
                "preliminary topographic low confidence areas",
                "preliminary river mile markers",
                "preliminary datum conversion points",
                "preliminary coastal gages",
                "preliminary gages",
                "preliminary nodes",
                "preliminary high water marks",
                "preliminary station start points",
                "preliminary cross-sections",
                "preliminary coastal transects",
                "preliminary base flood elevations",
                "preliminary profile baselines",
                "preliminary transect baselines",
                "preliminary limit of moderate wave action",
                "preliminary water lines",
                "preliminary political jurisdictions",
                "preliminary levees",
                "preliminary general structures",
                "preliminary primary frontal dunes",
                "preliminary hydrologic reaches",
                "preliminary flood hazard boundaries",
                "preliminary flood hazard zones",
                "preliminary submittal information",
                "preliminary alluvial fans",
                "preliminary subbasins",
                "preliminary water areas",
            ],
            NfhlService::PendingNfhl => &[
                "pending submittal information",
                "pending water areas",
                "pending firm panel index",
                "pending data availability",
                "pending firm panels",
                "pending political jurisdictions",
                "pending profile baselines",
                "pending water lines",
                "pending cross-sections",
                "pending base flood elevations",
                "pending levees",
                "pending seclusion boundaries",
                "pending coastal transects",
                "pending transect baselines",
                "pending general structures",
                "pending river mile markers",
                "pending plss",
                "pending limit of moderate wave action",
                "pending flood hazard boundaries",
                "pending flood hazard zones",
                "pending primary frontal dunes",
                "pending topographic low confidence areas",
                "pending datum conversion points",
                "pending coastal gages",
                "pending gages",
                "pending nodes",
                "pending high water marks",
                "pending station start points",
                "pending hydrologic reaches",
                "pending alluvial fans",
                "pending subbasins",
            ],
            NfhlService::DraftNfhl => &[
                "draft data availability",
                "draft firm panels",
                "draft political jurisdictions",
                "draft profile baselines",
                "draft water lines",
                "draft cross-sections",
                "draft base flood elevations",
                "draft levees",
                "draft submittal info",
                "draft coastal transects",
                "draft transect baselines",
                "draft general structures",
                "draft limit of moderate wave action",
                "draft flood hazard boundaries",
                "draft flood hazard zones",
            ],
        }
    }

    fn valid_names() -> Vec<String> {
        Self::ALL.iter().map(|s| s.as_str().to_string()).collect()
    }
}

impl std::str::FromStr for NfhlService {
    type Err = FloodDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NfhlService::ALL
            .iter()
            .copied()
            .find(|svc| svc.as_str() == s)
            .ok_or_else(|| FloodDataError::InvalidInput {
                given: s.to_string(),
                valid: NfhlService::valid_names(),
            })
    }
}

impl std::fmt::Display for NfhlService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
