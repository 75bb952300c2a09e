/// FEMA National Flood Hazard Layer (NFHL) map services.
///
/// The NFHL side of this crate is deliberately thin: it owns the fixed
/// catalog of services and layers and validates a (service, layer)
/// selection up front, so a bad name fails here with the valid set in hand
/// instead of as an opaque map-server error. The ArcGIS query protocol
/// itself (geometry filters, paging, feature decoding) is an external
/// collaborator that consumes this handle's accessors.
///
/// Reference: National Flood Hazard Layer GIS Web Services
/// https://hazards.fema.gov/femaportal/wps/portal/NFHLWMS

use std::str::FromStr;

use crate::catalog::{NfhlService, SERVICE_CRS};
use crate::logging::{self, DataSource};
use crate::model::{Epsg, FloodDataError};

// ---------------------------------------------------------------------------
// Layer handle
// ---------------------------------------------------------------------------

/// A validated selection of one layer from one NFHL map service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfhlLayer {
    service: NfhlService,
    layer: String,
    outfields: Vec<String>,
    crs: Epsg,
}

impl NfhlLayer {
    /// Validates both names and builds a handle with the default output
    /// fields (`*`, all fields) and output CRS (EPSG:4326).
    pub fn new(service: &str, layer: &str) -> Result<Self, FloodDataError> {
        let service = NfhlService::from_str(service)?;
        Self::for_service(service, layer)
    }

    /// Builds a handle for an already-resolved service. Layer matching is
    /// case-insensitive; the canonical catalog spelling is kept.
    pub fn for_service(service: NfhlService, layer: &str) -> Result<Self, FloodDataError> {
        let wanted = layer.trim().to_lowercase();
        let canonical = service
            .valid_layers()
            .iter()
            .find(|name| **name == wanted)
            .ok_or_else(|| FloodDataError::InvalidInput {
                given: layer.to_string(),
                valid: service.valid_layers().iter().map(|s| s.to_string()).collect(),
            })?;

        logging::debug(
            DataSource::Nfhl,
            Some(service.as_str()),
            &format!("selected layer '{}'", canonical),
        );

        Ok(NfhlLayer {
            service,
            layer: canonical.to_string(),
            outfields: vec!["*".to_string()],
            crs: SERVICE_CRS,
        })
    }

    /// Restricts the returned attribute fields.
    pub fn with_outfields<I, S>(mut self, outfields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outfields = outfields.into_iter().map(Into::into).collect();
        self
    }

    /// Requests feature geometry in a different output CRS.
    pub fn with_crs(mut self, crs: Epsg) -> Self {
        self.crs = crs;
        self
    }

    pub fn service(&self) -> NfhlService {
        self.service
    }

    /// Canonical (catalog-spelled) layer name.
    pub fn layer(&self) -> &str {
        &self.layer
    }

    /// MapServer base URL of the selected service.
    pub fn service_url(&self) -> &'static str {
        self.service.base_url()
    }

    pub fn outfields(&self) -> &[String] {
        &self.outfields
    }

    pub fn crs(&self) -> Epsg {
        self.crs
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
