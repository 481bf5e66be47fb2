// libs/provider-search-cell/src/models.rs
use serde::{Deserialize, Serialize};

// ==============================================================================
// SEARCH REQUEST/RESPONSE MODELS
// ==============================================================================

/// Accepted both as query parameters (GET) and as a JSON body (POST).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchProvidersRequest {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub specialty: Option<String>,
    pub insurance: Option<String>,
    /// Search radius in miles.
    pub radius: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl SearchProvidersRequest {
    pub fn address(&self) -> Address {
        Address {
            street: self.street.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip: self.zip.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyCode(pub String);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSummary {
    /// National Provider Identifier.
    pub npi: String,
    pub name: String,
    #[serde(default)]
    pub taxonomy_codes: Vec<String>,
    pub distance_meters: Option<f64>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Location not found")]
    LocationNotFound,

    #[error("Specialty not found")]
    SpecialtyNotFound,

    #[error("No providers accept this insurance")]
    NoProvidersForInsurance,

    #[error("No provider found with the given NPI")]
    ProviderNotFound,

    #[error("upstream lookup failed: {0}")]
    Upstream(String),
}
