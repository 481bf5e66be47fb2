// libs/provider-search-cell/src/services/lookup.rs
//
// HTTP-backed implementations of the search collaborator contracts. The
// geocoder speaks a Nominatim-style API; taxonomy, insurance, and directory
// lookups go through the same document-store gateway the booking stores use.
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use shared_config::AppConfig;

use crate::contracts::{GeocodingLookup, ProviderDirectory, TaxonomyLookup};
use crate::models::{Address, GeoPoint, ProviderSummary, TaxonomyCode};

// ==============================================================================
// GEOCODING
// ==============================================================================

pub struct HttpGeocodingLookup {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    lat: String,
    lon: String,
}

impl HttpGeocodingLookup {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.geocoder_base_url.clone(),
        }
    }
}

#[async_trait]
impl GeocodingLookup for HttpGeocodingLookup {
    async fn resolve(&self, address: &Address) -> Result<Option<GeoPoint>> {
        let url = format!("{}/search", self.base_url);
        let mut query: Vec<(&str, &str)> = vec![("format", "json"), ("limit", "1")];
        if let Some(street) = address.street.as_deref() {
            query.push(("street", street));
        }
        if let Some(city) = address.city.as_deref() {
            query.push(("city", city));
        }
        if let Some(state) = address.state.as_deref() {
            query.push(("state", state));
        }
        if let Some(zip) = address.zip.as_deref() {
            query.push(("postalcode", zip));
        }

        debug!("Geocoding address via {}", url);
        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("geocoder error ({})", status));
        }

        let hits: Vec<GeocodeHit> = response.json().await?;
        let Some(hit) = hits.into_iter().next() else {
            return Ok(None);
        };
        Ok(Some(GeoPoint {
            lat: hit.lat.parse()?,
            lon: hit.lon.parse()?,
        }))
    }
}

// ==============================================================================
// DIRECTORY GATEWAY
// ==============================================================================

/// Taxonomy, insurance, and provider directory reads against the document
/// store gateway.
pub struct DirectoryGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

impl DirectoryGateway {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.store_url.clone(),
            api_key: config.store_api_key.clone(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(key) = HeaderValue::from_str(&self.api_key) {
            headers.insert("x-api-key", key);
        }
        headers
    }

    async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Directory request: GET {}", url);
        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .query(query)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(anyhow!("directory error ({}): {}", status, message));
        }
        Ok(response.json().await?)
    }
}

#[derive(Debug, Deserialize)]
struct TaxonomyEntry {
    code: String,
}

#[async_trait]
impl TaxonomyLookup for DirectoryGateway {
    async fn code_for(&self, specialty: &str) -> Result<Option<TaxonomyCode>> {
        let entries: Vec<TaxonomyEntry> = self
            .get("/v1/taxonomy", &[("specialty", specialty.to_string())])
            .await?;
        Ok(entries.into_iter().next().map(|e| TaxonomyCode(e.code)))
    }

    async fn provider_ids_for(&self, insurance: &str) -> Result<Vec<String>> {
        self.get("/v1/insurance/providers", &[("plan", insurance.to_string())])
            .await
    }
}

#[async_trait]
impl ProviderDirectory for DirectoryGateway {
    async fn find_nearby(
        &self,
        origin: GeoPoint,
        radius_meters: f64,
        taxonomy: Option<&TaxonomyCode>,
        provider_ids: Option<&[String]>,
        limit: usize,
    ) -> Result<Vec<ProviderSummary>> {
        let mut query = vec![
            ("lat", origin.lat.to_string()),
            ("lon", origin.lon.to_string()),
            ("radius_meters", radius_meters.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(code) = taxonomy {
            query.push(("taxonomy", code.0.clone()));
        }
        if let Some(ids) = provider_ids {
            query.push(("providers", ids.join(",")));
        }
        self.get("/v1/providers/nearby", &query).await
    }

    async fn find_by_npi(&self, npi: &str) -> Result<Option<ProviderSummary>> {
        let results: Vec<ProviderSummary> = self
            .get("/v1/providers", &[("npi", npi.to_string())])
            .await?;
        Ok(results.into_iter().next())
    }
}
