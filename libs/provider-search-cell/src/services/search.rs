// libs/provider-search-cell/src/services/search.rs
use std::sync::Arc;

use tracing::{debug, info};

use crate::contracts::{GeocodingLookup, ProviderDirectory, TaxonomyLookup};
use crate::models::{ProviderSummary, SearchError, SearchProvidersRequest};

/// Hard cap on any provider search result set.
pub const MAX_SEARCH_RESULTS: usize = 20;

pub const DEFAULT_RADIUS_MILES: f64 = 10.0;

const METERS_PER_MILE: f64 = 1609.34;

/// Orchestrates the provider search path: geocode the caller's address,
/// translate the optional specialty and insurance filters, then run one
/// bounded directory query.
pub struct ProviderSearchService {
    geocoder: Arc<dyn GeocodingLookup>,
    taxonomy: Arc<dyn TaxonomyLookup>,
    directory: Arc<dyn ProviderDirectory>,
}

impl ProviderSearchService {
    pub fn new(
        geocoder: Arc<dyn GeocodingLookup>,
        taxonomy: Arc<dyn TaxonomyLookup>,
        directory: Arc<dyn ProviderDirectory>,
    ) -> Self {
        Self {
            geocoder,
            taxonomy,
            directory,
        }
    }

    pub async fn search(
        &self,
        request: SearchProvidersRequest,
    ) -> Result<Vec<ProviderSummary>, SearchError> {
        let origin = self
            .geocoder
            .resolve(&request.address())
            .await
            .map_err(|e| SearchError::Upstream(e.to_string()))?
            .ok_or(SearchError::LocationNotFound)?;

        let taxonomy = match request.specialty.as_deref() {
            Some(specialty) => Some(
                self.taxonomy
                    .code_for(specialty)
                    .await
                    .map_err(|e| SearchError::Upstream(e.to_string()))?
                    .ok_or(SearchError::SpecialtyNotFound)?,
            ),
            None => None,
        };

        let provider_ids = match request.insurance.as_deref() {
            Some(insurance) => {
                let ids = self
                    .taxonomy
                    .provider_ids_for(insurance)
                    .await
                    .map_err(|e| SearchError::Upstream(e.to_string()))?;
                if ids.is_empty() {
                    return Err(SearchError::NoProvidersForInsurance);
                }
                Some(ids)
            }
            None => None,
        };

        let radius_miles = match request.radius {
            Some(radius) if radius > 0.0 => radius,
            _ => DEFAULT_RADIUS_MILES,
        };
        let radius_meters = radius_miles * METERS_PER_MILE;

        debug!(
            "Searching providers within {:.0}m of ({}, {})",
            radius_meters, origin.lat, origin.lon
        );

        let results = self
            .directory
            .find_nearby(
                origin,
                radius_meters,
                taxonomy.as_ref(),
                provider_ids.as_deref(),
                MAX_SEARCH_RESULTS,
            )
            .await
            .map_err(|e| SearchError::Upstream(e.to_string()))?;

        info!("Provider search returned {} results", results.len());
        Ok(results)
    }

    pub async fn get_provider(&self, npi: &str) -> Result<ProviderSummary, SearchError> {
        self.directory
            .find_by_npi(npi)
            .await
            .map_err(|e| SearchError::Upstream(e.to_string()))?
            .ok_or(SearchError::ProviderNotFound)
    }
}
