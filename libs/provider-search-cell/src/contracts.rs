// libs/provider-search-cell/src/contracts.rs
//
// Interface boundary of the search path's external collaborators. The
// booking core never calls these; the search service composes them and caps
// every query it issues.
use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Address, GeoPoint, ProviderSummary, TaxonomyCode};

/// Resolves a structured address to coordinates. How the resolution happens
/// (and its data source) lives behind this boundary.
#[async_trait]
pub trait GeocodingLookup: Send + Sync {
    async fn resolve(&self, address: &Address) -> Result<Option<GeoPoint>>;
}

/// Translates human specialty names to taxonomy codes and insurance plan
/// names to the providers accepting them.
#[async_trait]
pub trait TaxonomyLookup: Send + Sync {
    async fn code_for(&self, specialty: &str) -> Result<Option<TaxonomyCode>>;

    async fn provider_ids_for(&self, insurance: &str) -> Result<Vec<String>>;
}

/// Filtered read access to the provider directory. `limit` is mandatory;
/// callers never issue unbounded queries.
#[async_trait]
pub trait ProviderDirectory: Send + Sync {
    async fn find_nearby(
        &self,
        origin: GeoPoint,
        radius_meters: f64,
        taxonomy: Option<&TaxonomyCode>,
        provider_ids: Option<&[String]>,
        limit: usize,
    ) -> Result<Vec<ProviderSummary>>;

    async fn find_by_npi(&self, npi: &str) -> Result<Option<ProviderSummary>>;
}
