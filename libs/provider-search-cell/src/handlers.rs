// libs/provider-search-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{SearchError, SearchProvidersRequest};
use crate::services::search::ProviderSearchService;

pub struct SearchState {
    pub search: ProviderSearchService,
}

fn to_app_error(e: SearchError) -> AppError {
    match e {
        SearchError::LocationNotFound => AppError::BadRequest("Location not found".to_string()),
        SearchError::SpecialtyNotFound => AppError::BadRequest("Specialty not found".to_string()),
        SearchError::NoProvidersForInsurance => {
            AppError::NotFound("No providers accept this insurance".to_string())
        }
        SearchError::ProviderNotFound => {
            AppError::NotFound("No provider found with the given NPI".to_string())
        }
        SearchError::Upstream(msg) => AppError::ExternalService(msg),
    }
}

#[derive(Debug, Deserialize)]
pub struct ProviderLookupQuery {
    pub id: Option<String>,
}

#[axum::debug_handler]
pub async fn search_providers_get(
    State(state): State<Arc<SearchState>>,
    Query(request): Query<SearchProvidersRequest>,
) -> Result<Json<Value>, AppError> {
    let results = state.search.search(request).await.map_err(to_app_error)?;
    Ok(Json(json!(results)))
}

#[axum::debug_handler]
pub async fn search_providers_post(
    State(state): State<Arc<SearchState>>,
    Json(request): Json<SearchProvidersRequest>,
) -> Result<Json<Value>, AppError> {
    let results = state.search.search(request).await.map_err(to_app_error)?;
    Ok(Json(json!(results)))
}

#[axum::debug_handler]
pub async fn search_provider_by_npi(
    State(state): State<Arc<SearchState>>,
    Query(query): Query<ProviderLookupQuery>,
) -> Result<Json<Value>, AppError> {
    let npi = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("NPI is required".to_string()))?;

    let provider = state.search.get_provider(&npi).await.map_err(to_app_error)?;
    Ok(Json(json!(provider)))
}
