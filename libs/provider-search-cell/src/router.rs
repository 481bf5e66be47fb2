// libs/provider-search-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers::{self, SearchState};

pub fn provider_routes(state: Arc<SearchState>) -> Router {
    Router::new()
        .route(
            "/search",
            get(handlers::search_providers_get).post(handlers::search_providers_post),
        )
        .route("/search-provider", get(handlers::search_provider_by_npi))
        .with_state(state)
}
