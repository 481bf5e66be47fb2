use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use booking_cell::router::{schedule_routes, user_routes};
use provider_search_cell::handlers::SearchState;
use provider_search_cell::router::provider_routes;
use shared_database::BookingStore;

pub fn create_router(store: Arc<dyn BookingStore>, search: Arc<SearchState>) -> Router {
    Router::new()
        .route("/", get(|| async { "CareFinder API is running!" }))
        .nest("/users", user_routes(Arc::clone(&store)))
        .nest("/provider-schedules", schedule_routes(store))
        .nest("/providers", provider_routes(search))
}
