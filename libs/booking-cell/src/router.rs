// libs/booking-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use shared_database::BookingStore;

use crate::handlers;
use crate::services::coordinator::BookingCoordinator;

/// Shared state for the booking surface: the coordinator plus direct store
/// access for the plain read/create endpoints. The store is injected at
/// startup; nothing here owns global connection state.
pub struct BookingState {
    pub coordinator: BookingCoordinator,
    pub store: Arc<dyn BookingStore>,
}

pub fn user_routes(store: Arc<dyn BookingStore>) -> Router {
    let state = Arc::new(BookingState {
        coordinator: BookingCoordinator::new(Arc::clone(&store)),
        store,
    });

    Router::new()
        .route("/", post(handlers::create_user))
        .route("/{user_id}", get(handlers::get_user))
        .route("/{user_id}/appointment", post(handlers::book_appointment))
        .route(
            "/{user_id}/appointment/{appointment_id}",
            delete(handlers::cancel_appointment),
        )
        .with_state(state)
}

pub fn schedule_routes(store: Arc<dyn BookingStore>) -> Router {
    let state = Arc::new(BookingState {
        coordinator: BookingCoordinator::new(Arc::clone(&store)),
        store,
    });

    Router::new()
        .route("/{provider_id}", get(handlers::get_provider_schedule))
        .with_state(state)
}
