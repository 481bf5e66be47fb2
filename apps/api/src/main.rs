use std::net::SocketAddr;
use std::sync::Arc;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use provider_search_cell::handlers::SearchState;
use provider_search_cell::services::lookup::{DirectoryGateway, HttpGeocodingLookup};
use provider_search_cell::services::search::ProviderSearchService;
use shared_config::AppConfig;
use shared_database::{BookingStore, MemoryDocumentStore, RestDocumentStore};

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareFinder API server");

    // Load configuration
    let config = AppConfig::from_env();

    // The store is constructed once here and injected everywhere; its
    // lifecycle belongs to the process, not to any module.
    let store: Arc<dyn BookingStore> = if config.is_store_configured() {
        Arc::new(RestDocumentStore::new(&config))
    } else {
        info!("Running against the in-memory store");
        Arc::new(MemoryDocumentStore::new())
    };

    let gateway = Arc::new(DirectoryGateway::new(&config));
    let search_state = Arc::new(SearchState {
        search: ProviderSearchService::new(
            Arc::new(HttpGeocodingLookup::new(&config)),
            gateway.clone(),
            gateway,
        ),
    });

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(store, search_state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .await
        .unwrap();
}
