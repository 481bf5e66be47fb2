use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_url: String,
    pub store_api_key: String,
    pub geocoder_base_url: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            store_url: env::var("BOOKING_STORE_URL")
                .unwrap_or_else(|_| {
                    warn!("BOOKING_STORE_URL not set, using empty value");
                    String::new()
                }),
            store_api_key: env::var("BOOKING_STORE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("BOOKING_STORE_API_KEY not set, using empty value");
                    String::new()
                }),
            geocoder_base_url: env::var("GEOCODER_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("GEOCODER_BASE_URL not set, using default");
                    "https://nominatim.openstreetmap.org".to_string()
                }),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
        };

        if !config.is_store_configured() {
            warn!("Document store not configured - falling back to the in-memory store");
        }

        config
    }

    /// True when a real document-store gateway is reachable from config.
    pub fn is_store_configured(&self) -> bool {
        !self.store_url.is_empty() && !self.store_api_key.is_empty()
    }
}
