pub mod contracts;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use contracts::{GeocodingLookup, ProviderDirectory, TaxonomyLookup};
pub use models::*;
pub use services::search::ProviderSearchService;
