pub mod lookup;
pub mod search;

pub use lookup::{DirectoryGateway, HttpGeocodingLookup};
pub use search::ProviderSearchService;
