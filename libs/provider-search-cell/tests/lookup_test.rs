use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use provider_search_cell::contracts::{GeocodingLookup, ProviderDirectory, TaxonomyLookup};
use provider_search_cell::models::{Address, GeoPoint, TaxonomyCode};
use provider_search_cell::services::lookup::{DirectoryGateway, HttpGeocodingLookup};
use shared_config::AppConfig;

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        store_url: server.uri(),
        store_api_key: "test-key".to_string(),
        geocoder_base_url: server.uri(),
        port: 0,
    }
}

#[tokio::test]
async fn geocoder_parses_the_first_hit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "1"))
        .and(query_param("city", "New York"))
        .and(query_param("postalcode", "10001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"lat": "40.7128", "lon": "-74.0060"},
            {"lat": "0.0", "lon": "0.0"}
        ])))
        .mount(&server)
        .await;

    let geocoder = HttpGeocodingLookup::new(&config_for(&server));
    let point = geocoder
        .resolve(&Address {
            city: Some("New York".to_string()),
            zip: Some("10001".to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
        .unwrap();

    assert!((point.lat - 40.7128).abs() < 1e-9);
    assert!((point.lon - -74.0060).abs() < 1e-9);
}

#[tokio::test]
async fn geocoder_empty_result_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let geocoder = HttpGeocodingLookup::new(&config_for(&server));
    let point = geocoder.resolve(&Address::default()).await.unwrap();
    assert!(point.is_none());
}

#[tokio::test]
async fn geocoder_error_status_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let geocoder = HttpGeocodingLookup::new(&config_for(&server));
    assert!(geocoder.resolve(&Address::default()).await.is_err());
}

#[tokio::test]
async fn taxonomy_lookup_takes_the_first_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/taxonomy"))
        .and(query_param("specialty", "Family Medicine"))
        .and(header("x-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"code": "207Q00000X"},
            {"code": "208D00000X"}
        ])))
        .mount(&server)
        .await;

    let gateway = DirectoryGateway::new(&config_for(&server));
    let code = gateway.code_for("Family Medicine").await.unwrap();
    assert_eq!(code, Some(TaxonomyCode("207Q00000X".to_string())));
}

#[tokio::test]
async fn nearby_query_carries_all_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/providers/nearby"))
        .and(query_param("radius_meters", "16093.4"))
        .and(query_param("limit", "20"))
        .and(query_param("taxonomy", "207Q00000X"))
        .and(query_param("providers", "100,200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"npi": "100", "name": "Dr. One", "distance_meters": 900.0}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = DirectoryGateway::new(&config_for(&server));
    let results = gateway
        .find_nearby(
            GeoPoint {
                lat: 40.7128,
                lon: -74.0060,
            },
            16093.4,
            Some(&TaxonomyCode("207Q00000X".to_string())),
            Some(&["100".to_string(), "200".to_string()]),
            20,
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].npi, "100");
    // taxonomy_codes is optional in the wire format.
    assert!(results[0].taxonomy_codes.is_empty());
}

#[tokio::test]
async fn npi_lookup_returns_none_for_empty_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/providers"))
        .and(query_param("npi", "999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let gateway = DirectoryGateway::new(&config_for(&server));
    assert!(gateway.find_by_npi("999").await.unwrap().is_none());
}
