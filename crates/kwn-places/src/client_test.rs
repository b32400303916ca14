use super::*;

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", 30, "kwn-test/0.1", base_url)
        .expect("client construction should not fail")
}

#[test]
fn endpoint_appends_segments_to_root() {
    let client = test_client("https://places.example.com");
    let url = client.endpoint(&["v1", "places:searchText"]).unwrap();
    assert_eq!(url.as_str(), "https://places.example.com/v1/places:searchText");
}

#[test]
fn endpoint_strips_trailing_slash() {
    let client = test_client("https://places.example.com///");
    let url = client.endpoint(&["v1", "places", "ChIJabc"]).unwrap();
    assert_eq!(url.as_str(), "https://places.example.com/v1/places/ChIJabc");
}

#[test]
fn endpoint_keeps_base_path_prefix() {
    let client = test_client("http://127.0.0.1:8080/proxy");
    let url = client.endpoint(&["v1", "places", "abc"]).unwrap();
    assert_eq!(url.as_str(), "http://127.0.0.1:8080/proxy/v1/places/abc");
}

#[test]
fn endpoint_encodes_place_id_as_single_segment() {
    let client = test_client("https://places.example.com");
    let url = client.endpoint(&["v1", "places", "a/b c"]).unwrap();
    assert_eq!(url.as_str(), "https://places.example.com/v1/places/a%2Fb%20c");
}

#[test]
fn media_url_carries_size_and_key() {
    let client = test_client("https://places.example.com");
    let options = PhotoOptions {
        max_width: 800,
        max_height: 600,
        max_count: 3,
    };
    let url = client
        .media_url("places/ChIJabc/photos/AUc7", options)
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://places.example.com/v1/places/ChIJabc/photos/AUc7/media?maxWidthPx=800&maxHeightPx=600&key=test-key"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = PlacesClient::with_base_url("k", 5, "ua", "not a url");
    assert!(matches!(result, Err(PlacesError::InvalidBaseUrl(_))));
}

#[test]
fn redact_key_drops_query() {
    let url = Url::parse("https://places.example.com/v1/x/media?key=secret&maxWidthPx=1").unwrap();
    assert_eq!(redact_key(&url), "https://places.example.com/v1/x/media");
}

fn app_config(api_key: Option<&str>) -> kwn_core::AppConfig {
    kwn_core::AppConfig {
        env: kwn_core::Environment::Test,
        log_level: "info".to_owned(),
        venues_path: "./config/venues.yaml".into(),
        places_api_key: api_key.map(str::to_owned),
        places_base_url: "https://places.example.com".to_owned(),
        places_request_timeout_secs: 5,
        places_user_agent: "kwn-test/0.1".to_owned(),
        places_max_retries: 1,
        places_retry_backoff_base_ms: 0,
        places_bias_radius_m: 250.0,
        photo_max_width: 640,
        photo_max_height: 480,
        photo_max_count: 2,
        fallback_reference: kwn_core::Coordinate::TOKYO_STATION,
        geolocation_timeout_ms: 100,
        carousel_autoplay_ms: 0,
        carousel_window: 12,
    }
}

#[test]
fn from_app_config_requires_api_key() {
    assert!(matches!(
        PlacesClient::from_app_config(&app_config(None)),
        Err(PlacesError::MissingApiKey)
    ));
}

#[test]
fn from_app_config_applies_settings() {
    let client = PlacesClient::from_app_config(&app_config(Some("k"))).unwrap();
    assert_eq!(client.base_url.as_str(), "https://places.example.com/");
    assert_eq!(client.max_retries, 1);
    assert!((client.bias_radius_m - 250.0).abs() < f64::EPSILON);
}

#[test]
fn photo_options_follow_app_config() {
    let options = PhotoOptions::from_app_config(&app_config(None));
    assert_eq!(
        options,
        PhotoOptions {
            max_width: 640,
            max_height: 480,
            max_count: 2,
        }
    );
}
