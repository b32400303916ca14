//! End-to-end browsing session: YAML catalog, ranking, selection and photo
//! lookup against a wiremock places service.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use kwn_core::{Coordinate, VenueId};
use kwn_discovery::{DiscoveryEngine, EngineSettings, ViewUpdate, YamlVenueSource};
use kwn_places::{PhotoCache, PlacesClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CATALOG: &str = r"
venues:
  - id: osaka-night
    name: Namba Night Bar
    lat: 34.6661
    lng: 135.5013
    category: girlsbar
    area: osaka
  - id: maid-dream
    name: Maid Dream Akiba
    address: Sotokanda 3-16
    lat: 35.7006
    lng: 139.7713
    category: concafe
    area: tokyo
    images:
      - https://img.example.com/maid-dream.jpg
  - id: lumiere
    name: Club Lumiere
    lat: 35.6938
    lng: 139.7034
    category: hostclub
    area: tokyo
    external_place_id: ChIJlumiere
";

fn write_catalog() -> PathBuf {
    let path = std::env::temp_dir().join(format!("kwn-session-{}.yaml", std::process::id()));
    let mut file = std::fs::File::create(&path).expect("create catalog");
    file.write_all(CATALOG.as_bytes()).expect("write catalog");
    path
}

#[tokio::test]
async fn browse_select_and_open_overlay() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/places/ChIJlumiere"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "photos": [
                {
                    "name": "places/ChIJlumiere/photos/P1",
                    "authorAttributions": [ { "displayName": "Ren", "uri": "https://example.com/ren" } ]
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/places:searchText"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = PlacesClient::with_base_url("test-key", 5, "kwn-test/0.1", &server.uri())
        .expect("client construction should not fail");
    let cache = Arc::new(PhotoCache::new(client));
    let mut engine = DiscoveryEngine::new(
        EngineSettings {
            autoplay_ms: 0,
            ..EngineSettings::default()
        },
        Some(cache),
    );

    let catalog = write_catalog();
    engine.set_reference_point(Some(Coordinate::TOKYO_STATION));
    let updates = engine.refresh(&YamlVenueSource::new(&catalog)).await;
    std::fs::remove_file(&catalog).ok();

    assert_eq!(
        updates,
        vec![
            ViewUpdate::ScrollCarousel(0),
            ViewUpdate::SelectMarker(VenueId::from("maid-dream")),
        ]
    );

    // Venue with a known place id: photos come from the service.
    let updates = engine.map_marker_tapped(&VenueId::from("lumiere"));
    assert_eq!(
        updates,
        vec![
            ViewUpdate::ScrollCarousel(1),
            ViewUpdate::ShowOverlay(VenueId::from("lumiere")),
        ]
    );
    let view = engine.overlay().await.expect("overlay open");
    assert_eq!(view.gallery.len(), 1);
    assert!(view.gallery[0]
        .url
        .ends_with("/v1/places/ChIJlumiere/photos/P1/media?maxWidthPx=1280&maxHeightPx=960&key=test-key"));
    assert_eq!(
        view.gallery[0].attributions_html,
        vec!["<a href=\"https://example.com/ren\">Ren</a>".to_owned()]
    );
    engine.overlay().await.expect("overlay still open");

    // Lookup fails: the venue's own image is shown, and the failure sticks.
    engine.overlay_closed();
    engine.card_activated(VenueId::from("maid-dream"));
    for _ in 0..2 {
        let view = engine.overlay().await.expect("overlay open");
        assert_eq!(view.gallery.len(), 1);
        assert_eq!(view.gallery[0].url, "https://img.example.com/maid-dream.jpg");
        assert!(view.gallery[0].attributions_html.is_empty());
    }
}
