use kwn_core::{Area, Venue, VenueId};
use kwn_discovery::{DiscoveryEngine, EngineSettings, RankedVenue, Selection, ViewUpdate};
use kwn_places::PlacesClient;

use super::*;
use crate::replay::{apply_step, describe};

#[test]
fn parses_validate_command() {
    let cli = Cli::try_parse_from(["kwn", "validate"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Validate)));
    assert!(cli.venues.is_none());
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["kwn"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn global_venues_flag_after_subcommand() {
    let cli = Cli::try_parse_from(["kwn", "validate", "--venues", "/tmp/v.yaml"])
        .expect("expected valid cli args");
    assert_eq!(cli.venues, Some(PathBuf::from("/tmp/v.yaml")));
}

#[test]
fn nearby_defaults() {
    let cli = Cli::try_parse_from(["kwn", "nearby"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Nearby {
            lat: None,
            lng: None,
            ref categories,
            area: AreaFilter::All,
            query: None,
            limit: 20,
        }) if categories.is_empty()
    ));
}

#[test]
fn nearby_with_point_and_filters() {
    let cli = Cli::try_parse_from([
        "kwn",
        "nearby",
        "--lat",
        "34.6661",
        "--lng",
        "135.5013",
        "--category",
        "concafe",
        "--category",
        "GirlsBar",
        "--area",
        "osaka",
        "--query",
        "maid",
        "--limit",
        "5",
    ])
    .unwrap();

    let Some(Commands::Nearby {
        lat,
        lng,
        categories,
        area,
        query,
        limit,
    }) = cli.command
    else {
        panic!("expected nearby command");
    };
    assert_eq!(lat, Some(34.6661));
    assert_eq!(lng, Some(135.5013));
    assert_eq!(categories, vec![Category::Concafe, Category::Girlsbar]);
    assert_eq!(area, AreaFilter::Only(Area::Osaka));
    assert_eq!(query.as_deref(), Some("maid"));
    assert_eq!(limit, 5);
}

#[test]
fn nearby_lat_requires_lng() {
    assert!(Cli::try_parse_from(["kwn", "nearby", "--lat", "35.0"]).is_err());
}

#[test]
fn nearby_rejects_unknown_category() {
    assert!(Cli::try_parse_from(["kwn", "nearby", "--category", "karaoke"]).is_err());
}

#[test]
fn photos_takes_venue_id_and_sizes() {
    let cli = Cli::try_parse_from(["kwn", "photos", "maid-dream", "--max-count", "3"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Photos {
            ref venue_id,
            max_width: None,
            max_height: None,
            max_count: Some(3),
        }) if venue_id == "maid-dream"
    ));
}

#[test]
fn replay_parses_steps() {
    let cli = Cli::try_parse_from(["kwn", "replay", "swipe:2", "tap:lumiere", "close", "tick"])
        .unwrap();
    let Some(Commands::Replay { steps, .. }) = cli.command else {
        panic!("expected replay command");
    };
    assert_eq!(
        steps,
        vec![
            ReplayStep::Swipe(2),
            ReplayStep::Tap(VenueId::from("lumiere")),
            ReplayStep::Close,
            ReplayStep::Tick,
        ]
    );
}

#[test]
fn replay_requires_steps_and_rejects_bad_ones() {
    assert!(Cli::try_parse_from(["kwn", "replay"]).is_err());
    assert!(Cli::try_parse_from(["kwn", "replay", "swipe:x"]).is_err());
    assert!(Cli::try_parse_from(["kwn", "replay", "tap:"]).is_err());
    assert!(Cli::try_parse_from(["kwn", "replay", "close:1"]).is_err());
}

#[test]
fn replay_step_display_round_trips() {
    for raw in ["swipe:4", "tap:a", "card:b", "close", "next", "prev", "tick"] {
        let step: ReplayStep = raw.parse().expect("valid step");
        assert_eq!(step.to_string(), raw);
    }
}

fn venue(id: &str, lat: f64, lng: f64) -> Venue {
    Venue::new(id, format!("Venue {id}"), Coordinate::new(lat, lng), Category::Concafe)
}

#[test]
fn replayed_steps_drive_the_engine() {
    let mut engine = DiscoveryEngine::<PlacesClient>::new(
        EngineSettings {
            autoplay_ms: 0,
            ..EngineSettings::default()
        },
        None,
    );
    engine.set_reference_point(Some(Coordinate::TOKYO_STATION));
    engine.replace_venues(vec![
        venue("far", 34.6661, 135.5013),
        venue("near", 35.6984, 139.7731),
    ]);

    let updates = apply_step(&mut engine, &ReplayStep::Swipe(1));
    assert_eq!(updates, vec![ViewUpdate::SelectMarker(VenueId::from("far"))]);

    let updates = apply_step(&mut engine, &ReplayStep::Tap(VenueId::from("near")));
    assert_eq!(
        updates,
        vec![
            ViewUpdate::ScrollCarousel(0),
            ViewUpdate::ShowOverlay(VenueId::from("near")),
        ]
    );
    assert_eq!(
        describe(engine.selection(), engine.overlay_venue()),
        "selected=near index=0 overlay=near"
    );

    apply_step(&mut engine, &ReplayStep::Close);
    assert_eq!(
        describe(engine.selection(), engine.overlay_venue()),
        "selected=near index=0 overlay=-"
    );
}

#[test]
fn describe_idle() {
    assert_eq!(describe(&Selection::Idle, None), "idle overlay=-");
}

#[test]
fn criteria_from_flags() {
    let criteria = nearby::criteria(
        &[Category::Hostclub],
        AreaFilter::Only(Area::Tokyo),
        Some("club"),
    );
    assert!(criteria.categories.contains(&Category::Hostclub));
    assert_eq!(criteria.area, AreaFilter::Only(Area::Tokyo));
    assert_eq!(criteria.text, "club");
}

#[test]
fn nearby_row_formats_distance() {
    let row = nearby::format_row(
        1,
        &RankedVenue {
            venue: venue("near", 35.6984, 139.7731),
            distance_meters: 1_983.4,
        },
    );
    assert_eq!(row, "  1.    2.0 km  concafe  other    Venue near [near]");
}

#[test]
fn photo_options_flags_override_config() {
    let config = kwn_core::AppConfig {
        env: kwn_core::Environment::Test,
        log_level: "info".to_owned(),
        venues_path: "./config/venues.yaml".into(),
        places_api_key: None,
        places_base_url: "https://places.example.com".to_owned(),
        places_request_timeout_secs: 5,
        places_user_agent: "kwn-test/0.1".to_owned(),
        places_max_retries: 0,
        places_retry_backoff_base_ms: 0,
        places_bias_radius_m: 500.0,
        photo_max_width: 1280,
        photo_max_height: 960,
        photo_max_count: 6,
        fallback_reference: Coordinate::TOKYO_STATION,
        geolocation_timeout_ms: 100,
        carousel_autoplay_ms: 0,
        carousel_window: 12,
    };
    let options = photos::options(&config, Some(400), None, Some(0));
    assert_eq!(options.max_width, 400);
    assert_eq!(options.max_height, 960);
    assert_eq!(options.max_count, 1);
}
