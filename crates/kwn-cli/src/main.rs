mod nearby;
mod photos;
mod replay;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use kwn_core::{AppConfig, AreaFilter, Category, Coordinate};
use kwn_discovery::{resolve_reference_point, FixedLocation};
use tracing_subscriber::EnvFilter;

use crate::replay::ReplayStep;

#[derive(Debug, Parser)]
#[command(name = "kwn")]
#[command(about = "Kawaii Nights venue discovery")]
struct Cli {
    /// Venue catalog to use instead of `KWN_VENUES_PATH`
    #[arg(long, global = true)]
    venues: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List venues ordered by distance from a point
    Nearby {
        /// Latitude of the reference point (defaults to the fallback point)
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude of the reference point
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
        /// Restrict to a category; repeat for several
        #[arg(long = "category", value_name = "CATEGORY")]
        categories: Vec<Category>,
        /// Area to list, or "all"
        #[arg(long, default_value = "all")]
        area: AreaFilter,
        /// Free-text match on name, concept or address
        #[arg(long)]
        query: Option<String>,
        /// Maximum number of venues to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Resolve gallery photos for one venue
    Photos {
        /// Venue id from the catalog
        venue_id: String,
        #[arg(long)]
        max_width: Option<u32>,
        #[arg(long)]
        max_height: Option<u32>,
        #[arg(long)]
        max_count: Option<usize>,
    },
    /// Load and validate the venue catalog
    Validate,
    /// Feed selection events through a discovery session
    Replay {
        /// Latitude of the reference point (defaults to the fallback point)
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude of the reference point
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
        /// Steps such as `swipe:2`, `tap:<id>`, `card:<id>`, `close`, `next`,
        /// `prev`, `tick`
        #[arg(required = true, value_name = "STEP")]
        steps: Vec<ReplayStep>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = kwn_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let venues_path = cli
        .venues
        .clone()
        .unwrap_or_else(|| config.venues_path.clone());

    match cli.command {
        Some(Commands::Nearby {
            lat,
            lng,
            categories,
            area,
            query,
            limit,
        }) => {
            let reference = reference_point(&config, lat, lng).await;
            let criteria = nearby::criteria(&categories, area, query.as_deref());
            nearby::run_nearby(&venues_path, reference, &criteria, limit)?;
        }
        Some(Commands::Photos {
            venue_id,
            max_width,
            max_height,
            max_count,
        }) => {
            let options = photos::options(&config, max_width, max_height, max_count);
            photos::run_photos(&config, &venues_path, &venue_id, options).await?;
        }
        Some(Commands::Validate) => {
            let file = kwn_core::load_venues(&venues_path)?;
            println!(
                "{}: {} venues OK",
                venues_path.display(),
                file.venues.len()
            );
        }
        Some(Commands::Replay { lat, lng, steps }) => {
            let reference = reference_point(&config, lat, lng).await;
            replay::run_replay(&config, &venues_path, reference, &steps).await?;
        }
        None => println!("kwn: no command given, see `kwn --help`"),
    }

    Ok(())
}

/// Explicit `--lat/--lng`, otherwise the configured fallback point.
async fn reference_point(
    config: &AppConfig,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Option<Coordinate> {
    let requested = lat.zip(lng).map(|(lat, lng)| Coordinate::new(lat, lng));
    resolve_reference_point(
        &FixedLocation(requested),
        Duration::from_millis(config.geolocation_timeout_ms),
        Some(config.fallback_reference),
    )
    .await
}

#[cfg(test)]
mod tests;
