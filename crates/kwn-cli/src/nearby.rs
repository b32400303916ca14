//! `kwn nearby`: filter and rank the catalog around a point.

use std::path::Path;

use kwn_core::{AreaFilter, Category, Coordinate};
use kwn_discovery::overlay::format_distance;
use kwn_discovery::{filter, rank, FilterCriteria, RankedVenue};

pub(crate) fn criteria(
    categories: &[Category],
    area: AreaFilter,
    query: Option<&str>,
) -> FilterCriteria {
    categories
        .iter()
        .fold(FilterCriteria::default(), |criteria, &category| {
            criteria.with_category(category)
        })
        .with_area(area)
        .with_text(query.unwrap_or_default())
}

/// Print the nearest `limit` venues that pass `criteria`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or fails validation.
pub(crate) fn run_nearby(
    venues_path: &Path,
    reference: Option<Coordinate>,
    criteria: &FilterCriteria,
    limit: usize,
) -> anyhow::Result<()> {
    let catalog = kwn_core::load_venues(venues_path)?;
    let ranked = rank(reference, &filter(&catalog.venues, criteria));

    if ranked.is_empty() {
        println!("no venues match");
        return Ok(());
    }

    for (position, entry) in ranked.iter().take(limit).enumerate() {
        println!("{}", format_row(position + 1, entry));
    }
    if ranked.len() > limit {
        println!("... {} more", ranked.len() - limit);
    }
    Ok(())
}

pub(crate) fn format_row(position: usize, entry: &RankedVenue) -> String {
    let distance = if entry.distance_meters.is_finite() {
        format_distance(entry.distance_meters)
    } else {
        "-".to_owned()
    };
    format!(
        "{position:>3}. {distance:>9}  {:<8} {:<8} {} [{}]",
        entry.venue.category.as_str(),
        entry.venue.area.as_str(),
        entry.venue.name,
        entry.venue.id
    )
}
