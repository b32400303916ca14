//! Category, area and free-text filtering.

use std::collections::BTreeSet;

use kwn_core::{AreaFilter, Category, Venue};

/// Constraints a venue must satisfy to be listed. The default admits
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Empty means every category.
    pub categories: BTreeSet<Category>,
    pub area: AreaFilter,
    pub text: String,
}

impl FilterCriteria {
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.insert(category);
        self
    }

    /// Adds `category` if absent, removes it if present.
    pub fn toggle_category(&mut self, category: Category) {
        if !self.categories.remove(&category) {
            self.categories.insert(category);
        }
    }

    #[must_use]
    pub fn with_area(mut self, area: AreaFilter) -> Self {
        self.area = area;
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn matches(&self, venue: &Venue) -> bool {
        let category_ok =
            self.categories.is_empty() || self.categories.contains(&venue.category);
        category_ok && self.area.admits(&venue.area) && self.text_matches(venue)
    }

    fn text_matches(&self, venue: &Venue) -> bool {
        let needle = self.text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            Some(venue.name.as_str()),
            venue.concept.as_deref(),
            Some(venue.address.as_str()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Venues that satisfy `criteria`, in input order.
#[must_use]
pub fn filter(venues: &[Venue], criteria: &FilterCriteria) -> Vec<Venue> {
    venues
        .iter()
        .filter(|venue| criteria.matches(venue))
        .cloned()
        .collect()
}
