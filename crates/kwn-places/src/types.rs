//! Photo types shared by the cache and the HTTP client, plus the wire shapes
//! of the places v1 REST API.

use serde::{Deserialize, Serialize};

/// One photo reference ready for display.
///
/// `attributions_html` must be rendered next to the photo whenever it is
/// non-empty; the lookup service's terms require visible attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoItem {
    pub url: String,
    pub attributions_html: Vec<String>,
}

impl PhotoItem {
    /// A venue-owned image; these carry no third-party attribution.
    pub fn owned(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            attributions_html: Vec::new(),
        }
    }
}

/// Requested photo size and count. Part of the cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhotoOptions {
    pub max_width: u32,
    pub max_height: u32,
    pub max_count: usize,
}

impl Default for PhotoOptions {
    fn default() -> Self {
        Self {
            max_width: 1280,
            max_height: 960,
            max_count: 6,
        }
    }
}

impl PhotoOptions {
    #[must_use]
    pub fn from_app_config(config: &kwn_core::AppConfig) -> Self {
        Self {
            max_width: config.photo_max_width,
            max_height: config.photo_max_height,
            max_count: config.photo_max_count,
        }
    }
}

// ---------------------------------------------------------------------------
// places:searchText
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchTextRequest<'a> {
    pub text_query: &'a str,
    pub max_result_count: u32,
    pub location_bias: LocationBias,
}

#[derive(Debug, Serialize)]
pub(crate) struct LocationBias {
    pub circle: Circle,
}

#[derive(Debug, Serialize)]
pub(crate) struct Circle {
    pub center: LatLng,
    pub radius: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchTextResponse {
    #[serde(default)]
    pub places: Vec<PlaceRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaceRef {
    pub id: String,
}

// ---------------------------------------------------------------------------
// places/{id}
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct PlaceDetails {
    #[serde(default)]
    pub photos: Vec<PlacePhoto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlacePhoto {
    /// Resource name, `places/{place_id}/photos/{photo_ref}`.
    pub name: String,
    #[serde(default)]
    pub author_attributions: Vec<AuthorAttribution>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthorAttribution {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub uri: Option<String>,
}

impl AuthorAttribution {
    /// Render as the HTML snippet shown under the photo.
    pub(crate) fn to_html(&self) -> String {
        let name = escape_html(&self.display_name);
        match self.uri.as_deref().filter(|u| !u.trim().is_empty()) {
            Some(uri) => format!("<a href=\"{}\">{name}</a>", escape_html(uri)),
            None => name,
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
