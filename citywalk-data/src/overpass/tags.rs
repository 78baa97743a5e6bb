//! Tag utilities for POI extraction.
//!
//! Provides helpers to:
//! - map OpenStreetMap tags to a [`PoiCategory`];
//! - read the display name; and
//! - derive an external reference link.

use std::collections::BTreeMap;

use citywalk_core::PoiCategory;

/// Key/value tags attached to an OpenStreetMap element.
pub type Tags = BTreeMap<String, String>;

/// Language assumed for `wikipedia` tags without a language prefix.
const DEFAULT_WIKIPEDIA_LANGUAGE: &str = "en";

/// Classification of an element for the general POI query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    /// A sightseeing or food stop.
    Poi(PoiCategory),
    /// A railway station, served by the dedicated station query instead.
    Station,
}

/// Classify `tags`, first match wins.
///
/// # Examples
/// ```
/// use citywalk_core::PoiCategory;
/// use citywalk_data::overpass::tags::{TagClass, Tags, classify};
///
/// let tags = Tags::from([("tourism".to_owned(), "museum".to_owned())]);
/// assert_eq!(classify(&tags), TagClass::Poi(PoiCategory::Museum));
/// ```
#[must_use]
pub fn classify(tags: &Tags) -> TagClass {
    let has = |key: &str, value: &str| tags.get(key).is_some_and(|v| v == value);
    let category = if has("amenity", "restaurant") {
        PoiCategory::Restaurant
    } else if has("amenity", "cafe") {
        PoiCategory::Cafe
    } else if has("tourism", "museum") {
        PoiCategory::Museum
    } else if has("leisure", "park") {
        PoiCategory::Park
    } else if has("tourism", "attraction") {
        PoiCategory::Landmark
    } else if tags
        .get("historic")
        .is_some_and(|v| matches!(v.as_str(), "building" | "church" | "castle"))
    {
        PoiCategory::HistoricSite
    } else if has("railway", "station") {
        return TagClass::Station;
    } else {
        PoiCategory::Other
    };
    TagClass::Poi(category)
}

/// The trimmed `name` tag, if present and non-blank.
#[must_use]
pub fn display_name(tags: &Tags) -> Option<&str> {
    tags.get("name")
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
}

/// The `website` tag, else a link derived from the `wikipedia` tag.
///
/// # Examples
/// ```
/// use citywalk_data::overpass::tags::{Tags, derive_link};
///
/// let tags = Tags::from([("wikipedia".to_owned(), "fr:Tour Eiffel".to_owned())]);
/// assert_eq!(
///     derive_link(&tags).as_deref(),
///     Some("https://fr.wikipedia.org/wiki/Tour_Eiffel")
/// );
/// ```
#[must_use]
pub fn derive_link(tags: &Tags) -> Option<String> {
    let website = tags
        .get("website")
        .map(|site| site.trim())
        .filter(|site| !site.is_empty());
    if let Some(site) = website {
        return Some(site.to_owned());
    }
    tags.get("wikipedia").and_then(|value| wikipedia_url(value))
}

fn wikipedia_url(value: &str) -> Option<String> {
    let value = value.trim();
    let (language, title) = match value.split_once(':') {
        Some((prefix, rest)) if is_language_code(prefix) => (prefix, rest.trim()),
        _ => (DEFAULT_WIKIPEDIA_LANGUAGE, value),
    };
    if title.is_empty() {
        return None;
    }
    Some(format!(
        "https://{language}.wikipedia.org/wiki/{}",
        title.replace(' ', "_")
    ))
}

fn is_language_code(prefix: &str) -> bool {
    (2..=12).contains(&prefix.len())
        && prefix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == '-')
}
