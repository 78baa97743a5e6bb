//! DTOs for decoding Overpass JSON responses.
//!
//! The client decodes into these transport DTOs first, then maps them into
//! domain [`Poi`] records in one pass. Elements that cannot become a valid
//! POI are skipped rather than failing the whole response.

use std::collections::HashSet;

use citywalk_core::{Poi, PoiCategory};
use serde::Deserialize;

use super::tags::{TagClass, Tags, classify, derive_link, display_name};

#[derive(Debug, Deserialize)]
pub(super) struct OverpassResponseDto {
    #[serde(default)]
    pub(super) elements: Vec<OverpassElementDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OverpassElementDto {
    #[serde(rename = "type", default)]
    pub(super) element_type: String,
    pub(super) id: i64,
    pub(super) lat: Option<f64>,
    pub(super) lon: Option<f64>,
    pub(super) center: Option<OverpassElementCenterDto>,
    #[serde(default)]
    pub(super) tags: Tags,
}

#[derive(Debug, Deserialize)]
pub(super) struct OverpassElementCenterDto {
    pub(super) lat: f64,
    pub(super) lon: f64,
}

impl OverpassResponseDto {
    /// Named, categorised POIs; stations are excluded.
    pub(super) fn into_pois(self) -> Vec<Poi> {
        self.collect(|tags| match classify(tags) {
            TagClass::Poi(category) => Some(category),
            TagClass::Station => None,
        })
    }

    /// Named stations, categorised as [`PoiCategory::Other`].
    pub(super) fn into_stations(self) -> Vec<Poi> {
        self.collect(|_| Some(PoiCategory::Other))
    }

    fn collect<F>(self, categorize: F) -> Vec<Poi>
    where
        F: Fn(&Tags) -> Option<PoiCategory>,
    {
        let mut seen = HashSet::new();
        let mut pois = Vec::with_capacity(self.elements.len());
        for element in self.elements {
            let Some(category) = categorize(&element.tags) else {
                continue;
            };
            let Some(poi) = element.into_poi(category) else {
                continue;
            };
            if seen.insert(poi.id()) {
                pois.push(poi);
            } else {
                log::debug!("skipping duplicate element id {}", poi.id());
            }
        }
        pois
    }
}

impl OverpassElementDto {
    fn into_poi(self, category: PoiCategory) -> Option<Poi> {
        let Some(name) = display_name(&self.tags) else {
            log::trace!("skipping unnamed {} {}", self.element_type, self.id);
            return None;
        };
        let Some((lat, lon)) = self.coordinates() else {
            log::debug!("skipping {} {}: missing coordinates", self.element_type, self.id);
            return None;
        };
        let link = derive_link(&self.tags);
        match Poi::new(self.id, lat, lon, name, category) {
            Ok(poi) => Some(match link {
                Some(link) => poi.with_link(link),
                None => poi,
            }),
            Err(err) => {
                log::debug!("skipping {} {}: {err}", self.element_type, self.id);
                None
            }
        }
    }

    fn coordinates(&self) -> Option<(f64, f64)> {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return Some((lat, lon));
        }
        self.center.as_ref().map(|center| (center.lat, center.lon))
    }
}
