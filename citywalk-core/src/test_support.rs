//! In-memory collaborators and builders for unit and behaviour tests.
//!
//! Nothing here touches the network. The module is hidden from the public
//! documentation but compiled unconditionally so integration tests in every
//! workspace crate can share it.

use std::cell::Cell;
use std::f64::consts::PI;

use crate::geometry::EARTH_RADIUS_KM;
use crate::{
    BoundingBox, CityLocation, GeocodeError, GeocodedCity, Geocoder, Poi, PoiCategory, PoiSource,
};

/// Half the side of the box [`StaticGeocoder::around`] reports, in degrees.
pub const DEFAULT_HALF_SPAN_DEG: f64 = 0.05;

/// Build a POI named after its id.
///
/// Coordinates are not validated.
///
/// # Examples
/// ```rust
/// use citywalk_core::PoiCategory;
/// use citywalk_core::test_support::poi;
///
/// let poi = poi(4, 1.0, 2.0, PoiCategory::Museum);
/// assert_eq!(poi.name(), "POI 4");
/// ```
#[must_use]
pub fn poi(id: i64, lat: f64, lon: f64, category: PoiCategory) -> Poi {
    Poi::from_parts(id, CityLocation::new(lat, lon), format!("POI {id}"), category)
}

/// Build a POI `km` kilometres due north of `(0, 0)`.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "converts kilometres to degrees")]
pub fn poi_at_km(id: i64, km: f64, category: PoiCategory) -> Poi {
    let km_per_degree = EARTH_RADIUS_KM * PI / 180.0;
    poi(id, km / km_per_degree, 0.0, category)
}

/// A [`Geocoder`] resolving every city to the same place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticGeocoder {
    city: GeocodedCity,
}

impl StaticGeocoder {
    /// Resolve to `city`.
    #[must_use]
    pub const fn new(city: GeocodedCity) -> Self {
        Self { city }
    }

    /// Resolve to `center` with a square box [`DEFAULT_HALF_SPAN_DEG`] either
    /// side of it.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "offsets the box edges")]
    pub fn around(center: CityLocation) -> Self {
        let bbox = BoundingBox::from_edges(
            center.lat - DEFAULT_HALF_SPAN_DEG,
            center.lat + DEFAULT_HALF_SPAN_DEG,
            center.lon - DEFAULT_HALF_SPAN_DEG,
            center.lon + DEFAULT_HALF_SPAN_DEG,
        );
        Self::new(GeocodedCity { center, bbox })
    }
}

impl Geocoder for StaticGeocoder {
    fn geocode(&self, _city: &str) -> Result<GeocodedCity, GeocodeError> {
        Ok(self.city)
    }
}

/// A [`Geocoder`] that knows no cities.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingGeocoder;

impl Geocoder for FailingGeocoder {
    fn geocode(&self, city: &str) -> Result<GeocodedCity, GeocodeError> {
        Err(GeocodeError::NotFound {
            city: city.to_owned(),
        })
    }
}

/// A [`PoiSource`] serving a fixed list.
///
/// POIs outside the requested box are filtered out. The number of
/// [`PoiSource::fetch_pois`] calls is recorded.
#[derive(Debug, Default, Clone)]
pub struct MemoryPoiSource {
    pois: Vec<Poi>,
    station: Option<Poi>,
    fetches: Cell<usize>,
}

impl MemoryPoiSource {
    /// Serve `pois`.
    pub fn with_pois<I>(pois: I) -> Self
    where
        I: IntoIterator<Item = Poi>,
    {
        Self {
            pois: pois.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Also serve `station` from [`PoiSource::fetch_station`].
    #[must_use]
    pub fn with_station(mut self, station: Poi) -> Self {
        self.station = Some(station);
        self
    }

    /// How often [`PoiSource::fetch_pois`] has been called.
    #[must_use]
    pub const fn fetch_count(&self) -> usize {
        self.fetches.get()
    }
}

impl PoiSource for MemoryPoiSource {
    fn fetch_station(&self, _bbox: &BoundingBox, _city_center: CityLocation) -> Option<Poi> {
        self.station.clone()
    }

    fn fetch_pois(&self, bbox: &BoundingBox) -> Vec<Poi> {
        self.fetches.set(self.fetches.get().saturating_add(1));
        self.pois
            .iter()
            .filter(|poi| bbox.contains(poi.location()))
            .cloned()
            .collect()
    }
}
