//! Collaborator traits for geocoding and POI acquisition.
//!
//! The planner never talks to the network itself. Implementations live in
//! `citywalk-data`; tests use the in-memory doubles from `test_support`.

use thiserror::Error;

use crate::{BoundingBox, CityLocation, Poi};

/// A resolved city: its center and the region to search for stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocodedCity {
    /// Geocoded city center.
    pub center: CityLocation,
    /// Search region around the city.
    pub bbox: BoundingBox,
}

/// Errors raised while resolving a city name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The geocoder returned no match.
    #[error("city '{city}' could not be found")]
    NotFound {
        /// Requested city name.
        city: String,
    },
    /// The geocoder could not be reached.
    #[error("geocoding '{city}' failed: {message}")]
    Transport {
        /// Requested city name.
        city: String,
        /// Description of the final failure.
        message: String,
    },
    /// The geocoder answered with data that could not be interpreted.
    #[error("geocoder returned an invalid response for '{city}': {message}")]
    InvalidResponse {
        /// Requested city name.
        city: String,
        /// Description of the defect.
        message: String,
    },
}

/// Resolves city names to coordinates.
pub trait Geocoder {
    /// Resolve `city` to its center and bounding box.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] when the city is unknown or the lookup fails.
    fn geocode(&self, city: &str) -> Result<GeocodedCity, GeocodeError>;
}

/// Supplies categorised points of interest.
///
/// Both methods are infallible: sources absorb transport failures and
/// return an empty result, which the planner treats as "nothing found".
pub trait PoiSource {
    /// The railway station in `bbox` closest to `city_center`, if any.
    fn fetch_station(&self, bbox: &BoundingBox, city_center: CityLocation) -> Option<Poi>;

    /// Every named, categorised POI in `bbox`.
    fn fetch_pois(&self, bbox: &BoundingBox) -> Vec<Poi>;
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn geocode(&self, city: &str) -> Result<GeocodedCity, GeocodeError> {
        (**self).geocode(city)
    }
}

impl<T: PoiSource + ?Sized> PoiSource for &T {
    fn fetch_station(&self, bbox: &BoundingBox, city_center: CityLocation) -> Option<Poi> {
        (**self).fetch_station(bbox, city_center)
    }

    fn fetch_pois(&self, bbox: &BoundingBox) -> Vec<Poi> {
        (**self).fetch_pois(bbox)
    }
}
