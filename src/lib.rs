//! Facade crate for the CityWalk itinerary planner.
//!
//! This crate re-exports the core planning types and exposes the
//! OpenStreetMap-backed collaborators behind the `http` feature.

#![forbid(unsafe_code)]

pub use citywalk_core::{
    BoundingBox, CityLocation, GeocodeError, GeocodedCity, Geocoder, PlanError, PlanRequest,
    PlanRequestError, PlannerConfig, Poi, PoiCategory, PoiSource, RoutePlan, RoutePlanner,
};

#[cfg(feature = "http")]
pub use citywalk_data::{
    ClientBuildError, NominatimConfig, NominatimGeocoder, OverpassClient, OverpassConfig,
    RetryPolicy, TransportError,
};
