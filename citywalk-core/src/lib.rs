//! Core planning logic for CityWalk.
//!
//! The crate turns a city name and a time budget into an ordered walking
//! itinerary. Network access sits behind the [`Geocoder`] and [`PoiSource`]
//! traits so the planning pipeline stays deterministic and testable:
//!
//! - [`selection`] narrows candidates into a diverse working set;
//! - [`sequencing`] orders that set greedily within the budget;
//! - [`RoutePlanner`] runs the whole pipeline and returns a [`RoutePlan`].
//!
//! # Examples
//! ```
//! use citywalk_core::test_support::{MemoryPoiSource, StaticGeocoder, poi};
//! use citywalk_core::{CityLocation, PlanRequest, PoiCategory, RoutePlanner};
//!
//! # fn main() -> Result<(), citywalk_core::PlanError> {
//! let center = CityLocation::new(41.9, 12.5);
//! let source = MemoryPoiSource::with_pois([
//!     poi(1, 41.901, 12.5, PoiCategory::Landmark),
//!     poi(2, 41.902, 12.501, PoiCategory::Museum),
//! ]);
//! let planner = RoutePlanner::new(StaticGeocoder::around(center), source);
//! let plan = planner.plan(&PlanRequest::new("Rome", 3.0).with_seed(42))?;
//! assert!(plan.stops[0].is_virtual());
//! assert!(plan.estimated_time_hours <= 3.0);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod category;
mod config;
mod location;
mod plan;
mod planner;
mod poi;
mod source;

pub mod geometry;
pub mod selection;
pub mod sequencing;

#[doc(hidden)]
pub mod test_support;

pub use category::PoiCategory;
pub use config::PlannerConfig;
pub use location::{BoundingBox, BoundingBoxError, CityLocation};
pub use plan::{RoutePlan, assemble};
pub use planner::{PlanError, PlanRequest, PlanRequestError, RoutePlanner};
pub use poi::{Poi, PoiError, VIRTUAL_START_ID, VIRTUAL_START_NAME};
pub use source::{GeocodeError, GeocodedCity, Geocoder, PoiSource};
