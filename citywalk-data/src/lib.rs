//! OpenStreetMap-backed collaborators for the CityWalk planner.
//!
//! Responsibilities:
//! - Resolve city names through Nominatim ([`NominatimGeocoder`]).
//! - Fetch categorised points of interest and railway stations through the
//!   Overpass API ([`OverpassClient`]).
//! - Map OpenStreetMap tags onto planner categories and links.
//!
//! Boundaries:
//! - Do not encode planning rules (they live in `citywalk-core`).
//! - Keep blocking I/O off async executors; the clients bridge to the
//!   synchronous core traits themselves.
//!
//! Invariants:
//! - Transport failures are retried with bounded back-off and never panic.
//! - No global mutable state.

mod error;
mod http;
pub mod nominatim;
pub mod overpass;
mod retry;

pub use error::{ClientBuildError, TransportError};
pub use nominatim::{DEFAULT_NOMINATIM_URL, NominatimConfig, NominatimGeocoder};
pub use overpass::{DEFAULT_OVERPASS_URL, OverpassClient, OverpassConfig};
pub use retry::RetryPolicy;

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("citywalk/", env!("CARGO_PKG_VERSION"));
