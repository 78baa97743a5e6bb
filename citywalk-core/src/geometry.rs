//! Stateless geometry helpers.
//!
//! Great-circle distance drives every walking-time estimate in the planner.
//! The projection helpers map WGS84 coordinates onto the unit square used by
//! slippy-map renderers (`x` grows east, `y` grows south).

use std::f64::consts::{FRAC_PI_4, PI};

use crate::{BoundingBox, CityLocation};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometres.
///
/// # Examples
/// ```
/// use citywalk_core::CityLocation;
/// use citywalk_core::geometry::distance_km;
///
/// let paris = CityLocation::new(48.8566, 2.3522);
/// let london = CityLocation::new(51.5074, -0.1278);
/// let km = distance_km(paris, london);
/// assert!((km - 343.5).abs() < 1.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "haversine formula is inherently floating point"
)]
pub fn distance_km(from: CityLocation, to: CityLocation) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Project a longitude onto the `[0, 1]` horizontal axis.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "projection arithmetic")]
pub fn lon_to_x(lon: f64) -> f64 {
    (lon + 180.0) / 360.0
}

/// Project a latitude onto the `[0, 1]` Web Mercator vertical axis.
///
/// `0` is the northern edge and `1` the southern edge. Latitudes beyond the
/// Mercator limit are clamped.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "projection arithmetic")]
pub fn lat_to_y(lat: f64) -> f64 {
    let merc = (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    ((1.0 - merc / PI) / 2.0).clamp(0.0, 1.0)
}

/// Normalise points into the unit square spanned by `bbox`.
///
/// The south-west corner maps to `(0, 1)` and the north-east corner to
/// `(1, 0)`, matching screen coordinates where `y` grows downwards.
///
/// # Examples
/// ```
/// use citywalk_core::{BoundingBox, CityLocation};
/// use citywalk_core::geometry::normalize_points;
///
/// # fn main() -> Result<(), citywalk_core::BoundingBoxError> {
/// let bbox = BoundingBox::new(0.0, 2.0, 0.0, 4.0)?;
/// let points = normalize_points(&[CityLocation::new(1.0, 1.0)], &bbox);
/// assert_eq!(points, vec![(0.25, 0.5)]);
/// # Ok(())
/// # }
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "projection arithmetic")]
pub fn normalize_points(points: &[CityLocation], bbox: &BoundingBox) -> Vec<(f64, f64)> {
    let width = bbox.east() - bbox.west();
    let height = bbox.north() - bbox.south();
    points
        .iter()
        .map(|point| {
            let x = (point.lon - bbox.west()) / width;
            let y = 1.0 - (point.lat - bbox.south()) / height;
            (x, y)
        })
        .collect()
}
