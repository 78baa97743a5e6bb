//! Coordinates and query regions.

use geo::{Coord, Rect};
use thiserror::Error;

/// A WGS84 point: a city center, the current walking position or the
/// centroid of a group of stops.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CityLocation {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl CityLocation {
    /// Construct a location from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether both components are finite and within WGS84 bounds.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Arithmetic mean of the supplied locations.
    ///
    /// Returns `None` when the iterator is empty.
    ///
    /// # Examples
    /// ```
    /// use citywalk_core::CityLocation;
    ///
    /// let centroid = CityLocation::centroid([
    ///     CityLocation::new(0.0, 0.0),
    ///     CityLocation::new(2.0, 4.0),
    /// ]);
    /// assert_eq!(centroid, Some(CityLocation::new(1.0, 2.0)));
    /// assert_eq!(CityLocation::centroid(Vec::new()), None);
    /// ```
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "centroid is a floating-point mean over a small set"
    )]
    pub fn centroid<I>(locations: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let (count, lat_sum, lon_sum) = locations
            .into_iter()
            .fold((0_usize, 0.0, 0.0), |(n, lat, lon), loc| {
                (n + 1, lat + loc.lat, lon + loc.lon)
            });
        if count == 0 {
            return None;
        }
        let n = count as f64;
        Some(Self::new(lat_sum / n, lon_sum / n))
    }
}

impl From<Coord<f64>> for CityLocation {
    fn from(coord: Coord<f64>) -> Self {
        Self::new(coord.y, coord.x)
    }
}

impl From<CityLocation> for Coord<f64> {
    fn from(location: CityLocation) -> Self {
        Self {
            x: location.lon,
            y: location.lat,
        }
    }
}

/// Errors returned by [`BoundingBox::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BoundingBoxError {
    /// A bound was NaN or infinite.
    #[error("bounding box edges must be finite")]
    NonFinite,
    /// `south` was not strictly below `north`.
    #[error("south edge {south} must lie below north edge {north}")]
    InvertedLatitude {
        /// Requested southern edge.
        south: f64,
        /// Requested northern edge.
        north: f64,
    },
    /// `west` was not strictly left of `east`.
    #[error("west edge {west} must lie left of east edge {east}")]
    InvertedLongitude {
        /// Requested western edge.
        west: f64,
        /// Requested eastern edge.
        east: f64,
    },
}

/// Rectangular query region in degrees.
///
/// # Examples
/// ```
/// use citywalk_core::{BoundingBox, CityLocation};
///
/// # fn main() -> Result<(), citywalk_core::BoundingBoxError> {
/// let bbox = BoundingBox::new(48.0, 49.0, 2.0, 3.0)?;
/// assert!(bbox.contains(CityLocation::new(48.5, 2.5)));
/// assert_eq!(bbox.overpass_filter(), "48,2,49,3");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    south: f64,
    north: f64,
    west: f64,
    east: f64,
}

impl BoundingBox {
    /// Validates and constructs a [`BoundingBox`].
    ///
    /// # Errors
    ///
    /// Returns [`BoundingBoxError`] when an edge is non-finite or the edges
    /// are not strictly ordered.
    pub fn new(south: f64, north: f64, west: f64, east: f64) -> Result<Self, BoundingBoxError> {
        if [south, north, west, east].iter().any(|v| !v.is_finite()) {
            return Err(BoundingBoxError::NonFinite);
        }
        if south >= north {
            return Err(BoundingBoxError::InvertedLatitude { south, north });
        }
        if west >= east {
            return Err(BoundingBoxError::InvertedLongitude { west, east });
        }
        Ok(Self {
            south,
            north,
            west,
            east,
        })
    }

    /// Construct without validation; callers guarantee ordered finite edges.
    pub(crate) const fn from_edges(south: f64, north: f64, west: f64, east: f64) -> Self {
        Self {
            south,
            north,
            west,
            east,
        }
    }

    /// Southern edge.
    #[must_use]
    pub const fn south(&self) -> f64 {
        self.south
    }

    /// Northern edge.
    #[must_use]
    pub const fn north(&self) -> f64 {
        self.north
    }

    /// Western edge.
    #[must_use]
    pub const fn west(&self) -> f64 {
        self.west
    }

    /// Eastern edge.
    #[must_use]
    pub const fn east(&self) -> f64 {
        self.east
    }

    /// Whether `location` lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, location: CityLocation) -> bool {
        (self.south..=self.north).contains(&location.lat)
            && (self.west..=self.east).contains(&location.lon)
    }

    /// Convert into a `geo` rectangle (`x = lon`, `y = lat`).
    #[must_use]
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.west,
                y: self.south,
            },
            Coord {
                x: self.east,
                y: self.north,
            },
        )
    }

    /// Render the box in Overpass QL order: `south,west,north,east`.
    #[must_use]
    pub fn overpass_filter(&self) -> String {
        format!("{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}
