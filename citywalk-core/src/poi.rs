use thiserror::Error;

use crate::{CityLocation, PoiCategory};

/// Identifier reserved for the synthetic city-center start point.
pub const VIRTUAL_START_ID: i64 = -1;

/// Display name of the synthetic city-center start point.
pub const VIRTUAL_START_NAME: &str = "Start (City Center)";

/// A named, geolocated, categorised place worth visiting.
///
/// # Examples
/// ```
/// use citywalk_core::{Poi, PoiCategory};
///
/// # fn main() -> Result<(), citywalk_core::PoiError> {
/// let poi = Poi::new(7, 48.8584, 2.2945, "Eiffel Tower", PoiCategory::Landmark)?
///     .with_link("https://www.toureiffel.paris");
/// assert_eq!(poi.id(), 7);
/// assert_eq!(poi.category().weight(), 10);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "PoiRecord"))]
pub struct Poi {
    id: i64,
    lat: f64,
    lon: f64,
    name: String,
    category: PoiCategory,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    link: Option<String>,
}

/// Unvalidated wire form; decoding goes through [`Poi::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct PoiRecord {
    id: i64,
    lat: f64,
    lon: f64,
    name: String,
    category: PoiCategory,
    #[serde(default)]
    link: Option<String>,
}

#[cfg(feature = "serde")]
impl TryFrom<PoiRecord> for Poi {
    type Error = PoiError;

    fn try_from(record: PoiRecord) -> Result<Self, Self::Error> {
        let poi = Self::new(record.id, record.lat, record.lon, record.name, record.category)?;
        Ok(match record.link {
            Some(link) => poi.with_link(link),
            None => poi,
        })
    }
}

/// Errors returned by [`Poi::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PoiError {
    /// The display name was empty or whitespace.
    #[error("point of interest {id} must have a non-empty name")]
    BlankName {
        /// Identifier of the rejected POI.
        id: i64,
    },
    /// Latitude or longitude fell outside WGS84 bounds.
    #[error("point of interest {id} has invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate {
        /// Identifier of the rejected POI.
        id: i64,
        /// Supplied latitude.
        lat: f64,
        /// Supplied longitude.
        lon: f64,
    },
}

impl Poi {
    /// Validates and constructs a [`Poi`].
    ///
    /// # Errors
    ///
    /// Returns [`PoiError::BlankName`] for an empty name and
    /// [`PoiError::InvalidCoordinate`] for out-of-range coordinates.
    pub fn new(
        id: i64,
        lat: f64,
        lon: f64,
        name: impl Into<String>,
        category: PoiCategory,
    ) -> Result<Self, PoiError> {
        let display_name = name.into();
        if display_name.trim().is_empty() {
            return Err(PoiError::BlankName { id });
        }
        if !CityLocation::new(lat, lon).is_valid() {
            return Err(PoiError::InvalidCoordinate { id, lat, lon });
        }
        Ok(Self {
            id,
            lat,
            lon,
            name: display_name,
            category,
            link: None,
        })
    }

    /// Construct without validation; used by test doubles.
    pub(crate) const fn from_parts(
        id: i64,
        location: CityLocation,
        name: String,
        category: PoiCategory,
    ) -> Self {
        Self {
            id,
            lat: location.lat,
            lon: location.lon,
            name,
            category,
            link: None,
        }
    }

    /// The synthetic start point placed at `location`.
    ///
    /// # Examples
    /// ```
    /// use citywalk_core::{CityLocation, Poi, VIRTUAL_START_ID};
    ///
    /// let start = Poi::virtual_start(CityLocation::new(50.0, 8.0));
    /// assert_eq!(start.id(), VIRTUAL_START_ID);
    /// assert!(start.is_virtual());
    /// ```
    #[must_use]
    pub fn virtual_start(location: CityLocation) -> Self {
        Self::from_parts(
            VIRTUAL_START_ID,
            location,
            VIRTUAL_START_NAME.to_owned(),
            PoiCategory::Other,
        )
    }

    /// Attach an external reference URL.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Identifier, unique within one planning run.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.lon
    }

    /// Position as a [`CityLocation`].
    #[must_use]
    pub const fn location(&self) -> CityLocation {
        CityLocation::new(self.lat, self.lon)
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category assigned at acquisition time.
    #[must_use]
    pub const fn category(&self) -> PoiCategory {
        self.category
    }

    /// External reference URL, if known.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Whether this is the synthetic city-center start point.
    #[must_use]
    pub const fn is_virtual(&self) -> bool {
        self.id == VIRTUAL_START_ID
    }
}
