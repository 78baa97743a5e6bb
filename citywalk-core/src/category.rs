//! Categories of points of interest.
//!
//! Each category carries a fixed desirability weight and an expected dwell
//! time. The planner scores candidates with the weight and charges the dwell
//! time against the walking budget.
//!
//! # Examples
//! ```
//! use citywalk_core::PoiCategory;
//!
//! assert_eq!(PoiCategory::Landmark.weight(), 10);
//! assert_eq!(PoiCategory::Museum.dwell_time_min(), 60);
//! assert_eq!(PoiCategory::HistoricSite.to_string(), "historic_site");
//! ```

/// Closed set of POI categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PoiCategory {
    /// Major attractions.
    Landmark,
    /// Historic buildings, churches and castles.
    HistoricSite,
    /// Museums and galleries.
    Museum,
    /// Parks and gardens.
    Park,
    /// Sit-down restaurants.
    Restaurant,
    /// Cafes.
    Cafe,
    /// Anything without a more specific category.
    Other,
}

impl PoiCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Landmark,
        Self::HistoricSite,
        Self::Museum,
        Self::Park,
        Self::Restaurant,
        Self::Cafe,
        Self::Other,
    ];

    /// Sightseeing categories that seed a diverse working set.
    pub const DIVERSITY_SEEDS: [Self; 4] =
        [Self::Landmark, Self::HistoricSite, Self::Museum, Self::Park];

    /// Relative desirability used as the scoring numerator.
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::Landmark => 10,
            Self::HistoricSite | Self::Cafe => 7,
            Self::Museum => 5,
            Self::Park => 3,
            Self::Restaurant => 8,
            Self::Other => 1,
        }
    }

    /// Expected minutes spent on site.
    #[must_use]
    pub const fn dwell_time_min(self) -> u32 {
        match self {
            Self::Landmark => 15,
            Self::HistoricSite => 5,
            Self::Museum => 60,
            Self::Park => 30,
            Self::Restaurant => 45,
            Self::Cafe => 20,
            Self::Other => 10,
        }
    }

    /// Whether the category is a food stop.
    #[must_use]
    pub const fn is_food(self) -> bool {
        matches!(self, Self::Restaurant | Self::Cafe)
    }

    /// Return the category as a lowercase `&str`.
    ///
    /// # Examples
    /// ```
    /// use citywalk_core::PoiCategory;
    ///
    /// assert_eq!(PoiCategory::Cafe.as_str(), "cafe");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Landmark => "landmark",
            Self::HistoricSite => "historic_site",
            Self::Museum => "museum",
            Self::Park => "park",
            Self::Restaurant => "restaurant",
            Self::Cafe => "cafe",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for PoiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PoiCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == wanted)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}
