//! The finished itinerary.

use crate::sequencing::Sequence;
use crate::{CityLocation, Poi};

/// A walking itinerary for one city.
///
/// `stops[0]` is always the start point, either a railway station or the
/// synthetic city-center start. The estimate covers every committed leg's
/// walking and dwell time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutePlan {
    /// City the plan was requested for.
    pub city: String,
    /// Coordinates of the start point.
    pub center: CityLocation,
    /// Stops in walking order.
    pub stops: Vec<Poi>,
    /// Total great-circle distance walked.
    pub total_dist_km: f64,
    /// Walking plus dwell time in hours.
    pub estimated_time_hours: f64,
}

impl RoutePlan {
    /// Whether the plan contains only its start point.
    ///
    /// # Examples
    /// ```
    /// use citywalk_core::{CityLocation, Poi, RoutePlan};
    ///
    /// let start = Poi::virtual_start(CityLocation::new(1.0, 1.0));
    /// let plan = RoutePlan {
    ///     city: "Nowhere".into(),
    ///     center: start.location(),
    ///     stops: vec![start],
    ///     total_dist_km: 0.0,
    ///     estimated_time_hours: 0.0,
    /// };
    /// assert!(plan.is_degenerate());
    /// ```
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.stops.len() <= 1
    }

    /// The start point, if any.
    #[must_use]
    pub fn start(&self) -> Option<&Poi> {
        self.stops.first()
    }
}

/// Package a [`Sequence`] as a [`RoutePlan`] for `city`.
///
/// Returns `None` when the sequence has no start point.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "minutes are converted to hours")]
pub fn assemble(city: &str, sequence: Sequence) -> Option<RoutePlan> {
    let center = sequence.start()?.location();
    Some(RoutePlan {
        city: city.to_owned(),
        center,
        stops: sequence.route,
        total_dist_km: sequence.total_distance_km,
        estimated_time_hours: sequence.elapsed_minutes / 60.0,
    })
}
