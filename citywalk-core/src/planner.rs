//! Route planning orchestration.
//!
//! [`RoutePlanner`] wires a [`Geocoder`] and a [`PoiSource`] to the
//! selection and sequencing stages:
//!
//! 1. validate the request;
//! 2. geocode the city;
//! 3. resolve the start point (station or city center);
//! 4. fetch candidates, select a working set, sequence it and assemble the
//!    plan.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::plan::assemble;
use crate::selection::select_working_set;
use crate::sequencing::{Sequence, sequence_stops};
use crate::{GeocodeError, Geocoder, PlannerConfig, Poi, PoiSource, RoutePlan};

/// Parameters of one planning call.
///
/// # Examples
/// ```
/// use citywalk_core::PlanRequest;
///
/// let request = PlanRequest::new("Vienna", 3.0).with_food(true).with_seed(7);
/// assert!(request.validate().is_ok());
/// assert_eq!(request.seed, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    /// City to plan in.
    pub city: String,
    /// Time budget in hours.
    pub hours: f64,
    /// Start at the railway station nearest the city center, when one exists.
    pub start_from_station: bool,
    /// Add one restaurant and one cafe to the working set.
    pub include_food: bool,
    /// Seed for reproducible plans; entropy is used when absent.
    pub seed: Option<u64>,
}

/// Errors raised by [`PlanRequest::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanRequestError {
    /// The time budget was zero, negative or not a number.
    #[error("hours must be a positive number, got {hours}")]
    NonPositiveHours {
        /// Rejected budget.
        hours: f64,
    },
    /// The city name was empty.
    #[error("city must not be blank")]
    BlankCity,
}

impl PlanRequest {
    /// A city-center walk without food stops.
    #[must_use]
    pub fn new(city: impl Into<String>, hours: f64) -> Self {
        Self {
            city: city.into(),
            hours,
            start_from_station: false,
            include_food: false,
            seed: None,
        }
    }

    /// Request a station start.
    #[must_use]
    pub const fn with_station_start(mut self, enabled: bool) -> Self {
        self.start_from_station = enabled;
        self
    }

    /// Request food stops.
    #[must_use]
    pub const fn with_food(mut self, enabled: bool) -> Self {
        self.include_food = enabled;
        self
    }

    /// Fix the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the request before any collaborator is contacted.
    ///
    /// # Errors
    ///
    /// Returns [`PlanRequestError`] for a blank city or a non-positive or
    /// non-finite budget.
    pub fn validate(&self) -> Result<(), PlanRequestError> {
        if self.city.trim().is_empty() {
            return Err(PlanRequestError::BlankCity);
        }
        if !self.hours.is_finite() || self.hours <= 0.0 {
            return Err(PlanRequestError::NonPositiveHours { hours: self.hours });
        }
        Ok(())
    }
}

/// Errors raised by [`RoutePlanner`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The request failed validation.
    #[error(transparent)]
    InvalidRequest(#[from] PlanRequestError),
    /// The city could not be geocoded.
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

/// Plans walking routes using injected collaborators.
///
/// # Examples
/// ```
/// use citywalk_core::test_support::{MemoryPoiSource, StaticGeocoder, poi};
/// use citywalk_core::{CityLocation, PlanRequest, PoiCategory, RoutePlanner};
///
/// # fn main() -> Result<(), citywalk_core::PlanError> {
/// let geocoder = StaticGeocoder::around(CityLocation::new(45.0, 7.0));
/// let source = MemoryPoiSource::with_pois([poi(1, 45.001, 7.0, PoiCategory::Landmark)]);
/// let planner = RoutePlanner::new(geocoder, source);
/// let plan = planner.plan(&PlanRequest::new("Turin", 2.0).with_seed(1))?;
/// assert_eq!(plan.stops.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RoutePlanner<G, S> {
    geocoder: G,
    source: S,
    config: PlannerConfig,
}

impl<G, S> RoutePlanner<G, S>
where
    G: Geocoder,
    S: PoiSource,
{
    /// Create a planner with default tunables.
    #[must_use]
    pub fn new(geocoder: G, source: S) -> Self {
        Self::with_config(geocoder, source, PlannerConfig::default())
    }

    /// Create a planner with explicit tunables.
    #[must_use]
    pub const fn with_config(geocoder: G, source: S, config: PlannerConfig) -> Self {
        Self {
            geocoder,
            source,
            config,
        }
    }

    /// Tunables in use.
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a route drawing randomness from `rng`.
    ///
    /// An empty candidate set is not an error: the plan then holds only the
    /// start point.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidRequest`] for a malformed request and
    /// [`PlanError::Geocode`] when the city cannot be resolved.
    pub fn plan_route<R>(&self, request: &PlanRequest, rng: &mut R) -> Result<RoutePlan, PlanError>
    where
        R: Rng + ?Sized,
    {
        request.validate()?;
        let city = self.geocoder.geocode(&request.city)?;
        log::info!(
            "planning {:.1}h walk in {} around ({:.5}, {:.5})",
            request.hours,
            request.city,
            city.center.lat,
            city.center.lon
        );

        let station = request
            .start_from_station
            .then(|| self.source.fetch_station(&city.bbox, city.center))
            .flatten();
        if request.start_from_station && station.is_none() {
            log::info!("no station found in {}, starting at city center", request.city);
        }
        let magnet = station.as_ref().map(|_| city.center);
        let start = station.unwrap_or_else(|| Poi::virtual_start(city.center));

        let candidates = self.source.fetch_pois(&city.bbox);
        log::debug!("fetched {} candidates", candidates.len());
        let working_set = select_working_set(
            &candidates,
            request.hours,
            request.include_food,
            &self.config,
            rng,
        );
        let sequence = sequence_stops(&start, working_set, request.hours, magnet, &self.config);
        Ok(finish(&request.city, sequence, start))
    }

    /// Plan a route, seeding randomness from the request.
    ///
    /// When the first attempt yields only the start point the whole pipeline
    /// runs once more with the same parameters, continuing the same random
    /// stream.
    ///
    /// # Errors
    ///
    /// As for [`RoutePlanner::plan_route`].
    pub fn plan(&self, request: &PlanRequest) -> Result<RoutePlan, PlanError> {
        let mut rng = request
            .seed
            .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
        let plan = self.plan_route(request, &mut rng)?;
        if !plan.is_degenerate() {
            return Ok(plan);
        }
        log::warn!("plan for {} has no stops, retrying once", request.city);
        self.plan_route(request, &mut rng)
    }
}

fn finish(city: &str, sequence: Sequence, start: Poi) -> RoutePlan {
    let center = start.location();
    assemble(city, sequence).unwrap_or_else(|| RoutePlan {
        city: city.to_owned(),
        center,
        stops: vec![start],
        total_dist_km: 0.0,
        estimated_time_hours: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingGeocoder, MemoryPoiSource, StaticGeocoder, poi};
    use crate::{CityLocation, PoiCategory};
    use rstest::{fixture, rstest};

    const CENTER: CityLocation = CityLocation::new(52.52, 13.405);

    #[fixture]
    fn geocoder() -> StaticGeocoder {
        StaticGeocoder::around(CENTER)
    }

    #[fixture]
    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(3)
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    fn rejects_non_positive_hours(#[case] hours: f64) {
        let err = PlanRequest::new("Berlin", hours).validate().expect_err("invalid");
        assert!(matches!(err, PlanRequestError::NonPositiveHours { .. }));
    }

    #[rstest]
    fn rejects_blank_city() {
        let err = PlanRequest::new("  ", 2.0).validate().expect_err("invalid");
        assert_eq!(err, PlanRequestError::BlankCity);
    }

    #[rstest]
    fn invalid_request_skips_geocoding(mut rng: ChaCha8Rng) {
        let planner = RoutePlanner::new(FailingGeocoder, MemoryPoiSource::default());
        let err = planner
            .plan_route(&PlanRequest::new("Berlin", 0.0), &mut rng)
            .expect_err("invalid request");
        assert!(matches!(err, PlanError::InvalidRequest(_)));
    }

    #[rstest]
    fn geocode_failure_is_reported(mut rng: ChaCha8Rng) {
        let planner = RoutePlanner::new(FailingGeocoder, MemoryPoiSource::default());
        let err = planner
            .plan_route(&PlanRequest::new("Atlantis", 2.0), &mut rng)
            .expect_err("unknown city");
        assert!(matches!(err, PlanError::Geocode(GeocodeError::NotFound { .. })));
    }

    #[rstest]
    fn empty_source_yields_single_stop(geocoder: StaticGeocoder, mut rng: ChaCha8Rng) {
        let planner = RoutePlanner::new(geocoder, MemoryPoiSource::default());
        let plan = planner
            .plan_route(&PlanRequest::new("Berlin", 3.0), &mut rng)
            .expect("plan");
        assert!(plan.is_degenerate());
        assert!(plan.stops[0].is_virtual());
        assert_eq!(plan.center, CENTER);
        assert!(plan.total_dist_km.abs() < f64::EPSILON);
        assert!(plan.estimated_time_hours.abs() < f64::EPSILON);
    }

    #[rstest]
    fn station_start_falls_back_to_center(geocoder: StaticGeocoder, mut rng: ChaCha8Rng) {
        let source = MemoryPoiSource::with_pois([poi(1, 52.521, 13.405, PoiCategory::Park)]);
        let planner = RoutePlanner::new(geocoder, source);
        let request = PlanRequest::new("Berlin", 2.0).with_station_start(true);
        let plan = planner.plan_route(&request, &mut rng).expect("plan");
        assert!(plan.stops[0].is_virtual());
        assert_eq!(plan.stops.len(), 2);
    }

    #[rstest]
    fn station_becomes_the_start(geocoder: StaticGeocoder, mut rng: ChaCha8Rng) {
        let station = poi(500, 52.525, 13.369, PoiCategory::Other);
        let source = MemoryPoiSource::with_pois([poi(1, 52.516, 13.377, PoiCategory::Landmark)])
            .with_station(station.clone());
        let planner = RoutePlanner::new(geocoder, source);
        let request = PlanRequest::new("Berlin", 2.0).with_station_start(true);
        let plan = planner.plan_route(&request, &mut rng).expect("plan");
        assert_eq!(plan.stops[0], station);
        assert_eq!(plan.center, station.location());
    }

    #[rstest]
    fn station_is_ignored_unless_requested(geocoder: StaticGeocoder, mut rng: ChaCha8Rng) {
        let source = MemoryPoiSource::default().with_station(poi(500, 52.5, 13.3, PoiCategory::Other));
        let planner = RoutePlanner::new(geocoder, source);
        let plan = planner
            .plan_route(&PlanRequest::new("Berlin", 2.0), &mut rng)
            .expect("plan");
        assert!(plan.stops[0].is_virtual());
    }

    #[rstest]
    fn seeded_plans_are_reproducible(geocoder: StaticGeocoder) {
        let pois = (1..=30_i32).map(|id| {
            let offset = f64::from(id) * 0.001;
            poi(i64::from(id), 52.52 + offset, 13.405 - offset, PoiCategory::Other)
        });
        let planner = RoutePlanner::new(geocoder, MemoryPoiSource::with_pois(pois));
        let request = PlanRequest::new("Berlin", 2.0).with_seed(11);
        let first = planner.plan(&request).expect("first plan");
        let second = planner.plan(&request).expect("second plan");
        assert_eq!(first, second);
    }

    #[rstest]
    fn degenerate_plan_is_returned_after_retry(geocoder: StaticGeocoder) {
        let planner = RoutePlanner::new(geocoder, MemoryPoiSource::default());
        let plan = planner
            .plan(&PlanRequest::new("Berlin", 1.0).with_seed(5))
            .expect("plan");
        assert!(plan.is_degenerate());
        assert_eq!(planner.source.fetch_count(), 2);
    }
}
