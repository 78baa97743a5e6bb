//! Greedy ordering of the working set under a time budget.
//!
//! The search walks from the start point, repeatedly choosing the most
//! attractive remaining candidate and committing it when its walking plus
//! dwell cost still fits the budget. Candidates that do not fit are dropped
//! and never reconsidered; committed stops are never reordered.
//!
//! Attractiveness is `weight / (distance_km + bias)^exponent`. The bias keeps
//! a trivially close minor stop from beating a major one a few hundred metres
//! further on, and the super-linear exponent makes the walk behave like a
//! nearest-neighbour search at long range.

use crate::geometry::distance_km;
use crate::{CityLocation, PlannerConfig, Poi};

/// Minutes in an hour.
const MINUTES_PER_HOUR: f64 = 60.0;

/// Outcome of [`sequence_stops`].
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    /// Committed stops in walking order; the start point comes first.
    pub route: Vec<Poi>,
    /// Walking plus dwell minutes spent across every committed leg.
    pub elapsed_minutes: f64,
    /// Sum of the great-circle legs actually walked.
    pub total_distance_km: f64,
}

impl Sequence {
    /// The first stop of the route.
    #[must_use]
    pub fn start(&self) -> Option<&Poi> {
        self.route.first()
    }
}

/// Score of a candidate `distance_km` away with category `weight`.
///
/// # Examples
/// ```
/// use citywalk_core::PlannerConfig;
/// use citywalk_core::sequencing::attractiveness;
///
/// let config = PlannerConfig::default();
/// let landmark = attractiveness(10, 0.1, &config);
/// let minor = attractiveness(1, 0.05, &config);
/// assert!((landmark - 21.5).abs() < 0.1);
/// assert!((minor - 2.45).abs() < 0.01);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "scoring is a floating-point heuristic")]
pub fn attractiveness(weight: u32, distance_km: f64, config: &PlannerConfig) -> f64 {
    f64::from(weight)
        / (distance_km + config.score_distance_bias_km).powf(config.score_distance_exponent)
}

/// Order `working_set` into a walk starting at `start` within `hours`.
///
/// `magnet` is the geocoded city center when the walk starts at a station:
/// the first hop then goes to the candidate nearest the center rather than
/// the most attractive one, which keeps a peripheral station from dragging
/// the walk into the suburbs. Pass `None` for a city-center start.
///
/// Any candidate sharing the start point's id is ignored. Ties go to the
/// candidate that appears first in `working_set`.
///
/// # Examples
/// ```
/// use citywalk_core::sequencing::sequence_stops;
/// use citywalk_core::{CityLocation, PlannerConfig, Poi, PoiCategory};
///
/// # fn main() -> Result<(), citywalk_core::PoiError> {
/// let start = Poi::virtual_start(CityLocation::new(0.0, 0.0));
/// let park = Poi::new(1, 0.001, 0.0, "Park", PoiCategory::Park)?;
/// let sequence = sequence_stops(&start, vec![park], 1.0, None, &PlannerConfig::default());
/// assert_eq!(sequence.route.len(), 2);
/// assert!(sequence.elapsed_minutes > 30.0);
/// # Ok(())
/// # }
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "distance and time accounting are floating point"
)]
pub fn sequence_stops(
    start: &Poi,
    working_set: Vec<Poi>,
    hours: f64,
    magnet: Option<CityLocation>,
    config: &PlannerConfig,
) -> Sequence {
    let budget_minutes = hours * MINUTES_PER_HOUR;
    let mut remaining: Vec<Poi> = working_set
        .into_iter()
        .filter(|candidate| candidate.id() != start.id())
        .collect();
    let mut route = vec![start.clone()];
    let mut current = start.location();
    let mut elapsed_minutes = 0.0;
    let mut total_distance_km = 0.0;

    while !remaining.is_empty() {
        let anchor = magnet.filter(|_| route.len() == 1);
        let Some(index) = next_target(&remaining, current, anchor, config) else {
            break;
        };
        let target = remaining.remove(index);
        let leg_km = distance_km(current, target.location());
        let walk_minutes = leg_km / config.walking_speed_kmh * MINUTES_PER_HOUR;
        let cost = walk_minutes + f64::from(target.category().dwell_time_min());

        if elapsed_minutes + cost <= budget_minutes {
            log::trace!(
                "committing {} ({leg_km:.3} km, {cost:.1} min)",
                target.name()
            );
            elapsed_minutes += cost;
            total_distance_km += leg_km;
            current = target.location();
            route.push(target);
        } else {
            log::trace!(
                "discarding {}: {cost:.1} min exceeds remaining {:.1} min",
                target.name(),
                budget_minutes - elapsed_minutes
            );
        }
    }

    log::debug!(
        "sequenced {} stops, {total_distance_km:.2} km, {elapsed_minutes:.0} min",
        route.len()
    );
    Sequence {
        route,
        elapsed_minutes,
        total_distance_km,
    }
}

/// Index of the next candidate to evaluate.
///
/// With an `anchor`, the candidate nearest the anchor wins; otherwise the
/// most attractive candidate from `current` wins. Strict comparisons keep the
/// earliest candidate on ties.
fn next_target(
    remaining: &[Poi],
    current: CityLocation,
    anchor: Option<CityLocation>,
    config: &PlannerConfig,
) -> Option<usize> {
    anchor.map_or_else(
        || {
            best_index(
                remaining,
                |candidate| {
                    attractiveness(
                        candidate.category().weight(),
                        distance_km(current, candidate.location()),
                        config,
                    )
                },
                |score, incumbent| score > incumbent,
            )
        },
        |center| {
            best_index(
                remaining,
                |candidate| distance_km(center, candidate.location()),
                |distance, incumbent| distance < incumbent,
            )
        },
    )
}

/// Index of the candidate whose key beats every earlier one.
///
/// `beats` is strict, so ties keep the earliest candidate.
fn best_index<K, B>(remaining: &[Poi], key: K, beats: B) -> Option<usize>
where
    K: Fn(&Poi) -> f64,
    B: Fn(f64, f64) -> bool,
{
    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in remaining.iter().enumerate() {
        let value = key(candidate);
        if best.is_none_or(|(_, incumbent)| beats(value, incumbent)) {
            best = Some((index, value));
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PoiCategory;
    use crate::test_support::{poi, poi_at_km};
    use rstest::{fixture, rstest};

    #[fixture]
    fn config() -> PlannerConfig {
        PlannerConfig::default()
    }

    #[fixture]
    fn origin() -> Poi {
        Poi::virtual_start(CityLocation::new(0.0, 0.0))
    }

    fn ids(sequence: &Sequence) -> Vec<i64> {
        sequence.route.iter().map(Poi::id).collect()
    }

    #[rstest]
    fn weight_beats_proximity(origin: Poi, config: PlannerConfig) {
        let landmark = poi_at_km(1, 0.1, PoiCategory::Landmark);
        let marker = poi_at_km(2, 0.05, PoiCategory::Other);
        let sequence = sequence_stops(&origin, vec![marker, landmark], 2.0, None, &config);
        assert_eq!(ids(&sequence), vec![-1, 1, 2]);
    }

    #[rstest]
    fn over_budget_candidate_is_discarded(origin: Poi, config: PlannerConfig) {
        // A museum 22.5 km away: 300 minutes of walking plus 60 of dwell.
        let museum = poi_at_km(1, 22.5, PoiCategory::Museum);
        let sequence = sequence_stops(&origin, vec![museum], 1.0, None, &config);
        assert_eq!(ids(&sequence), vec![-1]);
        assert!(sequence.elapsed_minutes.abs() < f64::EPSILON);
        assert!(sequence.total_distance_km.abs() < f64::EPSILON);
    }

    #[rstest]
    fn ninety_minute_stop_does_not_fit_one_hour(origin: Poi, config: PlannerConfig) {
        // Museum dwell is 60 minutes; 2.25 km adds 30 minutes of walking.
        let museum = poi_at_km(1, 2.25, PoiCategory::Museum);
        let sequence = sequence_stops(&origin, vec![museum], 1.0, None, &config);
        assert_eq!(sequence.route.len(), 1);
    }

    #[rstest]
    fn discarding_does_not_stop_the_search(origin: Poi, config: PlannerConfig) {
        // The landmark scores highest but cannot fit; the cafe still can.
        let landmark = poi_at_km(1, 0.01, PoiCategory::Museum);
        let cafe = poi_at_km(2, 0.5, PoiCategory::Cafe);
        let sequence = sequence_stops(&origin, vec![landmark, cafe], 0.5, None, &config);
        assert_eq!(ids(&sequence), vec![-1, 2]);
        assert!(sequence.elapsed_minutes <= 30.0);
    }

    #[rstest]
    fn magnet_pulls_first_hop_towards_center(config: PlannerConfig) {
        let station = poi(99, 0.0, 0.0, PoiCategory::Other);
        let center = CityLocation::new(0.027, 0.0);
        // Right next to the station, and a landmark, yet farther from the center.
        let suburb = poi(1, 0.0005, 0.0, PoiCategory::Landmark);
        let downtown = poi(2, 0.026, 0.0, PoiCategory::Other);
        let sequence = sequence_stops(&station, vec![suburb, downtown], 4.0, Some(center), &config);
        assert_eq!(sequence.route.get(1).map(Poi::id), Some(2));
    }

    #[rstest]
    fn magnet_only_applies_to_first_hop(config: PlannerConfig) {
        let station = poi(99, 0.0, 0.0, PoiCategory::Other);
        let center = CityLocation::new(0.01, 0.0);
        let first = poi(1, 0.01, 0.0, PoiCategory::Other);
        let landmark = poi(2, 0.011, 0.0, PoiCategory::Landmark);
        let at_center = poi(3, 0.0101, 0.0, PoiCategory::Other);
        let sequence = sequence_stops(
            &station,
            vec![first, landmark, at_center],
            4.0,
            Some(center),
            &config,
        );
        assert_eq!(ids(&sequence), vec![99, 1, 2, 3]);
    }

    #[rstest]
    fn start_point_is_never_revisited(config: PlannerConfig) {
        let start = poi(5, 0.0, 0.0, PoiCategory::Landmark);
        let duplicate = start.clone();
        let other = poi(6, 0.001, 0.0, PoiCategory::Park);
        let sequence = sequence_stops(&start, vec![duplicate, other], 2.0, None, &config);
        assert_eq!(ids(&sequence), vec![5, 6]);
    }

    #[rstest]
    fn ties_resolve_to_first_candidate(origin: Poi, config: PlannerConfig) {
        let first = poi(1, 0.001, 0.0, PoiCategory::Park);
        let twin = poi(2, 0.001, 0.0, PoiCategory::Park);
        let sequence = sequence_stops(&origin, vec![first, twin], 2.0, None, &config);
        assert_eq!(ids(&sequence), vec![-1, 1, 2]);
    }

    #[rstest]
    fn magnet_ties_resolve_to_first_candidate(config: PlannerConfig) {
        let station = poi(99, 0.0, 0.0, PoiCategory::Other);
        let center = CityLocation::new(0.01, 0.0);
        let west = poi(1, 0.01, -0.001, PoiCategory::Other);
        let east = poi(2, 0.01, 0.001, PoiCategory::Landmark);
        let sequence = sequence_stops(&station, vec![west, east], 4.0, Some(center), &config);
        assert_eq!(sequence.route.get(1).map(Poi::id), Some(1));
    }

    #[rstest]
    fn accumulates_walk_and_dwell(origin: Poi, config: PlannerConfig) {
        let landmark = poi_at_km(1, 4.5, PoiCategory::Landmark);
        let sequence = sequence_stops(&origin, vec![landmark], 2.0, None, &config);
        // One hour of walking plus fifteen minutes on site.
        assert!((sequence.elapsed_minutes - 75.0).abs() < 0.01);
        assert!((sequence.total_distance_km - 4.5).abs() < 0.001);
    }

    #[rstest]
    fn empty_working_set_yields_start_only(origin: Poi, config: PlannerConfig) {
        let sequence = sequence_stops(&origin, Vec::new(), 3.0, None, &config);
        assert_eq!(sequence.start().map(Poi::id), Some(-1));
        assert_eq!(sequence.route.len(), 1);
    }

    #[rstest]
    #[case(10, 0.1, 21.5)]
    #[case(1, 0.05, 2.45)]
    fn attractiveness_matches_reference_values(
        config: PlannerConfig,
        #[case] weight: u32,
        #[case] distance: f64,
        #[case] expected: f64,
    ) {
        assert!((attractiveness(weight, distance, &config) - expected).abs() < 0.05);
    }

    #[rstest]
    fn attractiveness_is_monotonic(config: PlannerConfig) {
        assert!(attractiveness(5, 1.0, &config) > attractiveness(5, 2.0, &config));
        assert!(attractiveness(6, 1.0, &config) > attractiveness(5, 1.0, &config));
    }
}
