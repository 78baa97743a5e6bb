//! Working-set selection.
//!
//! Narrows an unordered candidate pool into a bounded set that is diverse
//! across sightseeing categories and sized for the time budget. Sequencing
//! later decides which of these stops actually fit, so the set is
//! deliberately oversized.
//!
//! Randomness comes from the caller. Data sources return features in an
//! order that carries no ranking signal, so seeds and filler are drawn at
//! random rather than taken from the front of the list.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::geometry::distance_km;
use crate::{CityLocation, PlannerConfig, Poi, PoiCategory};

/// Build the working set handed to the sequencing stage.
///
/// Steps:
/// 1. split candidates into restaurants, cafes and sights;
/// 2. pick one random sight from each present diversity bucket (landmark,
///    historic site, museum, park);
/// 3. fill up to [`target_capacity`] with the remaining sights in shuffled
///    order;
/// 4. when `include_food` is set and the set is non-empty, add the
///    restaurant nearest the set's centroid and one random cafe.
///
/// # Examples
/// ```
/// use citywalk_core::selection::select_working_set;
/// use citywalk_core::{PlannerConfig, Poi, PoiCategory};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// # fn main() -> Result<(), citywalk_core::PoiError> {
/// let candidates = vec![
///     Poi::new(1, 48.85, 2.35, "Cathedral", PoiCategory::Landmark)?,
///     Poi::new(2, 48.86, 2.34, "Gallery", PoiCategory::Museum)?,
/// ];
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let set = select_working_set(&candidates, 2.0, false, &PlannerConfig::default(), &mut rng);
/// assert_eq!(set.len(), 2);
/// # Ok(())
/// # }
/// ```
pub fn select_working_set<R>(
    candidates: &[Poi],
    hours: f64,
    include_food: bool,
    config: &PlannerConfig,
    rng: &mut R,
) -> Vec<Poi>
where
    R: Rng + ?Sized,
{
    let (food, sights): (Vec<&Poi>, Vec<&Poi>) = candidates
        .iter()
        .partition(|poi| poi.category().is_food());

    let mut selected = diversity_seeds(&sights, rng);
    let capacity = target_capacity(hours, selected.len(), config);

    let mut filler: Vec<&Poi> = sights
        .iter()
        .copied()
        .filter(|poi| !selected.iter().any(|seed| seed.id() == poi.id()))
        .collect();
    filler.shuffle(rng);
    for poi in filler {
        if selected.len() >= capacity {
            break;
        }
        selected.push(poi.clone());
    }

    log::debug!(
        "selected {} of {} sights (capacity {capacity})",
        selected.len(),
        sights.len()
    );

    if include_food {
        add_food_stops(&mut selected, &food, rng);
    }
    selected
}

/// Number of sights the working set aims for.
///
/// Computed as `max(hours / hours_per_stop, seed_count + extra_capacity)`
/// and truncated towards zero.
///
/// # Examples
/// ```
/// use citywalk_core::PlannerConfig;
/// use citywalk_core::selection::target_capacity;
///
/// let config = PlannerConfig::default();
/// assert_eq!(target_capacity(6.0, 4, &config), 12);
/// assert_eq!(target_capacity(1.9, 0, &config), 5);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "capacity is a truncated floating-point estimate"
)]
pub fn target_capacity(hours: f64, seed_count: usize, config: &PlannerConfig) -> usize {
    let by_budget = hours / config.hours_per_stop;
    let minimum = (seed_count + config.extra_capacity) as f64;
    by_budget.max(minimum) as usize
}

fn diversity_seeds<R>(sights: &[&Poi], rng: &mut R) -> Vec<Poi>
where
    R: Rng + ?Sized,
{
    PoiCategory::DIVERSITY_SEEDS
        .into_iter()
        .filter_map(|category| {
            let bucket: Vec<&Poi> = sights
                .iter()
                .copied()
                .filter(|poi| poi.category() == category)
                .collect();
            bucket.choose(rng).map(|poi| (*poi).clone())
        })
        .collect()
}

fn add_food_stops<R>(selected: &mut Vec<Poi>, food: &[&Poi], rng: &mut R)
where
    R: Rng + ?Sized,
{
    let Some(centroid) = CityLocation::centroid(selected.iter().map(Poi::location)) else {
        return;
    };

    let restaurant = food
        .iter()
        .copied()
        .filter(|poi| poi.category() == PoiCategory::Restaurant)
        .min_by(|lhs, rhs| {
            distance_km(centroid, lhs.location()).total_cmp(&distance_km(centroid, rhs.location()))
        });
    let cafes: Vec<&Poi> = food
        .iter()
        .copied()
        .filter(|poi| poi.category() == PoiCategory::Cafe)
        .collect();
    let cafe = cafes.choose(rng).copied();

    for stop in [restaurant, cafe].into_iter().flatten() {
        log::debug!("adding food stop {} ({})", stop.name(), stop.category());
        selected.push(stop.clone());
    }
}
