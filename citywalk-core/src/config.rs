/// Tunable constants for selection and sequencing.
///
/// The defaults reproduce the planner's reference behaviour. Only the
/// monotonic relationships matter (higher weight and shorter distance raise
/// a candidate's score), so callers may adjust them freely.
///
/// # Examples
/// ```
/// use citywalk_core::PlannerConfig;
///
/// let config = PlannerConfig::default();
/// assert_eq!(config.walking_speed_kmh, 4.5);
/// assert_eq!(config.score_distance_exponent, 1.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Walking speed used to convert distance into minutes.
    pub walking_speed_kmh: f64,
    /// Distance added before exponentiation so nearby low-value stops do not
    /// dominate the score.
    pub score_distance_bias_km: f64,
    /// Super-linear distance penalty exponent.
    pub score_distance_exponent: f64,
    /// Budget hours allotted per stop when sizing the working set.
    pub hours_per_stop: f64,
    /// Slack added on top of the diversity seeds when sizing the working set.
    pub extra_capacity: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            walking_speed_kmh: 4.5,
            score_distance_bias_km: 0.5,
            score_distance_exponent: 1.5,
            hours_per_stop: 0.5,
            extra_capacity: 5,
        }
    }
}
