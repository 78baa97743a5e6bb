//! Plan command implementation for the CityWalk CLI.

use std::io::Write;

use citywalk_core::{Geocoder, PlanError, PlanRequest, PoiSource, RoutePlan, RoutePlanner};
use citywalk_data::{
    DEFAULT_NOMINATIM_URL, DEFAULT_OVERPASS_URL, DEFAULT_USER_AGENT, NominatimConfig,
    NominatimGeocoder, OverpassClient, OverpassConfig,
};
use clap::{Parser, ValueEnum};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CITY, ARG_FOOD, ARG_FORMAT, ARG_FROM_STATION, ARG_HOURS, ARG_NOMINATIM_URL,
    ARG_OVERPASS_URL, ARG_SEED, ARG_USER_AGENT, CliError, ENV_CITY,
};

/// Walking budget used when none is configured.
pub(crate) const DEFAULT_HOURS: f64 = 3.0;

/// How the finished plan is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    /// Pretty-printed JSON `RoutePlan`.
    #[default]
    Json,
    /// Numbered itinerary suitable for sharing.
    Text,
}

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Geocode a city, fetch its points of interest from \
                 OpenStreetMap and order a walk that fits the time budget. \
                 Options can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Plan a walking itinerary"
)]
#[ortho_config(prefix = "CITYWALK")]
pub(crate) struct PlanArgs {
    /// City to walk through, e.g. "Vienna".
    #[arg(value_name = ARG_CITY)]
    #[serde(default)]
    pub(crate) city: Option<String>,
    /// Time budget in hours (default 3).
    #[arg(long = ARG_HOURS, value_name = "hours")]
    #[serde(default)]
    pub(crate) hours: Option<f64>,
    /// Start at the main railway station instead of the city center.
    #[arg(long = ARG_FROM_STATION)]
    #[serde(default)]
    pub(crate) from_station: bool,
    /// Add a restaurant and a cafe to the walk.
    #[arg(long = ARG_FOOD)]
    #[serde(default)]
    pub(crate) food: bool,
    /// Seed for reproducible plans.
    #[arg(long = ARG_SEED, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Output format.
    #[arg(long = ARG_FORMAT, value_enum)]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
    /// Overpass interpreter endpoint.
    #[arg(long = ARG_OVERPASS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_url: Option<String>,
    /// Nominatim base URL.
    #[arg(long = ARG_NOMINATIM_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_url: Option<String>,
    /// User agent sent to both services.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanConfig {
    pub(crate) city: String,
    pub(crate) hours: f64,
    pub(crate) from_station: bool,
    pub(crate) food: bool,
    pub(crate) seed: Option<u64>,
    pub(crate) format: OutputFormat,
    pub(crate) overpass_url: String,
    pub(crate) nominatim_url: String,
    pub(crate) user_agent: String,
}

impl PlanConfig {
    /// The planner request this configuration describes.
    pub(crate) fn request(&self) -> PlanRequest {
        let request = PlanRequest::new(self.city.clone(), self.hours)
            .with_station_start(self.from_station)
            .with_food(self.food);
        match self.seed {
            Some(seed) => request.with_seed(seed),
            None => request,
        }
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let city = args
            .city
            .map(|city| city.trim().to_owned())
            .filter(|city| !city.is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_CITY,
                env: ENV_CITY,
            })?;

        let config = Self {
            city,
            hours: args.hours.unwrap_or(DEFAULT_HOURS),
            from_station: args.from_station,
            food: args.food,
            seed: args.seed,
            format: args.format.unwrap_or_default(),
            overpass_url: args
                .overpass_url
                .unwrap_or_else(|| DEFAULT_OVERPASS_URL.to_owned()),
            nominatim_url: args
                .nominatim_url
                .unwrap_or_else(|| DEFAULT_NOMINATIM_URL.to_owned()),
            user_agent: args
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
        };
        config.request().validate()?;
        Ok(config)
    }
}

/// Anything that can turn a request into a plan.
pub(super) trait RoutePlanning {
    fn plan(&self, request: &PlanRequest) -> Result<RoutePlan, PlanError>;
}

impl<G, S> RoutePlanning for RoutePlanner<G, S>
where
    G: Geocoder,
    S: PoiSource,
{
    fn plan(&self, request: &PlanRequest) -> Result<RoutePlan, PlanError> {
        Self::plan(self, request)
    }
}

/// Builds a planner for the current plan invocation.
pub(super) trait PlanPlannerBuilder {
    fn build(&self, config: &PlanConfig) -> Result<Box<dyn RoutePlanning>, CliError>;
}

pub(super) struct DefaultPlanPlannerBuilder;

impl PlanPlannerBuilder for DefaultPlanPlannerBuilder {
    fn build(&self, config: &PlanConfig) -> Result<Box<dyn RoutePlanning>, CliError> {
        let geocoder = NominatimGeocoder::with_config(
            NominatimConfig::new(config.nominatim_url.clone())
                .with_user_agent(config.user_agent.clone()),
        )
        .map_err(|source| CliError::BuildClient {
            service: "Nominatim",
            url: config.nominatim_url.clone(),
            source,
        })?;
        let source = OverpassClient::with_config(
            OverpassConfig::new(config.overpass_url.clone())
                .with_user_agent(config.user_agent.clone()),
        )
        .map_err(|source| CliError::BuildClient {
            service: "Overpass",
            url: config.overpass_url.clone(),
            source,
        })?;
        Ok(Box::new(RoutePlanner::new(geocoder, source)))
    }
}

pub(super) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultPlanPlannerBuilder;
    run_plan_with(args, &builder, &mut stdout)
}

pub(super) fn run_plan_with(
    args: PlanArgs,
    builder: &dyn PlanPlannerBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let plan = execute_plan(&config, builder)?;
    write_plan(writer, &plan, config.format)
}

fn execute_plan(
    config: &PlanConfig,
    builder: &dyn PlanPlannerBuilder,
) -> Result<RoutePlan, CliError> {
    let planner = builder.build(config)?;
    let plan = planner
        .plan(&config.request())
        .map_err(|source| CliError::Plan { source })?;
    if plan.is_degenerate() {
        return Err(CliError::NoPointsOfInterest {
            city: config.city.clone(),
        });
    }
    log::info!(
        "planned {} stops over {:.2} km in {}",
        plan.stops.len(),
        plan.total_dist_km,
        plan.city
    );
    Ok(plan)
}

fn write_plan(
    writer: &mut dyn Write,
    plan: &RoutePlan,
    format: OutputFormat,
) -> Result<(), CliError> {
    let payload = match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(plan).map_err(CliError::SerialisePlan)?
        }
        OutputFormat::Text => render_share_text(plan),
    };
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WritePlanOutput)?;
    if !payload.ends_with('\n') {
        writer.write_all(b"\n").map_err(CliError::WritePlanOutput)?;
    }
    Ok(())
}

/// Render `plan` as a numbered itinerary.
///
/// Distance is truncated to whole kilometres; links have spaces escaped.
pub(super) fn render_share_text(plan: &RoutePlan) -> String {
    let mut lines = vec![
        format!("CityWalk: {}", plan.city),
        format!(
            "{:.0}km, ~{:.1}h",
            plan.total_dist_km.trunc(),
            plan.estimated_time_hours
        ),
        "---".to_owned(),
    ];
    lines.extend(plan.stops.iter().enumerate().map(|(index, stop)| {
        let entry = format!("{}. {} ({})", index + 1, stop.name(), stop.category());
        match stop.link() {
            Some(link) => format!("{entry} - {}", link.replace(' ', "%20")),
            None => entry,
        }
    }));
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
