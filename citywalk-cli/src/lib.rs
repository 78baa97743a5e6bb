//! Command-line interface for planning CityWalk itineraries.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod plan;

pub use error::CliError;
use plan::{PlanArgs, run_plan};

const ARG_CITY: &str = "city";
const ARG_HOURS: &str = "hours";
const ARG_FROM_STATION: &str = "from-station";
const ARG_FOOD: &str = "food";
const ARG_SEED: &str = "seed";
const ARG_FORMAT: &str = "format";
const ARG_OVERPASS_URL: &str = "overpass-url";
const ARG_NOMINATIM_URL: &str = "nominatim-url";
const ARG_USER_AGENT: &str = "user-agent";
const ENV_CITY: &str = "CITYWALK_CMDS_PLAN_CITY";

/// Run the CityWalk CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => run_plan(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "citywalk",
    about = "Plan walking itineraries through a city's points of interest",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan a walk for a city and time budget.
    Plan(PlanArgs),
}

#[cfg(test)]
mod tests;
