//! Error types emitted by the CityWalk CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use citywalk_core::{PlanError, PlanRequestError};
use citywalk_data::ClientBuildError;
use thiserror::Error;

/// Errors emitted by the CityWalk CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The merged arguments describe a request the planner rejects.
    #[error("invalid plan request: {0}")]
    InvalidRequest(#[from] PlanRequestError),
    /// Building an HTTP collaborator failed.
    #[error("failed to build {service} client for {url}: {source}")]
    BuildClient {
        service: &'static str,
        url: String,
        #[source]
        source: ClientBuildError,
    },
    /// Planning failed.
    #[error("failed to plan route: {source}")]
    Plan {
        #[source]
        source: PlanError,
    },
    /// The planner found nothing to visit, even after retrying.
    #[error("no points of interest found in {city}")]
    NoPointsOfInterest { city: String },
    /// Encoding the plan as JSON failed.
    #[error("failed to serialise route plan: {0}")]
    SerialisePlan(#[source] serde_json::Error),
    /// Writing the plan to the output stream failed.
    #[error("failed to write plan output: {0}")]
    WritePlanOutput(#[source] std::io::Error),
}
