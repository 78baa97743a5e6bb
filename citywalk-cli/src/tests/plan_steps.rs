//! Behaviour-driven step definitions driving the plan CLI scenarios.

use super::*;
use crate::plan::{PlanConfig, PlanPlannerBuilder, RoutePlanning, run_plan_with};
use citywalk_core::test_support::{MemoryPoiSource, StaticGeocoder};
use citywalk_core::{CityLocation, PlanRequestError, Poi, PoiCategory, RoutePlan, RoutePlanner};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

const VIENNA: CityLocation = CityLocation::new(48.2082, 16.3738);

#[derive(Debug, Default)]
struct PlanWorld {
    pois: RefCell<Vec<Poi>>,
    include_city: RefCell<bool>,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl PlanWorld {
    fn new() -> Self {
        Self {
            include_city: RefCell::new(true),
            ..Self::default()
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["citywalk".to_owned(), "plan".to_owned()];
        if *self.include_city.borrow() {
            argv.push("Vienna".to_owned());
        }
        argv.extend([format!("--{ARG_SEED}"), "7".to_owned()]);
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn stdout_text(&self) -> String {
        String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8")
    }

    fn error(&self) -> CliError {
        self.result
            .borrow_mut()
            .take()
            .expect("result recorded")
            .expect_err("expected error")
    }
}

#[fixture]
fn world() -> PlanWorld {
    PlanWorld::new()
}

/// Serves a fixed city from memory instead of OpenStreetMap.
#[derive(Debug)]
struct StubPlanPlannerBuilder {
    pois: Vec<Poi>,
}

impl PlanPlannerBuilder for StubPlanPlannerBuilder {
    fn build(&self, _config: &PlanConfig) -> Result<Box<dyn RoutePlanning>, CliError> {
        Ok(Box::new(RoutePlanner::new(
            StaticGeocoder::around(VIENNA),
            MemoryPoiSource::with_pois(self.pois.clone()),
        )))
    }
}

#[given("a city with two sights")]
fn city_with_two_sights(#[from(world)] world: &PlanWorld) {
    let cathedral = Poi::new(1, 48.2085, 16.3731, "Stephansdom", PoiCategory::Landmark)
        .expect("valid poi");
    let gallery = Poi::new(2, 48.2048, 16.3687, "Albertina", PoiCategory::Museum)
        .expect("valid poi")
        .with_link("https://example.org/albertina collection");
    world.pois.replace(vec![cathedral, gallery]);
}

#[given("a city without sights")]
fn city_without_sights(#[from(world)] world: &PlanWorld) {
    world.pois.replace(Vec::new());
}

#[given("text output is requested")]
fn text_output_requested(#[from(world)] world: &PlanWorld) {
    world
        .cli_args
        .borrow_mut()
        .extend([format!("--{ARG_FORMAT}"), "text".to_owned()]);
}

#[given("I omit the city")]
fn omit_city(#[from(world)] world: &PlanWorld) {
    *world.include_city.borrow_mut() = false;
}

#[given("a budget of zero hours")]
fn zero_hour_budget(#[from(world)] world: &PlanWorld) {
    world
        .cli_args
        .borrow_mut()
        .extend([format!("--{ARG_HOURS}"), "0".to_owned()]);
}

#[when("I run the plan command")]
fn run_plan_command(#[from(world)] world: &PlanWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Plan(args) => {
            let builder = StubPlanPlannerBuilder {
                pois: world.pois.borrow().clone(),
            };
            let mut buffer = world.stdout.borrow_mut();
            run_plan_with(args, &builder, &mut *buffer)
        }
    });

    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints a JSON plan")]
fn command_prints_json_plan(#[from(world)] world: &PlanWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");

    let plan: RoutePlan =
        serde_json::from_str(&world.stdout_text()).expect("output should be a JSON route plan");
    assert_eq!(plan.city, "Vienna");
    assert_eq!(plan.stops.len(), 3);
    assert!(plan.stops.first().is_some_and(Poi::is_virtual));
    assert!(plan.estimated_time_hours <= 3.0);
}

#[then("the command prints the share text")]
fn command_prints_share_text(#[from(world)] world: &PlanWorld) {
    let borrowed = world.result.borrow();
    borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect("expected success");

    let text = world.stdout_text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.first(), Some(&"CityWalk: Vienna"));
    assert_eq!(lines.get(2), Some(&"---"));
    assert_eq!(lines.len(), 6);
    assert!(text.contains("https://example.org/albertina%20collection"));
}

#[then("the command fails because no points of interest were found")]
fn command_fails_without_pois(#[from(world)] world: &PlanWorld) {
    match world.error() {
        CliError::NoPointsOfInterest { city } => assert_eq!(city, "Vienna"),
        other => panic!("expected NoPointsOfInterest, found {other:?}"),
    }
    assert!(world.stdout.borrow().is_empty());
}

#[then("the command fails because the city is missing")]
fn command_fails_missing_city(#[from(world)] world: &PlanWorld) {
    match world.error() {
        CliError::MissingArgument { field, .. } => assert_eq!(field, ARG_CITY),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command fails because the budget is invalid")]
fn command_fails_invalid_budget(#[from(world)] world: &PlanWorld) {
    match world.error() {
        CliError::InvalidRequest(PlanRequestError::NonPositiveHours { .. }) => {}
        other => panic!("expected NonPositiveHours, found {other:?}"),
    }
}

macro_rules! register_plan_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/plan_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: PlanWorld) {
            let _ = world;
        }
    };
}

register_plan_scenario!(plan_as_json, "planning a walk as JSON");
register_plan_scenario!(plan_as_text, "sharing a walk as text");
register_plan_scenario!(plan_without_sights, "rejecting cities without sights");
register_plan_scenario!(plan_missing_city, "rejecting missing cities");
register_plan_scenario!(plan_zero_hours, "rejecting empty time budgets");
