//! Shared test harness modules for the CityWalk CLI.

use super::*;

mod plan_steps;
