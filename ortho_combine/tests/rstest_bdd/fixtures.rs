//! Shared fixtures for the combiner's behavioural scenarios.

use ortho_combine::{CombineResult, Value};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Scenario state carrying the base value and the latest combine outcome.
#[derive(Debug, Default, ScenarioState)]
pub struct CombineState {
    pub base: Slot<Value>,
    pub result: Slot<CombineResult<Value>>,
    pub warned: Slot<bool>,
}

/// Creates a clean state for each scenario.
#[fixture]
pub fn combine_state() -> CombineState {
    CombineState::default()
}
