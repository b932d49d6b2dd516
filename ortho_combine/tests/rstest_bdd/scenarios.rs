//! Binds the combiner feature files to the step registry.

use crate::fixtures::{CombineState, combine_state};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/combine.feature",
    fixtures = [combine_state: CombineState]
);
