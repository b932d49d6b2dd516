//! `rstest-bdd` behavioural suite for `ortho_combine`.
//!
//! [`fixtures`] holds the shared scenario state, [`steps`] the step
//! implementations, and [`scenarios`] binds the `.feature` files to both.

mod fixtures;
mod scenarios;
mod steps;
