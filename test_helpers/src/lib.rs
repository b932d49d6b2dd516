//! Test helpers shared across crates.
//!
//! This crate provides a guard serialising access to the combiner's global
//! warning state, JSON shorthands for building values and updates, and text
//! normalisation for behavioural step arguments.

pub mod json;
pub mod text;
pub mod warnings;
