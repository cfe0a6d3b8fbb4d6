#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime rate aggregation and ranking engine.
//!
//! Joins suburb boundaries with the locality crime statistics and the
//! population table, computes offences per 100 residents for the active
//! offence categories in one reporting year, and ranks the suburbs. Every
//! pass is a synchronous, in-memory computation; loading the datasets is
//! the job of `crime_rate_source`.

pub mod color;
pub mod engine;
pub mod filter;
pub mod join;
pub mod rate;

pub use engine::{AggregationEngine, DEFAULT_TOP_N, recompute};
pub use filter::OffenceFilterState;
pub use join::LocalityJoinIndex;
pub use rate::{DEFAULT_MIN_POPULATION, RateCalculator};

use thiserror::Error;

/// Errors that can occur while configuring the engine.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// An offence label did not match any category.
    #[error("Unknown offence category: {label}")]
    UnknownOffence {
        /// The label as given.
        label: String,
    },
}
