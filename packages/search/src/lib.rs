#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Locality name autocomplete.
//!
//! [`filter_localities`] is the prefix match itself. [`SearchDebouncer`]
//! collapses a burst of keystrokes into a single match once the input has
//! been quiet for the configured delay.

pub mod debounce;

pub use debounce::{SearchDebouncer, SearchOutcome};

use crime_rate_crime_models::Locality;

/// Localities whose name starts with `text`, ignoring case, in list order.
#[must_use]
pub fn filter_localities(localities: &[Locality], text: &str) -> Vec<Locality> {
    let prefix = text.to_uppercase();
    localities
        .iter()
        .filter(|l| l.name.to_uppercase().starts_with(&prefix))
        .cloned()
        .collect()
}
