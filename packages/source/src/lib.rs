#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Dataset configuration and loading.
//!
//! Reads the map configuration and loads the four source datasets
//! (boundaries, locality list, crime statistics, population) from local
//! files or URLs. Loading is all-or-nothing: the engine never runs on a
//! partial set of tables.

pub mod config;
pub mod load;
pub mod progress;

pub use config::MapConfig;
pub use load::{Datasets, load_datasets};

use strum_macros::{AsRefStr, Display};

/// The four source datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Dataset {
    Boundaries,
    Localities,
    Statistics,
    Population,
}

/// Errors that can occur while loading configuration or datasets.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The map configuration does not match the schema.
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A dataset was readable but had the wrong shape.
    #[error("Malformed {dataset} dataset: {message}")]
    Malformed {
        /// Which dataset was malformed.
        dataset: Dataset,
        /// Description of what went wrong.
        message: String,
    },
}
