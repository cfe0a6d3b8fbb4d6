//! Map configuration: the region, reporting year, thresholds, and where
//! each of the four datasets lives.
//!
//! A default configuration for the Perth metropolitan area is embedded at
//! compile time. A TOML file with the same schema can replace it.

use std::path::{Path, PathBuf};

use crime_rate_crime_models::FinancialYear;
use crime_rate_geography_models::BoundingBox;
use serde::{Deserialize, Serialize};

use crate::SourceError;

/// Environment variable that re-roots relative dataset paths.
pub const DATA_DIR_ENV: &str = "CRIME_RATE_DATA_DIR";

const DEFAULT_CONFIG: &str = include_str!("../config/perth.toml");

/// Full configuration for one map region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Human-readable region name.
    pub name: String,
    /// Only statistics from this period are counted.
    #[serde(default)]
    pub reporting_year: FinancialYear,
    /// Populations below this produce a missing rate.
    #[serde(default = "default_min_population")]
    pub min_population: u64,
    /// Length of the highest/lowest lists.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Boundary property holding the upper-case locality name.
    pub boundary_name_property: String,
    /// Boundaries without a vertex strictly inside this box are dropped.
    pub bounds: BoundingBox,
    /// Initial map center.
    pub center: MapCenter,
    #[serde(default)]
    pub search: SearchConfig,
    pub datasets: DatasetLocations,
    /// Directory relative dataset paths are resolved against.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

const fn default_min_population() -> u64 {
    100
}

const fn default_top_n() -> usize {
    10
}

/// A `(lng, lat)` position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCenter {
    pub lng: f64,
    pub lat: f64,
}

/// Locality search tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before filtering.
    pub debounce_ms: u64,
    /// Inputs shorter than this are ignored.
    pub min_length: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            min_length: 3,
        }
    }
}

/// Where each dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetLocations {
    /// `GeoJSON` `FeatureCollection` of suburb polygons.
    pub boundaries: DatasetLocation,
    /// JSON array of `{ "Name": ... }`.
    pub localities: DatasetLocation,
    /// JSON array of per-locality arrays of crime records.
    pub statistics: DatasetLocation,
    /// JSON object of upper-case locality name to population.
    pub population: DatasetLocation,
}

/// How to obtain one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DatasetLocation {
    /// A local file. Relative paths resolve against the data directory.
    File {
        /// File path.
        path: PathBuf,
    },
    /// A static file or API returning the dataset directly.
    Url {
        /// Full URL.
        url: String,
    },
}

impl MapConfig {
    /// The embedded Perth configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the embedded TOML is invalid.
    pub fn embedded() -> Result<Self, SourceError> {
        Self::parse(DEFAULT_CONFIG)
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the text does not match the
    /// schema.
    pub fn parse(toml_str: &str) -> Result<Self, SourceError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Reads a configuration file. Relative dataset paths resolve against
    /// the file's directory unless [`DATA_DIR_ENV`] is set.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&text)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Resolves a dataset file path. Absolute paths are returned as is.
    #[must_use]
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            return Path::new(&dir).join(path);
        }
        self.base_dir
            .as_ref()
            .map_or_else(|| path.to_path_buf(), |dir| dir.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_parses() {
        let config = MapConfig::embedded().unwrap();
        assert_eq!(config.reporting_year, FinancialYear::Fy2021_22);
        assert_eq!(config.min_population, 100);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.boundary_name_property, "wa_local_2");
        assert_eq!(config.bounds, BoundingBox::new(115.63, -32.63, 116.08, -31.55));
        assert_eq!(config.search.debounce_ms, 500);
        assert!(matches!(
            config.datasets.boundaries,
            DatasetLocation::File { ref path } if path == Path::new("assets/suburbs.geojson")
        ));
    }

    #[test]
    fn url_locations_and_defaults() {
        let config = MapConfig::parse(
            r#"
            name = "Test"
            boundary_name_property = "name"
            bounds = { west = 0.0, south = 0.0, east = 1.0, north = 1.0 }
            center = { lng = 0.5, lat = 0.5 }

            [datasets]
            boundaries = { type = "url", url = "https://example.com/suburbs.geojson" }
            localities = { type = "file", path = "/data/localities.json" }
            statistics = { type = "file", path = "stats.json" }
            population = { type = "file", path = "population.json" }
            "#,
        )
        .unwrap();

        assert_eq!(config.reporting_year, FinancialYear::LATEST);
        assert_eq!(config.min_population, 100);
        assert_eq!(config.search, SearchConfig::default());
        assert!(matches!(config.datasets.boundaries, DatasetLocation::Url { .. }));
        assert_eq!(
            config.resolve_path(Path::new("/data/localities.json")),
            PathBuf::from("/data/localities.json")
        );
    }

    #[test]
    fn invalid_config_is_an_error() {
        let err = MapConfig::parse("name = 3").unwrap_err();
        assert!(matches!(err, SourceError::Config(_)));
    }
}
