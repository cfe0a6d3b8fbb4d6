//! Loads the four datasets concurrently.
//!
//! All four must succeed: the first failure aborts the whole load and no
//! partial [`Datasets`] is ever returned.

use std::sync::Arc;

use crime_rate_crime_models::{Locality, LocalityStats, PopulationTable};
use crime_rate_geography_models::BoundaryFeature;
use geojson::GeoJson;

use crate::config::{DatasetLocation, MapConfig};
use crate::progress::LoadProgress;
use crate::{Dataset, SourceError};

/// The four loaded datasets.
#[derive(Debug, Clone)]
pub struct Datasets {
    /// Every boundary feature, before bounds filtering.
    pub boundaries: Vec<BoundaryFeature>,
    pub localities: Vec<Locality>,
    /// Crime records grouped by locality.
    pub statistics: Vec<LocalityStats>,
    pub population: PopulationTable,
}

/// Loads all datasets named in `config` concurrently.
///
/// # Errors
///
/// Returns the first [`SourceError`] raised by any of the four loads.
pub async fn load_datasets(
    client: &reqwest::Client,
    config: &MapConfig,
    progress: Arc<dyn LoadProgress>,
) -> Result<Datasets, SourceError> {
    progress.started(&config.name, 4);

    let step = |dataset: Dataset, len: usize| {
        log::info!("Loaded {dataset}: {len} entries");
        progress.dataset_loaded(dataset, len);
    };

    let (boundaries, localities, statistics, population) = tokio::try_join!(
        async {
            let text = fetch_text(client, config, Dataset::Boundaries).await?;
            let parsed = parse_boundaries(&text, &config.boundary_name_property)?;
            step(Dataset::Boundaries, parsed.len());
            Ok::<_, SourceError>(parsed)
        },
        async {
            let text = fetch_text(client, config, Dataset::Localities).await?;
            let parsed = parse_localities(&text)?;
            step(Dataset::Localities, parsed.len());
            Ok::<_, SourceError>(parsed)
        },
        async {
            let text = fetch_text(client, config, Dataset::Statistics).await?;
            let parsed = parse_statistics(&text)?;
            step(Dataset::Statistics, parsed.len());
            Ok::<_, SourceError>(parsed)
        },
        async {
            let text = fetch_text(client, config, Dataset::Population).await?;
            let parsed = parse_population(&text)?;
            step(Dataset::Population, parsed.len());
            Ok::<_, SourceError>(parsed)
        },
    )
    .inspect_err(|e| {
        log::error!("Dataset load failed: {e}");
        progress.failed(e);
    })?;

    progress.finished();

    Ok(Datasets {
        boundaries,
        localities,
        statistics,
        population,
    })
}

const fn location(config: &MapConfig, dataset: Dataset) -> &DatasetLocation {
    match dataset {
        Dataset::Boundaries => &config.datasets.boundaries,
        Dataset::Localities => &config.datasets.localities,
        Dataset::Statistics => &config.datasets.statistics,
        Dataset::Population => &config.datasets.population,
    }
}

/// Reads a dataset's raw text from disk or over HTTP.
async fn fetch_text(
    client: &reqwest::Client,
    config: &MapConfig,
    dataset: Dataset,
) -> Result<String, SourceError> {
    match location(config, dataset) {
        DatasetLocation::File { path } => {
            let path = config.resolve_path(path);
            log::debug!("Reading {dataset} from {}", path.display());
            Ok(tokio::fs::read_to_string(&path).await?)
        }
        DatasetLocation::Url { url } => {
            log::debug!("Fetching {dataset} from {url}");
            let resp = client.get(url).send().await?;
            if !resp.status().is_success() {
                return Err(SourceError::Malformed {
                    dataset,
                    message: format!("request failed with status {}", resp.status()),
                });
            }
            Ok(resp.text().await?)
        }
    }
}

/// Parses the boundary `FeatureCollection`.
///
/// # Errors
///
/// Returns [`SourceError::Malformed`] if the text is not a
/// `FeatureCollection` or any feature lacks a name or polygon geometry.
pub fn parse_boundaries(
    text: &str,
    name_property: &str,
) -> Result<Vec<BoundaryFeature>, SourceError> {
    let malformed = |message: String| SourceError::Malformed {
        dataset: Dataset::Boundaries,
        message,
    };

    let geojson: GeoJson = text
        .parse()
        .map_err(|e: geojson::Error| malformed(format!("invalid GeoJSON: {e}")))?;

    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(malformed("expected a FeatureCollection".to_string()));
    };

    collection
        .features
        .into_iter()
        .map(|feature| {
            BoundaryFeature::from_geojson(feature, name_property)
                .map_err(|e| malformed(e.to_string()))
        })
        .collect()
}

/// Parses the locality name list.
///
/// # Errors
///
/// Returns [`SourceError::Json`] if the text is not an array of
/// `{ "Name": string }`.
pub fn parse_localities(text: &str) -> Result<Vec<Locality>, SourceError> {
    Ok(serde_json::from_str(text)?)
}

/// Parses the grouped crime statistics.
///
/// # Errors
///
/// Returns [`SourceError::Json`] if any record has an unknown offence,
/// unknown financial year, or non-numeric count.
pub fn parse_statistics(text: &str) -> Result<Vec<LocalityStats>, SourceError> {
    Ok(serde_json::from_str(text)?)
}

/// Parses the population table.
///
/// # Errors
///
/// Returns [`SourceError::Json`] if the text is not an object of
/// non-negative integers.
pub fn parse_population(text: &str) -> Result<PopulationTable, SourceError> {
    let raw: std::collections::BTreeMap<String, u64> = serde_json::from_str(text)?;
    Ok(PopulationTable::new(raw))
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::config::DatasetLocations;
    use crate::progress::silent;

    const BOUNDARIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "wa_local_2": "PERTH" },
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [[[[115.85, -31.95], [115.87, -31.95], [115.87, -31.96], [115.85, -31.95]]]]
            }
        }]
    }"#;

    const STATISTICS: &str = r#"[[{
        "Locality": "Perth", "Offence": "Stealing", "FinancialYear": "2021-22",
        "July": 1, "August": 1, "September": 1, "October": 1, "November": 1,
        "December": 1, "January": 1, "February": 1, "March": 1, "April": 1,
        "May": 1, "June": 1, "TotalAnnual": 12
    }]]"#;

    fn write_fixtures(dir: &Path, population: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join("suburbs.geojson"), BOUNDARIES).unwrap();
        std::fs::write(dir.join("localities.json"), r#"[{"Name": "Perth"}]"#).unwrap();
        std::fs::write(dir.join("stats.json"), STATISTICS).unwrap();
        std::fs::write(dir.join("population.json"), population).unwrap();
    }

    fn config_for(dir: &Path) -> MapConfig {
        let file = |name: &str| DatasetLocation::File {
            path: PathBuf::from(name),
        };
        let mut config = MapConfig::embedded().unwrap();
        config.datasets = DatasetLocations {
            boundaries: file("suburbs.geojson"),
            localities: file("localities.json"),
            statistics: file("stats.json"),
            population: file("population.json"),
        };
        config.base_dir = Some(dir.to_path_buf());
        config
    }

    #[tokio::test]
    async fn loads_all_four_datasets() {
        let dir = std::env::temp_dir().join("crime_rate_source_load_ok");
        write_fixtures(&dir, r#"{"PERTH": 26000}"#);

        let datasets = load_datasets(&reqwest::Client::new(), &config_for(&dir), silent())
            .await
            .unwrap();

        assert_eq!(datasets.boundaries.len(), 1);
        assert_eq!(datasets.boundaries[0].name(), "PERTH");
        assert_eq!(datasets.localities[0].name, "Perth");
        assert_eq!(datasets.statistics[0][0].total_annual, 12);
        assert_eq!(datasets.population.get("Perth"), Some(26_000));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn any_failure_fails_the_whole_load() {
        let dir = std::env::temp_dir().join("crime_rate_source_load_bad");
        write_fixtures(&dir, r#"{"PERTH": "lots"}"#);

        let result =
            load_datasets(&reqwest::Client::new(), &config_for(&dir), silent()).await;
        assert!(matches!(result, Err(SourceError::Json(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = std::env::temp_dir().join("crime_rate_source_load_missing");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let result =
            load_datasets(&reqwest::Client::new(), &config_for(&dir), silent()).await;
        assert!(matches!(result, Err(SourceError::Io(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn boundaries_must_be_a_feature_collection() {
        let point = r#"{"type": "Point", "coordinates": [115.8, -31.9]}"#;
        let err = parse_boundaries(point, "wa_local_2").unwrap_err();
        assert!(matches!(
            err,
            SourceError::Malformed {
                dataset: Dataset::Boundaries,
                ..
            }
        ));
    }

    #[test]
    fn boundary_without_name_is_malformed() {
        let err = parse_boundaries(BOUNDARIES, "other_property").unwrap_err();
        assert!(err.to_string().contains("other_property"));
    }

    #[test]
    fn population_keys_are_upper_cased() {
        let table = parse_population(r#"{"Mount Lawley": 14000}"#).unwrap();
        assert_eq!(table.get("MOUNT LAWLEY"), Some(14_000));
    }
}
