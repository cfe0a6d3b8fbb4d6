//! A loaded map: configuration, engine, and the current offence filter.
//!
//! Every filter mutation goes through [`Session`] so it is always followed
//! by a recompute.

use std::time::Duration;

use crime_rate_analytics::{AggregationEngine, LocalityJoinIndex, OffenceFilterState, RateCalculator};
use crime_rate_analytics_models::RankedView;
use crime_rate_cli_utils::{DatasetProgressBar, MultiProgress};
use crime_rate_crime_models::Offence;
use crime_rate_source::{Datasets, MapConfig, load_datasets};

pub struct Session {
    pub config: MapConfig,
    pub engine: AggregationEngine,
    filter: OffenceFilterState,
}

impl Session {
    /// Loads all datasets and runs the first recompute.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or any dataset
    /// fails to load. No engine is built from a partial load.
    pub async fn load(
        config: MapConfig,
        multi: &MultiProgress,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        let progress = DatasetProgressBar::attach(multi);
        let datasets = load_datasets(&client, &config, progress).await?;

        Ok(Self::from_datasets(config, datasets, OffenceFilterState::all()))
    }

    /// Bounds-filters the boundaries, builds the join index, and runs the
    /// first recompute under `filter`.
    #[must_use]
    pub fn from_datasets(config: MapConfig, datasets: Datasets, filter: OffenceFilterState) -> Self {
        let Datasets {
            boundaries,
            localities,
            statistics,
            population,
        } = datasets;

        let in_bounds = crime_rate_spatial::filter_in_bounds(&config.bounds, boundaries);
        let index = LocalityJoinIndex::new(statistics);
        log::info!(
            "Joined {} statistics groups and {} population entries",
            index.len(),
            population.len()
        );

        let engine = AggregationEngine::new(
            in_bounds,
            localities,
            index,
            population,
            RateCalculator::new(config.reporting_year, config.min_population),
            config.top_n,
        );

        let mut session = Self {
            config,
            engine,
            filter,
        };
        session.recompute();
        session
    }

    pub fn recompute(&mut self) -> &RankedView {
        self.engine.recompute(&self.filter)
    }

    #[must_use]
    pub const fn filter(&self) -> &OffenceFilterState {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: OffenceFilterState) -> &RankedView {
        self.filter = filter;
        self.recompute()
    }

    pub fn toggle(&mut self, offence: Offence) -> &RankedView {
        self.filter.toggle(offence);
        self.recompute()
    }

    pub fn toggle_all(&mut self) -> &RankedView {
        self.filter.toggle_all();
        self.recompute()
    }

    /// The annotated in-bounds boundaries as a `GeoJSON` `FeatureCollection`.
    #[must_use]
    pub fn feature_collection(&self) -> geojson::FeatureCollection {
        geojson::FeatureCollection {
            bbox: None,
            features: self
                .engine
                .features()
                .iter()
                .map(|f| f.to_geojson(&self.config.boundary_name_property))
                .collect(),
            foreign_members: None,
        }
    }
}
