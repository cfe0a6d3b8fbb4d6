#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing shared by the crime rate binaries.
//!
//! [`init_logger`] routes `log` output through `indicatif-log-bridge` so a
//! log line never tears a progress bar, and [`DatasetProgressBar`] renders
//! dataset loading on the returned [`MultiProgress`].

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use crime_rate_source::progress::LoadProgress;
use crime_rate_source::{Dataset, SourceError};
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// One bar that advances as each dataset finishes loading.
///
/// The message lists the datasets loaded so far, in completion order.
pub struct DatasetProgressBar {
    bar: ProgressBar,
    loaded: Mutex<Vec<Dataset>>,
}

impl DatasetProgressBar {
    /// Adds a spinner to `multi`. It turns into a `2/4` bar when loading
    /// starts.
    #[must_use]
    pub fn attach(multi: &MultiProgress) -> Arc<dyn LoadProgress> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message("Reading map configuration");

        Arc::new(Self {
            bar,
            loaded: Mutex::new(Vec::with_capacity(4)),
        })
    }
}

impl LoadProgress for DatasetProgressBar {
    fn started(&self, region: &str, datasets: usize) {
        self.bar.set_length(datasets as u64);
        self.bar.set_position(0);
        self.bar.set_style(
            ProgressStyle::with_template(
                "{prefix:.bold} {wide_bar:.green/dim} {pos}/{len} {msg} [{elapsed_precise}]",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
        );
        self.bar.set_prefix(region.to_string());
    }

    fn dataset_loaded(&self, dataset: Dataset, _entries: usize) {
        let Ok(mut loaded) = self.loaded.lock() else {
            self.bar.inc(1);
            return;
        };
        loaded.push(dataset);
        let names: Vec<&str> = loaded.iter().map(AsRef::as_ref).collect();
        self.bar.set_message(names.join(", "));
        self.bar.inc(1);
    }

    fn finished(&self) {
        self.bar.finish_with_message("datasets loaded");
    }

    fn failed(&self, error: &SourceError) {
        self.bar.abandon_with_message(format!("failed: {error}"));
    }
}

/// Installs `pretty_env_logger` (filtered by `RUST_LOG`) behind
/// `indicatif-log-bridge`.
///
/// Every progress bar must be added to the returned [`MultiProgress`].
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    // A logger may already be installed, e.g. by a test harness.
    if indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .is_ok()
    {
        log::set_max_level(level);
    }

    multi
}
