//! Progress reporting for dataset loading.
//!
//! [`LoadProgress`] keeps the loaders independent of how progress is shown:
//! `indicatif` bars in the CLI, nothing at all in tests.

use std::sync::Arc;

use crate::{Dataset, SourceError};

/// Receives loading events. Shared by the concurrent loads, hence
/// `Send + Sync`.
pub trait LoadProgress: Send + Sync {
    /// Loading of `datasets` datasets for `region` has begun.
    fn started(&self, region: &str, datasets: usize);

    /// One dataset was fetched and parsed into `entries` entries.
    fn dataset_loaded(&self, dataset: Dataset, entries: usize);

    /// Every dataset loaded.
    fn finished(&self);

    /// The load was abandoned. No further events follow.
    fn failed(&self, error: &SourceError);
}

/// Ignores every event.
pub struct SilentProgress;

impl LoadProgress for SilentProgress {
    fn started(&self, _region: &str, _datasets: usize) {}
    fn dataset_loaded(&self, _dataset: Dataset, _entries: usize) {}
    fn finished(&self) {}
    fn failed(&self, _error: &SourceError) {}
}

#[must_use]
pub fn silent() -> Arc<dyn LoadProgress> {
    Arc::new(SilentProgress)
}
