#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Output types of the crime rate engine.
//!
//! These are what the map renderer and the CLI consume: the ranked view
//! rebuilt on every recompute, the bulk-toggle selection state, and the
//! per-locality details shown when a suburb is searched or clicked.

use crime_rate_geography_models::BoundingBox;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// A locality with a defined rate, as it appears in the ranked lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedLocality {
    /// Boundary name (upper case).
    pub name: String,
    /// Offences per 100 residents, rounded to two decimals.
    pub rate: f64,
}

/// Everything derived from one recompute.
///
/// Rebuilt from scratch each time, so a locality whose rate turns missing
/// cannot linger in any list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedView {
    /// Localities with a defined rate, ascending by rate. Ties keep the
    /// boundary dataset order.
    pub sorted: Vec<RankedLocality>,
    /// Highest rates first.
    pub highest: Vec<RankedLocality>,
    /// Lowest rates first.
    pub lowest: Vec<RankedLocality>,
    /// Number of in-scope features, including those with a missing rate.
    pub total_features: usize,
}

impl RankedView {
    /// Number of in-scope features whose rate is missing.
    #[must_use]
    pub const fn missing_count(&self) -> usize {
        self.total_features.saturating_sub(self.sorted.len())
    }
}

/// Tri-state of the "select all offences" control.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SelectionState {
    /// Every offence category is active.
    All,
    /// No offence category is active.
    None,
    /// Some but not all categories are active (indeterminate checkbox).
    Some,
}

impl SelectionState {
    /// Derives the state from the active and total category counts.
    #[must_use]
    pub const fn from_counts(active: usize, total: usize) -> Self {
        if active == 0 {
            Self::None
        } else if active >= total {
            Self::All
        } else {
            Self::Some
        }
    }

    /// Whether the bulk checkbox should render as indeterminate.
    #[must_use]
    pub const fn is_indeterminate(self) -> bool {
        matches!(self, Self::Some)
    }
}

/// Coarse classification of a locality's position in the ranking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RankTier {
    /// Rank 1 to 50.
    Good,
    /// Rank 51 to 200.
    Fair,
    /// Anything past 200.
    Poor,
}

impl RankTier {
    #[must_use]
    pub const fn for_rank(rank: usize) -> Self {
        if rank <= 50 {
            Self::Good
        } else if rank <= 200 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// Details for one locality, shown after a search or click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalityDetails {
    /// Mixed-case name from the locality list.
    pub name: String,
    /// 1-based position in the ascending ranking (1 = lowest rate).
    pub rank: usize,
    /// Number of ranked localities.
    pub total: usize,
    pub tier: RankTier,
    /// Current rate under the active offence filter.
    pub rate: f64,
    /// Envelope of the suburb's outer ring, for fitting the map.
    pub bounds: Option<BoundingBox>,
    /// Envelope midpoint `(lng, lat)`, where the popup is anchored.
    pub center: Option<(f64, f64)>,
}

impl LocalityDetails {
    /// Rank with its English ordinal suffix, e.g. `"23rd of 310"`.
    #[must_use]
    pub fn rank_label(&self) -> String {
        format!("{}{} of {}", self.rank, ordinal_suffix(self.rank), self.total)
    }
}

/// Ordinal suffix chosen from the last digit only, so 11 reads `"11st"`
/// exactly like the published map.
#[must_use]
pub const fn ordinal_suffix(n: usize) -> &'static str {
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}
