//! The set of offence categories currently counted towards crime rates.
//!
//! Mutating the filter has no effect on its own: the caller must follow
//! every change with [`crate::engine::AggregationEngine::recompute`].

use std::collections::BTreeSet;

use crime_rate_analytics_models::SelectionState;
use crime_rate_crime_models::Offence;

use crate::AnalyticsError;

/// Active offence categories. Starts with every category active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffenceFilterState {
    active: BTreeSet<Offence>,
}

impl Default for OffenceFilterState {
    fn default() -> Self {
        Self::all()
    }
}

impl OffenceFilterState {
    /// Every category active.
    #[must_use]
    pub fn all() -> Self {
        Self {
            active: Offence::all().iter().copied().collect(),
        }
    }

    /// No category active.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            active: BTreeSet::new(),
        }
    }

    /// Only the given categories active.
    #[must_use]
    pub fn only(offences: impl IntoIterator<Item = Offence>) -> Self {
        Self {
            active: offences.into_iter().collect(),
        }
    }

    /// Builds a filter from dataset labels such as `"Graffiti"`.
    ///
    /// With `exclude = false` only the labelled categories are active;
    /// with `exclude = true` every category except the labelled ones is.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::UnknownOffence`] if a label does not name
    /// one of the 18 categories.
    pub fn from_labels<S: AsRef<str>>(labels: &[S], exclude: bool) -> Result<Self, AnalyticsError> {
        let mut state = if exclude { Self::all() } else { Self::none() };

        for label in labels {
            let label = label.as_ref();
            let offence =
                Offence::from_label(label).ok_or_else(|| AnalyticsError::UnknownOffence {
                    label: label.to_string(),
                })?;
            if exclude {
                state.active.remove(&offence);
            } else {
                state.active.insert(offence);
            }
        }

        Ok(state)
    }

    /// Flips membership of a single category.
    pub fn toggle(&mut self, offence: Offence) {
        if !self.active.remove(&offence) {
            self.active.insert(offence);
        }
    }

    /// Clears the set if anything is active, otherwise activates every
    /// category.
    pub fn toggle_all(&mut self) {
        if self.active.is_empty() {
            self.active = Offence::all().iter().copied().collect();
        } else {
            self.active.clear();
        }
    }

    #[must_use]
    pub fn is_active(&self, offence: Offence) -> bool {
        self.active.contains(&offence)
    }

    /// Active categories in taxonomy order.
    pub fn active(&self) -> impl Iterator<Item = Offence> + '_ {
        self.active.iter().copied()
    }

    /// Number of active offence categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether every category is switched off.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// State of the bulk-toggle control.
    #[must_use]
    pub fn selection(&self) -> SelectionState {
        SelectionState::from_counts(self.active.len(), Offence::all().len())
    }
}
