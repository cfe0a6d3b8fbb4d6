//! Locality-keyed lookup over the grouped crime statistics.
//!
//! Boundary names are upper case while the statistics use mixed case, so
//! both sides are reduced to the same key: title-case the name, then fold
//! to upper case for a case-insensitive comparison.

use std::collections::BTreeMap;

use crime_rate_crime_models::{CrimeRecord, LocalityStats, to_title_case};

/// Lookup from normalized locality name to that locality's statistics.
#[derive(Debug, Clone, Default)]
pub struct LocalityJoinIndex {
    groups: BTreeMap<String, LocalityStats>,
}

fn join_key(name: &str) -> String {
    to_title_case(name.trim()).to_uppercase()
}

impl LocalityJoinIndex {
    /// Indexes each group by the locality of its first record.
    ///
    /// Empty groups cannot be keyed and are skipped. When two groups share
    /// a locality the first one wins, matching a linear scan.
    #[must_use]
    pub fn new(stats: Vec<LocalityStats>) -> Self {
        let mut groups = BTreeMap::new();
        let mut skipped = 0usize;

        for group in stats {
            let Some(first) = group.first() else {
                skipped += 1;
                continue;
            };
            let key = join_key(&first.locality);
            if groups.contains_key(&key) {
                log::debug!("Duplicate statistics group for {}, keeping the first", first.locality);
                continue;
            }
            groups.insert(key, group);
        }

        if skipped > 0 {
            log::warn!("Skipped {skipped} empty statistics groups");
        }

        Self { groups }
    }

    /// Returns the statistics group for `locality`, or `None` when the
    /// locality has no published statistics. A miss is normal and not an
    /// error.
    #[must_use]
    pub fn get(&self, locality: &str) -> Option<&[CrimeRecord]> {
        self.groups.get(&join_key(locality)).map(Vec::as_slice)
    }

    /// Number of indexed localities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no locality has statistics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
