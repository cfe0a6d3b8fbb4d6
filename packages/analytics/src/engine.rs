//! Joins boundaries with statistics and population, annotates every
//! boundary with its rate, and derives the ranked view.
//!
//! [`recompute`] is the whole pipeline as a free function over borrowed
//! inputs. [`AggregationEngine`] owns the loaded datasets and the last
//! [`RankedView`] so callers only need to hand it the current
//! [`OffenceFilterState`].

use std::cmp::Ordering;

use crime_rate_analytics_models::{LocalityDetails, RankTier, RankedLocality, RankedView};
use crime_rate_crime_models::{Locality, PopulationTable};
use crime_rate_geography_models::{BoundaryFeature, CrimeRate};

use crate::filter::OffenceFilterState;
use crate::join::LocalityJoinIndex;
use crate::rate::RateCalculator;

/// Default length of the highest/lowest lists.
pub const DEFAULT_TOP_N: usize = 10;

/// Three-way comparison of two defined rates. Never subtracts.
fn compare_rates(a: f64, b: f64) -> Ordering {
    if a > b {
        Ordering::Greater
    } else if a < b {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}

/// Writes a rate onto every feature and rebuilds the ranked view.
///
/// The only side effect is the rate written into each feature's
/// attributes. Calling this twice with unchanged inputs produces identical
/// features and an identical view.
#[must_use]
pub fn recompute(
    features: &mut [BoundaryFeature],
    index: &LocalityJoinIndex,
    populations: &PopulationTable,
    filter: &OffenceFilterState,
    calculator: &RateCalculator,
    top_n: usize,
) -> RankedView {
    for feature in features.iter_mut() {
        let name = feature.name();
        let rate = calculator.rate(index.get(name), populations.get(name), filter);
        feature.attributes.crime_rate = Some(rate);
    }

    let mut sorted: Vec<RankedLocality> = features
        .iter()
        .filter_map(|f| {
            f.crime_rate().value().map(|rate| RankedLocality {
                name: f.name().to_string(),
                rate,
            })
        })
        .collect();

    // `sort_by` is stable, so ties keep boundary dataset order.
    sorted.sort_by(|a, b| compare_rates(a.rate, b.rate));

    let lowest: Vec<RankedLocality> = sorted.iter().take(top_n).cloned().collect();
    let highest: Vec<RankedLocality> = sorted.iter().rev().take(top_n).cloned().collect();

    log::debug!(
        "Recomputed {} features: {} ranked, {} active offences",
        features.len(),
        sorted.len(),
        filter.len()
    );

    RankedView {
        sorted,
        highest,
        lowest,
        total_features: features.len(),
    }
}

/// Owns the in-scope boundaries and the joined datasets.
#[derive(Debug, Clone)]
pub struct AggregationEngine {
    features: Vec<BoundaryFeature>,
    localities: Vec<Locality>,
    index: LocalityJoinIndex,
    populations: PopulationTable,
    calculator: RateCalculator,
    top_n: usize,
    view: RankedView,
}

impl AggregationEngine {
    /// Builds an engine over already bounds-filtered features. No rates are
    /// computed until the first [`Self::recompute`].
    #[must_use]
    pub fn new(
        features: Vec<BoundaryFeature>,
        localities: Vec<Locality>,
        index: LocalityJoinIndex,
        populations: PopulationTable,
        calculator: RateCalculator,
        top_n: usize,
    ) -> Self {
        Self {
            features,
            localities,
            index,
            populations,
            calculator,
            top_n,
            view: RankedView::default(),
        }
    }

    /// Re-annotates every feature under `filter` and returns the new view.
    pub fn recompute(&mut self, filter: &OffenceFilterState) -> &RankedView {
        self.view = recompute(
            &mut self.features,
            &self.index,
            &self.populations,
            filter,
            &self.calculator,
            self.top_n,
        );
        &self.view
    }

    /// Annotated features, in boundary dataset order.
    #[must_use]
    pub fn features(&self) -> &[BoundaryFeature] {
        &self.features
    }

    /// The view produced by the last recompute.
    #[must_use]
    pub const fn view(&self) -> &RankedView {
        &self.view
    }

    /// The searchable locality list, in dataset order.
    #[must_use]
    pub fn localities(&self) -> &[Locality] {
        &self.localities
    }

    /// Reporting year and population threshold used by every recompute.
    #[must_use]
    pub const fn calculator(&self) -> &RateCalculator {
        &self.calculator
    }

    /// Current rate of the feature named `name` (case-insensitive).
    #[must_use]
    pub fn rate_of(&self, name: &str) -> Option<CrimeRate> {
        self.feature(name).map(BoundaryFeature::crime_rate)
    }

    fn feature(&self, name: &str) -> Option<&BoundaryFeature> {
        let upper = name.to_uppercase();
        self.features.iter().find(|f| f.name().to_uppercase() == upper)
    }

    /// Details for a locality picked from the locality list.
    ///
    /// Returns `None` when the name is not in the locality list or the
    /// locality is not ranked (outside the map, or its rate is missing).
    #[must_use]
    pub fn details(&self, name: &str) -> Option<LocalityDetails> {
        let upper = name.trim().to_uppercase();
        let locality = self
            .localities
            .iter()
            .find(|l| l.name.to_uppercase() == upper)?;

        let position = self
            .view
            .sorted
            .iter()
            .position(|r| r.name.to_uppercase() == upper)?;
        let ranked = &self.view.sorted[position];
        let rank = position + 1;

        let bounds = self.feature(&upper).and_then(crime_rate_spatial::ring_envelope);

        Some(LocalityDetails {
            name: locality.name.clone(),
            rank,
            total: self.view.sorted.len(),
            tier: RankTier::for_rank(rank),
            rate: ranked.rate,
            bounds,
            center: bounds.map(|b| b.center()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::tests::record;
    use crime_rate_crime_models::{FinancialYear, Offence};
    use geo::{LineString, MultiPolygon, Polygon};

    fn feature(name: &str) -> BoundaryFeature {
        let ring = LineString::from(vec![
            (115.8, -31.9),
            (115.9, -31.9),
            (115.9, -32.0),
            (115.8, -31.9),
        ]);
        BoundaryFeature::new(name, MultiPolygon(vec![Polygon::new(ring, vec![])]))
    }

    /// Locality `i` gets `i` robberies and `i` graffiti on a population of 1000.
    fn engine(count: usize) -> AggregationEngine {
        let names: Vec<String> = (1..=count).map(|i| format!("Suburb {i}")).collect();

        let features = names.iter().map(|n| feature(&n.to_uppercase())).collect();
        let localities = names
            .iter()
            .map(|n| Locality { name: n.clone() })
            .collect();
        let stats = names
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let total = i as u64 + 1;
                vec![
                    record(n, Offence::Robbery, FinancialYear::LATEST, total),
                    record(n, Offence::Graffiti, FinancialYear::LATEST, total),
                ]
            })
            .collect();
        let populations = PopulationTable::new(names.iter().map(|n| (n.clone(), 1_000)));

        AggregationEngine::new(
            features,
            localities,
            LocalityJoinIndex::new(stats),
            populations,
            RateCalculator::default(),
            DEFAULT_TOP_N,
        )
    }

    fn is_rounded(rate: f64) -> bool {
        ((rate * 100.0).round() / 100.0 - rate).abs() < f64::EPSILON
    }

    #[test]
    fn annotates_every_feature() {
        let mut engine = engine(3);
        assert!(engine.features().iter().all(|f| f.attributes.crime_rate.is_none()));

        engine.recompute(&OffenceFilterState::all());

        assert_eq!(engine.rate_of("Suburb 1"), Some(CrimeRate::Rate(0.2)));
        assert_eq!(engine.rate_of("SUBURB 3"), Some(CrimeRate::Rate(0.6)));
        for f in engine.features() {
            let rate = f.crime_rate().value().unwrap();
            assert!(rate >= 0.0 && is_rounded(rate));
        }
    }

    #[test]
    fn ranked_lists_take_ten_from_each_end() {
        let mut engine = engine(25);
        let view = engine.recompute(&OffenceFilterState::all()).clone();

        assert_eq!(view.sorted.len(), 25);
        assert_eq!(view.highest.len(), 10);
        assert_eq!(view.lowest.len(), 10);
        assert_eq!(view.highest[0].name, "SUBURB 25");
        assert_eq!(view.lowest[0].name, "SUBURB 1");

        let expected_highest: Vec<_> = view.sorted.iter().rev().take(10).cloned().collect();
        assert_eq!(view.highest, expected_highest);
        assert_eq!(view.lowest, view.sorted[..10].to_vec());

        assert!(view.sorted.windows(2).all(|w| w[0].rate <= w[1].rate));
        assert!(view.lowest.windows(2).all(|w| w[0].rate <= w[1].rate));
        assert!(view.highest.windows(2).all(|w| w[0].rate >= w[1].rate));
    }

    #[test]
    fn fewer_than_ten_returns_what_is_available() {
        let mut engine = engine(4);
        let view = engine.recompute(&OffenceFilterState::all());
        assert_eq!(view.highest.len(), 4);
        assert_eq!(view.lowest.len(), 4);
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut engine = engine(12);
        let filter = OffenceFilterState::only([Offence::Robbery]);

        let first = engine.recompute(&filter).clone();
        let first_features = engine.features().to_vec();
        let second = engine.recompute(&filter).clone();

        assert_eq!(first, second);
        assert_eq!(first_features, engine.features());
    }

    #[test]
    fn toggling_off_never_increases_and_toggling_back_restores() {
        let mut engine = engine(12);
        let mut filter = OffenceFilterState::all();
        engine.recompute(&filter);
        let before: Vec<CrimeRate> = engine.features().iter().map(BoundaryFeature::crime_rate).collect();

        filter.toggle(Offence::Graffiti);
        engine.recompute(&filter);
        for (f, prior) in engine.features().iter().zip(&before) {
            assert!(f.crime_rate().value().unwrap() <= prior.value().unwrap());
        }

        filter.toggle(Offence::Graffiti);
        engine.recompute(&filter);
        let after: Vec<CrimeRate> = engine.features().iter().map(BoundaryFeature::crime_rate).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn missing_rates_are_excluded_and_do_not_linger() {
        let features = vec![feature("SMALL TOWN"), feature("BIG CITY"), feature("NO STATS")];
        let stats = vec![
            vec![record("Small Town", Offence::Arson, FinancialYear::LATEST, 2)],
            vec![record("Big City", Offence::Arson, FinancialYear::LATEST, 50)],
        ];
        let populations = PopulationTable::new([
            ("SMALL TOWN".to_string(), 150),
            ("BIG CITY".to_string(), 10_000),
            ("NO STATS".to_string(), 10_000),
        ]);
        let mut engine = AggregationEngine::new(
            features,
            vec![],
            LocalityJoinIndex::new(stats),
            populations,
            RateCalculator::default(),
            DEFAULT_TOP_N,
        );

        let view = engine.recompute(&OffenceFilterState::all()).clone();
        assert_eq!(view.sorted.len(), 2);
        assert_eq!(view.missing_count(), 1);
        assert_eq!(engine.rate_of("NO STATS"), Some(CrimeRate::Missing));

        // Raising the threshold makes SMALL TOWN missing on the next pass.
        engine.calculator = RateCalculator::new(FinancialYear::LATEST, 200);
        let view = engine.recompute(&OffenceFilterState::all()).clone();
        let names: Vec<&str> = view.sorted.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["BIG CITY"]);
        assert!(view.highest.iter().all(|r| r.name != "SMALL TOWN"));
        assert!(view.lowest.iter().all(|r| r.name != "SMALL TOWN"));
    }

    #[test]
    fn ties_keep_dataset_order() {
        let features = vec![feature("B"), feature("A"), feature("C")];
        let stats = ["B", "A", "C"]
            .iter()
            .map(|n| vec![record(n, Offence::Arson, FinancialYear::LATEST, 1)])
            .collect();
        let populations = PopulationTable::new(["A", "B", "C"].map(|n| (n.to_string(), 1_000)));
        let view = recompute(
            &mut features.clone(),
            &LocalityJoinIndex::new(stats),
            &populations,
            &OffenceFilterState::all(),
            &RateCalculator::default(),
            DEFAULT_TOP_N,
        );
        let names: Vec<&str> = view.sorted.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn details_rank_from_lowest_rate() {
        let mut engine = engine(3);
        engine.recompute(&OffenceFilterState::all());

        let details = engine.details("suburb 2").unwrap();
        assert_eq!(details.name, "Suburb 2");
        assert_eq!(details.rank, 2);
        assert_eq!(details.total, 3);
        assert_eq!(details.rank_label(), "2nd of 3");
        assert_eq!(details.tier, RankTier::Good);
        assert!((details.rate - 0.4).abs() < f64::EPSILON);
        assert!(details.bounds.is_some());
        assert!(details.center.is_some());
    }

    #[test]
    fn details_miss_is_none() {
        let mut engine = engine(3);
        engine.recompute(&OffenceFilterState::all());
        assert!(engine.details("Atlantis").is_none());
    }
}
