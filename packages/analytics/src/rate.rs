//! Per-locality crime rate: offences per 100 residents.

use crime_rate_crime_models::{CrimeRecord, FinancialYear};
use crime_rate_geography_models::CrimeRate;
use serde::{Deserialize, Serialize};

use crate::filter::OffenceFilterState;

/// Populations below this produce a missing rate.
pub const DEFAULT_MIN_POPULATION: u64 = 100;

/// Computes rates for one fixed reporting year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCalculator {
    /// Only records from this year are counted.
    pub reporting_year: FinancialYear,
    /// Rates on smaller populations are suppressed as unreliable.
    pub min_population: u64,
}

impl Default for RateCalculator {
    fn default() -> Self {
        Self {
            reporting_year: FinancialYear::LATEST,
            min_population: DEFAULT_MIN_POPULATION,
        }
    }
}

impl RateCalculator {
    #[must_use]
    pub const fn new(reporting_year: FinancialYear, min_population: u64) -> Self {
        Self {
            reporting_year,
            min_population,
        }
    }

    /// Sums `TotalAnnual` over the records of the reporting year whose
    /// offence is active. Inactive records are skipped.
    #[must_use]
    pub fn offence_count(&self, records: &[CrimeRecord], filter: &OffenceFilterState) -> u64 {
        records
            .iter()
            .filter(|r| r.financial_year == self.reporting_year)
            .filter(|r| filter.is_active(r.offence))
            .map(|r| r.total_annual)
            .sum()
    }

    /// Rate for one locality.
    ///
    /// Missing when there are no statistics, no population, or the
    /// population is below [`Self::min_population`] (even with zero
    /// offences). Otherwise `count * 100 / population` rounded to two
    /// decimals, which may be exactly zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rate(
        &self,
        records: Option<&[CrimeRecord]>,
        population: Option<u64>,
        filter: &OffenceFilterState,
    ) -> CrimeRate {
        let (Some(records), Some(population)) = (records, population) else {
            return CrimeRate::Missing;
        };

        if population < self.min_population || population == 0 {
            return CrimeRate::Missing;
        }

        let count = self.offence_count(records, filter);

        CrimeRate::rounded(count as f64 * 100.0 / population as f64)
    }
}
