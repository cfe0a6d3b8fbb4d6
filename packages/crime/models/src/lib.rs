#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Offence taxonomy, reporting periods, and the non-spatial dataset types.
//!
//! This crate defines the 18 offence categories and 11 financial years that
//! appear in the locality crime statistics, together with the record shapes
//! of the locality list, crime statistics, and population datasets. All
//! other crates join against these types.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// An offence category as published in the locality crime statistics.
///
/// The string forms match the dataset exactly (e.g. `"Assault (Family)"`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Offence {
    #[serde(rename = "Homicide")]
    #[strum(serialize = "Homicide")]
    Homicide,
    #[serde(rename = "Sexual Offences")]
    #[strum(serialize = "Sexual Offences")]
    SexualOffences,
    #[serde(rename = "Assault (Family)")]
    #[strum(serialize = "Assault (Family)")]
    AssaultFamily,
    #[serde(rename = "Assault (Non-Family)")]
    #[strum(serialize = "Assault (Non-Family)")]
    AssaultNonFamily,
    #[serde(rename = "Threatening Behaviour (Family)")]
    #[strum(serialize = "Threatening Behaviour (Family)")]
    ThreateningFamily,
    #[serde(rename = "Threatening Behaviour (Non-Family)")]
    #[strum(serialize = "Threatening Behaviour (Non-Family)")]
    ThreateningNonFamily,
    #[serde(rename = "Deprivation of Liberty")]
    #[strum(serialize = "Deprivation of Liberty")]
    Deprivation,
    #[serde(rename = "Robbery")]
    #[strum(serialize = "Robbery")]
    Robbery,
    #[serde(rename = "Dwelling Burglary")]
    #[strum(serialize = "Dwelling Burglary")]
    DwellingBurglary,
    #[serde(rename = "Non-Dwelling Burglary")]
    #[strum(serialize = "Non-Dwelling Burglary")]
    NonDwellingBurglary,
    #[serde(rename = "Stealing of Motor Vehicle")]
    #[strum(serialize = "Stealing of Motor Vehicle")]
    StealingMotorVehicle,
    #[serde(rename = "Stealing")]
    #[strum(serialize = "Stealing")]
    Stealing,
    #[serde(rename = "Property Damage")]
    #[strum(serialize = "Property Damage")]
    PropertyDamage,
    #[serde(rename = "Arson")]
    #[strum(serialize = "Arson")]
    Arson,
    #[serde(rename = "Drug Offences")]
    #[strum(serialize = "Drug Offences")]
    DrugOffences,
    #[serde(rename = "Graffiti")]
    #[strum(serialize = "Graffiti")]
    Graffiti,
    #[serde(rename = "Fraud & Related Offences")]
    #[strum(serialize = "Fraud & Related Offences")]
    Fraud,
    #[serde(rename = "Breach of Violence Restraint Order")]
    #[strum(serialize = "Breach of Violence Restraint Order")]
    BreachOfRestraint,
}

impl Offence {
    /// Returns all variants of this enum, in dataset order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Homicide,
            Self::SexualOffences,
            Self::AssaultFamily,
            Self::AssaultNonFamily,
            Self::ThreateningFamily,
            Self::ThreateningNonFamily,
            Self::Deprivation,
            Self::Robbery,
            Self::DwellingBurglary,
            Self::NonDwellingBurglary,
            Self::StealingMotorVehicle,
            Self::Stealing,
            Self::PropertyDamage,
            Self::Arson,
            Self::DrugOffences,
            Self::Graffiti,
            Self::Fraud,
            Self::BreachOfRestraint,
        ]
    }

    /// Looks up an offence by its dataset label, ignoring ASCII case and
    /// surrounding whitespace.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::all()
            .iter()
            .copied()
            .find(|o| o.as_ref().eq_ignore_ascii_case(label))
    }
}

/// A financial-year reporting period (July to June).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum FinancialYear {
    #[serde(rename = "2011-12")]
    #[strum(serialize = "2011-12")]
    Fy2011_12,
    #[serde(rename = "2012-13")]
    #[strum(serialize = "2012-13")]
    Fy2012_13,
    #[serde(rename = "2013-14")]
    #[strum(serialize = "2013-14")]
    Fy2013_14,
    #[serde(rename = "2014-15")]
    #[strum(serialize = "2014-15")]
    Fy2014_15,
    #[serde(rename = "2015-16")]
    #[strum(serialize = "2015-16")]
    Fy2015_16,
    #[serde(rename = "2016-17")]
    #[strum(serialize = "2016-17")]
    Fy2016_17,
    #[serde(rename = "2017-18")]
    #[strum(serialize = "2017-18")]
    Fy2017_18,
    #[serde(rename = "2018-19")]
    #[strum(serialize = "2018-19")]
    Fy2018_19,
    #[serde(rename = "2019-20")]
    #[strum(serialize = "2019-20")]
    Fy2019_20,
    #[serde(rename = "2020-21")]
    #[strum(serialize = "2020-21")]
    Fy2020_21,
    #[serde(rename = "2021-22")]
    #[strum(serialize = "2021-22")]
    Fy2021_22,
}

impl FinancialYear {
    /// The most recent period in the published statistics.
    pub const LATEST: Self = Self::Fy2021_22;

    /// Returns all variants of this enum, oldest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Fy2011_12,
            Self::Fy2012_13,
            Self::Fy2013_14,
            Self::Fy2014_15,
            Self::Fy2015_16,
            Self::Fy2016_17,
            Self::Fy2017_18,
            Self::Fy2018_19,
            Self::Fy2019_20,
            Self::Fy2020_21,
            Self::Fy2021_22,
        ]
    }
}

impl Default for FinancialYear {
    fn default() -> Self {
        Self::LATEST
    }
}

/// An entry of the locality name list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality {
    /// Mixed-case locality name (e.g. `"Mount Lawley"`).
    #[serde(rename = "Name")]
    pub name: String,
}

/// One row of the locality crime statistics: a single offence category in a
/// single financial year for a single locality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CrimeRecord {
    /// Row identifier, when the export includes one.
    #[serde(default)]
    pub id: Option<u64>,
    /// Mixed-case locality name.
    pub locality: String,
    /// Offence category.
    pub offence: Offence,
    /// Reporting period.
    pub financial_year: FinancialYear,
    #[serde(deserialize_with = "count")]
    pub july: u64,
    #[serde(deserialize_with = "count")]
    pub august: u64,
    #[serde(deserialize_with = "count")]
    pub september: u64,
    #[serde(deserialize_with = "count")]
    pub october: u64,
    #[serde(deserialize_with = "count")]
    pub november: u64,
    #[serde(deserialize_with = "count")]
    pub december: u64,
    #[serde(deserialize_with = "count")]
    pub january: u64,
    #[serde(deserialize_with = "count")]
    pub february: u64,
    #[serde(deserialize_with = "count")]
    pub march: u64,
    #[serde(deserialize_with = "count")]
    pub april: u64,
    #[serde(deserialize_with = "count")]
    pub may: u64,
    #[serde(deserialize_with = "count")]
    pub june: u64,
    /// Annual total as published. Not recomputed from the monthly counts.
    #[serde(deserialize_with = "count")]
    pub total_annual: u64,
}

impl CrimeRecord {
    /// Monthly counts in financial-year order (July first).
    #[must_use]
    pub const fn monthly(&self) -> [u64; 12] {
        [
            self.july,
            self.august,
            self.september,
            self.october,
            self.november,
            self.december,
            self.january,
            self.february,
            self.march,
            self.april,
            self.may,
            self.june,
        ]
    }
}

/// Accepts counts published either as JSON numbers or numeric strings.
fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid count {s:?}: {e}"))),
    }
}

/// All statistics rows for one locality, across every year and offence.
pub type LocalityStats = Vec<CrimeRecord>;

/// Population per locality, keyed by the upper-cased locality name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, u64>")]
pub struct PopulationTable(BTreeMap<String, u64>);

impl From<BTreeMap<String, u64>> for PopulationTable {
    fn from(entries: BTreeMap<String, u64>) -> Self {
        Self::new(entries)
    }
}

impl PopulationTable {
    /// Builds a table, upper-casing every key.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = (String, u64)>) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(name, population)| (name.to_uppercase(), population))
                .collect(),
        )
    }

    /// Returns the population of `locality`, matched on its upper-cased name.
    #[must_use]
    pub fn get(&self, locality: &str) -> Option<u64> {
        self.0.get(&locality.to_uppercase()).copied()
    }

    /// Number of localities with a population.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Title-cases a locality name: every space-delimited token gets an
/// upper-case first character and a lower-cased remainder.
///
/// Boundary features carry upper-case names (`"MOUNT LAWLEY"`) while the
/// crime statistics use mixed case (`"Mount Lawley"`); this is the bridge.
#[must_use]
pub fn to_title_case(name: &str) -> String {
    name.split(' ')
        .map(|token| {
            let mut chars = token.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
