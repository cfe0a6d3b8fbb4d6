#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Suburb boundary types.
//!
//! A [`BoundaryFeature`] is one suburb polygon from the boundary dataset,
//! carrying an explicit attribute record instead of an untyped property
//! bag. The derived [`CrimeRate`] lives in that record; every other
//! property from the source `GeoJSON` is held open in
//! [`FeatureAttributes::extra`] so it survives a round trip to the
//! renderer.

use geo::MultiPolygon;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Property key the renderer reads the computed rate from.
pub const CRIME_RATE_PROPERTY: &str = "crime-rate";

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary (min longitude).
    pub west: f64,
    /// Southern latitude boundary (min latitude).
    pub south: f64,
    /// Eastern longitude boundary (max longitude).
    pub east: f64,
    /// Northern latitude boundary (max latitude).
    pub north: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Midpoint of the box as `(lng, lat)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            f64::midpoint(self.west, self.east),
            f64::midpoint(self.south, self.north),
        )
    }
}

/// Offences per 100 residents, or `Missing` when there is not enough data.
///
/// `Missing` is not zero: it never takes part in ranking. Serialized as a
/// JSON number, or `null` when missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrimeRate {
    /// A computed rate, already rounded to two decimals.
    Rate(f64),
    /// No boundary/statistics/population match, or population too small.
    Missing,
}

impl CrimeRate {
    /// Builds a rate from a raw ratio, rounding to two decimal places.
    #[must_use]
    pub fn rounded(value: f64) -> Self {
        if value.is_finite() {
            Self::Rate((value * 100.0).round() / 100.0)
        } else {
            Self::Missing
        }
    }

    /// The numeric rate, if present.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Rate(v) => Some(v),
            Self::Missing => None,
        }
    }

    #[must_use]
    pub const fn is_missing(self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl std::fmt::Display for CrimeRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rate(v) => write!(f, "{v:.2}"),
            Self::Missing => write!(f, "Insufficient data"),
        }
    }
}

impl Serialize for CrimeRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Rate(v) => serializer.serialize_f64(*v),
            Self::Missing => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for CrimeRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.map_or(Self::Missing, Self::Rate))
    }
}

/// Typed attributes of a boundary feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureAttributes {
    /// Locality name as it appears in the boundary dataset (upper case).
    pub name: String,
    /// Derived rate. `None` until the first recompute has run.
    pub crime_rate: Option<CrimeRate>,
    /// Every other source property, passed through to the renderer.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One suburb polygon from the boundary dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    /// Source feature id, when present.
    pub id: Option<geojson::feature::Id>,
    /// Suburb geometry. Single polygons are promoted to a one-member
    /// multipolygon.
    pub geometry: MultiPolygon<f64>,
    pub attributes: FeatureAttributes,
}

impl BoundaryFeature {
    /// Creates a feature with no extra attributes and no computed rate.
    #[must_use]
    pub fn new(name: impl Into<String>, geometry: MultiPolygon<f64>) -> Self {
        Self {
            id: None,
            geometry,
            attributes: FeatureAttributes {
                name: name.into(),
                crime_rate: None,
                extra: serde_json::Map::new(),
            },
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.attributes.name
    }

    /// The computed rate, treating "not yet computed" as missing.
    #[must_use]
    pub fn crime_rate(&self) -> CrimeRate {
        self.attributes.crime_rate.unwrap_or(CrimeRate::Missing)
    }

    /// Exterior ring of the first polygon, the only ring sampled by the
    /// bounds filter and used for fitting the map to a suburb.
    #[must_use]
    pub fn outer_ring(&self) -> Option<&geo::LineString<f64>> {
        self.geometry.0.first().map(geo::Polygon::exterior)
    }

    /// Parses a `GeoJSON` feature, reading the locality name from
    /// `name_property`.
    ///
    /// # Errors
    ///
    /// Returns an error if the feature has no name property, no geometry,
    /// or a geometry that is not a `Polygon`/`MultiPolygon`.
    pub fn from_geojson(
        feature: geojson::Feature,
        name_property: &str,
    ) -> Result<Self, FeatureConversionError> {
        let mut extra = feature.properties.unwrap_or_default();

        let name = extra
            .remove(name_property)
            .and_then(|v| v.as_str().map(str::trim).map(str::to_string))
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FeatureConversionError::MissingName {
                property: name_property.to_string(),
            })?;

        // A stale rate from a previous export is recomputed, never trusted.
        extra.remove(CRIME_RATE_PROPERTY);

        let geometry = feature
            .geometry
            .ok_or_else(|| FeatureConversionError::MissingGeometry { name: name.clone() })?;

        let geo_geom: geo::Geometry<f64> =
            geometry
                .try_into()
                .map_err(|e: geojson::Error| FeatureConversionError::InvalidGeometry {
                    name: name.clone(),
                    message: e.to_string(),
                })?;

        let geometry = match geo_geom {
            geo::Geometry::MultiPolygon(mp) => mp,
            geo::Geometry::Polygon(p) => MultiPolygon(vec![p]),
            other => {
                return Err(FeatureConversionError::InvalidGeometry {
                    name,
                    message: format!("expected Polygon or MultiPolygon, got {other:?}"),
                });
            }
        };

        Ok(Self {
            id: feature.id,
            geometry,
            attributes: FeatureAttributes {
                name,
                crime_rate: None,
                extra,
            },
        })
    }

    /// Converts back into a `GeoJSON` feature for the renderer, writing the
    /// name under `name_property` and the rate under
    /// [`CRIME_RATE_PROPERTY`].
    #[must_use]
    pub fn to_geojson(&self, name_property: &str) -> geojson::Feature {
        let mut properties = self.attributes.extra.clone();
        properties.insert(
            name_property.to_string(),
            serde_json::Value::String(self.attributes.name.clone()),
        );
        if let Some(rate) = self.attributes.crime_rate {
            properties.insert(
                CRIME_RATE_PROPERTY.to_string(),
                rate.value().map_or(serde_json::Value::Null, serde_json::Value::from),
            );
        }

        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(&self.geometry))),
            id: self.id.clone(),
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

/// Error returned when a `GeoJSON` feature cannot become a
/// [`BoundaryFeature`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureConversionError {
    /// The name property is absent, not a string, or blank.
    MissingName {
        /// Property that was expected to hold the name.
        property: String,
    },
    /// The feature has no geometry.
    MissingGeometry {
        /// Locality name of the offending feature.
        name: String,
    },
    /// The geometry could not be converted to a multipolygon.
    InvalidGeometry {
        /// Locality name of the offending feature.
        name: String,
        /// Conversion failure detail.
        message: String,
    },
}

impl std::fmt::Display for FeatureConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName { property } => {
                write!(f, "feature has no string '{property}' property")
            }
            Self::MissingGeometry { name } => write!(f, "feature {name} has no geometry"),
            Self::InvalidGeometry { name, message } => {
                write!(f, "feature {name} has invalid geometry: {message}")
            }
        }
    }
}

impl std::error::Error for FeatureConversionError {}
