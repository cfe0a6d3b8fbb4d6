#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Coarse spatial filtering for suburb boundaries.
//!
//! The map only covers one metropolitan rectangle, so boundaries are
//! filtered with a single vertex-sampling test instead of a real
//! polygon/rectangle intersection. A suburb is kept when any vertex of its
//! first polygon's exterior ring lies strictly inside the rectangle. A
//! polygon that fully encloses the rectangle without a vertex inside it is
//! dropped; that is a known limitation of the test, not something to patch
//! here.

use crime_rate_geography_models::{BoundaryFeature, BoundingBox};
use geo::{BoundingRect, Coord};

/// Returns `true` when `coord` lies strictly inside `bbox`. Points on an
/// edge are outside.
#[must_use]
pub fn strictly_contains(bbox: &BoundingBox, coord: Coord<f64>) -> bool {
    bbox.west < coord.x && coord.x < bbox.east && bbox.south < coord.y && coord.y < bbox.north
}

/// Returns `true` when any vertex of the feature's outer ring is strictly
/// inside `bbox`.
#[must_use]
pub fn has_vertex_within(bbox: &BoundingBox, feature: &BoundaryFeature) -> bool {
    feature
        .outer_ring()
        .is_some_and(|ring| ring.coords().any(|c| strictly_contains(bbox, *c)))
}

/// Keeps the features with at least one outer-ring vertex strictly inside
/// `bbox`, preserving input order. Features without a match are dropped
/// along with all of their other rings.
#[must_use]
pub fn filter_in_bounds(bbox: &BoundingBox, features: Vec<BoundaryFeature>) -> Vec<BoundaryFeature> {
    let total = features.len();

    let kept: Vec<BoundaryFeature> = features
        .into_iter()
        .filter(|f| has_vertex_within(bbox, f))
        .collect();

    log::info!(
        "Kept {} of {total} boundaries inside ({}, {}, {}, {})",
        kept.len(),
        bbox.west,
        bbox.south,
        bbox.east,
        bbox.north
    );

    kept
}

/// Envelope of a feature's outer ring, used to fit the map to a suburb.
#[must_use]
pub fn ring_envelope(feature: &BoundaryFeature) -> Option<BoundingBox> {
    let rect = feature.outer_ring()?.bounding_rect()?;
    Some(BoundingBox::new(
        rect.min().x,
        rect.min().y,
        rect.max().x,
        rect.max().y,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, MultiPolygon, Polygon};

    const PERTH: BoundingBox = BoundingBox::new(115.63, -32.63, 116.08, -31.55);

    fn feature(name: &str, ring: &[(f64, f64)]) -> BoundaryFeature {
        let polygon = Polygon::new(LineString::from(ring.to_vec()), vec![]);
        BoundaryFeature::new(name, MultiPolygon(vec![polygon]))
    }

    #[test]
    fn keeps_feature_with_single_vertex_inside() {
        let inside = feature(
            "PARTLY IN",
            &[(115.70, -32.00), (115.0, -33.0), (114.0, -33.0), (115.70, -32.00)],
        );
        let outside = feature(
            "FAR AWAY",
            &[(120.0, -20.0), (121.0, -20.0), (121.0, -21.0), (120.0, -20.0)],
        );

        let kept = filter_in_bounds(&PERTH, vec![inside, outside]);
        let names: Vec<&str> = kept.iter().map(BoundaryFeature::name).collect();
        assert_eq!(names, vec!["PARTLY IN"]);
    }

    #[test]
    fn vertices_on_the_edge_are_outside() {
        let on_edge = feature(
            "EDGE",
            &[(115.63, -32.0), (116.08, -32.0), (115.9, -31.55), (115.63, -32.0)],
        );
        assert!(!has_vertex_within(&PERTH, &on_edge));
    }

    #[test]
    fn enclosing_polygon_without_inner_vertex_is_dropped() {
        let enclosing = feature(
            "HUGE",
            &[(110.0, -40.0), (120.0, -40.0), (120.0, -20.0), (110.0, -20.0), (110.0, -40.0)],
        );
        assert!(filter_in_bounds(&PERTH, vec![enclosing]).is_empty());
    }

    #[test]
    fn only_first_exterior_ring_is_sampled() {
        let outside = Polygon::new(
            LineString::from(vec![(120.0, -20.0), (121.0, -20.0), (121.0, -21.0), (120.0, -20.0)]),
            vec![],
        );
        let inside = Polygon::new(
            LineString::from(vec![(115.8, -31.9), (115.9, -31.9), (115.9, -32.0), (115.8, -31.9)]),
            vec![],
        );
        let multi = BoundaryFeature::new("SPLIT", MultiPolygon(vec![outside, inside]));
        assert!(!has_vertex_within(&PERTH, &multi));
    }

    #[test]
    fn preserves_input_order() {
        let a = feature("A", &[(115.8, -31.9), (115.9, -31.9), (115.8, -31.9)]);
        let b = feature("B", &[(115.7, -32.1), (115.75, -32.1), (115.7, -32.1)]);
        let kept = filter_in_bounds(&PERTH, vec![b, a]);
        assert_eq!(kept[0].name(), "B");
        assert_eq!(kept[1].name(), "A");
    }

    #[test]
    fn envelope_spans_outer_ring() {
        let f = feature(
            "BOX",
            &[(115.8, -31.9), (115.9, -31.9), (115.9, -32.0), (115.8, -32.0), (115.8, -31.9)],
        );
        let env = ring_envelope(&f).unwrap();
        assert_eq!(env, BoundingBox::new(115.8, -32.0, 115.9, -31.9));
        let (lng, lat) = env.center();
        assert!((lng - 115.85).abs() < 1e-9);
        assert!((lat + 31.95).abs() < 1e-9);
    }
}
