//! Polygon types and the pluggable geometry engine.
//!
//! Slot footprints and detected vehicles share one planar pixel/map
//! coordinate space. Polygons are stored and transported as a list of
//! closed rings of `[x, y]` pairs (the detector's wire format); only
//! the exterior ring participates in overlap computation.
//!
//! The actual area/intersection math sits behind [`GeometryEngine`] so
//! the backing library can be swapped without touching reconciliation
//! logic. The default engine is backed by the `geo` crate.

use geo::{Area, BooleanOps, Coord, LineString};
use serde::{Deserialize, Serialize};

/// One polygon ring: an ordered list of `[x, y]` points, with the first
/// point conventionally repeated as the last.
pub type Ring = Vec<[f64; 2]>;

/// A polygon as a list of rings, matching the detector wire format
/// `[[[x1, y1], [x2, y2], ...], ...]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon(pub Vec<Ring>);

impl Polygon {
    /// Build a polygon from a single exterior ring.
    pub fn from_exterior(ring: Ring) -> Self {
        Self(vec![ring])
    }

    /// The exterior ring, if present.
    pub fn exterior(&self) -> Option<&Ring> {
        self.0.first()
    }
}

/// A polygon that cannot be used for area/overlap computation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("polygon has no rings")]
    Empty,

    #[error("polygon ring has {count} distinct points, need at least 3")]
    TooFewPoints { count: usize },

    #[error("polygon contains a non-finite coordinate")]
    NonFiniteCoordinate,
}

/// Minimal capability interface over a polygon geometry library.
pub trait GeometryEngine: Send + Sync {
    /// Planar area of a polygon.
    fn area(&self, polygon: &Polygon) -> Result<f64, GeometryError>;

    /// Intersection area of two polygons. `Ok(None)` when they do not
    /// overlap.
    fn intersection_area(
        &self,
        a: &Polygon,
        b: &Polygon,
    ) -> Result<Option<f64>, GeometryError>;
}

/// Default [`GeometryEngine`] backed by the `geo` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeoEngine;

impl GeometryEngine for GeoEngine {
    fn area(&self, polygon: &Polygon) -> Result<f64, GeometryError> {
        Ok(to_geo(polygon)?.unsigned_area())
    }

    fn intersection_area(
        &self,
        a: &Polygon,
        b: &Polygon,
    ) -> Result<Option<f64>, GeometryError> {
        let overlap = to_geo(a)?.intersection(&to_geo(b)?).unsigned_area();
        if overlap > 0.0 {
            Ok(Some(overlap))
        } else {
            Ok(None)
        }
    }
}

/// Validate and convert the exterior ring into a `geo` polygon.
fn to_geo(polygon: &Polygon) -> Result<geo::Polygon<f64>, GeometryError> {
    let ring = polygon.exterior().ok_or(GeometryError::Empty)?;

    // Ignore the closing point when counting: the wire format repeats
    // the first point as the last.
    let mut count = ring.len();
    if count >= 2 && ring.first() == ring.last() {
        count -= 1;
    }
    if count < 3 {
        return Err(GeometryError::TooFewPoints { count });
    }

    if ring.iter().any(|p| !p[0].is_finite() || !p[1].is_finite()) {
        return Err(GeometryError::NonFiniteCoordinate);
    }

    let coords: Vec<Coord<f64>> = ring.iter().map(|p| Coord { x: p[0], y: p[1] }).collect();
    // geo closes the exterior ring itself if the input is open.
    Ok(geo::Polygon::new(LineString::from(coords), vec![]))
}

/// Axis-aligned rectangle as a closed exterior ring (test helper).
#[cfg(test)]
pub(crate) fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
    Polygon::from_exterior(vec![
        [x0, y0],
        [x1, y0],
        [x1, y1],
        [x0, y1],
        [x0, y0],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn rectangle_area() {
        let area = GeoEngine.area(&rect(0.0, 0.0, 4.0, 2.5)).unwrap();
        assert!((area - 10.0).abs() < 1e-9);
    }

    #[test]
    fn overlapping_rectangles_intersect() {
        let a = rect(0.0, 0.0, 2.0, 2.0);
        let b = rect(1.0, 1.0, 3.0, 3.0);
        let overlap = GeoEngine.intersection_area(&a, &b).unwrap().unwrap();
        assert!((overlap - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_rectangles_do_not_intersect() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(5.0, 5.0, 6.0, 6.0);
        assert_eq!(GeoEngine.intersection_area(&a, &b).unwrap(), None);
    }

    #[test]
    fn degenerate_ring_is_rejected() {
        let line = Polygon::from_exterior(vec![[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
        assert_matches!(
            GeoEngine.area(&line),
            Err(GeometryError::TooFewPoints { count: 2 })
        );

        let empty = Polygon(vec![]);
        assert_matches!(GeoEngine.area(&empty), Err(GeometryError::Empty));
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let bad = Polygon::from_exterior(vec![
            [0.0, 0.0],
            [f64::NAN, 1.0],
            [1.0, 0.0],
            [0.0, 0.0],
        ]);
        assert_matches!(
            GeoEngine.area(&bad),
            Err(GeometryError::NonFiniteCoordinate)
        );
    }

    #[test]
    fn open_ring_is_accepted() {
        // Some detector revisions omit the closing point.
        let open = Polygon::from_exterior(vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]]);
        let area = GeoEngine.area(&open).unwrap();
        assert!((area - 4.0).abs() < 1e-9);
    }
}
