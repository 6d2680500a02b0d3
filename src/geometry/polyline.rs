//! Polylines and polyline-polyline intersection.

use super::distance;
use super::segment::{IntersectionResult, segment_intersection};
use crate::error::{Result, WaterwayError};
use geo::{Coord, Line, LineString};
use smallvec::SmallVec;
use wasserwege_types::bbox::BBox;

/// An ordered sequence of at least 2 vertices.
///
/// Consecutive duplicate vertices are allowed; they form zero-length
/// segments that the intersection routines treat as points.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    line: LineString<f64>,
}

impl Polyline {
    /// Build a polyline from its vertices.
    ///
    /// Fails with [`WaterwayError::InvalidTrack`] when fewer than 2 vertices
    /// are given. Coordinates are not checked for finiteness here; see
    /// [`validate_track`](crate::validation::validate_track).
    pub fn new(coords: Vec<Coord>) -> Result<Self> {
        if coords.len() < 2 {
            return Err(WaterwayError::InvalidTrack(format!(
                "A polyline needs at least 2 vertices, got {}",
                coords.len()
            )));
        }
        Ok(Self {
            line: LineString::new(coords),
        })
    }

    pub fn from_line_string(line: LineString<f64>) -> Result<Self> {
        Self::new(line.0)
    }

    pub fn coords(&self) -> &[Coord] {
        &self.line.0
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.line.0.len()
    }

    /// Always false; a polyline has at least 2 vertices.
    pub fn is_empty(&self) -> bool {
        self.line.0.is_empty()
    }

    pub fn segments(&self) -> impl ExactSizeIterator<Item = Line> + '_ {
        self.line.lines()
    }

    pub fn as_line_string(&self) -> &LineString<f64> {
        &self.line
    }

    pub fn into_line_string(self) -> LineString<f64> {
        self.line
    }

    pub fn bbox(&self) -> BBox {
        // at least 2 vertices, so never empty
        BBox::from_coords(self.coords()).unwrap_or_else(|| BBox::from_coord(self.line.0[0]))
    }

    /// Planar length.
    pub fn length(&self) -> f64 {
        self.line.0.windows(2).map(|w| distance(w[0], w[1])).sum()
    }
}

/// Bounding box of a line part, `None` when it has no vertices.
pub fn line_bbox(line: &LineString<f64>) -> Option<BBox> {
    BBox::from_coords(&line.0)
}

/// Runs [`segment_intersection`] for every segment pair of `p` and `q` and
/// keeps the non-empty results, ordered by segment of `p`, then of `q`.
///
/// Segments of `p` outside the extent of `q` are skipped before the inner
/// loop, so a long query against a short feature part costs close to
/// O(n + k·m) where k is the number of query segments near the part.
///
/// # Examples
///
/// ```
/// use wasserwege::geometry::{IntersectionResult, polyline_intersection};
/// use geo::Coord;
///
/// let track = [Coord { x: 2.0, y: 0.0 }, Coord { x: 8.0, y: 0.0 }];
/// let river = [Coord { x: 0.0, y: 0.0 }, Coord { x: 10.0, y: 0.0 }];
/// let hits = polyline_intersection(&track, &river);
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].length(), 6.0);
/// ```
pub fn polyline_intersection(p: &[Coord], q: &[Coord]) -> SmallVec<[IntersectionResult; 4]> {
    let mut results = SmallVec::new();

    let Some(q_bbox) = BBox::from_coords(q) else {
        return results;
    };
    if p.len() < 2 || q.len() < 2 {
        return results;
    }

    for a in p.windows(2) {
        let (a1, a2) = (a[0], a[1]);
        let seg_bbox = BBox::new(a1.x, a1.y, a2.x, a2.y);
        if !seg_bbox.intersects(&q_bbox) {
            continue;
        }

        for b in q.windows(2) {
            let hit = segment_intersection(a1, a2, b[0], b[1]);
            if !hit.is_none() {
                results.push(hit);
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord {
        Coord { x, y }
    }

    #[test]
    fn test_polyline_requires_two_vertices() {
        assert!(Polyline::new(vec![]).is_err());
        let err = Polyline::new(vec![c(1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, WaterwayError::InvalidTrack(_)));
        assert!(Polyline::new(vec![c(1.0, 1.0), c(1.0, 1.0)]).is_ok());
    }

    #[test]
    fn test_polyline_bbox_and_length() {
        let line = Polyline::new(vec![c(0.0, 0.0), c(3.0, 4.0), c(3.0, -1.0)]).unwrap();
        assert_eq!(line.bbox(), BBox::new(0.0, -1.0, 3.0, 4.0));
        assert_eq!(line.length(), 10.0);
        assert_eq!(line.len(), 3);
        assert_eq!(line.segments().len(), 2);
        assert!(!line.is_empty());
    }

    #[test]
    fn test_zigzag_crosses_line_multiple_times() {
        let track = [c(0.0, 1.0), c(1.0, -1.0), c(2.0, 1.0), c(3.0, -1.0)];
        let river = [c(-1.0, 0.0), c(4.0, 0.0)];
        let hits = polyline_intersection(&track, &river);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0], IntersectionResult::Point(c(0.5, 0.0)));
        assert_eq!(hits[1], IntersectionResult::Point(c(1.5, 0.0)));
        assert_eq!(hits[2], IntersectionResult::Point(c(2.5, 0.0)));
    }

    #[test]
    fn test_duplicate_vertices_do_not_break_intersection() {
        let track = [c(5.0, -5.0), c(5.0, -5.0), c(5.0, 5.0), c(5.0, 5.0)];
        let river = [c(0.0, 0.0), c(10.0, 0.0)];
        let hits = polyline_intersection(&track, &river);
        assert_eq!(hits.as_slice(), &[IntersectionResult::Point(c(5.0, 0.0))]);
    }

    #[test]
    fn test_vertex_on_line_reported_by_both_segments() {
        let track = [c(5.0, -5.0), c(5.0, 0.0), c(6.0, 5.0)];
        let river = [c(0.0, 0.0), c(10.0, 0.0)];
        let hits = polyline_intersection(&track, &river);
        assert_eq!(hits.len(), 2);
        assert!(
            hits.iter()
                .all(|h| *h == IntersectionResult::Point(c(5.0, 0.0)))
        );
    }

    #[test]
    fn test_no_intersection_far_apart() {
        let track = [c(0.0, 0.0), c(1.0, 1.0)];
        let river = [c(10.0, 10.0), c(11.0, 12.0)];
        assert!(polyline_intersection(&track, &river).is_empty());
    }
}
