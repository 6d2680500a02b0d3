//! Segment-segment intersection.
//!
//! Orientation tests use plain f64 cross products and exact zero checks, so
//! collinearity is decided on the stored coordinates without tolerance.
//! Intersection points that coincide with an input endpoint are returned as
//! that endpoint, bit for bit.

use super::distance;
use geo::{Coord, Line};

/// Outcome of intersecting two segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntersectionResult {
    /// The segments are disjoint.
    None,
    /// The segments meet in a single point (proper crossing or touch).
    Point(Coord),
    /// The segments are collinear and share a sub-segment of positive length.
    /// The sub-segment is oriented along the first segment.
    Overlap(Line),
}

impl IntersectionResult {
    pub fn is_none(&self) -> bool {
        matches!(self, IntersectionResult::None)
    }

    /// Length of the shared geometry; 0 for points.
    pub fn length(&self) -> f64 {
        match self {
            IntersectionResult::Overlap(line) => distance(line.start, line.end),
            _ => 0.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            IntersectionResult::None => true,
            IntersectionResult::Point(p) => p.x.is_finite() && p.y.is_finite(),
            IntersectionResult::Overlap(line) => {
                line.start.x.is_finite()
                    && line.start.y.is_finite()
                    && line.end.x.is_finite()
                    && line.end.y.is_finite()
            }
        }
    }
}

/// Twice the signed area of the triangle `a, b, c`.
/// Positive when `c` is left of `a -> b`, zero when collinear.
#[inline]
fn orient(a: Coord, b: Coord, c: Coord) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// `p` lies within the axis-aligned extent of segment `a, b`.
#[inline]
fn within_extent(a: Coord, b: Coord, p: Coord) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

#[inline]
fn on_segment(a: Coord, b: Coord, p: Coord) -> bool {
    orient(a, b, p) == 0.0 && within_extent(a, b, p)
}

#[inline]
fn extents_overlap(a1: Coord, a2: Coord, b1: Coord, b2: Coord) -> bool {
    a1.x.max(a2.x) >= b1.x.min(b2.x)
        && b1.x.max(b2.x) >= a1.x.min(a2.x)
        && a1.y.max(a2.y) >= b1.y.min(b2.y)
        && b1.y.max(b2.y) >= a1.y.min(a2.y)
}

#[inline]
fn opposite_sides(o1: f64, o2: f64) -> bool {
    (o1 > 0.0 && o2 < 0.0) || (o1 < 0.0 && o2 > 0.0)
}

/// Intersects segment `a1 -> a2` with segment `b1 -> b2`.
///
/// Zero-length segments are treated as points and tested for containment in
/// the other segment; they never divide by zero.
///
/// # Examples
///
/// ```
/// use wasserwege::geometry::{IntersectionResult, segment_intersection};
/// use geo::Coord;
///
/// let hit = segment_intersection(
///     Coord { x: 5.0, y: -5.0 },
///     Coord { x: 5.0, y: 5.0 },
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 10.0, y: 0.0 },
/// );
/// assert_eq!(hit, IntersectionResult::Point(Coord { x: 5.0, y: 0.0 }));
/// ```
pub fn segment_intersection(a1: Coord, a2: Coord, b1: Coord, b2: Coord) -> IntersectionResult {
    if !extents_overlap(a1, a2, b1, b2) {
        return IntersectionResult::None;
    }

    match (a1 == a2, b1 == b2) {
        (true, true) => {
            return if a1 == b1 {
                IntersectionResult::Point(a1)
            } else {
                IntersectionResult::None
            };
        }
        (true, false) => {
            return if on_segment(b1, b2, a1) {
                IntersectionResult::Point(a1)
            } else {
                IntersectionResult::None
            };
        }
        (false, true) => {
            return if on_segment(a1, a2, b1) {
                IntersectionResult::Point(b1)
            } else {
                IntersectionResult::None
            };
        }
        (false, false) => {}
    }

    let o1 = orient(a1, a2, b1);
    let o2 = orient(a1, a2, b2);
    let o3 = orient(b1, b2, a1);
    let o4 = orient(b1, b2, a2);

    if (o1 == 0.0 && o2 == 0.0) || (o3 == 0.0 && o4 == 0.0) {
        return collinear_overlap(a1, a2, b1, b2);
    }

    if opposite_sides(o1, o2) && opposite_sides(o3, o4) {
        // o3 and o4 are the signed distances of a1 and a2 from line b
        let t = o3 / (o3 - o4);
        return IntersectionResult::Point(a1 + (a2 - a1) * t);
    }

    if o1 == 0.0 && within_extent(a1, a2, b1) {
        return IntersectionResult::Point(b1);
    }
    if o2 == 0.0 && within_extent(a1, a2, b2) {
        return IntersectionResult::Point(b2);
    }
    if o3 == 0.0 && within_extent(b1, b2, a1) {
        return IntersectionResult::Point(a1);
    }
    if o4 == 0.0 && within_extent(b1, b2, a2) {
        return IntersectionResult::Point(a2);
    }

    IntersectionResult::None
}

/// Shared part of two collinear segments, projected onto `a`.
///
/// The overlap endpoints are always input endpoints, so they are copied
/// rather than recomputed from the projection parameters.
fn collinear_overlap(a1: Coord, a2: Coord, b1: Coord, b2: Coord) -> IntersectionResult {
    let d = a2 - a1;
    let len2 = d.x * d.x + d.y * d.y;
    let param = |p: Coord| ((p.x - a1.x) * d.x + (p.y - a1.y) * d.y) / len2;

    let (tb1, tb2) = (param(b1), param(b2));
    let (lo, t_lo, hi, t_hi) = if tb1 <= tb2 {
        (b1, tb1, b2, tb2)
    } else {
        (b2, tb2, b1, tb1)
    };

    if t_hi < 0.0 || t_lo > 1.0 {
        return IntersectionResult::None;
    }

    let start = if t_lo > 0.0 { lo } else { a1 };
    let end = if t_hi < 1.0 { hi } else { a2 };

    if start == end {
        IntersectionResult::Point(start)
    } else {
        IntersectionResult::Overlap(Line::new(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord {
        Coord { x, y }
    }

    #[test]
    fn test_proper_crossing() {
        let r = segment_intersection(c(0.0, 0.0), c(2.0, 2.0), c(0.0, 2.0), c(2.0, 0.0));
        assert_eq!(r, IntersectionResult::Point(c(1.0, 1.0)));
    }

    #[test]
    fn test_disjoint_and_parallel() {
        let disjoint = segment_intersection(c(0.0, 0.0), c(1.0, 0.0), c(2.0, -1.0), c(2.0, 1.0));
        assert!(disjoint.is_none());

        let parallel = segment_intersection(c(0.0, 0.0), c(10.0, 0.0), c(0.0, 1.0), c(10.0, 1.0));
        assert!(parallel.is_none());

        // crossing lines, but the segments stop short of each other
        let short = segment_intersection(c(0.0, 0.0), c(1.0, 1.0), c(3.0, 0.0), c(2.0, 1.0));
        assert!(short.is_none());
    }

    #[test]
    fn test_endpoint_touch_returns_exact_endpoint() {
        let r = segment_intersection(c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(1.0, 1.0));
        assert_eq!(r, IntersectionResult::Point(c(1.0, 0.0)));

        // T-junction: b1 lies inside a
        let t = segment_intersection(c(0.0, 0.0), c(4.0, 0.0), c(2.0, 0.0), c(2.0, 3.0));
        assert_eq!(t, IntersectionResult::Point(c(2.0, 0.0)));
    }

    #[test]
    fn test_collinear_overlap_inside() {
        let r = segment_intersection(c(2.0, 0.0), c(8.0, 0.0), c(0.0, 0.0), c(10.0, 0.0));
        assert_eq!(
            r,
            IntersectionResult::Overlap(Line::new(c(2.0, 0.0), c(8.0, 0.0)))
        );
        assert_eq!(r.length(), 6.0);
    }

    #[test]
    fn test_collinear_overlap_partial_and_reversed() {
        // b runs against a and only covers its tail
        let r = segment_intersection(c(0.0, 0.0), c(4.0, 4.0), c(6.0, 6.0), c(2.0, 2.0));
        assert_eq!(
            r,
            IntersectionResult::Overlap(Line::new(c(2.0, 2.0), c(4.0, 4.0)))
        );
    }

    #[test]
    fn test_collinear_touching_end_to_end() {
        let r = segment_intersection(c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(3.0, 0.0));
        assert_eq!(r, IntersectionResult::Point(c(1.0, 0.0)));
    }

    #[test]
    fn test_collinear_gap() {
        let r = segment_intersection(c(0.0, 0.0), c(1.0, 0.0), c(2.0, 0.0), c(3.0, 0.0));
        assert!(r.is_none());
    }

    #[test]
    fn test_zero_length_segments() {
        // point on segment
        let r = segment_intersection(c(1.0, 1.0), c(1.0, 1.0), c(0.0, 0.0), c(2.0, 2.0));
        assert_eq!(r, IntersectionResult::Point(c(1.0, 1.0)));

        // point off segment
        let r = segment_intersection(c(1.0, 1.5), c(1.0, 1.5), c(0.0, 0.0), c(2.0, 2.0));
        assert!(r.is_none());

        // segment containing a point
        let r = segment_intersection(c(0.0, 0.0), c(2.0, 0.0), c(0.5, 0.0), c(0.5, 0.0));
        assert_eq!(r, IntersectionResult::Point(c(0.5, 0.0)));

        // two identical points
        let r = segment_intersection(c(3.0, 3.0), c(3.0, 3.0), c(3.0, 3.0), c(3.0, 3.0));
        assert_eq!(r, IntersectionResult::Point(c(3.0, 3.0)));

        // two distinct points
        let r = segment_intersection(c(3.0, 3.0), c(3.0, 3.0), c(3.0, 4.0), c(3.0, 4.0));
        assert!(r.is_none());
    }

    #[test]
    fn test_result_helpers() {
        assert_eq!(IntersectionResult::Point(c(1.0, 2.0)).length(), 0.0);
        assert!(IntersectionResult::None.is_finite());
        assert!(!IntersectionResult::Point(c(f64::NAN, 0.0)).is_finite());
    }
}
