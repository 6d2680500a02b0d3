//! Planar geometry primitives: segments, polylines and bounding boxes.
//!
//! Coordinates are treated as a flat Cartesian plane (x = longitude,
//! y = latitude). Nothing here is geodesic.

pub mod polyline;
pub mod segment;

pub use polyline::{Polyline, line_bbox, polyline_intersection};
pub use segment::{IntersectionResult, segment_intersection};

use geo::{Coord, Distance, Euclidean, Point};
use wasserwege_types::bbox::BBox;

/// Bounding box of a polyline. O(n) in the vertex count.
pub fn bbox_of(polyline: &Polyline) -> BBox {
    polyline.bbox()
}

/// Axis-aligned overlap test. Boxes that only touch count as intersecting.
pub fn bbox_intersects(a: &BBox, b: &BBox) -> bool {
    a.intersects(b)
}

/// Euclidean length of the segment between two coordinates.
#[inline]
pub(crate) fn distance(a: Coord, b: Coord) -> f64 {
    Euclidean.distance(Point::from(a), Point::from(b))
}
