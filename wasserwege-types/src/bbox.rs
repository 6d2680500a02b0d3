use geo::{BoundingRect, Coord, MultiPoint, Point, Rect};
use serde::{Deserialize, Serialize};

/// A 2D axis-aligned bounding box.
///
/// Wraps `geo::Rect`. All comparisons are inclusive: boxes that only touch
/// along an edge or a corner intersect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// The underlying geometric rectangle
    pub rect: Rect,
}

impl BBox {
    /// Create a new bounding box from minimum and maximum coordinates.
    ///
    /// # Arguments
    ///
    /// * `min_x` - Minimum longitude/x coordinate
    /// * `min_y` - Minimum latitude/y coordinate
    /// * `max_x` - Maximum longitude/x coordinate
    /// * `max_y` - Maximum latitude/y coordinate
    ///
    /// # Examples
    ///
    /// ```
    /// use wasserwege_types::bbox::BBox;
    ///
    /// let bbox = BBox::new(11.5, 48.1, 11.6, 48.2);
    /// assert_eq!(bbox.min_x(), 11.5);
    /// ```
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            rect: Rect::new(
                geo::coord! { x: min_x, y: min_y },
                geo::coord! { x: max_x, y: max_y },
            ),
        }
    }

    /// Create a bounding box from a `geo::Rect`.
    pub fn from_rect(rect: Rect) -> Self {
        Self { rect }
    }

    /// Degenerate box covering a single coordinate.
    pub fn from_coord(coord: Coord) -> Self {
        Self::new(coord.x, coord.y, coord.x, coord.y)
    }

    /// Smallest box covering every coordinate, or `None` for an empty input.
    pub fn from_coords<'a, I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coord>,
    {
        let points: MultiPoint = coords.into_iter().map(|c| Point::from(*c)).collect();
        points.bounding_rect().map(Self::from_rect)
    }

    /// Get the minimum x coordinate.
    pub fn min_x(&self) -> f64 {
        self.rect.min().x
    }

    /// Get the minimum y coordinate.
    pub fn min_y(&self) -> f64 {
        self.rect.min().y
    }

    /// Get the maximum x coordinate.
    pub fn max_x(&self) -> f64 {
        self.rect.max().x
    }

    /// Get the maximum y coordinate.
    pub fn max_y(&self) -> f64 {
        self.rect.max().y
    }

    pub fn width(&self) -> f64 {
        self.max_x() - self.min_x()
    }

    pub fn height(&self) -> f64 {
        self.max_y() - self.min_y()
    }

    /// Check if a coordinate lies inside or on the boundary of this box.
    pub fn contains_coord(&self, coord: &Coord) -> bool {
        coord.x >= self.min_x()
            && coord.x <= self.max_x()
            && coord.y >= self.min_y()
            && coord.y <= self.max_y()
    }

    /// Check if this bounding box intersects with another.
    ///
    /// Touching edges count as intersecting.
    pub fn intersects(&self, other: &BBox) -> bool {
        !(self.max_x() < other.min_x()
            || self.min_x() > other.max_x()
            || self.max_y() < other.min_y()
            || self.min_y() > other.max_y())
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BBox) -> Self {
        Self::new(
            self.min_x().min(other.min_x()),
            self.min_y().min(other.min_y()),
            self.max_x().max(other.max_x()),
            self.max_y().max(other.max_y()),
        )
    }

    /// True when all four bounds are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.min_x().is_finite()
            && self.min_y().is_finite()
            && self.max_x().is_finite()
            && self.max_y().is_finite()
    }
}
