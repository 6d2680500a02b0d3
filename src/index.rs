//! Bulk-loaded R*-tree over feature bounding boxes.
//!
//! The tree stores one envelope per feature together with the feature's
//! position in the [`FeatureStore`]. It is packed once with
//! `RTree::bulk_load` and never modified; a changed dataset gets a new index.
//!
//! # Example
//!
//! ```rust
//! use wasserwege::{FeatureStore, SpatialIndex};
//! use wasserwege_types::bbox::BBox;
//! use wasserwege_types::feature::FeatureRecord;
//! use geo::LineString;
//!
//! let record = FeatureRecord::from_line(1, "river", LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]));
//! let (store, _) = FeatureStore::from_records(vec![record], false);
//! let index = SpatialIndex::build(&store);
//!
//! assert_eq!(index.query(&BBox::new(5.0, -5.0, 5.0, 5.0)), vec![0]);
//! assert!(index.query(&BBox::new(20.0, 20.0, 30.0, 30.0)).is_empty());
//! ```

use crate::store::FeatureStore;
use rstar::{AABB, RTree, RTreeObject};
use wasserwege_types::bbox::BBox;

/// Feature envelope for R*-tree indexing.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedEnvelope {
    /// Position of the feature in its store
    pub idx: usize,
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl IndexedEnvelope {
    pub fn new(idx: usize, bbox: &BBox) -> Self {
        Self {
            idx,
            min_x: bbox.min_x(),
            min_y: bbox.min_y(),
            max_x: bbox.max_x(),
            max_y: bbox.max_y(),
        }
    }
}

impl RTreeObject for IndexedEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}

fn to_aabb(bbox: &BBox) -> AABB<[f64; 2]> {
    AABB::from_corners([bbox.min_x(), bbox.min_y()], [bbox.max_x(), bbox.max_y()])
}

/// Read-only spatial index answering "which features have a bounding box
/// intersecting this box".
///
/// Queries take `&self` only, so any number of threads can query one index
/// concurrently without synchronization.
pub struct SpatialIndex {
    tree: RTree<IndexedEnvelope>,
}

impl SpatialIndex {
    /// Bulk-load the index from every feature in `store`.
    pub fn build(store: &FeatureStore) -> Self {
        let envelopes: Vec<IndexedEnvelope> = store
            .iter()
            .enumerate()
            .map(|(idx, feature)| IndexedEnvelope::new(idx, feature.bbox()))
            .collect();

        Self {
            tree: RTree::bulk_load(envelopes),
        }
    }

    /// Store positions of all features whose bounding box intersects `bbox`.
    ///
    /// Boundary contact counts as intersecting. The order of the returned
    /// positions is unspecified.
    pub fn query(&self, bbox: &BBox) -> Vec<usize> {
        self.tree
            .locate_in_envelope_intersecting(&to_aabb(bbox))
            .map(|entry| entry.idx)
            .collect()
    }

    /// Number of indexed features.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Envelope of the whole index, `None` when empty.
    pub fn extent(&self) -> Option<BBox> {
        if self.is_empty() {
            return None;
        }
        let env = self.tree.root().envelope();
        let (lower, upper) = (env.lower(), env.upper());
        Some(BBox::new(lower[0], lower[1], upper[0], upper[1]))
    }
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("len", &self.len())
            .field("extent", &self.extent())
            .finish()
    }
}
