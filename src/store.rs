//! Immutable feature store.
//!
//! Features are validated and their bounding boxes computed exactly once, at
//! construction. Nothing in the store can be mutated afterwards; a changed
//! dataset means building a new store.

use crate::error::WaterwayError;
use crate::geometry::line_bbox;
use crate::validation::validate_coords;
use geo::LineString;
use rustc_hash::FxHashMap;
use wasserwege_types::bbox::BBox;
use wasserwege_types::feature::FeatureRecord;

/// A loaded waterway.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    id: i64,
    name: Option<String>,
    kind: String,
    parts: Vec<LineString<f64>>,
    part_bboxes: Vec<BBox>,
    bbox: BBox,
}

impl Feature {
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Stored name. The unnamed placeholder is applied at format time only.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Line parts, each with at least 2 vertices.
    pub fn parts(&self) -> &[LineString<f64>] {
        &self.parts
    }

    /// Bounding box of each part, parallel to [`parts`](Self::parts).
    pub fn part_bboxes(&self) -> &[BBox] {
        &self.part_bboxes
    }

    pub fn bbox(&self) -> &BBox {
        &self.bbox
    }

    pub fn vertex_count(&self) -> usize {
        self.parts.iter().map(|p| p.0.len()).sum()
    }

    /// Validates a record and turns it into a feature.
    ///
    /// Parts with fewer than 2 vertices are dropped. The feature itself is
    /// rejected when no part survives or when any coordinate is invalid.
    fn from_record(record: FeatureRecord, strict: bool) -> Result<Self, WaterwayError> {
        let FeatureRecord {
            id,
            name,
            kind,
            parts,
        } = record;

        let total_parts = parts.len();
        let mut kept = Vec::with_capacity(total_parts);
        let mut part_bboxes = Vec::with_capacity(total_parts);

        for (part_idx, part) in parts.into_iter().enumerate() {
            if part.0.len() < 2 {
                log::debug!(
                    "Feature {}: dropping part {} with {} vertex(es)",
                    id,
                    part_idx,
                    part.0.len()
                );
                continue;
            }

            validate_coords(&part.0, strict).map_err(|e| WaterwayError::DegenerateFeature {
                id,
                reason: format!("part {}: {}", part_idx, e),
            })?;

            if let Some(bbox) = line_bbox(&part) {
                part_bboxes.push(bbox);
                kept.push(part);
            }
        }

        let mut boxes = part_bboxes.iter();
        let Some(first) = boxes.next() else {
            return Err(WaterwayError::DegenerateFeature {
                id,
                reason: format!("none of {} part(s) has at least 2 vertices", total_parts),
            });
        };
        let bbox = boxes.fold(*first, |acc, b| acc.union(b));

        Ok(Self {
            id,
            name,
            kind,
            parts: kept,
            part_bboxes,
            bbox,
        })
    }
}

/// Outcome of loading a feature store.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Features accepted into the store
    pub loaded: usize,
    /// One error per rejected feature, source rejects first
    pub skipped: Vec<WaterwayError>,
}

impl LoadReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Immutable array of features with lookup by position and by id.
#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    features: Vec<Feature>,
    by_id: FxHashMap<i64, usize>,
}

impl FeatureStore {
    /// Consumes a feature source and keeps every usable feature.
    ///
    /// Degenerate features and duplicate ids are logged, recorded in the
    /// returned [`LoadReport`] and excluded; loading always continues.
    pub fn from_records<I>(records: I, strict: bool) -> (Self, LoadReport)
    where
        I: IntoIterator<Item = FeatureRecord>,
    {
        let mut features = Vec::new();
        let mut by_id = FxHashMap::default();
        let mut report = LoadReport::default();

        for record in records {
            let id = record.id;

            if by_id.contains_key(&id) {
                let err = WaterwayError::DegenerateFeature {
                    id,
                    reason: "duplicate feature id".to_string(),
                };
                log::warn!("{}", err);
                report.skipped.push(err);
                continue;
            }

            match Feature::from_record(record, strict) {
                Ok(feature) => {
                    by_id.insert(id, features.len());
                    features.push(feature);
                }
                Err(err) => {
                    log::warn!("{}", err);
                    report.skipped.push(err);
                }
            }
        }

        features.shrink_to_fit();
        report.loaded = features.len();

        (Self { features, by_id }, report)
    }

    /// Feature at a store position, as returned by the spatial index.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    pub fn feature_at(&self, idx: usize) -> &Feature {
        &self.features[idx]
    }

    pub fn get(&self, idx: usize) -> Option<&Feature> {
        self.features.get(idx)
    }

    pub fn by_id(&self, id: i64) -> Option<&Feature> {
        self.by_id.get(&id).map(|&idx| &self.features[idx])
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Feature> {
        self.features.iter()
    }

    pub fn vertex_count(&self) -> usize {
        self.features.iter().map(Feature::vertex_count).sum()
    }

    /// Bounding box of the whole store, `None` when empty.
    pub fn extent(&self) -> Option<BBox> {
        let mut iter = self.features.iter();
        let first = *iter.next()?.bbox();
        Some(iter.fold(first, |acc, f| acc.union(f.bbox())))
    }
}
