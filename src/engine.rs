//! Exact intersection between a query polyline and indexed features.
//!
//! The engine assumes an already validated polyline (at least 2 finite
//! vertices). It never fails on geometry shape; it fails with
//! [`WaterwayError::GeometryComputation`] when non-finite numbers show up in
//! the math, because that means validation was bypassed.

use crate::error::{Result, WaterwayError};
use crate::geometry::{IntersectionResult, Polyline, bbox_of, distance, polyline_intersection};
use crate::index::SpatialIndex;
use crate::store::{Feature, FeatureStore};
use geo::{Coord, Line, LineString};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// Merged intersection geometry of one feature with the query track.
///
/// Overlaps are unioned per feature segment, so a stretch the track covers
/// more than once appears once. Overlaps that continue one another along the
/// feature are chained into a single line string; repeated points and points
/// lying on an overlap are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrossingGeometry {
    pub points: Vec<Coord>,
    pub lines: Vec<LineString<f64>>,
}

fn coord_key(c: &Coord) -> (u64, u64) {
    // + 0.0 folds -0.0 into 0.0
    ((c.x + 0.0).to_bits(), (c.y + 0.0).to_bits())
}

fn covers(line: &Line, p: &Coord) -> bool {
    matches!(
        crate::geometry::segment_intersection(line.start, line.end, *p, *p),
        IntersectionResult::Point(_)
    )
}

/// An overlap expressed as an interval along its feature segment.
#[derive(Debug, Clone, Copy)]
struct Span {
    t_start: f64,
    start: Coord,
    t_end: f64,
    end: Coord,
}

impl Span {
    fn along(segment: &Line, overlap: &Line) -> Self {
        let d = segment.delta();
        let len2 = d.x * d.x + d.y * d.y;
        let param = |p: Coord| {
            if len2 > 0.0 {
                ((p.x - segment.start.x) * d.x + (p.y - segment.start.y) * d.y) / len2
            } else {
                0.0
            }
        };

        let (ts, te) = (param(overlap.start), param(overlap.end));
        if ts <= te {
            Self {
                t_start: ts,
                start: overlap.start,
                t_end: te,
                end: overlap.end,
            }
        } else {
            Self {
                t_start: te,
                start: overlap.end,
                t_end: ts,
                end: overlap.start,
            }
        }
    }
}

/// Union of intervals on one segment, in segment direction.
fn merge_spans(mut spans: SmallVec<[Span; 4]>) -> SmallVec<[Span; 4]> {
    spans.sort_by(|a, b| a.t_start.total_cmp(&b.t_start));

    let mut merged: SmallVec<[Span; 4]> = SmallVec::new();
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.t_start <= last.t_end => {
                if span.t_end > last.t_end {
                    last.t_end = span.t_end;
                    last.end = span.end;
                }
            }
            _ => merged.push(span),
        }
    }
    merged
}

impl CrossingGeometry {
    /// Merge raw results, each group tagged with the feature segment it was
    /// computed against. Groups must arrive in feature order.
    pub fn from_segments<I, R>(segments: I) -> Self
    where
        I: IntoIterator<Item = (Line, R)>,
        R: IntoIterator<Item = IntersectionResult>,
    {
        let mut raw_points = Vec::new();
        let mut covered: Vec<Line> = Vec::new();
        let mut lines: Vec<LineString<f64>> = Vec::new();

        for (segment, results) in segments {
            let mut spans: SmallVec<[Span; 4]> = SmallVec::new();
            for result in results {
                match result {
                    IntersectionResult::None => {}
                    IntersectionResult::Point(p) => raw_points.push(p),
                    IntersectionResult::Overlap(line) => spans.push(Span::along(&segment, &line)),
                }
            }

            for span in merge_spans(spans) {
                match lines.last_mut() {
                    Some(last) if last.0.last() == Some(&span.start) => last.0.push(span.end),
                    _ => lines.push(LineString::new(vec![span.start, span.end])),
                }
                covered.push(Line::new(span.start, span.end));
            }
        }

        let mut seen_points = FxHashSet::default();
        let points = raw_points
            .into_iter()
            .filter(|p| !covered.iter().any(|l| covers(l, p)))
            .filter(|p| seen_points.insert(coord_key(p)))
            .collect();

        Self { points, lines }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.lines.is_empty()
    }

    /// Total length of the overlapping parts; points contribute 0.
    pub fn length(&self) -> f64 {
        self.lines
            .iter()
            .flat_map(|l| l.0.windows(2))
            .map(|w| distance(w[0], w[1]))
            .sum()
    }

    pub fn is_finite(&self) -> bool {
        self.points
            .iter()
            .chain(self.lines.iter().flat_map(|l| l.0.iter()))
            .all(|c| c.x.is_finite() && c.y.is_finite())
    }
}

/// A waterway crossed by the query track.
#[derive(Debug, Clone, PartialEq)]
pub struct Crossing {
    pub feature_id: i64,
    pub name: Option<String>,
    pub kind: String,
    pub intersection: CrossingGeometry,
    /// Used for ordering only; not part of the wire format.
    pub intersection_length: f64,
}

fn ensure_finite(polyline: &Polyline) -> Result<()> {
    match polyline
        .coords()
        .iter()
        .position(|c| !c.x.is_finite() || !c.y.is_finite())
    {
        Some(idx) => Err(WaterwayError::GeometryComputation(format!(
            "Query vertex {} is not finite: {:?}",
            idx,
            polyline.coords()[idx]
        ))),
        None => Ok(()),
    }
}

/// Store positions of the features whose bounding box meets the track's.
pub fn prune(index: &SpatialIndex, polyline: &Polyline) -> Result<Vec<usize>> {
    ensure_finite(polyline)?;
    Ok(index.query(&bbox_of(polyline)))
}

/// Exact intersection of the track with one feature, `None` when disjoint.
pub fn intersect_feature(feature: &Feature, polyline: &Polyline) -> Result<Option<Crossing>> {
    let query_bbox = bbox_of(polyline);
    let coords = polyline.coords();
    let segments = feature
        .parts()
        .iter()
        .zip(feature.part_bboxes())
        .filter(|(_, part_bbox)| part_bbox.intersects(&query_bbox))
        .flat_map(|(part, _)| part.lines())
        .map(|segment| {
            let hits = polyline_intersection(coords, &[segment.start, segment.end]);
            (segment, hits)
        });

    let intersection = CrossingGeometry::from_segments(segments);
    if intersection.is_empty() {
        return Ok(None);
    }

    if !intersection.is_finite() {
        return Err(WaterwayError::GeometryComputation(format!(
            "Non-finite intersection with feature {}",
            feature.id()
        )));
    }

    let intersection_length = intersection.length();
    Ok(Some(Crossing {
        feature_id: feature.id(),
        name: feature.name().map(str::to_owned),
        kind: feature.kind().to_owned(),
        intersection,
        intersection_length,
    }))
}

/// Exact intersection against the given candidate positions.
///
/// Runs on the rayon pool when there are more than `parallel_threshold`
/// candidates. The output order follows `candidates`.
pub fn intersect(
    store: &FeatureStore,
    polyline: &Polyline,
    candidates: &[usize],
    parallel_threshold: usize,
) -> Result<Vec<Crossing>> {
    let hits: Vec<Option<Crossing>> = if candidates.len() > parallel_threshold {
        candidates
            .par_iter()
            .map(|&idx| intersect_feature(store.feature_at(idx), polyline))
            .collect::<Result<_>>()?
    } else {
        candidates
            .iter()
            .map(|&idx| intersect_feature(store.feature_at(idx), polyline))
            .collect::<Result<_>>()?
    };

    Ok(hits.into_iter().flatten().collect())
}

/// Prune through the index, then intersect exactly. The result is unsorted.
///
/// # Examples
///
/// ```
/// use wasserwege::{FeatureStore, Polyline, SpatialIndex, engine};
/// use wasserwege_types::feature::FeatureRecord;
/// use geo::{Coord, LineString};
///
/// let river = FeatureRecord::from_line(1, "river", LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]));
/// let (store, _) = FeatureStore::from_records(vec![river], false);
/// let index = SpatialIndex::build(&store);
///
/// let track = Polyline::new(vec![Coord { x: 5.0, y: -5.0 }, Coord { x: 5.0, y: 5.0 }])?;
/// let crossings = engine::find_crossings(&index, &store, &track)?;
/// assert_eq!(crossings.len(), 1);
/// assert_eq!(crossings[0].intersection.points, vec![Coord { x: 5.0, y: 0.0 }]);
/// assert_eq!(crossings[0].intersection_length, 0.0);
/// # Ok::<(), wasserwege::WaterwayError>(())
/// ```
pub fn find_crossings(
    index: &SpatialIndex,
    store: &FeatureStore,
    polyline: &Polyline,
) -> Result<Vec<Crossing>> {
    let candidates = prune(index, polyline)?;
    intersect(store, polyline, &candidates, usize::MAX)
}

/// Intersects against every feature without consulting the index.
///
/// Reference path for checking that pruning never drops a true positive.
pub fn scan_all(store: &FeatureStore, polyline: &Polyline) -> Result<Vec<Crossing>> {
    ensure_finite(polyline)?;
    let mut crossings = Vec::new();
    for feature in store.iter() {
        if let Some(crossing) = intersect_feature(feature, polyline)? {
            crossings.push(crossing);
        }
    }
    Ok(crossings)
}
