//! Stage-timed query pipeline: prune, intersect, sort.
//!
//! This is the public query operation consumed by the HTTP boundary. Every
//! call returns the ordered crossings together with the elapsed time of
//! each stage.

use crate::config::Config;
use crate::engine::{self, Crossing};
use crate::error::Result;
use crate::geometry::Polyline;
use crate::index::SpatialIndex;
use crate::store::FeatureStore;
use crate::validation::validate_track;
use geo::Coord;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::time::Instant;
use wasserwege_types::timing::StageTimings;

/// Crossings of one track, longest intersection first, with stage timings.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub crossings: Vec<Crossing>,
    pub timings: StageTimings,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.crossings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crossings.is_empty()
    }

    /// Crossed feature ids in result order.
    pub fn feature_ids(&self) -> Vec<i64> {
        self.crossings.iter().map(|c| c.feature_id).collect()
    }
}

/// Result ordering: intersection length descending, then feature id ascending.
pub fn crossing_order(a: &Crossing, b: &Crossing) -> Ordering {
    b.intersection_length
        .total_cmp(&a.intersection_length)
        .then_with(|| a.feature_id.cmp(&b.feature_id))
}

pub fn sort_crossings(crossings: &mut [Crossing]) {
    crossings.sort_unstable_by(crossing_order);
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Finds every feature crossed by the track, with default configuration.
///
/// Fails with [`WaterwayError::InvalidTrack`](crate::WaterwayError::InvalidTrack)
/// before touching the index when the track has fewer than 2 vertices or a
/// non-finite vertex.
///
/// # Examples
///
/// ```
/// use wasserwege::{load_dataset, query};
/// use wasserwege_types::feature::FeatureRecord;
/// use geo::{Coord, LineString};
///
/// let river = FeatureRecord::from_line(2, "river", LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]));
/// let dataset = load_dataset(vec![river])?;
///
/// let track = [Coord { x: 2.0, y: 0.0 }, Coord { x: 8.0, y: 0.0 }];
/// let result = query::find_crossings(dataset.index(), dataset.store(), &track)?;
/// assert_eq!(result.feature_ids(), vec![2]);
/// assert_eq!(result.crossings[0].intersection_length, 6.0);
/// # Ok::<(), wasserwege::WaterwayError>(())
/// ```
pub fn find_crossings(
    index: &SpatialIndex,
    store: &FeatureStore,
    vertices: &[Coord],
) -> Result<QueryResult> {
    find_crossings_with_config(index, store, vertices, &Config::default())
}

pub fn find_crossings_with_config(
    index: &SpatialIndex,
    store: &FeatureStore,
    vertices: &[Coord],
    config: &Config,
) -> Result<QueryResult> {
    validate_track(vertices, config)?;
    let polyline = Polyline::new(vertices.to_vec())?;
    run(index, store, &polyline, config)
}

/// Runs the three timed stages on an already validated polyline.
pub fn run(
    index: &SpatialIndex,
    store: &FeatureStore,
    polyline: &Polyline,
    config: &Config,
) -> Result<QueryResult> {
    let start = Instant::now();
    let candidates = engine::prune(index, polyline)?;
    let prune_ms = elapsed_ms(start);

    let start = Instant::now();
    let mut crossings = engine::intersect(store, polyline, &candidates, config.parallel_threshold)?;
    let intersect_ms = elapsed_ms(start);

    let start = Instant::now();
    sort_crossings(&mut crossings);
    let sort_ms = elapsed_ms(start);

    log::debug!(
        "{} vertices, {} candidates, {} crossings; prune {:.3} ms, intersect {:.3} ms, sort {:.3} ms",
        polyline.len(),
        candidates.len(),
        crossings.len(),
        prune_ms,
        intersect_ms,
        sort_ms
    );

    Ok(QueryResult {
        crossings,
        timings: StageTimings {
            prune_ms,
            intersect_ms,
            sort_ms,
        },
    })
}

/// Runs independent queries on the rayon pool.
///
/// Each track gets its own result; one failing track does not affect the
/// others. Results are returned in input order.
pub fn query_batch<T>(
    index: &SpatialIndex,
    store: &FeatureStore,
    tracks: &[T],
    config: &Config,
) -> Vec<Result<QueryResult>>
where
    T: AsRef<[Coord]> + Sync,
{
    tracks
        .par_iter()
        .map(|track| find_crossings_with_config(index, store, track.as_ref(), config))
        .collect()
}
