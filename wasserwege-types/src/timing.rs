use serde::{Deserialize, Serialize};

/// Elapsed wall time of each query stage, in milliseconds.
///
/// Track parsing is timed by whoever parses the track and is not part of
/// this record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimings {
    /// Bounding-box pruning through the spatial index
    pub prune_ms: f64,
    /// Exact polyline intersection against the candidates
    pub intersect_ms: f64,
    /// Ordering of the crossings
    pub sort_ms: f64,
}

impl StageTimings {
    pub fn total_ms(&self) -> f64 {
        self.prune_ms + self.intersect_ms + self.sort_ms
    }
}
