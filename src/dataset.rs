//! Dataset lifecycle: load once, query read-only, swap on reload.
//!
//! A [`Dataset`] bundles the feature store and its spatial index. Both are
//! immutable after [`load_dataset`] returns. [`SharedDataset`] adds reload
//! on top: a replacement is built off-lock and swapped in atomically, so
//! in-flight queries finish on the snapshot they started with.

use crate::config::Config;
use crate::error::{Result, WaterwayError};
use crate::index::SpatialIndex;
use crate::query::{self, QueryResult};
use crate::store::{FeatureStore, LoadReport};
use geo::Coord;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use wasserwege_types::bbox::BBox;
use wasserwege_types::feature::FeatureRecord;

/// Dataset statistics
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStats {
    /// Number of features in the store
    pub feature_count: usize,
    /// Number of features rejected at load
    pub skipped_count: usize,
    /// Total vertices across all stored features
    pub vertex_count: usize,
    /// Bounding box of all features
    pub extent: Option<BBox>,
    /// Time spent building store and index
    pub build_time: Duration,
}

/// An immutable feature store with its spatial index.
#[derive(Debug)]
pub struct Dataset {
    store: FeatureStore,
    index: SpatialIndex,
    config: Config,
    report: LoadReport,
    stats: DatasetStats,
}

/// Builds a dataset with default configuration.
///
/// Fails with [`WaterwayError::Dataset`] when the source yields no usable
/// feature after degenerate geometries are filtered out.
pub fn load_dataset<I>(records: I) -> Result<Dataset>
where
    I: IntoIterator<Item = FeatureRecord>,
{
    load_dataset_with_config(records, Config::default())
}

pub fn load_dataset_with_config<I>(records: I, config: Config) -> Result<Dataset>
where
    I: IntoIterator<Item = FeatureRecord>,
{
    load_with_source_rejects(records, config, Vec::new())
}

/// Like [`load_dataset_with_config`], counting features the source already
/// rejected (unsupported geometry, missing id) in the load report.
pub(crate) fn load_with_source_rejects<I>(
    records: I,
    config: Config,
    source_rejects: Vec<WaterwayError>,
) -> Result<Dataset>
where
    I: IntoIterator<Item = FeatureRecord>,
{
    config.validate().map_err(WaterwayError::Config)?;

    let start = Instant::now();
    let (store, mut report) = FeatureStore::from_records(records, config.strict_coordinates);
    let mut skipped = source_rejects;
    skipped.append(&mut report.skipped);
    report.skipped = skipped;

    if store.is_empty() {
        return Err(WaterwayError::Dataset(format!(
            "No usable features ({} skipped)",
            report.skipped_count()
        )));
    }

    let index = SpatialIndex::build(&store);
    let build_time = start.elapsed();

    let stats = DatasetStats {
        feature_count: store.len(),
        skipped_count: report.skipped_count(),
        vertex_count: store.vertex_count(),
        extent: store.extent(),
        build_time,
    };

    log::info!(
        "Loaded {} waterways ({} vertices), skipped {} in {:.2?}",
        stats.feature_count,
        stats.vertex_count,
        stats.skipped_count,
        build_time
    );

    Ok(Dataset {
        store,
        index,
        config,
        report,
        stats,
    })
}

impl Dataset {
    pub fn store(&self) -> &FeatureStore {
        &self.store
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Features rejected during load.
    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn stats(&self) -> &DatasetStats {
        &self.stats
    }

    pub fn into_parts(self) -> (FeatureStore, SpatialIndex) {
        (self.store, self.index)
    }

    /// Finds the crossings of a raw track using this dataset's configuration.
    pub fn query(&self, vertices: &[Coord]) -> Result<QueryResult> {
        query::find_crossings_with_config(&self.index, &self.store, vertices, &self.config)
    }

    pub fn query_batch<T>(&self, tracks: &[T]) -> Vec<Result<QueryResult>>
    where
        T: AsRef<[Coord]> + Sync,
    {
        query::query_batch(&self.index, &self.store, tracks, &self.config)
    }
}

/// Thread-safe handle to the current dataset with atomic reload.
///
/// Queries clone the current `Arc` under a read lock and run without any
/// lock held. Reloads are serialized; the write lock is held only for the
/// pointer swap.
#[derive(Clone)]
pub struct SharedDataset {
    inner: Arc<SharedInner>,
}

struct SharedInner {
    current: RwLock<Arc<Dataset>>,
    reload_lock: Mutex<()>,
    generation: AtomicU64,
}

impl SharedDataset {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            inner: Arc::new(SharedInner {
                current: RwLock::new(Arc::new(dataset)),
                reload_lock: Mutex::new(()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// The dataset current at the time of the call.
    pub fn snapshot(&self) -> Arc<Dataset> {
        Arc::clone(&self.inner.current.read())
    }

    /// Number of successful reloads since creation.
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> DatasetStats {
        self.snapshot().stats().clone()
    }

    pub fn query(&self, vertices: &[Coord]) -> Result<QueryResult> {
        self.snapshot().query(vertices)
    }

    /// Rebuilds from a new feature source with the current configuration.
    ///
    /// On failure the current dataset stays in place.
    pub fn reload<I>(&self, records: I) -> Result<DatasetStats>
    where
        I: IntoIterator<Item = FeatureRecord>,
    {
        let _guard = self.inner.reload_lock.lock();
        let config = self.snapshot().config().clone();
        let dataset = load_dataset_with_config(records, config)?;
        let stats = dataset.stats().clone();
        self.swap(dataset);
        Ok(stats)
    }

    /// Swaps in an already built dataset and returns the previous one.
    pub fn replace(&self, dataset: Dataset) -> Arc<Dataset> {
        let _guard = self.inner.reload_lock.lock();
        self.swap(dataset)
    }

    fn swap(&self, dataset: Dataset) -> Arc<Dataset> {
        let previous = std::mem::replace(&mut *self.inner.current.write(), Arc::new(dataset));
        let generation = self.inner.generation.fetch_add(1, Ordering::AcqRel) + 1;
        log::info!("Dataset swapped, generation {}", generation);
        previous
    }
}

impl std::fmt::Debug for SharedDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedDataset")
            .field("generation", &self.generation())
            .field("features", &self.snapshot().store().len())
            .finish()
    }
}
