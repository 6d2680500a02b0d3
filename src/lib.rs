//! Spatial index and intersection engine answering "which waterways does
//! this GPS track cross, and where?".
//!
//! A static set of line-shaped waterways is loaded once into an immutable
//! [`FeatureStore`] and a bulk-loaded R*-tree ([`SpatialIndex`]). Each query
//! prunes candidates by bounding box, intersects the track exactly with
//! every candidate, and returns the crossings ordered by intersection length
//! together with per-stage timings.
//!
//! Coordinates are planar (x = longitude, y = latitude); nothing is geodesic.
//!
//! ```rust
//! use wasserwege::{Coord, load_dataset};
//! use wasserwege::types::feature::FeatureRecord;
//! use geo::LineString;
//!
//! let river = FeatureRecord::from_line(1, "river", LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]))
//!     .with_name("Isar");
//! let dataset = load_dataset(vec![river])?;
//!
//! let track = [Coord { x: 5.0, y: -5.0 }, Coord { x: 5.0, y: 5.0 }];
//! let result = dataset.query(&track)?;
//! assert_eq!(result.feature_ids(), vec![1]);
//! assert_eq!(result.crossings[0].intersection.points, vec![Coord { x: 5.0, y: 0.0 }]);
//! # Ok::<(), wasserwege::WaterwayError>(())
//! ```

pub mod builder;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod geojson;
pub mod geometry;
pub mod index;
pub mod query;
pub mod store;
pub mod track;
pub mod validation;

pub use wasserwege_types as types;

pub use builder::DatasetBuilder;
pub use config::{Config, UNNAMED_WATERWAY};
pub use dataset::{Dataset, DatasetStats, SharedDataset, load_dataset, load_dataset_with_config};
pub use engine::{Crossing, CrossingGeometry};
pub use error::{Result, WaterwayError};
pub use geometry::{IntersectionResult, Polyline};
pub use index::SpatialIndex;
pub use query::{QueryResult, find_crossings};
pub use store::{Feature, FeatureStore, LoadReport};

pub use geo::Coord;
pub use wasserwege_types::bbox::BBox;
pub use wasserwege_types::feature::FeatureRecord;
pub use wasserwege_types::timing::StageTimings;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{DatasetBuilder, Result, WaterwayError};

    pub use crate::{Dataset, SharedDataset, load_dataset};

    pub use crate::{Crossing, QueryResult, find_crossings};

    pub use crate::{BBox, FeatureRecord, StageTimings};

    pub use crate::Config;

    pub use geo::{Coord, LineString};
}
