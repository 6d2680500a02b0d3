//! # wasserwege-types
//!
//! Core data types shared by the Wasserwege crossing engine and its callers.
//!
//! - **Bounding boxes**: `BBox`, an inclusive axis-aligned rectangle
//! - **Feature records**: `FeatureRecord`, the shape a feature source yields
//! - **Timings**: `StageTimings`, the per-stage breakdown of one query
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives. Coordinates are planar: x is longitude, y is latitude.
//!
//! ## Examples
//!
//! ```rust
//! use wasserwege_types::bbox::BBox;
//! use wasserwege_types::feature::FeatureRecord;
//! use geo::{Coord, LineString};
//!
//! let line = LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]);
//! let record = FeatureRecord::new(1, "river", vec![line]).with_name("Isar");
//! assert_eq!(record.display_name("Unnamed waterway"), "Isar");
//!
//! let bbox = BBox::new(0.0, 0.0, 10.0, 0.0);
//! assert!(bbox.contains_coord(&Coord { x: 5.0, y: 0.0 }));
//! ```

pub mod bbox;
pub mod feature;
pub mod timing;
