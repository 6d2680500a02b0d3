//! Error types for Wasserwege.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WaterwayError>;

/// Errors raised while loading a dataset or answering a query.
///
/// Load-time errors affect a single feature unless the whole dataset ends up
/// empty. Query-time errors affect only the query that raised them; the
/// shared store and index are never touched.
#[derive(Debug, Error)]
pub enum WaterwayError {
    /// The dataset has no usable feature after filtering.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// A single feature was excluded at load time.
    #[error("Degenerate feature {id} skipped: {reason}")]
    DegenerateFeature { id: i64, reason: String },

    /// The caller-supplied track is malformed.
    #[error("Invalid track: {0}")]
    InvalidTrack(String),

    /// Non-finite numbers reached the intersection math.
    #[error("Geometry computation error: {0}")]
    GeometryComputation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[cfg(feature = "gpx")]
    #[error("GPX parsing error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
}

impl WaterwayError {
    /// True for errors caused by the caller's input rather than the dataset
    /// or the engine. The HTTP boundary maps these to client errors.
    pub fn is_client_error(&self) -> bool {
        match self {
            WaterwayError::InvalidTrack(_) | WaterwayError::InvalidInput(_) => true,
            #[cfg(feature = "gpx")]
            WaterwayError::Gpx(_) => true,
            _ => false,
        }
    }
}
