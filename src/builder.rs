//! Dataset builder for flexible configuration
//!
//! Collects a configuration and a feature source, then builds a [`Dataset`]
//! or a reloadable [`SharedDataset`].

use crate::config::Config;
use crate::dataset::{Dataset, SharedDataset, load_with_source_rejects};
use crate::error::{Result, WaterwayError};
use crate::geojson::{ParsedFeatures, parse_feature_collection, read_feature_collection};
use std::path::PathBuf;
use wasserwege_types::feature::FeatureRecord;

#[derive(Debug)]
enum Source {
    Records(Vec<FeatureRecord>),
    GeoJson(String),
    GeoJsonFile(PathBuf),
}

/// Builder for datasets with custom configuration and feature source.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    config: Config,
    source: Option<Source>,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dataset configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Use in-memory records as the feature source.
    pub fn records<I>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = FeatureRecord>,
    {
        self.source = Some(Source::Records(records.into_iter().collect()));
        self
    }

    /// Use a GeoJSON FeatureCollection string as the feature source.
    pub fn geojson(mut self, text: impl Into<String>) -> Self {
        self.source = Some(Source::GeoJson(text.into()));
        self
    }

    /// Read a GeoJSON FeatureCollection file at build time.
    pub fn geojson_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.source = Some(Source::GeoJsonFile(path.into()));
        self
    }

    /// Build the dataset.
    pub fn build(self) -> Result<Dataset> {
        let parsed = match self.source {
            Some(Source::Records(records)) => ParsedFeatures {
                records,
                rejected: Vec::new(),
            },
            Some(Source::GeoJson(text)) => parse_feature_collection(&text)?,
            Some(Source::GeoJsonFile(path)) => {
                log::info!("Reading waterways from {}", path.display());
                read_feature_collection(&path)?
            }
            None => {
                return Err(WaterwayError::Dataset(
                    "No feature source configured".to_string(),
                ));
            }
        };

        load_with_source_rejects(parsed.records, self.config, parsed.rejected)
    }

    /// Build the dataset behind a reloadable handle.
    pub fn build_shared(self) -> Result<SharedDataset> {
        Ok(SharedDataset::new(self.build()?))
    }
}
