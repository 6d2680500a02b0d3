//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object or TOML document is a
//! valid configuration.
use crate::error::{Result, WaterwayError};
use serde::de::Error;
use std::path::Path;

/// Placeholder rendered for features without a name.
pub const UNNAMED_WATERWAY: &str = "Unnamed waterway";

/// Dataset and query configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Label used for unnamed features when formatting results
    #[serde(default = "Config::default_unnamed_label")]
    pub unnamed_label: String,

    /// Candidate count above which exact intersection runs on the rayon pool
    #[serde(default = "Config::default_parallel_threshold")]
    pub parallel_threshold: usize,

    /// Require coordinates to lie within longitude/latitude ranges
    #[serde(default)]
    pub strict_coordinates: bool,

    /// Largest accepted track, in vertices
    #[serde(default = "Config::default_max_track_vertices")]
    pub max_track_vertices: usize,
}

impl Config {
    fn default_unnamed_label() -> String {
        UNNAMED_WATERWAY.to_string()
    }

    const fn default_parallel_threshold() -> usize {
        64
    }

    const fn default_max_track_vertices() -> usize {
        1_000_000
    }

    pub fn with_unnamed_label(mut self, label: impl Into<String>) -> Self {
        self.unnamed_label = label.into();
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_strict_coordinates(mut self, strict: bool) -> Self {
        self.strict_coordinates = strict;
        self
    }

    pub fn with_max_track_vertices(mut self, max: usize) -> Self {
        assert!(max >= 2, "A track needs at least 2 vertices");
        if max > 50_000_000 {
            log::warn!(
                "Track vertex limit of {} is very large; a single query may hold \
                several gigabytes of coordinates.",
                max
            );
        }
        self.max_track_vertices = max;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_track_vertices < 2 {
            return Err("max_track_vertices must be at least 2".to_string());
        }

        if self.unnamed_label.trim().is_empty() {
            return Err("unnamed_label must not be blank".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load a configuration file, picking the format from its extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("json") => {
                Config::from_json(&text).map_err(|e| WaterwayError::Config(e.to_string()))
            }
            #[cfg(feature = "toml")]
            Some("toml") => {
                Config::from_toml(&text).map_err(|e| WaterwayError::Config(e.to_string()))
            }
            other => Err(WaterwayError::Config(format!(
                "Unsupported config file extension: {:?}",
                other
            ))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unnamed_label: Self::default_unnamed_label(),
            parallel_threshold: Self::default_parallel_threshold(),
            strict_coordinates: false,
            max_track_vertices: Self::default_max_track_vertices(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.unnamed_label, "Unnamed waterway");
        assert_eq!(config.parallel_threshold, 64);
        assert!(!config.strict_coordinates);
        assert_eq!(config.max_track_vertices, 1_000_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default()
            .with_unnamed_label("Namenloser Bach")
            .with_parallel_threshold(8)
            .with_strict_coordinates(true);

        let json = config.to_json().unwrap();
        let deserialized = Config::from_json(&json).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_rejects_unknown_and_invalid_fields() {
        assert!(Config::from_json(r#"{"sync_policy": "always"}"#).is_err());
        assert!(Config::from_json(r#"{"max_track_vertices": 1}"#).is_err());
        assert!(Config::from_json(r#"{"unnamed_label": "  "}"#).is_err());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_round_trip() {
        let config = Config::default().with_max_track_vertices(5000);
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_from_file_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"parallel_threshold": 3}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.parallel_threshold, 3);
    }

    #[test]
    fn test_from_file_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, WaterwayError::Config(_)));
    }
}
