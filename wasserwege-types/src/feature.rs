use geo::LineString;
use serde::{Deserialize, Serialize};

/// One waterway as delivered by a feature source.
///
/// This is the `(id, name?, type, geometry_parts)` tuple the dataset loader
/// consumes. No validation happens here; degenerate parts are filtered when
/// the record is loaded into a feature store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Unique feature identifier (OSM way/relation id upstream)
    pub id: i64,
    /// Display name, absent for unnamed waterways
    #[serde(default)]
    pub name: Option<String>,
    /// Free-form category taken from upstream tags (river, stream, canal, ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// One or more line parts
    pub parts: Vec<LineString<f64>>,
}

impl FeatureRecord {
    /// Create an unnamed record.
    ///
    /// # Examples
    ///
    /// ```
    /// use wasserwege_types::feature::FeatureRecord;
    /// use geo::LineString;
    ///
    /// let record = FeatureRecord::new(7, "stream", vec![LineString::from(vec![(0.0, 0.0), (1.0, 1.0)])]);
    /// assert!(record.name.is_none());
    /// ```
    pub fn new(id: i64, kind: impl Into<String>, parts: Vec<LineString<f64>>) -> Self {
        Self {
            id,
            name: None,
            kind: kind.into(),
            parts,
        }
    }

    /// Record with a single line part.
    pub fn from_line(id: i64, kind: impl Into<String>, line: LineString<f64>) -> Self {
        Self::new(id, kind, vec![line])
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name to show for this record, falling back to `placeholder`.
    pub fn display_name<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(placeholder)
    }

    /// Total number of vertices across all parts.
    pub fn vertex_count(&self) -> usize {
        self.parts.iter().map(|p| p.0.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_placeholder() {
        let line = LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]);
        let unnamed = FeatureRecord::from_line(1, "ditch", line.clone());
        assert_eq!(unnamed.display_name("Unnamed waterway"), "Unnamed waterway");

        let named = FeatureRecord::from_line(2, "river", line).with_name("Donau");
        assert_eq!(named.display_name("Unnamed waterway"), "Donau");
    }

    #[test]
    fn test_vertex_count_spans_parts() {
        let record = FeatureRecord::new(
            3,
            "canal",
            vec![
                LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]),
                LineString::from(vec![(5.0, 5.0), (6.0, 6.0)]),
            ],
        );
        assert_eq!(record.vertex_count(), 5);
    }

    #[test]
    fn test_serde_uses_type_key() {
        let record = FeatureRecord::from_line(
            4,
            "stream",
            LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "stream");
        assert!(json.get("kind").is_none());

        let back: FeatureRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
