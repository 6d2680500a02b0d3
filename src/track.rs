//! Track sources.
//!
//! A query track is the concatenation, in order, of the vertices of every
//! segment of every track in the submitted file. Segment breaks are not
//! path breaks: the last vertex of one segment is joined to the first vertex
//! of the next.

use geo::Coord;

/// Concatenates track segments into one vertex list.
///
/// # Examples
///
/// ```
/// use wasserwege::track::track_from_segments;
/// use geo::Coord;
///
/// let segments = vec![
///     vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 }],
///     vec![Coord { x: 5.0, y: 5.0 }],
/// ];
/// let track = track_from_segments(segments);
/// assert_eq!(track.len(), 3);
/// assert_eq!(track[2], Coord { x: 5.0, y: 5.0 });
/// ```
pub fn track_from_segments<I, S>(segments: I) -> Vec<Coord>
where
    I: IntoIterator<Item = S>,
    S: IntoIterator<Item = Coord>,
{
    segments.into_iter().flatten().collect()
}

#[cfg(feature = "gpx")]
pub use self::gpx_source::{parse_gpx, read_gpx, track_from_gpx};

#[cfg(feature = "gpx")]
mod gpx_source {
    use super::track_from_segments;
    use crate::error::Result;
    use geo::Coord;
    use std::io::Read;

    /// Track points of all tracks and segments, x = longitude, y = latitude.
    pub fn track_from_gpx(gpx: &gpx::Gpx) -> Vec<Coord> {
        track_from_segments(gpx.tracks.iter().flat_map(|track| {
            track.segments.iter().map(|segment| {
                segment.points.iter().map(|waypoint| {
                    let point = waypoint.point();
                    Coord {
                        x: point.x(),
                        y: point.y(),
                    }
                })
            })
        }))
    }

    /// Parses a GPX document and returns its concatenated track.
    pub fn read_gpx<R: Read>(reader: R) -> Result<Vec<Coord>> {
        let gpx = gpx::read(reader)?;
        Ok(track_from_gpx(&gpx))
    }

    pub fn parse_gpx(bytes: &[u8]) -> Result<Vec<Coord>> {
        read_gpx(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_are_joined() {
        let segments = vec![
            vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }],
            vec![],
            vec![Coord { x: 2.0, y: 0.0 }],
        ];
        assert_eq!(
            track_from_segments(segments),
            vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 1.0, y: 1.0 },
                Coord { x: 2.0, y: 0.0 },
            ]
        );
    }

    #[cfg(feature = "gpx")]
    #[test]
    fn test_parse_gpx_concatenates_tracks_and_segments() {
        let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="wasserwege-test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <trkseg>
      <trkpt lat="48.10" lon="11.50"></trkpt>
      <trkpt lat="48.20" lon="11.60"></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="48.30" lon="11.70"></trkpt>
    </trkseg>
  </trk>
  <trk>
    <trkseg>
      <trkpt lat="48.40" lon="11.80"></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

        let track = parse_gpx(text.as_bytes()).unwrap();
        assert_eq!(track.len(), 4);
        assert_eq!(track[0], Coord { x: 11.50, y: 48.10 });
        assert_eq!(track[2], Coord { x: 11.70, y: 48.30 });
        assert_eq!(track[3], Coord { x: 11.80, y: 48.40 });
    }

    #[cfg(feature = "gpx")]
    #[test]
    fn test_parse_gpx_rejects_garbage() {
        assert!(parse_gpx(b"<not-gpx/>").is_err());
    }
}
