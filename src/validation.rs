//! Validation for track vertices and feature coordinates.
//!
//! Every coordinate must be finite before it reaches the intersection math.
//! Range checks against longitude/latitude are opt-in through
//! [`Config::strict_coordinates`](crate::Config).

use crate::config::Config;
use crate::error::{Result, WaterwayError};
use geo::Coord;

/// Validates that a coordinate is finite and, when `strict`, that it lies
/// within longitude [-180.0, 180.0] and latitude [-90.0, 90.0].
///
/// # Examples
///
/// ```
/// use wasserwege::validation::validate_coordinate;
/// use geo::Coord;
///
/// assert!(validate_coordinate(&Coord { x: 11.57, y: 48.13 }, true).is_ok());
/// assert!(validate_coordinate(&Coord { x: f64::NAN, y: 48.13 }, false).is_err());
/// assert!(validate_coordinate(&Coord { x: 500.0, y: 0.0 }, false).is_ok());
/// assert!(validate_coordinate(&Coord { x: 500.0, y: 0.0 }, true).is_err());
/// ```
pub fn validate_coordinate(coord: &Coord, strict: bool) -> Result<()> {
    if !coord.x.is_finite() {
        return Err(WaterwayError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            coord.x
        )));
    }

    if !coord.y.is_finite() {
        return Err(WaterwayError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            coord.y
        )));
    }

    if strict {
        if !(-180.0..=180.0).contains(&coord.x) {
            return Err(WaterwayError::InvalidInput(format!(
                "Longitude out of range [-180.0, 180.0]: {}",
                coord.x
            )));
        }

        if !(-90.0..=90.0).contains(&coord.y) {
            return Err(WaterwayError::InvalidInput(format!(
                "Latitude out of range [-90.0, 90.0]: {}",
                coord.y
            )));
        }
    }

    Ok(())
}

/// Validates a raw track before it is turned into a query polyline.
///
/// Fails with [`WaterwayError::InvalidTrack`] when the track has fewer than
/// 2 vertices, more than `config.max_track_vertices`, or any invalid vertex.
pub fn validate_track(vertices: &[Coord], config: &Config) -> Result<()> {
    if vertices.len() < 2 {
        return Err(WaterwayError::InvalidTrack(format!(
            "Track must contain at least 2 points, got {}",
            vertices.len()
        )));
    }

    if vertices.len() > config.max_track_vertices {
        return Err(WaterwayError::InvalidTrack(format!(
            "Track has {} points, limit is {}",
            vertices.len(),
            config.max_track_vertices
        )));
    }

    for (idx, vertex) in vertices.iter().enumerate() {
        validate_coordinate(vertex, config.strict_coordinates)
            .map_err(|e| WaterwayError::InvalidTrack(format!("Point at index {}: {}", idx, e)))?;
    }

    Ok(())
}

/// Validates every coordinate of a feature part.
pub fn validate_coords(coords: &[Coord], strict: bool) -> Result<()> {
    for (idx, coord) in coords.iter().enumerate() {
        validate_coordinate(coord, strict)
            .map_err(|e| WaterwayError::InvalidInput(format!("Vertex at index {}: {}", idx, e)))?;
    }
    Ok(())
}
