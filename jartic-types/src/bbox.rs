use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A geographic bounding box in degrees.
///
/// Fields are kept in the order the remote service expects them
/// (west, south, east, north) and are never normalized, so a box parsed
/// from text serializes back to the same four values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum longitude
    pub west: f64,
    /// Minimum latitude
    pub south: f64,
    /// Maximum longitude
    pub east: f64,
    /// Maximum latitude
    pub north: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its four edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use jartic_types::bbox::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(139.15, 35.14, 139.32, 35.56);
    /// assert_eq!(bbox.west, 139.15);
    /// ```
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Get the center point of the bounding box.
    pub fn center(&self) -> Point {
        Point::new(
            (self.west + self.east) / 2.0,
            (self.south + self.north) / 2.0,
        )
    }

    /// Check if a point (x = longitude, y = latitude) lies strictly inside this box.
    pub fn strictly_contains(&self, point: &Point) -> bool {
        point.x() > self.west
            && point.x() < self.east
            && point.y() > self.south
            && point.y() < self.north
    }

    /// Check that all four edges are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.west.is_finite()
            && self.south.is_finite()
            && self.east.is_finite()
            && self.north.is_finite()
    }
}

impl fmt::Display for BoundingBox {
    /// Comma-joined `west,south,east,north`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

/// Error returned when a `west,south,east,north` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBoundingBoxError(pub String);

impl fmt::Display for ParseBoundingBoxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParseBoundingBoxError {}

impl FromStr for BoundingBox {
    type Err = ParseBoundingBoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(ParseBoundingBoxError(format!(
                "expected 4 comma-separated values (west,south,east,north), got {}",
                parts.len()
            )));
        }

        let mut values = [0.0_f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            let value: f64 = part
                .parse()
                .map_err(|_| ParseBoundingBoxError(format!("not a number: '{}'", part)))?;
            if !value.is_finite() {
                return Err(ParseBoundingBoxError(format!(
                    "bounding box values must be finite, got: {}",
                    part
                )));
            }
            *slot = value;
        }

        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }
}
