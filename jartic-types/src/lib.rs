//! # jartic-types
//!
//! Value types shared by the JARTIC traffic query core and its callers:
//!
//! - **Area types**: `BoundingBox`
//! - **Query selectors**: `RoadType`, `OutputFormat`
//!
//! All types are serializable with Serde. `BoundingBox` hands out its center
//! as a `geo::Point`.
//!
//! ## Examples
//!
//! ```rust
//! use jartic_types::bbox::BoundingBox;
//! use jartic_types::road::RoadType;
//!
//! let bbox: BoundingBox = "139.15,35.14,139.32,35.56".parse().unwrap();
//! assert_eq!(bbox.to_string(), "139.15,35.14,139.32,35.56");
//! assert_eq!(RoadType::NationalRoad.code(), "3");
//! ```

pub mod bbox;
pub mod format;
pub mod road;

pub use bbox::{BoundingBox, ParseBoundingBoxError};
pub use format::OutputFormat;
pub use road::RoadType;

/// Error returned when a textual selector does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl std::fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {}: '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}
