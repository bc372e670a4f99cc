//! Error types for traffic queries.
//!
//! Request-level failures are [`TrafficError`]s and abort the whole request.
//! A failed fetch for a single time quantum is a [`FetchError`]; it is logged
//! and recovered locally, never propagated past the aggregation step.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrafficError {
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),

    #[error("Invalid time range: start {start} is after end {end}")]
    InvalidTimeRange { start: String, end: String },

    #[error("Missing area specification: provide a bbox, or centerLat/centerLon with a positive radiusKm")]
    MissingAreaSpecification,

    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TrafficError>;

/// Why one quantum contributed no features.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("service returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<jartic_types::UnknownVariant> for TrafficError {
    fn from(err: jartic_types::UnknownVariant) -> Self {
        TrafficError::InvalidInput(err.to_string())
    }
}

impl From<jartic_types::ParseBoundingBoxError> for TrafficError {
    fn from(err: jartic_types::ParseBoundingBoxError) -> Self {
        TrafficError::InvalidBoundingBox(err.0)
    }
}
