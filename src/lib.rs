//! Road traffic observations from the JARTIC open traffic WFS service.
//!
//! ## Features
//! - **Time slicing**: a window is split into 5-minute quanta, one remote query each
//! - **Area resolution**: explicit bounding box, or a center point with a radius
//! - **Partial-failure tolerance**: a failed quantum is logged and skipped
//! - **Bounded concurrency**: optional parallel fetches that keep quantum order
//! - **Rendering**: GeoJSON `FeatureCollection` or flattened CSV
//!
//! ```rust,no_run
//! use jartic::{OutputFormat, QueryArgs, RoadType, TrafficClient};
//!
//! # async fn run() -> jartic::Result<()> {
//! let client = TrafficClient::builder().build()?;
//! let args = QueryArgs::new(RoadType::NationalRoad, "2024-01-01T00:00:00", "2024-01-01T00:10:00")
//!     .with_bbox("139.15,35.14,139.32,35.56")
//!     .with_output_format(OutputFormat::Csv);
//! let csv = client.query_args(&args).await?.into_text()?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod client;
pub mod compute;
pub mod config;
pub mod error;
pub mod request;
pub mod tool;

pub use builder::ClientBuilder;
pub use client::{FeatureSource, TrafficClient, fetch_window};
pub use config::Config;
pub use error::{FetchError, Result, TrafficError};
pub use request::{Area, PointCodes, QueryArgs, QueryRequest};
pub use tool::{Tool, ToolDefinition, dispatch};

pub use compute::{AggregateResult, FilterExpression, QueryReport, RenderedOutput, TimeQuantum};

pub use geojson::{Feature, FeatureCollection};
pub use jartic_types::{BoundingBox, OutputFormat, RoadType};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{ClientBuilder, Config, Result, TrafficClient, TrafficError};

    pub use crate::{OutputFormat, QueryArgs, QueryRequest, RenderedOutput, RoadType};

    pub use crate::{BoundingBox, Feature, FeatureCollection};

    pub use std::time::Duration;
}
