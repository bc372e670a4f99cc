//! Pure building blocks of a traffic query: area resolution, time slicing,
//! filter construction, aggregation and rendering.

pub mod aggregate;
pub mod bbox;
pub mod filter;
pub mod quanta;
pub mod render;

pub use aggregate::{AggregateResult, FailedQuantum, QuantumOutcome, QueryReport, aggregate};
pub use filter::FilterExpression;
pub use quanta::{TimeQuanta, TimeQuantum};
pub use render::{RenderedOutput, render};
