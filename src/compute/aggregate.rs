//! Per-quantum outcomes and their ordered concatenation.
//!
//! Fetching reports one [`QuantumOutcome`] per quantum. A failed quantum is
//! kept as a value carrying its reason instead of aborting the window, and
//! contributes no features to the aggregate.

use crate::compute::quanta::TimeQuantum;
use crate::error::FetchError;
use geojson::Feature;
use log::warn;

/// Result of querying a single quantum.
#[derive(Debug)]
pub enum QuantumOutcome {
    Fetched {
        quantum: TimeQuantum,
        features: Vec<Feature>,
    },
    Failed {
        quantum: TimeQuantum,
        reason: FetchError,
    },
}

impl QuantumOutcome {
    /// Wrap a fetch result, logging the failure where it happens.
    pub fn from_result(
        quantum: TimeQuantum,
        result: std::result::Result<Vec<Feature>, FetchError>,
    ) -> Self {
        match result {
            Ok(features) => QuantumOutcome::Fetched { quantum, features },
            Err(reason) => {
                warn!(
                    "Skipping quantum {} (time code {}): {}",
                    quantum,
                    quantum.time_code(),
                    reason
                );
                QuantumOutcome::Failed { quantum, reason }
            }
        }
    }

    pub fn quantum(&self) -> TimeQuantum {
        match self {
            QuantumOutcome::Fetched { quantum, .. } | QuantumOutcome::Failed { quantum, .. } => {
                *quantum
            }
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, QuantumOutcome::Failed { .. })
    }

    pub fn feature_count(&self) -> usize {
        match self {
            QuantumOutcome::Fetched { features, .. } => features.len(),
            QuantumOutcome::Failed { .. } => 0,
        }
    }
}

/// A quantum that contributed nothing because its fetch failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedQuantum {
    pub quantum: TimeQuantum,
    pub reason: String,
}

/// Summary of one request's fetch loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryReport {
    pub quanta_queried: usize,
    pub failed: Vec<FailedQuantum>,
    pub feature_count: usize,
}

impl QueryReport {
    pub fn quanta_failed(&self) -> usize {
        self.failed.len()
    }
}

/// Features of every quantum in arrival order, plus the run summary.
#[derive(Debug, Clone, Default)]
pub struct AggregateResult {
    pub features: Vec<Feature>,
    pub report: QueryReport,
}

impl AggregateResult {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn into_features(self) -> Vec<Feature> {
        self.features
    }
}

/// Concatenate outcomes in the order given. No deduplication, no sorting.
pub fn aggregate<I>(outcomes: I) -> AggregateResult
where
    I: IntoIterator<Item = QuantumOutcome>,
{
    let mut result = AggregateResult::default();

    for outcome in outcomes {
        result.report.quanta_queried += 1;
        match outcome {
            QuantumOutcome::Fetched { features, .. } => result.features.extend(features),
            QuantumOutcome::Failed { quantum, reason } => {
                result.report.failed.push(FailedQuantum {
                    quantum,
                    reason: reason.to_string(),
                });
            }
        }
    }

    result.report.feature_count = result.features.len();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::quanta::parse_timestamp;
    use serde_json::json;

    fn quantum(minute: u32) -> TimeQuantum {
        TimeQuantum::new(parse_timestamp(&format!("2024-01-01T00:{:02}:00", minute)).unwrap())
    }

    fn feature(id: &str) -> Feature {
        let mut feature = Feature::default();
        feature.set_property("id", json!(id));
        feature
    }

    fn ids(result: &AggregateResult) -> Vec<String> {
        result
            .features
            .iter()
            .map(|f| f.property("id").unwrap().as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_concatenation_preserves_order() {
        let result = aggregate(vec![
            QuantumOutcome::Fetched {
                quantum: quantum(0),
                features: vec![feature("a"), feature("b")],
            },
            QuantumOutcome::Fetched {
                quantum: quantum(5),
                features: vec![feature("c")],
            },
        ]);
        assert_eq!(ids(&result), ["a", "b", "c"]);
        assert_eq!(result.report.quanta_queried, 2);
        assert_eq!(result.report.feature_count, 3);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let result = aggregate(vec![
            QuantumOutcome::Fetched {
                quantum: quantum(0),
                features: vec![feature("a")],
            },
            QuantumOutcome::Fetched {
                quantum: quantum(5),
                features: vec![feature("a")],
            },
        ]);
        assert_eq!(ids(&result), ["a", "a"]);
    }

    #[test]
    fn test_failed_quantum_contributes_nothing() {
        let result = aggregate(vec![
            QuantumOutcome::Fetched {
                quantum: quantum(0),
                features: vec![feature("a")],
            },
            QuantumOutcome::from_result(
                quantum(5),
                Err(FetchError::Decode("truncated body".to_string())),
            ),
            QuantumOutcome::Fetched {
                quantum: quantum(10),
                features: vec![feature("c")],
            },
        ]);
        assert_eq!(ids(&result), ["a", "c"]);
        assert_eq!(result.report.quanta_queried, 3);
        assert_eq!(result.report.quanta_failed(), 1);
        assert_eq!(result.report.failed[0].quantum, quantum(5));
        assert!(result.report.failed[0].reason.contains("truncated body"));
    }

    #[test]
    fn test_empty_input() {
        let result = aggregate(Vec::new());
        assert!(result.is_empty());
        assert_eq!(result.report, QueryReport::default());
    }

    #[test]
    fn test_outcome_accessors() {
        let ok = QuantumOutcome::from_result(quantum(0), Ok(vec![feature("a")]));
        assert!(!ok.is_failed());
        assert_eq!(ok.feature_count(), 1);
        assert_eq!(ok.quantum(), quantum(0));

        let failed = QuantumOutcome::from_result(
            quantum(5),
            Err(FetchError::Status(reqwest::StatusCode::BAD_GATEWAY)),
        );
        assert!(failed.is_failed());
        assert_eq!(failed.feature_count(), 0);
    }
}
