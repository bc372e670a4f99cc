//! Remote feature fetching and the end-to-end query pipeline.
//!
//! [`FeatureSource`] is the I/O seam: [`TrafficClient`] implements it over
//! HTTP, and [`fetch_window`] drives any source across a request's quanta
//! without knowing how features are obtained.

use crate::builder::ClientBuilder;
use crate::compute::aggregate::{AggregateResult, QuantumOutcome, aggregate};
use crate::compute::filter::{self, FilterExpression, SRS_NAME};
use crate::compute::render::{RenderedOutput, render};
use crate::config::Config;
use crate::error::{FetchError, Result};
use crate::request::{QueryArgs, QueryRequest};
use futures::stream::{self, StreamExt};
use geojson::{Feature, FeatureCollection};
use log::{debug, info};
use std::future::Future;

/// Something that answers one filter with a list of features.
pub trait FeatureSource {
    fn fetch(
        &self,
        filter: &FilterExpression,
    ) -> impl Future<Output = std::result::Result<Vec<Feature>, FetchError>>;
}

/// Query every quantum of `request`, at most `concurrency` at a time.
///
/// Outcomes come back in ascending quantum order whatever the concurrency.
/// A failed quantum is recorded and skipped; it never stops the loop.
pub async fn fetch_window<S: FeatureSource>(
    source: &S,
    request: &QueryRequest,
    concurrency: usize,
) -> Result<AggregateResult> {
    let bbox = request.bbox_param()?;
    let quanta = request.quanta()?;
    let codes = request.point_codes.as_slice();

    info!(
        "Querying {} quanta from {} to {} within {}",
        quanta.len(),
        request.start,
        request.end,
        bbox
    );

    let outcomes: Vec<QuantumOutcome> = stream::iter(quanta)
        .map(|quantum| {
            let filter = filter::build(request.road_type, &quantum, &bbox, codes);
            async move {
                debug!("Fetching quantum {}: {}", quantum, filter);
                let result = source.fetch(&filter).await;
                QuantumOutcome::from_result(quantum, result)
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let result = aggregate(outcomes);
    info!(
        "Collected {} features from {} quanta ({} failed)",
        result.report.feature_count,
        result.report.quanta_queried,
        result.report.quanta_failed()
    );
    Ok(result)
}

/// HTTP client for the traffic observation WFS layer.
#[derive(Debug, Clone)]
pub struct TrafficClient {
    http: reqwest::Client,
    config: Config,
}

impl TrafficClient {
    /// Build a client from a configuration.
    pub fn new(config: Config) -> Result<Self> {
        ClientBuilder::new().config(config).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) fn from_parts(http: reqwest::Client, config: Config) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch and aggregate a validated request without rendering it.
    pub async fn fetch_window(&self, request: &QueryRequest) -> Result<AggregateResult> {
        fetch_window(self, request, self.config.max_concurrent_requests).await
    }

    /// Fetch, aggregate and render a validated request.
    pub async fn query(&self, request: &QueryRequest) -> Result<RenderedOutput> {
        let aggregate = self.fetch_window(request).await?;
        render(aggregate.into_features(), request.output_format)
    }

    /// Validate raw arguments, then [`query`](Self::query).
    pub async fn query_args(&self, args: &QueryArgs) -> Result<RenderedOutput> {
        let request = args.validate()?;
        self.query(&request).await
    }
}

impl FeatureSource for TrafficClient {
    async fn fetch(
        &self,
        filter: &FilterExpression,
    ) -> std::result::Result<Vec<Feature>, FetchError> {
        let cql = filter.to_cql();
        let params = [
            ("service", "WFS"),
            ("version", "2.0.0"),
            ("request", "GetFeature"),
            ("typeNames", self.config.type_name.as_str()),
            ("srsName", SRS_NAME),
            ("outputFormat", "application/json"),
            ("cql_filter", cql.as_str()),
        ];

        let response = self
            .http
            .get(&self.config.base_url)
            .query(&params)
            .timeout(self.config.request_timeout())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let collection: FeatureCollection =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(collection.features)
    }
}
