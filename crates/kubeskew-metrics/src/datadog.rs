//! Datadog v2 series intake

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::MetricsError;
use crate::sink::{MetricsSink, SkewSample};

/// Datadog site used when none is configured
pub const DEFAULT_SITE: &str = "datadoghq.com";

const SERIES_PATH: &str = "/api/v2/series";

/// Metric intake type `0`: unspecified
const METRIC_TYPE_UNSPECIFIED: u8 = 0;

/// Connection settings for the Datadog API
#[derive(Clone, Debug)]
pub struct DatadogConfig {
    /// Base URL, e.g. `https://api.datadoghq.com`
    pub base_url: String,
    pub api_key: String,
    pub app_key: Option<String>,
    pub timeout: Duration,
}

impl DatadogConfig {
    /// Build a config for a Datadog site such as `datadoghq.eu`
    pub fn for_site(site: &str, api_key: String) -> Self {
        Self {
            base_url: format!("https://api.{}", site),
            api_key,
            app_key: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_app_key(mut self, app_key: Option<String>) -> Self {
        self.app_key = app_key;
        self
    }
}

#[derive(Serialize)]
struct SeriesPayload<'a> {
    series: Vec<MetricSeries<'a>>,
}

#[derive(Serialize)]
struct MetricSeries<'a> {
    metric: &'a str,
    #[serde(rename = "type")]
    kind: u8,
    points: Vec<MetricPoint>,
    resources: Vec<MetricResource<'a>>,
}

#[derive(Serialize)]
struct MetricPoint {
    timestamp: i64,
    value: f64,
}

#[derive(Serialize)]
struct MetricResource<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    name: &'a str,
}

impl<'a> From<&'a SkewSample> for SeriesPayload<'a> {
    fn from(sample: &'a SkewSample) -> Self {
        Self {
            series: vec![MetricSeries {
                metric: &sample.metric,
                kind: METRIC_TYPE_UNSPECIFIED,
                points: vec![MetricPoint {
                    timestamp: sample.timestamp,
                    value: sample.value,
                }],
                resources: sample
                    .resources
                    .iter()
                    .map(|(kind, name)| MetricResource {
                        kind: kind.as_str(),
                        name: name.as_str(),
                    })
                    .collect(),
            }],
        }
    }
}

/// Submits samples to the Datadog metrics API
pub struct DatadogSink {
    http: reqwest::Client,
    config: DatadogConfig,
}

impl DatadogSink {
    pub fn new(config: DatadogConfig) -> Result<Self, MetricsError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    fn series_url(&self) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), SERIES_PATH)
    }
}

#[async_trait]
impl MetricsSink for DatadogSink {
    async fn submit(&self, sample: &SkewSample) -> Result<(), MetricsError> {
        let mut request = self
            .http
            .post(self.series_url())
            .header("DD-API-KEY", &self.config.api_key)
            .json(&SeriesPayload::from(sample));

        if let Some(app_key) = &self.config.app_key {
            request = request.header("DD-APPLICATION-KEY", app_key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(MetricsError::Rejected {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(metric = %sample.metric, response = %body, "metric submitted");
        Ok(())
    }
}
