use async_trait::async_trait;
use chrono::Utc;

use crate::error::MetricsError;

/// Metric name the skew is reported under
pub const SKEW_METRIC: &str = "topology.skew";

/// One data point, tagged with the resources it describes
#[derive(Clone, Debug, PartialEq)]
pub struct SkewSample {
    pub metric: String,
    pub value: f64,
    /// Unix timestamp in seconds
    pub timestamp: i64,
    /// `(resource type, resource name)` pairs
    pub resources: Vec<(String, String)>,
}

impl SkewSample {
    /// Sample for a deployment's skew, stamped with the current time
    pub fn for_deployment(deployment: &str, namespace: &str, skew: u32) -> Self {
        Self::at(deployment, namespace, skew, Utc::now().timestamp())
    }

    /// Sample for a deployment's skew at a fixed timestamp
    pub fn at(deployment: &str, namespace: &str, skew: u32, timestamp: i64) -> Self {
        Self {
            metric: SKEW_METRIC.to_string(),
            value: f64::from(skew),
            timestamp,
            resources: vec![
                ("kube_deployment".to_string(), deployment.to_string()),
                ("kube_namespace".to_string(), namespace.to_string()),
            ],
        }
    }
}

/// Destination for skew samples
#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn submit(&self, sample: &SkewSample) -> Result<(), MetricsError>;
}
