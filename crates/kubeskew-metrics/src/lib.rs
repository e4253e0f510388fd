//! Metric submission for kubeskew
//!
//! This crate defines the sink the topology scan reports skew samples to,
//! and a Datadog implementation of it.

mod datadog;
mod error;
mod sink;

pub use datadog::{DEFAULT_SITE, DatadogConfig, DatadogSink};
pub use error::MetricsError;
pub use sink::{MetricsSink, SKEW_METRIC, SkewSample};
