//! Kubernetes client for kubeskew
//!
//! This crate provides Kubernetes API integration for listing nodes,
//! namespaces, deployments, and the pods a deployment selects.

mod api;
mod client;
#[cfg(any(test, feature = "test-utils"))]
mod fake;
mod selector;

pub use api::ClusterApi;
pub use client::KubeClient;
#[cfg(any(test, feature = "test-utils"))]
pub use fake::{FakeCall, FakeCluster};
pub use selector::label_selector;

// Re-export types that are used in our public API
pub use kubeskew_types::{DeploymentInfo, LabelSet, NamespaceInfo, NodeInfo, PodInfo, ZONE_LABEL};
