use anyhow::Result;
use async_trait::async_trait;

use kubeskew_types::{DeploymentInfo, LabelSet, NamespaceInfo, NodeInfo, PodInfo};

/// Read-only view of the cluster used by the topology scan.
///
/// Implemented by [`crate::KubeClient`] against a live API server and by the
/// in-memory fake in tests. Every call is a single, complete list or get;
/// callers treat any error as fatal for the run.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// List every node in the cluster, with labels
    async fn list_nodes(&self) -> Result<Vec<NodeInfo>>;

    /// List every namespace in the cluster
    async fn list_namespaces(&self) -> Result<Vec<NamespaceInfo>>;

    /// List the deployments of one namespace
    async fn list_deployments(&self, namespace: &str) -> Result<Vec<DeploymentInfo>>;

    /// Fetch a single deployment, including its `matchLabels` selector
    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<DeploymentInfo>;

    /// List pods in all namespaces whose labels match `selector` exactly
    async fn list_pods(&self, selector: &LabelSet) -> Result<Vec<PodInfo>>;
}
