//! Namespace → deployment → pod walk producing per-deployment skew

use kubeskew_k8s::ClusterApi;
use kubeskew_metrics::{MetricsSink, SkewSample};

use crate::error::TopologyError;
use crate::locate::{locate_pods, match_labels, namespace_names};
use crate::skew::{UNKNOWN_ZONE, ZoneCounts};
use crate::zones::NodeZoneIndex;

/// Zone distribution of one deployment's pods
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentTopology {
    pub name: String,
    pub namespace: String,
    pub zone_counts: ZoneCounts,
    pub skew: u32,
    /// Matched pods that have no node yet
    pub unscheduled_pods: Vec<String>,
}

/// Results for one namespace; empty when it has no deployments
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceReport {
    pub namespace: String,
    pub deployments: Vec<DeploymentTopology>,
}

/// Results for the whole cluster, namespaces in listing order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClusterReport {
    pub namespaces: Vec<NamespaceReport>,
}

impl ClusterReport {
    pub fn deployments(&self) -> impl Iterator<Item = &DeploymentTopology> {
        self.namespaces.iter().flat_map(|ns| ns.deployments.iter())
    }
}

/// Walks the cluster and computes skew for every deployment
///
/// Any cluster API error aborts the scan. A failed metric submission is
/// logged and the scan carries on.
pub struct TopologyScanner<'a> {
    cluster: &'a dyn ClusterApi,
    index: &'a NodeZoneIndex,
    sink: Option<&'a dyn MetricsSink>,
}

impl<'a> TopologyScanner<'a> {
    pub fn new(cluster: &'a dyn ClusterApi, index: &'a NodeZoneIndex) -> Self {
        Self {
            cluster,
            index,
            sink: None,
        }
    }

    /// Submit a skew sample for every evaluated deployment
    pub fn with_sink(mut self, sink: &'a dyn MetricsSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub async fn scan(&self) -> Result<ClusterReport, TopologyError> {
        let mut report = ClusterReport::default();

        for namespace in namespace_names(self.cluster).await? {
            report.namespaces.push(self.scan_namespace(&namespace).await?);
        }

        Ok(report)
    }

    pub async fn scan_namespace(&self, namespace: &str) -> Result<NamespaceReport, TopologyError> {
        let deployments = self.cluster.list_deployments(namespace).await?;

        if deployments.is_empty() {
            tracing::debug!(namespace = %namespace, "no deployments found");
        }

        let mut report = NamespaceReport {
            namespace: namespace.to_string(),
            deployments: Vec::with_capacity(deployments.len()),
        };

        for deployment in deployments {
            let topology = self.evaluate(namespace, &deployment.name).await?;
            self.submit(&topology).await;
            report.deployments.push(topology);
        }

        Ok(report)
    }

    /// Count a deployment's pods per zone and compute its skew
    pub async fn evaluate(
        &self,
        namespace: &str,
        deployment: &str,
    ) -> Result<DeploymentTopology, TopologyError> {
        let selector = match_labels(self.cluster, namespace, deployment).await?;
        if selector.is_empty() {
            tracing::warn!(
                namespace = %namespace,
                deployment = %deployment,
                "deployment has no matchLabels, every pod in the cluster matches"
            );
        }

        let locations = locate_pods(self.cluster, &selector).await?;

        let mut zone_counts = ZoneCounts::seeded(self.index);
        for (pod, node) in &locations.nodes_by_pod {
            match self.index.zone_of(node) {
                Some(zone) => zone_counts.increment(zone),
                None => {
                    tracing::warn!(
                        pod = %pod,
                        node = %node,
                        "node is not in the zone index, counting pod as {}",
                        UNKNOWN_ZONE
                    );
                    zone_counts.increment(UNKNOWN_ZONE);
                }
            }
        }

        let skew = zone_counts.skew();
        tracing::debug!(
            namespace = %namespace,
            deployment = %deployment,
            pods = zone_counts.total(),
            skew,
            "evaluated deployment"
        );

        Ok(DeploymentTopology {
            name: deployment.to_string(),
            namespace: namespace.to_string(),
            zone_counts,
            skew,
            unscheduled_pods: locations.unscheduled,
        })
    }

    async fn submit(&self, topology: &DeploymentTopology) {
        let Some(sink) = self.sink else {
            return;
        };

        let sample = SkewSample::for_deployment(&topology.name, &topology.namespace, topology.skew);
        if let Err(e) = sink.submit(&sample).await {
            tracing::error!(
                namespace = %topology.namespace,
                deployment = %topology.name,
                error = %e,
                "failed to submit skew metric"
            );
        }
    }
}
