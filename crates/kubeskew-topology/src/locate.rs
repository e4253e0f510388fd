use std::collections::BTreeMap;

use kubeskew_k8s::{ClusterApi, label_selector};
use kubeskew_types::LabelSet;

use crate::error::TopologyError;

/// Where the pods matched by a selector are running
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PodLocations {
    /// Pod name to node name; same-named pods from different namespaces
    /// share one entry, the last listed wins
    pub nodes_by_pod: BTreeMap<String, String>,
    /// Names of matched pods not yet bound to a node
    pub unscheduled: Vec<String>,
}

/// Names of every namespace in the cluster, in listing order
pub async fn namespace_names(cluster: &dyn ClusterApi) -> Result<Vec<String>, TopologyError> {
    Ok(cluster
        .list_namespaces()
        .await?
        .into_iter()
        .map(|ns| ns.name)
        .collect())
}

/// Fetch a deployment and return its `matchLabels`
pub async fn match_labels(
    cluster: &dyn ClusterApi,
    namespace: &str,
    deployment: &str,
) -> Result<LabelSet, TopologyError> {
    Ok(cluster.get_deployment(namespace, deployment).await?.selector)
}

/// Find pods in all namespaces matching `selector` and the nodes they run on
///
/// Pods without a node are logged and reported separately.
pub async fn locate_pods(
    cluster: &dyn ClusterApi,
    selector: &LabelSet,
) -> Result<PodLocations, TopologyError> {
    let pods = cluster.list_pods(selector).await?;
    let mut locations = PodLocations::default();

    for pod in pods {
        match pod.node_name {
            Some(node) => {
                locations.nodes_by_pod.insert(pod.name, node);
            }
            None => {
                tracing::info!(
                    pod = %pod.name,
                    namespace = %pod.namespace,
                    "pod isn't attached to a node"
                );
                locations.unscheduled.push(pod.name);
            }
        }
    }

    tracing::debug!(
        selector = %label_selector(selector),
        scheduled = locations.nodes_by_pod.len(),
        unscheduled = locations.unscheduled.len(),
        "located pods"
    );

    Ok(locations)
}

#[cfg(test)]
mod tests {
    use kubeskew_k8s::{FakeCall, FakeCluster};
    use kubeskew_types::{DeploymentInfo, PodInfo};

    use super::*;

    fn web_selector() -> LabelSet {
        let mut selector = LabelSet::new();
        selector.insert("app".to_string(), "web".to_string());
        selector
    }

    #[tokio::test]
    async fn test_namespace_names_unfiltered() {
        let cluster = FakeCluster::new()
            .with_namespace("default")
            .with_namespace("kube-system")
            .with_namespace("shop");

        let names = namespace_names(&cluster).await.unwrap();
        assert_eq!(names, vec!["default", "kube-system", "shop"]);
    }

    #[tokio::test]
    async fn test_match_labels_from_deployment() {
        let cluster = FakeCluster::new().with_deployment(
            DeploymentInfo::new("web".to_string(), "shop".to_string()).with_selector("app", "web"),
        );

        let labels = match_labels(&cluster, "shop", "web").await.unwrap();
        assert_eq!(labels, web_selector());
    }

    #[tokio::test]
    async fn test_match_labels_for_deleted_deployment() {
        let cluster = FakeCluster::new().with_namespace("shop");
        let err = match_labels(&cluster, "shop", "web").await.unwrap_err();
        assert!(matches!(err, TopologyError::Cluster(_)));
    }

    #[tokio::test]
    async fn test_locate_splits_unscheduled_pods() {
        let cluster = FakeCluster::new()
            .with_pod(
                PodInfo::new("web-1".to_string(), "shop".to_string())
                    .with_label("app", "web")
                    .on_node("node-1"),
            )
            .with_pod(PodInfo::new("web-2".to_string(), "shop".to_string()).with_label("app", "web"))
            .with_pod(
                PodInfo::new("db-1".to_string(), "shop".to_string())
                    .with_label("app", "db")
                    .on_node("node-1"),
            );

        let locations = locate_pods(&cluster, &web_selector()).await.unwrap();
        assert_eq!(locations.nodes_by_pod.len(), 1);
        assert_eq!(
            locations.nodes_by_pod.get("web-1").map(String::as_str),
            Some("node-1")
        );
        assert_eq!(locations.unscheduled, vec!["web-2".to_string()]);
    }

    #[tokio::test]
    async fn test_same_pod_name_in_two_namespaces() {
        let cluster = FakeCluster::new()
            .with_pod(
                PodInfo::new("web-1".to_string(), "shop".to_string())
                    .with_label("app", "web")
                    .on_node("node-1"),
            )
            .with_pod(
                PodInfo::new("web-1".to_string(), "blog".to_string())
                    .with_label("app", "web")
                    .on_node("node-2"),
            );

        let locations = locate_pods(&cluster, &web_selector()).await.unwrap();
        assert_eq!(locations.nodes_by_pod.len(), 1);
        assert_eq!(
            locations.nodes_by_pod.get("web-1").map(String::as_str),
            Some("node-2")
        );
    }

    #[tokio::test]
    async fn test_locate_propagates_list_failure() {
        let cluster = FakeCluster::new().failing_on(FakeCall::ListPods);
        let err = locate_pods(&cluster, &web_selector()).await.unwrap_err();
        assert!(matches!(err, TopologyError::Cluster(_)));
    }
}
