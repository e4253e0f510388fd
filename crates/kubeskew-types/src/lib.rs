//! Shared types for kubeskew
//!
//! This crate contains the cluster objects passed between the Kubernetes
//! client, the topology core and the CLI.

use std::collections::BTreeMap;

/// Well-known node label carrying the availability zone
pub const ZONE_LABEL: &str = "topology.kubernetes.io/zone";

/// Exact-match label selector (`matchLabels`), keys kept sorted
pub type LabelSet = BTreeMap<String, String>;

// ============================================================================
// Kubernetes Resource Types
// ============================================================================

/// Node information
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeInfo {
    pub name: String,
    pub labels: LabelSet,
}

impl NodeInfo {
    pub fn new(name: String) -> Self {
        Self {
            name,
            labels: LabelSet::new(),
        }
    }

    /// Attach a label (builder style, mostly used by tests and fakes)
    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.to_string(), value.to_string());
        self
    }

    /// Look up a label value; empty values count as absent
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Namespace information
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceInfo {
    pub name: String,
}

impl NamespaceInfo {
    pub fn new(name: String) -> Self {
        Self { name }
    }
}

/// Deployment information
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentInfo {
    pub name: String,
    pub namespace: String,
    pub selector: LabelSet,
}

impl DeploymentInfo {
    pub fn new(name: String, namespace: String) -> Self {
        Self {
            name,
            namespace,
            selector: LabelSet::new(),
        }
    }

    pub fn with_selector(mut self, key: &str, value: &str) -> Self {
        self.selector.insert(key.to_string(), value.to_string());
        self
    }
}

/// Pod information
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PodInfo {
    pub name: String,
    pub namespace: String,
    pub labels: LabelSet,
    /// Node the pod is bound to, `None` while unscheduled
    pub node_name: Option<String>,
}

impl PodInfo {
    pub fn new(name: String, namespace: String) -> Self {
        Self {
            name,
            namespace,
            labels: LabelSet::new(),
            node_name: None,
        }
    }

    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.to_string(), value.to_string());
        self
    }

    pub fn on_node(mut self, node: &str) -> Self {
        self.node_name = Some(node.to_string());
        self
    }

    /// Check whether every selector pair is present on the pod
    pub fn matches(&self, selector: &LabelSet) -> bool {
        selector
            .iter()
            .all(|(k, v)| self.labels.get(k).is_some_and(|actual| actual == v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_label_counts_as_missing() {
        let node = NodeInfo::new("node-a".to_string()).with_label(ZONE_LABEL, "");
        assert_eq!(node.label(ZONE_LABEL), None);

        let node = node.with_label(ZONE_LABEL, "eu-west-2a");
        assert_eq!(node.label(ZONE_LABEL), Some("eu-west-2a"));
    }

    #[test]
    fn test_pod_selector_matching() {
        let pod = PodInfo::new("web-1".to_string(), "default".to_string())
            .with_label("app", "web")
            .with_label("tier", "frontend");

        let mut selector = LabelSet::new();
        selector.insert("app".to_string(), "web".to_string());
        assert!(pod.matches(&selector));

        selector.insert("tier".to_string(), "backend".to_string());
        assert!(!pod.matches(&selector));

        // Empty selector matches everything
        assert!(pod.matches(&LabelSet::new()));
    }
}
