use std::collections::{BTreeSet, HashMap};

use kubeskew_k8s::ClusterApi;
use kubeskew_types::NodeInfo;

use crate::error::TopologyError;

/// Node name to availability zone, built once per run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeZoneIndex {
    zones_by_node: HashMap<String, String>,
}

impl NodeZoneIndex {
    /// List every node and read its zone from `zone_label`
    pub async fn build(cluster: &dyn ClusterApi, zone_label: &str) -> Result<Self, TopologyError> {
        let nodes = cluster.list_nodes().await?;
        let index = Self::from_nodes(nodes, zone_label)?;

        tracing::debug!(
            nodes = index.len(),
            zones = index.zones().len(),
            "built node zone index"
        );

        Ok(index)
    }

    /// Build the index from already listed nodes
    ///
    /// Fails on an empty node list, or on the first node without a
    /// non-empty `zone_label`.
    pub fn from_nodes(nodes: Vec<NodeInfo>, zone_label: &str) -> Result<Self, TopologyError> {
        if nodes.is_empty() {
            return Err(TopologyError::NoNodes);
        }

        let mut zones_by_node = HashMap::with_capacity(nodes.len());
        for node in nodes {
            let Some(zone) = node.label(zone_label).map(str::to_string) else {
                return Err(TopologyError::MissingZoneLabel {
                    node: node.name,
                    label: zone_label.to_string(),
                });
            };
            zones_by_node.insert(node.name, zone);
        }

        Ok(Self { zones_by_node })
    }

    /// Zone of a node, `None` if the node was not present when the index was built
    pub fn zone_of(&self, node: &str) -> Option<&str> {
        self.zones_by_node.get(node).map(String::as_str)
    }

    /// Distinct zones, sorted
    pub fn zones(&self) -> BTreeSet<&str> {
        self.zones_by_node.values().map(String::as_str).collect()
    }

    /// Number of indexed nodes
    pub fn len(&self) -> usize {
        self.zones_by_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones_by_node.is_empty()
    }
}
