use thiserror::Error;

/// Errors that abort a topology scan
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("There are 0 nodes in the cluster")]
    NoNodes,

    #[error("Label '{label}' doesn't exist on node {node}")]
    MissingZoneLabel { node: String, label: String },

    /// Any failed list or get against the cluster API
    #[error(transparent)]
    Cluster(#[from] anyhow::Error),
}
