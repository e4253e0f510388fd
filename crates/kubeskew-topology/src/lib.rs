//! Zone distribution and skew computation for kubeskew
//!
//! This crate maps nodes to availability zones, counts each deployment's
//! pods per zone and derives the topology skew from those counts.

mod error;
mod locate;
mod scan;
mod skew;
mod zones;

pub use error::TopologyError;
pub use locate::{PodLocations, locate_pods, match_labels, namespace_names};
pub use scan::{ClusterReport, DeploymentTopology, NamespaceReport, TopologyScanner};
pub use skew::{UNKNOWN_ZONE, ZoneCounts, calculate_skew};
pub use zones::NodeZoneIndex;
