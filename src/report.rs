//! Plain-text rendering of a scan

use std::io::{self, Write};

use kubeskew_topology::{ClusterReport, DeploymentTopology};

/// Write every namespace's results, in scan order
pub fn write_report<W: Write>(report: &ClusterReport, out: &mut W) -> io::Result<()> {
    for namespace in &report.namespaces {
        if namespace.deployments.is_empty() {
            writeln!(out, "No Deployments found in {} namespace", namespace.namespace)?;
            continue;
        }

        for deployment in &namespace.deployments {
            write_deployment(deployment, out)?;
        }
    }

    out.flush()
}

/// Example:
///
/// ```text
/// web:
///
/// eu-west-2a: 3
/// eu-west-2b: 7
/// eu-west-2c: 11
/// Skew: 8
/// ```
fn write_deployment<W: Write>(deployment: &DeploymentTopology, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}:\n", deployment.name)?;

    for pod in &deployment.unscheduled_pods {
        writeln!(out, "Pod {} isn't attached to a node", pod)?;
    }

    for (zone, count) in deployment.zone_counts.iter() {
        writeln!(out, "{}: {}", zone, count)?;
    }

    writeln!(out, "Skew: {}\n", deployment.skew)
}
