//! In-memory cluster for tests

use std::collections::HashSet;

use anyhow::{Result, bail};
use async_trait::async_trait;

use kubeskew_types::{DeploymentInfo, LabelSet, NamespaceInfo, NodeInfo, PodInfo};

use crate::api::ClusterApi;

/// Calls that can be made to fail on a [`FakeCluster`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FakeCall {
    ListNodes,
    ListNamespaces,
    ListDeployments,
    GetDeployment,
    ListPods,
}

/// Cluster state held in memory, answering [`ClusterApi`] calls
#[derive(Clone, Debug, Default)]
pub struct FakeCluster {
    nodes: Vec<NodeInfo>,
    namespaces: Vec<NamespaceInfo>,
    deployments: Vec<DeploymentInfo>,
    pods: Vec<PodInfo>,
    failing: HashSet<FakeCall>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, node: NodeInfo) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_namespace(mut self, name: &str) -> Self {
        self.namespaces.push(NamespaceInfo::new(name.to_string()));
        self
    }

    pub fn with_deployment(mut self, deployment: DeploymentInfo) -> Self {
        self.deployments.push(deployment);
        self
    }

    pub fn with_pod(mut self, pod: PodInfo) -> Self {
        self.pods.push(pod);
        self
    }

    /// Make every invocation of `call` return an error
    pub fn failing_on(mut self, call: FakeCall) -> Self {
        self.failing.insert(call);
        self
    }

    fn check(&self, call: FakeCall) -> Result<()> {
        if self.failing.contains(&call) {
            bail!("injected failure for {:?}", call);
        }
        Ok(())
    }
}

#[async_trait]
impl ClusterApi for FakeCluster {
    async fn list_nodes(&self) -> Result<Vec<NodeInfo>> {
        self.check(FakeCall::ListNodes)?;
        Ok(self.nodes.clone())
    }

    async fn list_namespaces(&self) -> Result<Vec<NamespaceInfo>> {
        self.check(FakeCall::ListNamespaces)?;
        Ok(self.namespaces.clone())
    }

    async fn list_deployments(&self, namespace: &str) -> Result<Vec<DeploymentInfo>> {
        self.check(FakeCall::ListDeployments)?;
        Ok(self
            .deployments
            .iter()
            .filter(|d| d.namespace == namespace)
            .cloned()
            .collect())
    }

    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<DeploymentInfo> {
        self.check(FakeCall::GetDeployment)?;
        match self
            .deployments
            .iter()
            .find(|d| d.namespace == namespace && d.name == name)
        {
            Some(d) => Ok(d.clone()),
            None => bail!("deployments.apps \"{}\" not found", name),
        }
    }

    async fn list_pods(&self, selector: &LabelSet) -> Result<Vec<PodInfo>> {
        self.check(FakeCall::ListPods)?;
        Ok(self
            .pods
            .iter()
            .filter(|p| p.matches(selector))
            .cloned()
            .collect())
    }
}
