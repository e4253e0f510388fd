//! Kubernetes client for kubeskew

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Namespace, Node, Pod};
use kube::Api;
use kube::api::ListParams;
use kube::config::{KubeConfigOptions, Kubeconfig};

use kubeskew_types::{DeploymentInfo, LabelSet, NamespaceInfo, NodeInfo, PodInfo};

use crate::api::ClusterApi;
use crate::selector::label_selector;

/// Kubernetes client wrapper
///
/// Holds one `kube::Client`, built once from the kubeconfig and shared by
/// every call of the run.
#[derive(Clone)]
pub struct KubeClient {
    client: kube::Client,
    context: Option<String>,
}

impl KubeClient {
    /// Create a new KubeClient by loading the kubeconfig
    ///
    /// `path` overrides the default discovery (`$KUBECONFIG`, then
    /// `~/.kube/config`); `context` overrides the current context.
    pub async fn new(path: Option<&Path>, context: Option<&str>) -> Result<Self> {
        let kubeconfig = match path {
            Some(path) => Kubeconfig::read_from(path)
                .with_context(|| format!("Failed to read kubeconfig at {}", path.display()))?,
            None => {
                Kubeconfig::read().context("Failed to read kubeconfig. Is kubectl configured?")?
            }
        };

        let context = context
            .map(str::to_string)
            .or_else(|| kubeconfig.current_context.clone());

        let config = kube::Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: context.clone(),
                ..Default::default()
            },
        )
        .await
        .context(format!(
            "Failed to create config for context: {}",
            context.as_deref().unwrap_or("<current>")
        ))?;

        let client = kube::Client::try_from(config).context(format!(
            "Failed to create client for context: {}",
            context.as_deref().unwrap_or("<current>")
        ))?;

        tracing::debug!(context = ?context, "connected to cluster");

        Ok(Self { client, context })
    }

    /// Get the context name the client was built for
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Convert a k8s Node to NodeInfo
    fn node_to_info(node: Node) -> NodeInfo {
        let mut info = NodeInfo::new(node.metadata.name.unwrap_or_default());
        if let Some(labels) = node.metadata.labels {
            info.labels = labels;
        }
        info
    }

    /// Convert a k8s Deployment to DeploymentInfo
    fn deployment_to_info(deploy: Deployment, namespace: &str) -> DeploymentInfo {
        let name = deploy.metadata.name.unwrap_or_default();
        let mut info = DeploymentInfo::new(name, namespace.to_string());

        if let Some(spec) = deploy.spec {
            if let Some(selector) = spec.selector.match_labels {
                info.selector = selector;
            }
        }

        info
    }

    /// Convert a k8s Pod to PodInfo, normalizing an empty node name to `None`
    fn pod_to_info(pod: Pod) -> PodInfo {
        let name = pod.metadata.name.unwrap_or_default();
        let namespace = pod.metadata.namespace.unwrap_or_default();
        let mut info = PodInfo::new(name, namespace);

        if let Some(labels) = pod.metadata.labels {
            info.labels = labels;
        }

        info.node_name = pod
            .spec
            .and_then(|spec| spec.node_name)
            .filter(|node| !node.is_empty());

        info
    }
}

#[async_trait]
impl ClusterApi for KubeClient {
    /// Fetch all nodes from the cluster
    async fn list_nodes(&self) -> Result<Vec<NodeInfo>> {
        let nodes: Api<Node> = Api::all(self.client.clone());
        let list = nodes
            .list(&ListParams::default())
            .await
            .context("Failed to list nodes")?;

        Ok(list.items.into_iter().map(Self::node_to_info).collect())
    }

    /// Fetch all namespaces from the cluster
    async fn list_namespaces(&self) -> Result<Vec<NamespaceInfo>> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let list = namespaces
            .list(&ListParams::default())
            .await
            .context("Failed to list namespaces")?;

        Ok(list
            .items
            .into_iter()
            .map(|ns| NamespaceInfo::new(ns.metadata.name.unwrap_or_default()))
            .collect())
    }

    /// Fetch all deployments in a namespace
    async fn list_deployments(&self, namespace: &str) -> Result<Vec<DeploymentInfo>> {
        let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        let list = deployments
            .list(&ListParams::default())
            .await
            .context(format!("Failed to list deployments in {}", namespace))?;

        Ok(list
            .items
            .into_iter()
            .map(|d| Self::deployment_to_info(d, namespace))
            .collect())
    }

    /// Fetch a single deployment by name
    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<DeploymentInfo> {
        let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        let deploy = deployments.get(name).await.context(format!(
            "Failed to get deployment '{}' in namespace '{}'",
            name, namespace
        ))?;

        Ok(Self::deployment_to_info(deploy, namespace))
    }

    /// Fetch pods matching a selector, across all namespaces
    async fn list_pods(&self, selector: &LabelSet) -> Result<Vec<PodInfo>> {
        let pods: Api<Pod> = Api::all(self.client.clone());
        let label_selector = label_selector(selector);

        let list = pods
            .list(&ListParams::default().labels(&label_selector))
            .await
            .context(format!(
                "Failed to list pods for selector '{}'",
                label_selector
            ))?;

        Ok(list.items.into_iter().map(Self::pod_to_info).collect())
    }
}
