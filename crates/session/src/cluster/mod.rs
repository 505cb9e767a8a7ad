// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cluster access seam.
//!
//! The session controller talks to Kubernetes through [`ClusterApi`] so
//! tests can drive it against a recorded fake. The production
//! implementation is [`KubeCluster`], a kube client pinned to the Trident
//! namespace.

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ListParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::Path;
use thiserror::Error;

use tdb_core::trident;

/// Errors from cluster operations
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("failed to load kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),
    #[error("failed to infer cluster config: {0}")]
    Infer(#[from] kube::config::InferConfigError),
    #[error(transparent)]
    Api(#[from] kube::Error),
}

/// The cluster operations a debug session needs.
#[async_trait]
pub trait ClusterApi: Send + Sync + 'static {
    /// Fetch a deployment by name.
    async fn get_deployment(&self, name: &str) -> Result<Deployment, ClusterError>;

    /// Full replace of a deployment. The payload's resourceVersion carries
    /// the optimistic-concurrency check; a concurrent writer surfaces as a
    /// conflict error.
    async fn replace_deployment(
        &self,
        name: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, ClusterError>;

    /// Fetch a pod by name.
    async fn get_pod(&self, name: &str) -> Result<Pod, ClusterError>;

    /// List pods matching a label selector.
    async fn list_pods(&self, selector: &str) -> Result<Vec<Pod>, ClusterError>;
}

/// Production cluster client, bound to the Trident namespace.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
    namespace: String,
}

impl KubeCluster {
    /// Build a client from an explicit kubeconfig path, or from ambient
    /// discovery (env, default kubeconfig, in-cluster) when none is given.
    pub async fn connect(kubeconfig: Option<&Path>) -> Result<Self, ClusterError> {
        let config = match kubeconfig {
            Some(path) => {
                let kc = Kubeconfig::read_from(path)?;
                Config::from_custom_kubeconfig(kc, &KubeConfigOptions::default()).await?
            }
            None => Config::infer().await?,
        };
        let client = Client::try_from(config)?;
        Ok(Self { client, namespace: trident::NAMESPACE.to_string() })
    }

    /// Query the API server version. Fails fast when the cluster is
    /// unreachable or the credentials are bad, before anything mutates.
    pub async fn server_version(&self) -> Result<String, ClusterError> {
        let info = self.client.apiserver_version().await?;
        Ok(info.git_version)
    }

    fn deployments(&self) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    fn pods(&self) -> Api<Pod> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }
}

#[async_trait]
impl ClusterApi for KubeCluster {
    async fn get_deployment(&self, name: &str) -> Result<Deployment, ClusterError> {
        Ok(self.deployments().get(name).await?)
    }

    async fn replace_deployment(
        &self,
        name: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, ClusterError> {
        Ok(self.deployments().replace(name, &PostParams::default(), deployment).await?)
    }

    async fn get_pod(&self, name: &str) -> Result<Pod, ClusterError> {
        Ok(self.pods().get(name).await?)
    }

    async fn list_pods(&self, selector: &str) -> Result<Vec<Pod>, ClusterError> {
        let lp = ListParams::default().labels(selector);
        Ok(self.pods().list(&lp).await?.items)
    }
}

// Test support
#[cfg(test)]
mod fake;
#[cfg(test)]
pub(crate) use fake::FakeCluster;
