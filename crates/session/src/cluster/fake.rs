// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recorded in-memory cluster for session tests.
//!
//! Serves deployments and pods from maps, counts every call, and lets
//! tests script readiness (where a resource only reports healthy after N
//! reads) and failures (where the Nth call of an operation errors).

use super::{ClusterApi, ClusterError};
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentStatus};
use k8s_openapi::api::core::v1::{
    ContainerState, ContainerStateRunning, ContainerStatus, Pod, PodStatus,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

struct FakeClusterState {
    deployments: BTreeMap<String, Deployment>,
    pods: BTreeMap<String, Pod>,
    deployment_gets: usize,
    pod_gets: usize,
    replace_attempts: usize,
    replaces: Vec<Deployment>,
    // Resources report healthy once their get counter reaches these.
    rollout_ready_after: usize,
    pod_running_after: usize,
    // 1-based call numbers that fail with a scripted error.
    fail_deployment_gets: Vec<usize>,
    fail_pod_gets: Vec<usize>,
    fail_replaces: Vec<usize>,
    fail_next_list: bool,
}

#[derive(Clone)]
pub(crate) struct FakeCluster {
    inner: Arc<Mutex<FakeClusterState>>,
}

impl FakeCluster {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeClusterState {
                deployments: BTreeMap::new(),
                pods: BTreeMap::new(),
                deployment_gets: 0,
                pod_gets: 0,
                replace_attempts: 0,
                replaces: Vec::new(),
                rollout_ready_after: 0,
                pod_running_after: 0,
                fail_deployment_gets: Vec::new(),
                fail_pod_gets: Vec::new(),
                fail_replaces: Vec::new(),
                fail_next_list: false,
            })),
        }
    }

    pub(crate) fn insert_deployment(&self, mut deployment: Deployment) {
        if deployment.metadata.resource_version.is_none() {
            deployment.metadata.resource_version = Some("1".to_string());
        }
        let name = deployment.metadata.name.clone().unwrap_or_default();
        self.inner.lock().deployments.insert(name, deployment);
    }

    pub(crate) fn insert_pod(&self, pod: Pod) {
        let name = pod.metadata.name.clone().unwrap_or_default();
        self.inner.lock().pods.insert(name, pod);
    }

    /// Deployment reports all replicas ready once `gets` reads happened.
    pub(crate) fn set_rollout_ready_after(&self, gets: usize) {
        self.inner.lock().rollout_ready_after = gets;
    }

    /// Pod reports its container running once `gets` reads happened.
    pub(crate) fn set_pod_running_after(&self, gets: usize) {
        self.inner.lock().pod_running_after = gets;
    }

    pub(crate) fn fail_deployment_get_call(&self, call: usize) {
        self.inner.lock().fail_deployment_gets.push(call);
    }

    pub(crate) fn fail_pod_get_call(&self, call: usize) {
        self.inner.lock().fail_pod_gets.push(call);
    }

    pub(crate) fn fail_replace_call(&self, call: usize) {
        self.inner.lock().fail_replaces.push(call);
    }

    pub(crate) fn fail_next_list(&self) {
        self.inner.lock().fail_next_list = true;
    }

    /// Successful replace payloads, in call order.
    pub(crate) fn replaces(&self) -> Vec<Deployment> {
        self.inner.lock().replaces.clone()
    }

    /// Replace calls attempted, including scripted failures.
    pub(crate) fn replace_attempts(&self) -> usize {
        self.inner.lock().replace_attempts
    }

    pub(crate) fn deployment_gets(&self) -> usize {
        self.inner.lock().deployment_gets
    }

    pub(crate) fn pod_gets(&self) -> usize {
        self.inner.lock().pod_gets
    }

    pub(crate) fn stored_deployment(&self, name: &str) -> Option<Deployment> {
        self.inner.lock().deployments.get(name).cloned()
    }
}

fn scripted_error() -> ClusterError {
    ClusterError::Api(kube::Error::Api(kube::core::ErrorResponse {
        status: "Failure".to_string(),
        message: "scripted failure".to_string(),
        reason: "ServiceUnavailable".to_string(),
        code: 503,
    }))
}

fn not_found(name: &str) -> ClusterError {
    ClusterError::Api(kube::Error::Api(kube::core::ErrorResponse {
        status: "Failure".to_string(),
        message: format!("{} not found", name),
        reason: "NotFound".to_string(),
        code: 404,
    }))
}

fn matches_selector(pod: &Pod, selector: &str) -> bool {
    let Some((key, value)) = selector.split_once('=') else { return false };
    pod.metadata
        .labels
        .as_ref()
        .and_then(|labels| labels.get(key))
        .is_some_and(|v| v == value)
}

fn running_status() -> PodStatus {
    PodStatus {
        container_statuses: Some(vec![ContainerStatus {
            name: "trident-main".to_string(),
            state: Some(ContainerState {
                running: Some(ContainerStateRunning::default()),
                ..Default::default()
            }),
            ..Default::default()
        }]),
        ..Default::default()
    }
}

#[async_trait]
impl ClusterApi for FakeCluster {
    async fn get_deployment(&self, name: &str) -> Result<Deployment, ClusterError> {
        let mut state = self.inner.lock();
        state.deployment_gets += 1;
        if state.fail_deployment_gets.contains(&state.deployment_gets) {
            return Err(scripted_error());
        }
        let ready = state.deployment_gets >= state.rollout_ready_after;
        let mut deployment =
            state.deployments.get(name).cloned().ok_or_else(|| not_found(name))?;
        deployment.status = Some(DeploymentStatus {
            replicas: Some(1),
            ready_replicas: Some(if ready { 1 } else { 0 }),
            ..Default::default()
        });
        Ok(deployment)
    }

    async fn replace_deployment(
        &self,
        name: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, ClusterError> {
        let mut state = self.inner.lock();
        state.replace_attempts += 1;
        if state.fail_replaces.contains(&state.replace_attempts) {
            return Err(scripted_error());
        }
        state.replaces.push(deployment.clone());

        // Like the API server: the stored object gets a fresh resourceVersion.
        let next_version = state
            .deployments
            .get(name)
            .and_then(|d| d.metadata.resource_version.as_deref())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0)
            + 1;
        let mut stored = deployment.clone();
        stored.metadata.resource_version = Some(next_version.to_string());
        state.deployments.insert(name.to_string(), stored.clone());
        Ok(stored)
    }

    async fn get_pod(&self, name: &str) -> Result<Pod, ClusterError> {
        let mut state = self.inner.lock();
        state.pod_gets += 1;
        if state.fail_pod_gets.contains(&state.pod_gets) {
            return Err(scripted_error());
        }
        let running = state.pod_gets >= state.pod_running_after;
        let mut pod = state.pods.get(name).cloned().ok_or_else(|| not_found(name))?;
        if running {
            pod.status = Some(running_status());
        }
        Ok(pod)
    }

    async fn list_pods(&self, selector: &str) -> Result<Vec<Pod>, ClusterError> {
        let mut state = self.inner.lock();
        if state.fail_next_list {
            state.fail_next_list = false;
            return Err(scripted_error());
        }
        Ok(state.pods.values().filter(|p| matches_selector(p, selector)).cloned().collect())
    }
}
