// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Readiness observation for the patched deployment.
//!
//! Two phases: wait for the rollout to report all replicas ready, then
//! resolve the debug pod by label (exactly one match) and wait for every
//! container in it to report running. Both phases poll at a fixed
//! interval and break off as soon as the session is cancelled. Transient
//! read errors are retried indefinitely; only pod resolution is fatal.

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::cluster::ClusterApi;
use crate::env;
use crate::error::SessionError;

/// Poll timing for readiness waits.
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub poll_interval: Duration,
    pub settle_delay: Duration,
}

impl Timing {
    /// Production timing, with env overrides for slow clusters and tests.
    pub fn from_env() -> Self {
        Self { poll_interval: env::poll_interval(), settle_delay: env::settle_delay() }
    }
}

/// How a readiness wait ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Readiness {
    /// Rollout finished and the named debug pod is running.
    Ready { pod: String },
    /// The session was cancelled mid-wait; nothing more to observe.
    Cancelled,
}

/// Wait until the deployment rollout completes and the debug pod runs.
pub(crate) async fn wait_until_ready<C: ClusterApi>(
    cluster: &C,
    deployment: &str,
    selector: &str,
    timing: Timing,
    cancel: &CancellationToken,
) -> Result<Readiness, SessionError> {
    // Give the apply a moment to start replacing pods before observing.
    tracing::debug!(delay_ms = timing.settle_delay.as_millis() as u64, "letting the rollout settle");
    if !sleep_unless_cancelled(timing.settle_delay, cancel).await {
        return Ok(Readiness::Cancelled);
    }

    loop {
        if cancel.is_cancelled() {
            return Ok(Readiness::Cancelled);
        }
        match cluster.get_deployment(deployment).await {
            Ok(dep) if rollout_complete(&dep) => break,
            Ok(dep) => {
                let (ready, total) = replica_counts(&dep);
                tracing::debug!(name = %deployment, ready, total, "waiting for rollout");
            }
            Err(e) => {
                tracing::warn!(name = %deployment, error = %e, "deployment read failed, retrying");
            }
        }
        if !sleep_unless_cancelled(timing.poll_interval, cancel).await {
            return Ok(Readiness::Cancelled);
        }
    }
    tracing::info!(name = %deployment, "rollout complete");

    // Resolve the debug pod once; zero or many matches is operator territory
    // (wrong namespace, a second rollout) and polling will not fix it.
    let pods = cluster
        .list_pods(selector)
        .await
        .map_err(|source| SessionError::PodSelect { selector: selector.to_string(), source })?;
    let pod_name = match pods.as_slice() {
        [] => return Err(SessionError::PodMissing { selector: selector.to_string() }),
        [only] => only.metadata.name.clone().unwrap_or_default(),
        many => {
            return Err(SessionError::PodConflict {
                selector: selector.to_string(),
                count: many.len(),
            })
        }
    };

    // Poll the pod by name, refetching each pass, until every container
    // status reports running.
    loop {
        if cancel.is_cancelled() {
            return Ok(Readiness::Cancelled);
        }
        match cluster.get_pod(&pod_name).await {
            Ok(pod) if containers_running(&pod) => break,
            Ok(_) => tracing::debug!(pod = %pod_name, "waiting for containers to start"),
            Err(e) => tracing::warn!(pod = %pod_name, error = %e, "pod read failed, retrying"),
        }
        if !sleep_unless_cancelled(timing.poll_interval, cancel).await {
            return Ok(Readiness::Cancelled);
        }
    }
    tracing::info!(pod = %pod_name, "debug pod is running");

    Ok(Readiness::Ready { pod: pod_name })
}

fn replica_counts(deployment: &Deployment) -> (i32, i32) {
    let status = deployment.status.as_ref();
    let ready = status.and_then(|s| s.ready_replicas).unwrap_or(0);
    let total = status.and_then(|s| s.replicas).unwrap_or(0);
    (ready, total)
}

/// Every declared replica reports ready. Absent counts read as zero.
fn rollout_complete(deployment: &Deployment) -> bool {
    let (ready, total) = replica_counts(deployment);
    ready == total
}

/// True only when the kubelet has reported at least one container status
/// and all of them are running. An empty list means "not reported yet",
/// never "ready".
fn containers_running(pod: &Pod) -> bool {
    let statuses = pod
        .status
        .as_ref()
        .and_then(|s| s.container_statuses.as_ref())
        .map(Vec::as_slice)
        .unwrap_or_default();
    !statuses.is_empty()
        && statuses.iter().all(|cs| cs.state.as_ref().is_some_and(|s| s.running.is_some()))
}

/// False when the token fired before the pause elapsed.
async fn sleep_unless_cancelled(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        () = cancel.cancelled() => false,
        () = tokio::time::sleep(duration) => true,
    }
}

#[cfg(test)]
#[path = "readiness_tests.rs"]
mod tests;
