// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Restores the captured baseline after the session ends.

use k8s_openapi::api::apps::v1::Deployment;

use crate::cluster::ClusterApi;
use crate::error::SessionError;

/// Replace the live deployment's spec with the captured baseline.
///
/// The live object is refetched first so the write carries the current
/// resourceVersion; only the spec reverts.
pub(crate) async fn restore_baseline<C: ClusterApi>(
    cluster: &C,
    baseline: &Deployment,
) -> Result<(), SessionError> {
    let name = baseline.metadata.name.clone().unwrap_or_default();
    let mut live = cluster
        .get_deployment(&name)
        .await
        .map_err(|source| SessionError::Revert { name: name.clone(), source })?;
    live.spec = baseline.spec.clone();
    cluster
        .replace_deployment(&name, &live)
        .await
        .map_err(|source| SessionError::Revert { name, source })?;
    Ok(())
}

#[cfg(test)]
#[path = "revert_tests.rs"]
mod tests;
