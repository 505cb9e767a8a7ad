// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk snapshot of the captured deployment spec, written before any
//! mutation so an operator can restore by hand if the process dies
//! mid-session.

use k8s_openapi::api::apps::v1::Deployment;
use std::path::{Path, PathBuf};

use crate::error::SessionError;

/// Write the deployment's spec as YAML into `dir`, named after the
/// deployment. Returns the path written.
pub(crate) fn write_snapshot(dir: &Path, deployment: &Deployment) -> Result<PathBuf, SessionError> {
    let name =
        deployment.metadata.name.as_deref().unwrap_or(tdb_core::trident::DEPLOYMENT_NAME);
    let path = dir.join(format!("{}-deployment.yaml", name));
    let yaml = serde_yaml::to_string(&deployment.spec)
        .map_err(|source| SessionError::AuditEncode { source })?;
    std::fs::write(&path, yaml)
        .map_err(|source| SessionError::AuditWrite { path: path.clone(), source })?;
    Ok(path)
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod tests;
