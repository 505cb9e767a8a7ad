// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rewrites the controller deployment so the target container runs under
//! a headless Delve server instead of launching the controller directly.
//! The rewrite is pure: it returns a new deployment and never touches the
//! input, which later serves as the revert baseline.

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Capabilities, Container, ContainerPort, SecurityContext};
use thiserror::Error;

use crate::coords::BuildCoordinates;
use crate::trident;

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("deployment {0} has no pod template spec")]
    MissingPodSpec(String),
    #[error("deployment {deployment} has no container named {container}")]
    TargetContainerMissing { deployment: String, container: String },
}

/// Produces the debug variant of `original`.
///
/// Only the target container changes; every other container and every
/// non-container field of the spec carries over untouched.
pub fn apply_debug_patch(
    original: &Deployment,
    coords: &BuildCoordinates,
) -> Result<Deployment, PatchError> {
    let name = original.metadata.name.clone().unwrap_or_default();
    let mut patched = original.clone();

    let pod = patched
        .spec
        .as_mut()
        .and_then(|spec| spec.template.spec.as_mut())
        .ok_or_else(|| PatchError::MissingPodSpec(name.clone()))?;

    let container = pod
        .containers
        .iter_mut()
        .find(|c| c.name == trident::TARGET_CONTAINER)
        .ok_or_else(|| PatchError::TargetContainerMissing {
            deployment: name,
            container: trident::TARGET_CONTAINER.to_string(),
        })?;

    inject_debugger(container, coords);
    Ok(patched)
}

fn inject_debugger(container: &mut Container, coords: &BuildCoordinates) {
    // Launcher args, one separator, then the entrypoint Delve should exec.
    let mut args = trident::debugger_args();
    args.push(trident::ARG_SEPARATOR.to_string());
    args.extend(container.command.take().unwrap_or_default());
    args.extend(container.args.take().unwrap_or_default());

    container.image = Some(coords.debug_image());
    container.image_pull_policy = Some("Always".to_string());
    container.command = Some(vec![trident::DEBUGGER_PATH.to_string()]);
    container.args = Some(args);
    container.ports.get_or_insert_with(Vec::new).push(ContainerPort {
        container_port: trident::DEBUGGER_PORT,
        protocol: Some("TCP".to_string()),
        ..Default::default()
    });
    // Delve attaches via ptrace and needs a root-capable user.
    container.security_context = Some(SecurityContext {
        capabilities: Some(Capabilities {
            add: Some(vec!["SYS_PTRACE".to_string()]),
            ..Default::default()
        }),
        run_as_non_root: Some(false),
        ..Default::default()
    });
}

#[cfg(test)]
#[path = "patch_tests.rs"]
mod tests;
