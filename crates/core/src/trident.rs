// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed names for the Trident control plane and the Delve launcher
//! injected into it. Nothing here is configurable; the tool debugs one
//! well-known deployment.

/// Deployment that hosts the Trident controller.
pub const DEPLOYMENT_NAME: &str = "trident-controller";

/// Container inside that deployment running the controller binary.
pub const TARGET_CONTAINER: &str = "trident-main";

/// Namespace the deployment lives in, regardless of the kubeconfig default.
pub const NAMESPACE: &str = "trident";

/// Label selector matching the controller pod.
pub const POD_SELECTOR: &str = "app=controller.csi.trident.netapp.io";

/// Registry host debug images are pushed to.
pub const REGISTRY_HOST: &str = "docker.repo.eng.netapp.com";

/// Name and tag of the debug image.
pub const DEBUG_IMAGE: &str = "trident-debug";
pub const DEBUG_IMAGE_TAG: &str = "latest";

/// Path of the Delve binary inside the debug image.
pub const DEBUGGER_PATH: &str = "/dlv";

/// Port the headless Delve server listens on.
pub const DEBUGGER_PORT: i32 = 40000;

/// Separates the launcher's own arguments from the wrapped entrypoint.
pub const ARG_SEPARATOR: &str = "--";

/// Arguments that start Delve as a headless multi-client server and hand
/// it the original entrypoint via `exec`.
pub fn debugger_args() -> Vec<String> {
    vec![
        format!("--listen=:{}", DEBUGGER_PORT),
        "--headless=true".to_string(),
        "--continue".to_string(),
        "--api-version=2".to_string(),
        "--accept-multiclient".to_string(),
        "exec".to_string(),
    ]
}
