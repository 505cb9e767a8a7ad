// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The debug session itself: capture, patch, apply, wait, hold, revert.
//!
//! The controller runs as one task. The parent learns the session is
//! ready over a oneshot; every abort path flows through the shared
//! cancellation token, and the revert is issued from exactly one place so
//! it can never double-fire.

use std::path::PathBuf;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use tdb_core::{apply_debug_patch, trident, BuildCoordinates};

use crate::audit;
use crate::cluster::ClusterApi;
use crate::error::SessionError;
use crate::readiness::{self, Readiness, Timing};
use crate::revert;

/// Everything a session needs besides the cluster handle.
#[derive(Debug, Clone)]
pub struct SessionParams {
    pub coords: BuildCoordinates,
    /// Directory the pre-mutation spec snapshot is written into.
    pub audit_dir: PathBuf,
    pub timing: Timing,
}

/// A single debug session against the Trident controller deployment.
pub struct DebugSession<C: ClusterApi> {
    cluster: C,
    params: SessionParams,
    cancel: CancellationToken,
}

impl<C: ClusterApi> DebugSession<C> {
    pub fn new(cluster: C, params: SessionParams, cancel: CancellationToken) -> Self {
        Self { cluster, params, cancel }
    }

    /// Run the session to completion.
    ///
    /// `ready_tx` fires once the debug pod is running; dropping it without
    /// sending tells the parent the session failed early. On any error the
    /// shared token is cancelled so the parent's listeners shut down too.
    pub async fn run(self, ready_tx: oneshot::Sender<()>) -> Result<(), SessionError> {
        let result = self.drive(ready_tx).await;
        if let Err(ref err) = result {
            tracing::error!(error = %err, "debug session failed");
            self.cancel.cancel();
        }
        result
    }

    async fn drive(&self, ready_tx: oneshot::Sender<()>) -> Result<(), SessionError> {
        let name = trident::DEPLOYMENT_NAME;

        // The baseline has to exist before anything mutates; it is both
        // the revert payload and the on-disk recovery snapshot.
        let baseline = self
            .cluster
            .get_deployment(name)
            .await
            .map_err(|source| SessionError::Capture { name: name.to_string(), source })?;
        tracing::info!(%name, "captured deployment baseline");

        let patched = apply_debug_patch(&baseline, &self.params.coords)?;

        let snapshot = audit::write_snapshot(&self.params.audit_dir, &baseline)?;
        tracing::info!(path = %snapshot.display(), "baseline spec snapshot written");

        // Cancelled this early means nothing was mutated; just stop.
        if self.cancel.is_cancelled() {
            tracing::info!("session cancelled before apply, nothing to revert");
            return Ok(());
        }

        self.cluster
            .replace_deployment(name, &patched)
            .await
            .map_err(|source| SessionError::Apply { name: name.to_string(), source })?;
        tracing::info!(%name, image = %self.params.coords.debug_image(), "debug deployment applied");

        // From here on the cluster is mutated: exactly one revert runs,
        // whatever happened, and the first error keeps precedence.
        let session = self.hold_open(ready_tx).await;
        let restore = revert::restore_baseline(&self.cluster, &baseline).await;

        match (session, restore) {
            (Ok(()), Ok(())) => {
                tracing::info!(%name, "deployment restored");
                Ok(())
            }
            (Ok(()), Err(restore_err)) => Err(restore_err),
            (Err(session_err), Ok(())) => {
                tracing::info!(%name, "deployment restored");
                Err(session_err)
            }
            (Err(session_err), Err(restore_err)) => {
                tracing::error!(%name, error = %restore_err, "restore failed after session error");
                Err(session_err)
            }
        }
    }

    /// Wait for readiness, signal the parent, then hold until cancelled.
    async fn hold_open(&self, ready_tx: oneshot::Sender<()>) -> Result<(), SessionError> {
        let outcome = readiness::wait_until_ready(
            &self.cluster,
            trident::DEPLOYMENT_NAME,
            trident::POD_SELECTOR,
            self.params.timing,
            &self.cancel,
        )
        .await?;

        match outcome {
            Readiness::Cancelled => Ok(()),
            Readiness::Ready { pod } => {
                tracing::info!(%pod, port = trident::DEBUGGER_PORT, "debug session ready");
                // The parent may have given up in the meantime; a dropped
                // receiver is not an error.
                let _ = ready_tx.send(());
                self.cancel.cancelled().await;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
