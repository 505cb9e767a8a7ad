// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local build-file staging around the debug image build.
//!
//! The tool runs from a debug kit directory sitting inside the product
//! source tree. The kit carries debug variants of the tree's `Makefile`
//! and `Dockerfile`; before building we back the originals up into a
//! staging directory and install the debug variants over them, and after
//! the session we put the originals back. The staging directory also
//! receives the deployment snapshot, so everything needed to recover by
//! hand lives in one place.

use std::path::{Path, PathBuf};

use thiserror::Error;

use tdb_core::BuildCoordinates;

use crate::exit_error::ExitError;

/// Directory under the debug kit holding backups and the spec snapshot.
pub(crate) const STAGING_DIR: &str = "backup";

const BUILD_FILES: [&str; 2] = ["Makefile", "Dockerfile"];

#[derive(Debug, Error)]
pub(crate) enum StageError {
    #[error("debug kit at {0} has no parent directory to build in")]
    NoParent(PathBuf),
    #[error("cannot create staging directory {path}: {source}")]
    Staging {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot back up {name}: {source}")]
    Backup {
        name: &'static str,
        source: std::io::Error,
    },
    #[error("cannot install debug {name}: {source}")]
    Install {
        name: &'static str,
        source: std::io::Error,
    },
    #[error("cannot restore {name}: {source}")]
    Restore {
        name: &'static str,
        source: std::io::Error,
    },
}

/// Staged build files, ready to be restored when the session ends.
#[derive(Debug)]
pub(crate) struct Staging {
    kit_dir: PathBuf,
    parent_dir: PathBuf,
    staging_dir: PathBuf,
}

impl Staging {
    /// Back up the parent tree's build files, then install the kit's
    /// debug variants over them. All backups land before any install so
    /// a half-failed prepare leaves the parent tree untouched.
    pub(crate) async fn prepare(kit_dir: &Path) -> Result<Self, StageError> {
        let parent_dir = match kit_dir.parent() {
            Some(parent) => parent.to_path_buf(),
            None => return Err(StageError::NoParent(kit_dir.to_path_buf())),
        };
        let staging_dir = kit_dir.join(STAGING_DIR);
        tokio::fs::create_dir_all(&staging_dir)
            .await
            .map_err(|source| StageError::Staging { path: staging_dir.clone(), source })?;

        for name in BUILD_FILES {
            tokio::fs::copy(parent_dir.join(name), staging_dir.join(name))
                .await
                .map_err(|source| StageError::Backup { name, source })?;
        }
        for name in BUILD_FILES {
            tokio::fs::copy(kit_dir.join(name), parent_dir.join(name))
                .await
                .map_err(|source| StageError::Install { name, source })?;
        }

        tracing::info!(staging = %staging_dir.display(), "build files staged");
        Ok(Self { kit_dir: kit_dir.to_path_buf(), parent_dir, staging_dir })
    }

    /// Where backups and the deployment snapshot live.
    pub(crate) fn dir(&self) -> &Path {
        &self.staging_dir
    }

    /// The product source tree the debug image is built in.
    pub(crate) fn build_dir(&self) -> &Path {
        &self.parent_dir
    }

    /// Put the backed-up build files back in the parent tree.
    pub(crate) async fn restore(&self) -> Result<(), StageError> {
        for name in BUILD_FILES {
            tokio::fs::copy(self.staging_dir.join(name), self.parent_dir.join(name))
                .await
                .map_err(|source| StageError::Restore { name, source })?;
        }
        tracing::info!(kit = %self.kit_dir.display(), "build files restored");
        Ok(())
    }
}

/// Build and push the debug image via the installed debug Makefile. The
/// child inherits our stdio so build output streams to the operator; a
/// failed build surfaces the child's own exit code.
pub(crate) async fn run_debug_build(
    build_dir: &Path,
    coords: &BuildCoordinates,
) -> anyhow::Result<()> {
    let mut cmd = tokio::process::Command::new("make");
    cmd.arg("debug")
        .arg(format!("ARTIFACTORY_NAMESPACE={}", coords.namespace()))
        .arg(format!("ARTIFACTORY_FOLDER={}", coords.folder().unwrap_or_default()))
        .arg("-C")
        .arg(build_dir);

    let status = cmd
        .status()
        .await
        .map_err(|e| anyhow::anyhow!("cannot run make in {}: {}", build_dir.display(), e))?;
    if !status.success() {
        let code = status.code().unwrap_or(1);
        return Err(ExitError::new(code, format!("debug image build failed ({status})")).into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
