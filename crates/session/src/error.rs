// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

use crate::cluster::ClusterError;
use tdb_core::PatchError;

/// Errors from a debug session.
///
/// Messages name the object and the operation that failed so the operator
/// knows what to check and, after a failed restore, what to put back by
/// hand from the on-disk snapshot.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read deployment {name}: {source}")]
    Capture {
        name: String,
        #[source]
        source: ClusterError,
    },
    #[error(transparent)]
    Patch(#[from] PatchError),
    #[error("failed to write deployment snapshot {path}: {source}")]
    AuditWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode deployment snapshot: {source}")]
    AuditEncode {
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to apply debug deployment {name}: {source}")]
    Apply {
        name: String,
        #[source]
        source: ClusterError,
    },
    #[error("no pods match label {selector}")]
    PodMissing { selector: String },
    #[error("{count} pods match label {selector}, expected exactly one")]
    PodConflict { selector: String, count: usize },
    #[error("failed to list pods for label {selector}: {source}")]
    PodSelect {
        selector: String,
        #[source]
        source: ClusterError,
    },
    #[error("failed to restore deployment {name}: {source}")]
    Revert {
        name: String,
        #[source]
        source: ClusterError,
    },
}
