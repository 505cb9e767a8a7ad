// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tdb-session: drives a debug session against the cluster. Capture the
//! baseline, patch in the debugger, apply, wait for readiness, hold the
//! session open, revert.

mod audit;
pub mod cluster;
pub mod controller;
mod env;
pub mod error;
pub mod readiness;
mod revert;

pub use cluster::{ClusterApi, ClusterError, KubeCluster};
pub use controller::{DebugSession, SessionParams};
pub use error::SessionError;
pub use readiness::Timing;
