// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment overrides for session timing.

use std::time::Duration;

/// Interval between readiness polls. `TDB_POLL_MS`, default 500ms.
pub(crate) fn poll_interval() -> Duration {
    let ms = std::env::var("TDB_POLL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(500);
    Duration::from_millis(ms)
}

/// Delay before the first rollout poll, giving the apply time to start
/// replacing pods. `TDB_SETTLE_MS`, default 10s.
pub(crate) fn settle_delay() -> Duration {
    let ms = std::env::var("TDB_SETTLE_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(10_000);
    Duration::from_millis(ms)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
