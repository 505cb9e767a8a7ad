// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries a process exit code.
//!
//! Fallible steps return `ExitError` instead of calling
//! `std::process::exit()` directly, allowing `main()` to handle process
//! termination. The debug image build uses this to surface the child
//! process's own exit code as ours.

use std::fmt;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

/// Process exit status for a terminal error: a carried code when one was
/// attached, otherwise the generic failure code.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ExitError>().map(|e| e.code).unwrap_or(1)
}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
