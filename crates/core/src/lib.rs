// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tdb-core: pure data model for the Trident debug (tdb) CLI tool

pub mod coords;
pub mod patch;
pub mod trident;

pub use coords::BuildCoordinates;
pub use patch::{apply_debug_patch, PatchError};
