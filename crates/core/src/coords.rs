// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::trident;

/// Where the debug image lives in the registry.
///
/// The folder segment is optional; an empty string collapses to none so
/// the image reference never contains a doubled slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCoordinates {
    namespace: String,
    folder: Option<String>,
}

impl BuildCoordinates {
    pub fn new(namespace: impl Into<String>, folder: Option<String>) -> Self {
        let folder = folder.filter(|f| !f.is_empty());
        BuildCoordinates { namespace: namespace.into(), folder }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    /// Full reference of the debug image for these coordinates.
    pub fn debug_image(&self) -> String {
        match &self.folder {
            Some(folder) => format!(
                "{}/{}/{}/{}:{}",
                trident::REGISTRY_HOST,
                self.namespace,
                folder,
                trident::DEBUG_IMAGE,
                trident::DEBUG_IMAGE_TAG
            ),
            None => format!(
                "{}/{}/{}:{}",
                trident::REGISTRY_HOST,
                self.namespace,
                trident::DEBUG_IMAGE,
                trident::DEBUG_IMAGE_TAG
            ),
        }
    }
}

#[cfg(test)]
#[path = "coords_tests.rs"]
mod tests;
