#![forbid(unsafe_code)]

//! Registry mapping widget-type identifiers to manifests.
//!
//! # Invariants
//!
//! 1. Each type id maps to at most one manifest; re-registration replaces
//!    the previous manifest (last write wins).
//! 2. Lookup failure is a recoverable [`RegistryError`]: the rendering
//!    layer substitutes an error placeholder for the one widget, so a
//!    single unresolvable type never breaks the rest of the dashboard.

use std::collections::HashMap;
use std::fmt;

use ahash::RandomState;

use crate::manifest::WidgetManifest;

/// Explicit widget-type registry, constructed once and passed by reference.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    types: HashMap<String, Box<dyn WidgetManifest>, RandomState>,
}

impl WidgetRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a manifest under a type id, replacing any previous entry.
    ///
    /// Duplicate registration with a different manifest is treated as a
    /// configuration error by callers upstream; the registry itself does
    /// not police it.
    pub fn register(&mut self, type_id: impl Into<String>, manifest: Box<dyn WidgetManifest>) {
        self.types.insert(type_id.into(), manifest);
    }

    /// Look up a manifest by type id.
    pub fn get(&self, type_id: &str) -> Result<&dyn WidgetManifest, RegistryError> {
        self.types
            .get(type_id)
            .map(Box::as_ref)
            .ok_or_else(|| RegistryError::UnknownType {
                type_id: type_id.to_owned(),
            })
    }

    /// Whether a type id is registered.
    #[must_use]
    pub fn contains(&self, type_id: &str) -> bool {
        self.types.contains_key(type_id)
    }

    /// Registered type ids, unordered.
    pub fn type_ids(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Recoverable registry lookup errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No manifest registered under the requested type id.
    UnknownType { type_id: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType { type_id } => {
                write!(f, "no widget type registered under id {type_id:?}")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
