#![forbid(unsafe_code)]

//! Reference to one attribute of one asset.

use serde::{Deserialize, Serialize};

/// Points a widget's data binding at a single asset attribute.
///
/// Stored inside widget configs and passed to the asset-query boundary when
/// a widget refreshes its data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeRef {
    /// Asset identifier.
    pub id: String,
    /// Attribute name on that asset.
    pub name: String,
}

impl AttributeRef {
    /// Create a new reference.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
