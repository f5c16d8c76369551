#![forbid(unsafe_code)]

//! The asset/attribute data boundary widgets fetch through.
//!
//! Widgets bind to asset attributes via [`AttributeRef`]s in their config;
//! on refresh the host turns those into an [`AssetQuery`] and hands the
//! result back to the widget content. A failed query leaves the widget's
//! previously fetched data intact; there is no partial overwrite.

use std::collections::BTreeMap;

use dashgrid_model::AttributeRef;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

/// A queried asset with the selected attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub asset_type: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

/// Selection of assets and attributes to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetQuery {
    /// Asset ids to fetch.
    pub ids: Vec<String>,
    /// Attribute names to select; empty selects all.
    #[serde(default)]
    pub attributes: Vec<String>,
}

impl AssetQuery {
    /// Build a query covering a widget's attribute references, deduplicated
    /// in first-seen order.
    #[must_use]
    pub fn for_attribute_refs(refs: &[AttributeRef]) -> Self {
        let mut ids = Vec::new();
        let mut attributes = Vec::new();
        for attr in refs {
            if !ids.contains(&attr.id) {
                ids.push(attr.id.clone());
            }
            if !attributes.contains(&attr.name) {
                attributes.push(attr.name.clone());
            }
        }
        Self { ids, attributes }
    }

    /// Whether the query selects nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// The consumed asset-query boundary.
pub trait AssetSource {
    /// Fetch the assets addressed by the query.
    fn query_assets(&self, query: &AssetQuery) -> Result<Vec<Asset>, StoreError>;
}

/// Fixture-backed source for tests and previews.
#[derive(Debug, Default)]
pub struct StaticAssetSource {
    assets: BTreeMap<String, Asset>,
}

impl StaticAssetSource {
    /// Source holding the given assets.
    #[must_use]
    pub fn new(assets: impl IntoIterator<Item = Asset>) -> Self {
        Self {
            assets: assets.into_iter().map(|a| (a.id.clone(), a)).collect(),
        }
    }
}

impl AssetSource for StaticAssetSource {
    fn query_assets(&self, query: &AssetQuery) -> Result<Vec<Asset>, StoreError> {
        Ok(query
            .ids
            .iter()
            .filter_map(|id| self.assets.get(id))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
