#![forbid(unsafe_code)]

//! Built-in widget types and their typed config schemas.
//!
//! Each widget type carries a concrete config struct instead of an untyped
//! blob, keyed by its type id through the registry. Unknown persisted keys
//! land in a flattened extension bag so configs round-trip losslessly
//! across schema versions; missing keys deserialize to the defaults below.
//! Content internals (how a chart draws) are not modeled here; content
//! handles only track their applied config.

use std::collections::BTreeMap;

use dashgrid_model::AttributeRef;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::manifest::{WidgetContent, WidgetContext, WidgetManifest, WidgetSettings};
use crate::registry::WidgetRegistry;

/// Aggregation window for time-series widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Year,
    Month,
    Week,
    #[default]
    Day,
    Hour,
    Minute,
    Second,
}

/// How a KPI delta is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaFormat {
    #[default]
    Absolute,
    Percentage,
}

/// One colored threshold on a gauge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub value: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KpiConfig {
    pub display_name: String,
    pub attribute_refs: Vec<AttributeRef>,
    pub period: Period,
    pub delta_format: DeltaFormat,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            display_name: "KPI".into(),
            attribute_refs: Vec::new(),
            period: Period::Day,
            delta_format: DeltaFormat::Absolute,
            extensions: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
    pub display_name: String,
    pub attribute_refs: Vec<AttributeRef>,
    pub period: Period,
    pub decimals: u32,
    pub delta_format: DeltaFormat,
    pub show_timestamp_controls: bool,
    pub show_legend: bool,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            display_name: "Line chart".into(),
            attribute_refs: Vec::new(),
            period: Period::Day,
            decimals: 2,
            delta_format: DeltaFormat::Absolute,
            show_timestamp_controls: false,
            show_legend: true,
            extensions: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GaugeConfig {
    pub display_name: String,
    pub attribute_refs: Vec<AttributeRef>,
    pub decimals: u32,
    pub min_value: f64,
    pub max_value: f64,
    pub thresholds: Vec<Threshold>,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            display_name: "Gauge".into(),
            attribute_refs: Vec::new(),
            decimals: 0,
            min_value: 0.0,
            max_value: 100.0,
            thresholds: Vec::new(),
            extensions: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageConfig {
    pub display_name: String,
    pub attribute_refs: Vec<AttributeRef>,
    pub image_path: String,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            display_name: "Image".into(),
            attribute_refs: Vec::new(),
            image_path: String::new(),
            extensions: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapConfig {
    pub display_name: String,
    pub attribute_refs: Vec<AttributeRef>,
    pub zoom: f64,
    pub center: Option<[f64; 2]>,
    pub show_labels: bool,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            display_name: "Map".into(),
            attribute_refs: Vec::new(),
            zoom: 5.0,
            center: None,
            show_labels: false,
            extensions: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributeInputConfig {
    pub display_name: String,
    pub attribute_refs: Vec<AttributeRef>,
    pub readonly: bool,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

impl Default for AttributeInputConfig {
    fn default() -> Self {
        Self {
            display_name: "Attribute".into(),
            attribute_refs: Vec::new(),
            readonly: false,
            extensions: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    pub display_name: String,
    pub attribute_refs: Vec<AttributeRef>,
    pub table_columns: Vec<String>,
    pub page_size: u32,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            display_name: "Table".into(),
            attribute_refs: Vec::new(),
            table_columns: Vec::new(),
            page_size: 10,
            extensions: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Content / settings handles
// ---------------------------------------------------------------------------

/// Content handle shared by the built-in types: tracks the applied config
/// so the host can re-render from it.
#[derive(Debug)]
pub struct BoundContent {
    type_id: &'static str,
    config: Value,
}

impl BoundContent {
    /// The widget type this content belongs to.
    #[must_use]
    pub fn type_id(&self) -> &str {
        self.type_id
    }
}

impl WidgetContent for BoundContent {
    fn apply_config(&mut self, config: &Value, _ctx: &WidgetContext) {
        self.config = config.clone();
    }

    fn config(&self) -> &Value {
        &self.config
    }
}

/// Settings handle shared by the built-in types: a field-editable config
/// object emitting a changed signal per effective edit.
#[derive(Debug)]
pub struct PanelSettings {
    config: Value,
}

impl WidgetSettings for PanelSettings {
    fn config(&self) -> &Value {
        &self.config
    }

    fn set_field(&mut self, key: &str, value: Value) -> Option<&Value> {
        if self.config.get(key) == Some(&value) {
            return None;
        }
        if !self.config.is_object() {
            self.config = Value::Object(serde_json::Map::new());
        }
        if let Value::Object(map) = &mut self.config {
            map.insert(key.to_owned(), value);
        }
        Some(&self.config)
    }
}

/// Serialize a config struct to its JSON object form.
///
/// Built-in configs always serialize cleanly; a failure falls back to an
/// empty object rather than panicking mid-render.
fn config_value<T: Serialize>(config: &T) -> Value {
    serde_json::to_value(config).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

macro_rules! builtin_manifest {
    (
        $(#[$meta:meta])*
        $name:ident {
            type_id: $type_id:literal,
            display_name: $display:literal,
            icon: $icon:literal,
            min_px: ($min_w:literal, $min_h:literal),
            span: ($span_w:literal, $span_h:literal),
            config: $cfg:ty,
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default)]
        pub struct $name;

        impl $name {
            /// Registry key for this widget type.
            pub const TYPE_ID: &'static str = $type_id;
        }

        impl WidgetManifest for $name {
            fn display_name(&self) -> &str {
                $display
            }

            fn display_icon(&self) -> &str {
                $icon
            }

            fn min_pixel_width(&self) -> u32 {
                $min_w
            }

            fn min_pixel_height(&self) -> u32 {
                $min_h
            }

            fn default_span(&self) -> (u32, u32) {
                ($span_w, $span_h)
            }

            fn default_config(&self) -> Value {
                config_value(&<$cfg>::default())
            }

            fn create_content(
                &self,
                config: &Value,
                _ctx: &WidgetContext,
            ) -> Box<dyn WidgetContent> {
                Box::new(BoundContent {
                    type_id: Self::TYPE_ID,
                    config: config.clone(),
                })
            }

            fn create_settings(&self, config: &Value) -> Box<dyn WidgetSettings> {
                Box::new(PanelSettings {
                    config: config.clone(),
                })
            }
        }
    };
}

builtin_manifest!(
    /// Single-value KPI card with optional delta.
    KpiManifest {
        type_id: "kpi",
        display_name: "KPI",
        icon: "label",
        min_px: (140, 100),
        span: (2, 2),
        config: KpiConfig,
    }
);

builtin_manifest!(
    /// Time-series line chart over one or more attributes.
    ChartManifest {
        type_id: "linechart",
        display_name: "Line chart",
        icon: "chart-line",
        min_px: (300, 150),
        span: (4, 2),
        config: ChartConfig,
    }
);

builtin_manifest!(
    /// Radial gauge for a single numeric attribute.
    GaugeManifest {
        type_id: "gauge",
        display_name: "Gauge",
        icon: "gauge",
        min_px: (150, 150),
        span: (2, 2),
        config: GaugeConfig,
    }
);

builtin_manifest!(
    /// Static or attribute-bound image.
    ImageManifest {
        type_id: "image",
        display_name: "Image",
        icon: "file-image-marker",
        min_px: (100, 100),
        span: (2, 2),
        config: ImageConfig,
    }
);

builtin_manifest!(
    /// Geographic map of asset positions.
    MapManifest {
        type_id: "map",
        display_name: "Map",
        icon: "map",
        min_px: (300, 200),
        span: (4, 3),
        config: MapConfig,
    }
);

builtin_manifest!(
    /// Read/write input bound to one attribute.
    AttributeInputManifest {
        type_id: "attributeinput",
        display_name: "Attribute",
        icon: "form-textbox",
        min_px: (150, 80),
        span: (2, 1),
        config: AttributeInputConfig,
    }
);

builtin_manifest!(
    /// Tabular listing of attribute values.
    TableManifest {
        type_id: "table",
        display_name: "Table",
        icon: "table",
        min_px: (300, 150),
        span: (4, 2),
        config: TableConfig,
    }
);

/// Register every built-in widget type.
pub fn register_builtin_widgets(registry: &mut WidgetRegistry) {
    registry.register(KpiManifest::TYPE_ID, Box::new(KpiManifest));
    registry.register(ChartManifest::TYPE_ID, Box::new(ChartManifest));
    registry.register(GaugeManifest::TYPE_ID, Box::new(GaugeManifest));
    registry.register(ImageManifest::TYPE_ID, Box::new(ImageManifest));
    registry.register(MapManifest::TYPE_ID, Box::new(MapManifest));
    registry.register(
        AttributeInputManifest::TYPE_ID,
        Box::new(AttributeInputManifest),
    );
    registry.register(TableManifest::TYPE_ID, Box::new(TableManifest));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::correct_config_spec;
    use serde_json::json;

    #[test]
    fn all_builtins_registered() {
        let mut reg = WidgetRegistry::new();
        register_builtin_widgets(&mut reg);
        for type_id in [
            "kpi",
            "linechart",
            "gauge",
            "image",
            "map",
            "attributeinput",
            "table",
        ] {
            assert!(reg.contains(type_id), "missing builtin {type_id}");
        }
        assert_eq!(reg.len(), 7);
    }

    #[test]
    fn default_configs_are_objects() {
        let mut reg = WidgetRegistry::new();
        register_builtin_widgets(&mut reg);
        for type_id in reg.type_ids() {
            let manifest = reg.get(type_id).unwrap();
            assert!(
                manifest.default_config().is_object(),
                "{type_id} default config must be an object"
            );
        }
    }

    #[test]
    fn chart_partial_config_backfills_defaults() {
        let repaired = correct_config_spec(
            &ChartManifest,
            &json!({"displayName": "Boiler temp", "decimals": 0}),
        );
        assert_eq!(repaired["displayName"], json!("Boiler temp"));
        assert_eq!(repaired["decimals"], json!(0));
        assert_eq!(repaired["showLegend"], json!(true));
        assert_eq!(repaired["period"], json!("day"));
    }

    #[test]
    fn typed_config_round_trips_unknown_keys() {
        let raw = json!({
            "displayName": "KPI",
            "futureOption": {"nested": true},
        });
        let config: KpiConfig = serde_json::from_value(raw).unwrap();
        assert_eq!(config.extensions["futureOption"], json!({"nested": true}));

        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back["futureOption"], json!({"nested": true}));
        assert_eq!(back["period"], json!("day"));
    }

    #[test]
    fn kpi_default_config_shape() {
        let value = KpiManifest.default_config();
        assert_eq!(value["displayName"], json!("KPI"));
        assert_eq!(value["attributeRefs"], json!([]));
        assert_eq!(value["deltaFormat"], json!("absolute"));
    }

    #[test]
    fn content_tracks_applied_config() {
        let ctx = WidgetContext::viewing("master");
        let mut content = GaugeManifest.create_content(&GaugeManifest.default_config(), &ctx);
        let updated = json!({"displayName": "Pressure", "maxValue": 10.0});
        content.apply_config(&updated, &ctx);
        assert_eq!(content.config(), &updated);
    }

    #[test]
    fn settings_edit_emits_updated_config() {
        let mut settings = TableManifest.create_settings(&TableManifest.default_config());
        let updated = settings.set_field("pageSize", json!(25)).cloned();
        assert_eq!(updated.unwrap()["pageSize"], json!(25));
        assert!(settings.set_field("pageSize", json!(25)).is_none());
    }

    #[test]
    fn spans_are_at_least_one_cell() {
        let mut reg = WidgetRegistry::new();
        register_builtin_widgets(&mut reg);
        for type_id in reg.type_ids() {
            let (w, h) = reg.get(type_id).unwrap().default_span();
            assert!(w >= 1 && h >= 1);
        }
    }
}
