#![forbid(unsafe_code)]

//! Canonical dashboard/template schema and validation.
//!
//! This module defines the persisted shape of a dashboard: the record
//! itself, its template (columns, screen presets, refresh interval) and the
//! widgets placed on the grid. It focuses on:
//!
//! - Stable identifiers suitable for correlating live grid nodes to widgets.
//! - Canonical serialization that round-trips losslessly through save/load.
//! - Strict validation that rejects malformed templates before they reach
//!   the layout engine.

use std::collections::BTreeSet;
use std::fmt;

use dashgrid_core::{DashboardId, GridItemId, TemplateId, WidgetId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who may view or edit a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashboardAccess {
    /// Everyone in the realm, including unauthenticated viewers.
    Public,
    /// Every authenticated user in the realm.
    Shared,
    /// Only the owner.
    Private,
}

/// How often a viewed dashboard re-fetches widget data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefreshInterval {
    /// No automatic refresh.
    #[default]
    Off,
    OneMin,
    FiveMin,
    QuarterHour,
    OneHour,
}

impl RefreshInterval {
    /// Interval duration in milliseconds; `None` when off.
    #[must_use]
    pub fn as_millis(self) -> Option<u64> {
        match self {
            Self::Off => None,
            Self::OneMin => Some(60_000),
            Self::FiveMin => Some(300_000),
            Self::QuarterHour => Some(900_000),
            Self::OneHour => Some(3_600_000),
        }
    }
}

/// Layout behavior applied below a screen preset's breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScalingPreset {
    /// Leave the grid layout untouched.
    KeepLayout,
    /// Collapse the grid to a single static column.
    WrapToSingleColumn,
    /// Do not render the grid; show a "device not supported" state.
    BlockDevice,
    /// Navigate elsewhere instead of rendering.
    Redirect,
}

/// A viewport-width threshold and the scaling behavior below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenPreset {
    pub id: String,
    pub display_name: String,
    /// Viewport width threshold in pixels.
    pub breakpoint: u32,
    pub scaling_preset: ScalingPreset,
}

/// A widget's placement record on the grid.
///
/// `x`, `y` are zero-based cell coordinates; `w`, `h` are cell spans of at
/// least 1. Mutated exclusively by the layout engine in response to
/// drag/resize/drop; read by renderers through the coordinate model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridItem {
    /// Must equal the owning widget's coordinate-tracking key.
    pub id: GridItemId,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_pixel_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_pixel_h: Option<u32>,
}

impl GridItem {
    /// A 1x1 item at the origin with the given id.
    #[must_use]
    pub fn new(id: GridItemId) -> Self {
        Self {
            id,
            x: 0,
            y: 0,
            w: 1,
            h: 1,
            min_w: None,
            min_h: None,
            min_pixel_w: None,
            min_pixel_h: None,
        }
    }

    /// Builder-style placement.
    #[must_use]
    pub fn at(mut self, x: u32, y: u32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Builder-style span.
    #[must_use]
    pub fn spanning(mut self, w: u32, h: u32) -> Self {
        self.w = w;
        self.h = h;
        self
    }
}

/// One placed, configured visualization unit on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    /// Unique within the template; generated once at creation.
    pub id: WidgetId,
    pub display_name: String,
    /// Key into the widget registry.
    #[serde(alias = "widgetType")]
    pub widget_type_id: String,
    /// Shape owned by the widget type's manifest; repaired against the
    /// manifest defaults on every render pass.
    #[serde(default)]
    pub widget_config: Value,
    pub grid_item: GridItem,
}

/// The full layout+widget specification of one dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: TemplateId,
    /// Grid column count, at least 1.
    pub columns: u32,
    /// Upper bound on the rendered grid width in pixels.
    pub max_screen_width: u32,
    #[serde(default)]
    pub refresh_interval: RefreshInterval,
    #[serde(default)]
    pub screen_presets: Vec<ScreenPreset>,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

impl Template {
    /// Look up a widget by id.
    #[must_use]
    pub fn widget(&self, id: &WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| &w.id == id)
    }

    /// Mutable widget lookup by id.
    pub fn widget_mut(&mut self, id: &WidgetId) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| &w.id == id)
    }

    /// Look up a widget by its grid item's coordinate-tracking key.
    #[must_use]
    pub fn widget_by_grid_item(&self, id: &GridItemId) -> Option<&Widget> {
        self.widgets.iter().find(|w| &w.grid_item.id == id)
    }

    /// Mutable lookup by grid item id.
    pub fn widget_by_grid_item_mut(&mut self, id: &GridItemId) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| &w.grid_item.id == id)
    }

    /// Remove a widget by id; returns the removed record.
    pub fn remove_widget(&mut self, id: &WidgetId) -> Option<Widget> {
        let pos = self.widgets.iter().position(|w| &w.id == id)?;
        Some(self.widgets.remove(pos))
    }

    /// Validate structural invariants of the template.
    ///
    /// Checks column count, widget spans, id uniqueness, and that the
    /// breakpoint staircase is strictly increasing once sorted. Duplicate
    /// breakpoints are rejected because active-preset resolution would be
    /// input-order dependent.
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.columns < 1 {
            return Err(TemplateError::InvalidColumnCount {
                columns: self.columns,
            });
        }

        let mut widget_ids = BTreeSet::new();
        let mut grid_item_ids = BTreeSet::new();
        for widget in &self.widgets {
            if !widget_ids.insert(widget.id.clone()) {
                return Err(TemplateError::DuplicateWidgetId {
                    widget_id: widget.id.clone(),
                });
            }
            if !grid_item_ids.insert(widget.grid_item.id.clone()) {
                return Err(TemplateError::DuplicateGridItemId {
                    grid_item_id: widget.grid_item.id.clone(),
                });
            }
            if widget.grid_item.w < 1 || widget.grid_item.h < 1 {
                return Err(TemplateError::ZeroSpan {
                    grid_item_id: widget.grid_item.id.clone(),
                    w: widget.grid_item.w,
                    h: widget.grid_item.h,
                });
            }
        }

        let mut breakpoints: Vec<u32> = self.screen_presets.iter().map(|p| p.breakpoint).collect();
        breakpoints.sort_unstable();
        for pair in breakpoints.windows(2) {
            if pair[0] == pair[1] {
                return Err(TemplateError::DuplicateBreakpoint {
                    breakpoint: pair[0],
                });
            }
        }

        Ok(())
    }
}

/// Owned, persisted dashboard record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub id: DashboardId,
    pub realm: String,
    pub display_name: String,
    pub owner_id: String,
    pub view_access: DashboardAccess,
    pub edit_access: DashboardAccess,
    pub template: Template,
}

impl Dashboard {
    /// Validate the contained template.
    pub fn validate(&self) -> Result<(), TemplateError> {
        self.template.validate()
    }
}

/// Validation errors for template construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    InvalidColumnCount {
        columns: u32,
    },
    DuplicateWidgetId {
        widget_id: WidgetId,
    },
    DuplicateGridItemId {
        grid_item_id: GridItemId,
    },
    ZeroSpan {
        grid_item_id: GridItemId,
        w: u32,
        h: u32,
    },
    DuplicateBreakpoint {
        breakpoint: u32,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidColumnCount { columns } => {
                write!(f, "template column count {columns} is invalid (minimum 1)")
            }
            Self::DuplicateWidgetId { widget_id } => {
                write!(f, "duplicate widget id {}", widget_id.as_str())
            }
            Self::DuplicateGridItemId { grid_item_id } => {
                write!(f, "duplicate grid item id {}", grid_item_id.as_str())
            }
            Self::ZeroSpan { grid_item_id, w, h } => write!(
                f,
                "grid item {} has zero span {w}x{h} (both must be at least 1)",
                grid_item_id.as_str()
            ),
            Self::DuplicateBreakpoint { breakpoint } => {
                write!(f, "two screen presets share breakpoint {breakpoint}px")
            }
        }
    }
}

impl std::error::Error for TemplateError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn preset(id: &str, breakpoint: u32, scaling: ScalingPreset) -> ScreenPreset {
        ScreenPreset {
            id: id.into(),
            display_name: id.into(),
            breakpoint,
            scaling_preset: scaling,
        }
    }

    fn widget(id: &str, grid_id: &str) -> Widget {
        Widget {
            id: WidgetId::new(id),
            display_name: id.into(),
            widget_type_id: "kpi".into(),
            widget_config: Value::Null,
            grid_item: GridItem::new(GridItemId::new(grid_id)).spanning(2, 2),
        }
    }

    fn template() -> Template {
        Template {
            id: TemplateId::new("t1"),
            columns: 12,
            max_screen_width: 4000,
            refresh_interval: RefreshInterval::Off,
            screen_presets: vec![preset("mobile", 640, ScalingPreset::WrapToSingleColumn)],
            widgets: vec![widget("w1", "g1"), widget("w2", "g2")],
        }
    }

    #[test]
    fn valid_template_passes() {
        assert!(template().validate().is_ok());
    }

    #[test]
    fn zero_columns_rejected() {
        let mut t = template();
        t.columns = 0;
        assert_eq!(
            t.validate(),
            Err(TemplateError::InvalidColumnCount { columns: 0 })
        );
    }

    #[test]
    fn duplicate_widget_id_rejected() {
        let mut t = template();
        t.widgets.push(widget("w1", "g3"));
        assert!(matches!(
            t.validate(),
            Err(TemplateError::DuplicateWidgetId { .. })
        ));
    }

    #[test]
    fn duplicate_grid_item_id_rejected() {
        let mut t = template();
        t.widgets.push(widget("w3", "g1"));
        assert!(matches!(
            t.validate(),
            Err(TemplateError::DuplicateGridItemId { .. })
        ));
    }

    #[test]
    fn zero_span_rejected() {
        let mut t = template();
        t.widgets[0].grid_item.w = 0;
        assert!(matches!(t.validate(), Err(TemplateError::ZeroSpan { .. })));
    }

    #[test]
    fn duplicate_breakpoints_rejected() {
        let mut t = template();
        t.screen_presets
            .push(preset("other", 640, ScalingPreset::BlockDevice));
        assert_eq!(
            t.validate(),
            Err(TemplateError::DuplicateBreakpoint { breakpoint: 640 })
        );
    }

    #[test]
    fn widget_lookup_by_grid_item() {
        let t = template();
        let found = t.widget_by_grid_item(&GridItemId::new("g2")).unwrap();
        assert_eq!(found.id, WidgetId::new("w2"));
        assert!(t.widget_by_grid_item(&GridItemId::new("missing")).is_none());
    }

    #[test]
    fn remove_widget_by_id() {
        let mut t = template();
        let removed = t.remove_widget(&WidgetId::new("w1")).unwrap();
        assert_eq!(removed.id, WidgetId::new("w1"));
        assert_eq!(t.widgets.len(), 1);
        assert!(t.remove_widget(&WidgetId::new("w1")).is_none());
    }

    #[test]
    fn json_round_trip_is_lossless() {
        let t = template();
        let json = serde_json::to_string(&t).unwrap();
        let back: Template = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let t = template();
        let value = serde_json::to_value(&t).unwrap();
        assert!(value.get("maxScreenWidth").is_some());
        assert!(value.get("screenPresets").is_some());
        assert_eq!(value["refreshInterval"], json!("OFF"));
        assert_eq!(
            value["screenPresets"][0]["scalingPreset"],
            json!("WRAP_TO_SINGLE_COLUMN")
        );
        assert!(value["widgets"][0].get("widgetTypeId").is_some());
    }

    #[test]
    fn widget_type_alias_accepted() {
        let raw = json!({
            "id": "w9",
            "displayName": "legacy",
            "widgetType": "kpi",
            "gridItem": {"id": "g9", "x": 0, "y": 0, "w": 1, "h": 1}
        });
        let widget: Widget = serde_json::from_value(raw).unwrap();
        assert_eq!(widget.widget_type_id, "kpi");
        assert_eq!(widget.widget_config, Value::Null);
    }

    #[test]
    fn grid_item_omits_absent_minimums() {
        let item = GridItem::new(GridItemId::new("g1")).at(3, 2).spanning(2, 2);
        let value = serde_json::to_value(&item).unwrap();
        assert!(value.get("minW").is_none());
        assert!(value.get("minPixelW").is_none());
    }

    #[test]
    fn refresh_interval_millis() {
        assert_eq!(RefreshInterval::Off.as_millis(), None);
        assert_eq!(RefreshInterval::OneMin.as_millis(), Some(60_000));
        assert_eq!(RefreshInterval::OneHour.as_millis(), Some(3_600_000));
    }
}
