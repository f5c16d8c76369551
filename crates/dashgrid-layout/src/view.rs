#![forbid(unsafe_code)]

//! Render planning: from a template to per-widget pixel placements.
//!
//! [`plan_render`] is pure: it resolves the active preset, repairs every
//! widget config against its manifest (every pass, since schema upgrades
//! can land between a save and the next view), and classifies each widget
//! into a renderable state. Failures stay local to one widget: an unknown
//! type or an undersized placement yields a placeholder entry for that
//! widget only, never an aborted plan.

use dashgrid_core::{GridItemId, PxRect, WidgetId};
use dashgrid_model::{ScalingPreset, Template, clamp_to_bounds, to_pixel_rect};
use dashgrid_registry::{WidgetRegistry, correct_config_spec};
use serde_json::Value;

use crate::breakpoint::active_preset;
use crate::controller::{CellHeight, GridOptions};

/// The whole-grid state of a render plan.
#[derive(Debug, Clone, PartialEq)]
pub enum GridView {
    /// The active preset blocks this device: render a full-width "device
    /// not supported" message instead of the grid. A deliberate state, not
    /// an error.
    Blocked,
    /// The grid renders with these options.
    Active(GridOptions),
}

/// One widget's renderable state.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetViewKind {
    /// Renderable content with its repaired config.
    Content { rect: PxRect, config: Value },
    /// Placed area is below the widget's minimum pixel dimensions; show an
    /// inline "too small" message in its area only.
    TooSmall { rect: PxRect },
    /// The widget references an unregistered type; show an error
    /// placeholder without affecting sibling widgets.
    ErrorPlaceholder { widget_type_id: String },
}

/// A planned widget entry.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub widget_id: WidgetId,
    pub grid_item_id: GridItemId,
    pub display_name: String,
    pub kind: WidgetViewKind,
}

/// A full render plan for one template at one viewport width.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub grid: GridView,
    pub entries: Vec<WidgetView>,
}

impl RenderPlan {
    /// Whether the grid renders at all.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        matches!(self.grid, GridView::Blocked)
    }
}

/// Plan the render of a template at the given viewport width.
#[must_use]
pub fn plan_render(
    template: &Template,
    registry: &WidgetRegistry,
    viewport_width: u32,
    edit_mode: bool,
) -> RenderPlan {
    let preset = active_preset(viewport_width, &template.screen_presets);
    if preset
        .as_ref()
        .is_some_and(|p| p.scaling_preset == ScalingPreset::BlockDevice)
    {
        return RenderPlan {
            grid: GridView::Blocked,
            entries: Vec::new(),
        };
    }

    let options = GridOptions::compute(template, preset.as_ref(), edit_mode, viewport_width);
    let entries = if options.one_column_mode {
        plan_wrapped(template, registry, &options)
    } else {
        plan_grid(template, registry, &options)
    };
    RenderPlan {
        grid: GridView::Active(options),
        entries,
    }
}

fn plan_grid(
    template: &Template,
    registry: &WidgetRegistry,
    options: &GridOptions,
) -> Vec<WidgetView> {
    let cell_w = options.cell_width;
    let cell_h = match options.cell_height {
        CellHeight::Fixed(h) => h,
        CellHeight::Auto => cell_w,
    };
    template
        .widgets
        .iter()
        .map(|widget| {
            let clamped = clamp_to_bounds(&widget.grid_item, options.columns);
            let rect = to_pixel_rect(&clamped, cell_w, cell_h);
            classify(registry, widget, rect)
        })
        .collect()
}

fn plan_wrapped(
    template: &Template,
    registry: &WidgetRegistry,
    options: &GridOptions,
) -> Vec<WidgetView> {
    let row_h = match options.cell_height {
        CellHeight::Fixed(h) => h,
        CellHeight::Auto => options.cell_width,
    };
    let full_width = options.cell_width * f64::from(options.columns);

    // Stack by row, then column, preserving declaration order for ties.
    let mut ordered: Vec<&dashgrid_model::Widget> = template.widgets.iter().collect();
    ordered.sort_by_key(|w| (w.grid_item.y, w.grid_item.x));

    ordered
        .into_iter()
        .enumerate()
        .map(|(row, widget)| {
            let rect = PxRect::new(0.0, row_h * row as f64, full_width, row_h);
            classify(registry, widget, rect)
        })
        .collect()
}

fn classify(
    registry: &WidgetRegistry,
    widget: &dashgrid_model::Widget,
    rect: PxRect,
) -> WidgetView {
    let kind = match registry.get(&widget.widget_type_id) {
        Err(err) => {
            tracing::warn!(
                target: "dashgrid::view",
                widget = %widget.id,
                "rendering error placeholder: {err}"
            );
            WidgetViewKind::ErrorPlaceholder {
                widget_type_id: widget.widget_type_id.clone(),
            }
        }
        Ok(manifest) => {
            let config = correct_config_spec(manifest, &widget.widget_config);
            let min_w = widget
                .grid_item
                .min_pixel_w
                .unwrap_or_else(|| manifest.min_pixel_width());
            let min_h = widget
                .grid_item
                .min_pixel_h
                .unwrap_or_else(|| manifest.min_pixel_height());
            if rect.size().meets_minimum(f64::from(min_w), f64::from(min_h)) {
                WidgetViewKind::Content { rect, config }
            } else {
                WidgetViewKind::TooSmall { rect }
            }
        }
    };
    WidgetView {
        widget_id: widget.id.clone(),
        grid_item_id: widget.grid_item.id.clone(),
        display_name: widget.display_name.clone(),
        kind,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
