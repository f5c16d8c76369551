#![forbid(unsafe_code)]

//! Grid layout engine for dashgrid: breakpoint resolution, a pure
//! placement/collision arena, the live grid controller, and render
//! planning.

pub mod breakpoint;
pub mod config;
pub mod controller;
pub mod engine;
pub mod resize;
pub mod view;

pub use breakpoint::{active_preset, scaling_mode, scaling_mode_changed, sort_screen_presets};
pub use config::BuilderConfig;
pub use controller::{
    CellHeight, DropError, GridController, GridEvent, GridOptions, GridState, SetupOutcome,
};
pub use engine::{GridEngine, GridNode, single_column_cell_height};
pub use resize::ResizeDebouncer;
pub use view::{GridView, RenderPlan, WidgetView, WidgetViewKind, plan_render};
