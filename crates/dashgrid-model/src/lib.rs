#![forbid(unsafe_code)]

//! Persisted dashboard state: schema types, validation, the grid coordinate
//! model, and template diffing.
//!
//! The JSON shape of [`Dashboard`] and [`Template`] IS the persisted-state
//! layout; it must round-trip losslessly through save/load. Everything here
//! is plain data; interaction and rendering live in `dashgrid-layout`.

pub mod attribute;
pub mod coords;
pub mod diff;
pub mod template;

pub use attribute::AttributeRef;
pub use coords::{cell_size, clamp_to_bounds, to_pixel_rect};
pub use diff::{ReconcileAction, TemplateDiff, TemplateKey, diff_templates};
pub use template::{
    Dashboard, DashboardAccess, GridItem, RefreshInterval, ScalingPreset, ScreenPreset, Template,
    TemplateError, Widget,
};
