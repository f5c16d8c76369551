#![forbid(unsafe_code)]

//! Identifiers and pixel geometry primitives shared across the dashgrid crates.

pub mod geometry;
pub mod id;

pub use geometry::{PxRect, PxSize};
pub use id::{DashboardId, GridItemId, IdSource, RandomIdSource, SequentialIdSource, TemplateId, WidgetId};
