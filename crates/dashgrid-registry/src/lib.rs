#![forbid(unsafe_code)]

//! Widget type manifests, the widget registry, and config repair.
//!
//! A widget type is described by an immutable [`WidgetManifest`]: display
//! metadata, minimum pixel dimensions, a default config, and factory seams
//! for content and settings. Manifests are registered once at application
//! start into an explicit [`WidgetRegistry`] that is passed by reference to
//! the layout engine and settings panels. There are no module-level
//! globals, so a
//! test can construct a registry with fake manifests.

pub mod builtin;
pub mod config;
pub mod manifest;
pub mod registry;

pub use builtin::register_builtin_widgets;
pub use config::correct_config_spec;
pub use manifest::{WidgetContent, WidgetContext, WidgetManifest, WidgetSettings};
pub use registry::{RegistryError, WidgetRegistry};
