#![forbid(unsafe_code)]

//! The widget manifest contract.
//!
//! A manifest is the static description of one widget type: what it is
//! called, how small it may be rendered, what its config looks like when
//! nothing has been configured yet, and how to obtain content and settings
//! handles for a placed instance. Chart/gauge/map internals are out of
//! scope here; content and settings are seams the host renders through.

use std::fmt;

use serde_json::Value;

/// Ambient context handed to content and settings factories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetContext {
    /// Whether the surrounding grid is in edit mode.
    pub edit_mode: bool,
    /// Realm the dashboard belongs to.
    pub realm: String,
}

impl WidgetContext {
    /// Context for a viewer in the given realm.
    pub fn viewing(realm: impl Into<String>) -> Self {
        Self {
            edit_mode: false,
            realm: realm.into(),
        }
    }

    /// Context for an editor in the given realm.
    pub fn editing(realm: impl Into<String>) -> Self {
        Self {
            edit_mode: true,
            realm: realm.into(),
        }
    }
}

/// Live content handle for one placed widget.
///
/// The host re-applies the (repaired) config whenever the settings panel
/// changes it; implementations react by re-binding data sources.
pub trait WidgetContent: fmt::Debug {
    /// Apply a repaired config.
    fn apply_config(&mut self, config: &Value, ctx: &WidgetContext);

    /// The config currently applied.
    fn config(&self) -> &Value;
}

/// Settings-panel handle for one placed widget.
///
/// Field edits flow through [`WidgetSettings::set_field`]; a `Some` return
/// is the config-changed signal the host forwards to the widget config.
pub trait WidgetSettings: fmt::Debug {
    /// The config as currently edited.
    fn config(&self) -> &Value;

    /// Apply one field edit. Returns the updated config when the edit
    /// changed anything, `None` when it was a no-op.
    fn set_field(&mut self, key: &str, value: Value) -> Option<&Value>;
}

/// Immutable description of a widget type, registered once at startup.
pub trait WidgetManifest: fmt::Debug {
    /// Human-readable name shown in the palette.
    fn display_name(&self) -> &str;

    /// Icon identifier shown in the palette.
    fn display_icon(&self) -> &str;

    /// Smallest width in pixels at which the content renders legibly.
    fn min_pixel_width(&self) -> u32;

    /// Smallest height in pixels at which the content renders legibly.
    fn min_pixel_height(&self) -> u32;

    /// Cell span a freshly dropped widget of this type occupies.
    fn default_span(&self) -> (u32, u32) {
        (2, 2)
    }

    /// The complete default config. Always a JSON object; this is the base
    /// shape every persisted config is repaired against.
    fn default_config(&self) -> Value;

    /// Create a content handle for a placed instance.
    fn create_content(&self, config: &Value, ctx: &WidgetContext) -> Box<dyn WidgetContent>;

    /// Create a settings handle for a placed instance.
    fn create_settings(&self, config: &Value) -> Box<dyn WidgetSettings>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_constructors() {
        let view = WidgetContext::viewing("master");
        assert!(!view.edit_mode);
        assert_eq!(view.realm, "master");

        let edit = WidgetContext::editing("master");
        assert!(edit.edit_mode);
    }
}
