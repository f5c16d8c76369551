#![forbid(unsafe_code)]

//! Template diffing: which top-level properties changed, and what the live
//! grid should do about it.
//!
//! Full grid reconstruction is visibly expensive (flicker, loss of drag
//! state, scroll reset), so the builder patches the live grid whenever a
//! narrower update is correctness-preserving. [`diff_templates`] computes
//! the changed key set by structural comparison (never by reference) so a
//! template that round-tripped through JSON does not trigger a redundant
//! rebuild. [`TemplateDiff::reconcile_action`] maps the key set onto the
//! narrowest safe update.

use std::fmt;

use crate::template::Template;

/// Top-level properties of a [`Template`], in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    Id,
    Columns,
    MaxScreenWidth,
    RefreshInterval,
    ScreenPresets,
    Widgets,
}

impl TemplateKey {
    /// The persisted JSON key name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Columns => "columns",
            Self::MaxScreenWidth => "maxScreenWidth",
            Self::RefreshInterval => "refreshInterval",
            Self::ScreenPresets => "screenPresets",
            Self::Widgets => "widgets",
        }
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the live grid should do in response to a template change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    /// Nothing changed; suppress the re-render entirely.
    NoOp,
    /// Apply the new column count to the live grid in place, restyle the
    /// background cell size, then run a lightweight resize pass.
    ColumnsInPlace,
    /// Register model widgets missing from the live grid as new nodes;
    /// leave already-materialized nodes untouched.
    IncrementalWidgets,
    /// Destroy and recreate the grid.
    FullRebuild,
}

/// The changed key set between two templates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TemplateDiff {
    changed: Vec<TemplateKey>,
}

impl TemplateDiff {
    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    /// Whether the given key changed.
    #[must_use]
    pub fn contains(&self, key: TemplateKey) -> bool {
        self.changed.contains(&key)
    }

    /// The changed keys in template declaration order.
    #[must_use]
    pub fn changed_keys(&self) -> &[TemplateKey] {
        &self.changed
    }

    /// Map the changed key set onto the narrowest safe grid update.
    ///
    /// A lone change to a key the grid does not render from (id, max screen
    /// width, refresh interval) is a no-op here; the host applies those on
    /// the next full setup.
    #[must_use]
    pub fn reconcile_action(&self) -> ReconcileAction {
        if self.changed.is_empty() {
            return ReconcileAction::NoOp;
        }
        if self.changed == [TemplateKey::Columns] {
            return ReconcileAction::ColumnsInPlace;
        }
        if self.changed.len() > 1 {
            return ReconcileAction::FullRebuild;
        }
        if self.changed == [TemplateKey::Widgets] {
            return ReconcileAction::IncrementalWidgets;
        }
        if self.changed == [TemplateKey::ScreenPresets] {
            // Breakpoint thresholds feed active-preset resolution.
            return ReconcileAction::FullRebuild;
        }
        ReconcileAction::NoOp
    }
}

/// Compute the set of top-level template properties whose values differ.
#[must_use]
pub fn diff_templates(old: &Template, new: &Template) -> TemplateDiff {
    let mut changed = Vec::new();
    if old.id != new.id {
        changed.push(TemplateKey::Id);
    }
    if old.columns != new.columns {
        changed.push(TemplateKey::Columns);
    }
    if old.max_screen_width != new.max_screen_width {
        changed.push(TemplateKey::MaxScreenWidth);
    }
    if old.refresh_interval != new.refresh_interval {
        changed.push(TemplateKey::RefreshInterval);
    }
    if old.screen_presets != new.screen_presets {
        changed.push(TemplateKey::ScreenPresets);
    }
    if old.widgets != new.widgets {
        changed.push(TemplateKey::Widgets);
    }
    TemplateDiff { changed }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
