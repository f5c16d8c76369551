#![forbid(unsafe_code)]

//! Live grid controller.
//!
//! Owns one grid instance: placement, interaction, template reconciliation,
//! and the event stream the host reacts to. Single-threaded and
//! tick-driven: a wait (mount element missing, rebuild in flight) is
//! expressed as a deferred outcome re-attempted on a bounded poll interval,
//! never as a blocked thread and never as an unbounded queue of pending
//! rebuilds: only the latest deferred setup is kept.
//!
//! # State machine
//!
//! `Uninitialized → Ready ⇄ Rebuilding → Destroyed`
//!
//! - A full rebuild of a live grid is two-phase: the grid is destroyed and
//!   the controller parks in `Rebuilding` until the next [`tick`] after the
//!   host's render pass completes. Setup calls arriving meanwhile defer.
//! - `Destroyed` is terminal; every operation after teardown is a
//!   defensive no-op.
//!
//! # Ordering guarantees
//!
//! - Selecting widget B while A is selected emits `Deselected(A)` strictly
//!   before `Selected(B)`.
//! - Template mutation happens before the `TemplateChanged` event that
//!   announces it.
//!
//! [`tick`]: GridController::tick

use std::fmt;

use dashgrid_core::{GridItemId, IdSource, WidgetId};
use dashgrid_model::{
    GridItem, ReconcileAction, ScalingPreset, ScreenPreset, Template, Widget, cell_size,
    diff_templates,
};
use dashgrid_registry::{RegistryError, WidgetRegistry, correct_config_spec};
use serde_json::Value;
use web_time::{Duration, Instant};

use crate::breakpoint::{active_preset, scaling_mode_changed};
use crate::config::BuilderConfig;
use crate::engine::{GridEngine, single_column_cell_height};
use crate::resize::ResizeDebouncer;

/// Lifecycle state of one grid instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridState {
    Uninitialized,
    Ready,
    Rebuilding,
    Destroyed,
}

/// Cell height policy for the active grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellHeight {
    /// Square cells derived from the cell width.
    Auto,
    /// Fixed pixel height (single-column wrap mode).
    Fixed(f64),
}

/// Effective options of the live grid, derived from the template, the
/// active screen preset, and the edit/view mode.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    pub columns: u32,
    pub max_screen_width: u32,
    /// Background cell width in pixels for the current viewport.
    pub cell_width: f64,
    pub cell_height: CellHeight,
    /// No pointer-driven mutation when set.
    pub static_grid: bool,
    /// Whether palette cards may be dropped onto the grid.
    pub accept_drops: bool,
    /// Single-column stacking active.
    pub one_column_mode: bool,
}

impl GridOptions {
    /// Derive the effective options for a template under an active preset.
    ///
    /// The usable width is the viewport capped at the template's maximum
    /// screen width. Under `WrapToSingleColumn` the grid is static with a
    /// fixed cell height; otherwise cells are square and interactivity
    /// follows the edit mode.
    #[must_use]
    pub fn compute(
        template: &Template,
        active: Option<&ScreenPreset>,
        edit_mode: bool,
        viewport_width: u32,
    ) -> Self {
        let wrap = active.is_some_and(|p| p.scaling_preset == ScalingPreset::WrapToSingleColumn);
        let effective = f64::from(viewport_width.min(template.max_screen_width));
        Self {
            columns: template.columns,
            max_screen_width: template.max_screen_width,
            cell_width: cell_size(effective, template.columns),
            cell_height: if wrap {
                CellHeight::Fixed(single_column_cell_height(effective, template.columns))
            } else {
                CellHeight::Auto
            },
            static_grid: wrap || !edit_mode,
            accept_drops: edit_mode,
            one_column_mode: wrap,
        }
    }
}

/// Events emitted by the controller, drained by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    WidgetCreated { widget: Widget },
    Selected { id: WidgetId },
    Deselected { id: WidgetId },
    TemplateChanged,
    WidgetDropped { widget_type_id: String, x: u32, y: u32 },
    WidgetUpdated { id: WidgetId },
}

/// Result of a setup attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    /// The grid is live. `rebuilt` reports whether this attempt fully
    /// (re)built it.
    Ready { rebuilt: bool },
    /// Setup could not run yet; retry after the given interval.
    Deferred { retry_after: Duration },
    /// Nothing to do (torn down, or an idle tick).
    Idle,
}

/// Errors from palette drops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropError {
    /// The dropped card references an unregistered widget type.
    UnknownType(RegistryError),
    /// The grid is not live.
    NotReady,
    /// The grid is in view mode and rejects drops.
    ViewOnly,
}

impl fmt::Display for DropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType(err) => write!(f, "cannot create widget: {err}"),
            Self::NotReady => write!(f, "grid is not ready to accept drops"),
            Self::ViewOnly => write!(f, "grid is in view mode and rejects drops"),
        }
    }
}

impl std::error::Error for DropError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnknownType(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct PendingSetup {
    template: Template,
    edit_mode: bool,
    viewport_width: u32,
    force: bool,
}

/// Controller for one mounted grid.
#[derive(Debug)]
pub struct GridController {
    config: BuilderConfig,
    state: GridState,
    engine: Option<GridEngine>,
    template: Option<Template>,
    edit_mode: bool,
    viewport_width: u32,
    active_preset: Option<ScreenPreset>,
    options: Option<GridOptions>,
    selected: Option<WidgetId>,
    events: Vec<GridEvent>,
    pending: Option<PendingSetup>,
    ghost: Option<GridItemId>,
    mounted: bool,
    rebuild_count: u64,
    generation: u64,
    debouncer: ResizeDebouncer,
}

impl GridController {
    /// A fresh, unmounted controller.
    #[must_use]
    pub fn new(config: BuilderConfig) -> Self {
        let debouncer = ResizeDebouncer::new(config.resize_window());
        Self {
            config,
            state: GridState::Uninitialized,
            engine: None,
            template: None,
            edit_mode: false,
            viewport_width: 0,
            active_preset: None,
            options: None,
            selected: None,
            events: Vec::new(),
            pending: None,
            ghost: None,
            mounted: false,
            rebuild_count: 0,
            generation: 0,
            debouncer,
        }
    }

    /// Signal whether the mount element is present in the host view.
    pub fn set_mounted(&mut self, mounted: bool) {
        self.mounted = mounted;
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> GridState {
        self.state
    }

    /// Effective grid options, when the grid is live.
    #[must_use]
    pub fn options(&self) -> Option<&GridOptions> {
        self.options.as_ref()
    }

    /// The controller's template snapshot.
    #[must_use]
    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    /// The screen preset currently governing layout, if any.
    #[must_use]
    pub fn active_preset(&self) -> Option<&ScreenPreset> {
        self.active_preset.as_ref()
    }

    /// Currently selected widget.
    #[must_use]
    pub fn selected_widget(&self) -> Option<&WidgetId> {
        self.selected.as_ref()
    }

    /// Number of full grid (re)builds performed. Instrumentation hook for
    /// asserting that lightweight paths stayed lightweight.
    #[must_use]
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    /// Monotonic token invalidated by teardown and full rebuilds. Async
    /// completions capture it and check [`is_current`](Self::is_current)
    /// before mutating state.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a captured generation token is still current.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.state != GridState::Destroyed && self.generation == generation
    }

    /// Drain the queued events in emission order.
    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    // -----------------------------------------------------------------
    // Setup / teardown
    // -----------------------------------------------------------------

    /// Initialize or adjust the grid for a template.
    ///
    /// Defers (bounded poll, latest-wins) while the mount element is absent
    /// or a rebuild is in flight. Performs a full destroy+recreate when
    /// `force` is set or the active preset's scaling *mode* changed;
    /// otherwise adjusts the live grid in place.
    pub fn setup(
        &mut self,
        template: Template,
        edit_mode: bool,
        viewport_width: u32,
        force: bool,
    ) -> SetupOutcome {
        if self.state == GridState::Destroyed {
            tracing::debug!(target: "dashgrid::controller", "setup after teardown ignored");
            return SetupOutcome::Idle;
        }
        if !self.mounted || self.state == GridState::Rebuilding {
            self.pending = Some(PendingSetup {
                template,
                edit_mode,
                viewport_width,
                force,
            });
            return SetupOutcome::Deferred {
                retry_after: self.config.setup_poll_interval(),
            };
        }

        let new_preset = active_preset(viewport_width, &template.screen_presets);
        let mode_changed =
            scaling_mode_changed(self.active_preset.as_ref(), new_preset.as_ref());
        let needs_full = force || mode_changed || self.engine.is_none();

        self.template = Some(template);
        self.edit_mode = edit_mode;
        self.viewport_width = viewport_width;
        self.active_preset = new_preset;

        if needs_full {
            if self.engine.take().is_some() {
                // Destroy now; recreate on the next tick, after the host's
                // render pass has replaced the mount contents.
                self.state = GridState::Rebuilding;
                self.generation += 1;
                tracing::info!(target: "dashgrid::controller", "grid destroyed for rebuild");
                return SetupOutcome::Deferred {
                    retry_after: self.config.setup_poll_interval(),
                };
            }
            self.build_grid();
            return SetupOutcome::Ready { rebuilt: true };
        }

        if let Some(engine) = self.engine.as_mut() {
            let columns = self.template.as_ref().map_or(1, |t| t.columns);
            engine.set_columns(columns);
        }
        self.apply_engine_changes(false);
        self.recompute_options();
        self.state = GridState::Ready;
        SetupOutcome::Ready { rebuilt: false }
    }

    /// Advance deferred work: deliver debounced resizes, finish an
    /// in-flight rebuild, and retry a deferred setup.
    pub fn tick(&mut self, now: Instant) -> SetupOutcome {
        if self.state == GridState::Destroyed {
            return SetupOutcome::Idle;
        }

        if let Some(width) = self.debouncer.poll(now) {
            if let Some(template) = self.template.clone() {
                // A resize re-runs setup non-forced; the scaling-mode check
                // decides whether that turns into a rebuild.
                self.pending = Some(PendingSetup {
                    template,
                    edit_mode: self.edit_mode,
                    viewport_width: width,
                    force: false,
                });
            }
        }

        if self.state == GridState::Rebuilding {
            if self.mounted {
                self.build_grid();
                return SetupOutcome::Ready { rebuilt: true };
            }
            return SetupOutcome::Deferred {
                retry_after: self.config.setup_poll_interval(),
            };
        }

        if let Some(pending) = self.pending.take() {
            return self.setup(
                pending.template,
                pending.edit_mode,
                pending.viewport_width,
                pending.force,
            );
        }
        SetupOutcome::Idle
    }

    /// Record a viewport width notification from the host's observer.
    pub fn notify_resize(&mut self, width: u32, now: Instant) {
        if self.state == GridState::Destroyed {
            return;
        }
        self.debouncer.push(width, now);
    }

    /// Tear the grid down. Synchronous: the resize observer hook and any
    /// pending work are dropped immediately; in-flight async completions
    /// fail the [`is_current`](Self::is_current) check afterwards.
    pub fn teardown(&mut self) {
        self.state = GridState::Destroyed;
        self.engine = None;
        self.pending = None;
        self.ghost = None;
        self.options = None;
        self.generation += 1;
        self.debouncer.reset();
        tracing::info!(target: "dashgrid::controller", "grid torn down");
    }

    fn build_grid(&mut self) {
        let Some(template) = self.template.as_ref() else {
            self.state = GridState::Uninitialized;
            return;
        };
        let mut engine = GridEngine::new(template.columns);
        for widget in &template.widgets {
            engine.place(&widget.grid_item);
        }
        self.engine = Some(engine);
        // Load-time clamping is corrective, not a user edit.
        self.apply_engine_changes(false);
        self.recompute_options();
        self.state = GridState::Ready;
        self.rebuild_count += 1;
        tracing::info!(
            target: "dashgrid::controller",
            rebuilds = self.rebuild_count,
            "grid built"
        );
    }

    fn recompute_options(&mut self) {
        self.options = self.template.as_ref().map(|template| {
            GridOptions::compute(
                template,
                self.active_preset.as_ref(),
                self.edit_mode,
                self.viewport_width,
            )
        });
    }

    // -----------------------------------------------------------------
    // Template reconciliation
    // -----------------------------------------------------------------

    /// Reconcile an updated template against the live grid, taking the
    /// narrowest correctness-preserving path. Returns the action taken.
    pub fn apply_template(&mut self, new: Template) -> ReconcileAction {
        if self.state == GridState::Destroyed {
            tracing::debug!(target: "dashgrid::controller", "template change after teardown ignored");
            return ReconcileAction::NoOp;
        }
        let Some(old) = self.template.as_ref() else {
            // First template: equivalent to an initial setup.
            self.pending = Some(PendingSetup {
                template: new,
                edit_mode: self.edit_mode,
                viewport_width: self.viewport_width,
                force: false,
            });
            return ReconcileAction::FullRebuild;
        };

        let diff = diff_templates(old, &new);
        let action = diff.reconcile_action();
        match action {
            ReconcileAction::NoOp => {
                self.template = Some(new);
            }
            ReconcileAction::ColumnsInPlace => {
                let columns = new.columns;
                self.template = Some(new);
                if let Some(engine) = self.engine.as_mut() {
                    engine.set_columns(columns);
                }
                self.apply_engine_changes(true);
                // Background cell-size styling follows the options.
                self.recompute_options();
            }
            ReconcileAction::IncrementalWidgets => {
                self.template = Some(new);
                self.reconcile_widgets();
            }
            ReconcileAction::FullRebuild => {
                self.active_preset = active_preset(self.viewport_width, &new.screen_presets);
                self.template = Some(new);
                if self.engine.take().is_some() {
                    self.state = GridState::Rebuilding;
                    self.generation += 1;
                } else {
                    self.build_grid();
                }
            }
        }
        action
    }

    /// Materialize model widgets missing from the live grid and prune grid
    /// nodes whose widget is gone. Already-materialized nodes are left
    /// untouched.
    fn reconcile_widgets(&mut self) {
        let Some(template) = self.template.as_ref() else {
            return;
        };
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let stale: Vec<GridItemId> = engine
            .nodes_in_order()
            .map(|node| node.id.clone())
            .filter(|id| template.widget_by_grid_item(id).is_none())
            .collect();
        for id in stale {
            tracing::debug!(
                target: "dashgrid::controller",
                grid_item = %id,
                "pruning grid node without widget"
            );
            engine.remove(&id);
        }
        for widget in &template.widgets {
            if !engine.contains(&widget.grid_item.id) {
                engine.place(&widget.grid_item);
            }
        }
        self.apply_engine_changes(false);
    }

    // -----------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------

    /// Select a widget. Emits `Deselected` for the previous selection
    /// before `Selected` for the new one. Returns whether the selection
    /// took effect.
    pub fn select_widget(&mut self, id: &WidgetId) -> bool {
        let exists = self
            .template
            .as_ref()
            .is_some_and(|t| t.widget(id).is_some());
        if !exists {
            tracing::warn!(target: "dashgrid::controller", widget = %id, "selected widget does not exist");
            return false;
        }
        if self.selected.as_ref() == Some(id) {
            return true;
        }
        if let Some(prev) = self.selected.take() {
            self.events.push(GridEvent::Deselected { id: prev });
        }
        self.selected = Some(id.clone());
        self.events.push(GridEvent::Selected { id: id.clone() });
        true
    }

    /// Clear the selection, emitting `Deselected` if something was
    /// selected.
    pub fn deselect_widget(&mut self) {
        if let Some(prev) = self.selected.take() {
            self.events.push(GridEvent::Deselected { id: prev });
        }
    }

    // -----------------------------------------------------------------
    // Palette drag & drop
    // -----------------------------------------------------------------

    /// Register the transient drag ghost shown while a palette card hovers
    /// over the grid.
    pub fn begin_palette_drag(&mut self, ghost: GridItem) {
        if self.engine.is_none() || !self.edit_mode {
            return;
        }
        let id = ghost.id.clone();
        if let Some(engine) = self.engine.as_mut() {
            engine.place(&ghost);
        }
        self.ghost = Some(id);
    }

    /// Remove the drag ghost without creating a widget.
    pub fn cancel_palette_drag(&mut self) {
        if let (Some(ghost), Some(engine)) = (self.ghost.take(), self.engine.as_mut()) {
            engine.remove(&ghost);
        }
    }

    /// Create a widget from a palette card dropped at grid cell `(x, y)`.
    ///
    /// Removes the drag ghost, synthesizes a widget with a fresh id and the
    /// manifest's default config, places its grid item clamped to bounds,
    /// appends it to the template, and emits `WidgetDropped` followed by
    /// `WidgetCreated`.
    pub fn drop_from_palette(
        &mut self,
        registry: &WidgetRegistry,
        widget_type_id: &str,
        x: u32,
        y: u32,
        ids: &mut dyn IdSource,
    ) -> Result<WidgetId, DropError> {
        if self.state != GridState::Ready || self.engine.is_none() {
            return Err(DropError::NotReady);
        }
        if !self.edit_mode {
            return Err(DropError::ViewOnly);
        }
        // The ghost was never a real widget; clear it first.
        self.cancel_palette_drag();

        let manifest = registry.get(widget_type_id).map_err(DropError::UnknownType)?;
        let (span_w, span_h) = manifest.default_span();
        let widget_id = WidgetId::new(ids.next_id());
        let mut item = GridItem::new(GridItemId::new(ids.next_id()))
            .at(x, y)
            .spanning(span_w, span_h);
        item.min_pixel_w = Some(manifest.min_pixel_width());
        item.min_pixel_h = Some(manifest.min_pixel_height());

        let widget_config = correct_config_spec(manifest, &Value::Null);
        let display_name = manifest.display_name().to_owned();

        let Some(engine) = self.engine.as_mut() else {
            return Err(DropError::NotReady);
        };
        let placed = engine.place(&item);

        let widget = Widget {
            id: widget_id.clone(),
            display_name,
            widget_type_id: widget_type_id.to_owned(),
            widget_config,
            grid_item: placed,
        };
        let Some(template) = self.template.as_mut() else {
            return Err(DropError::NotReady);
        };
        template.widgets.push(widget.clone());

        self.events.push(GridEvent::WidgetDropped {
            widget_type_id: widget_type_id.to_owned(),
            x,
            y,
        });
        self.events.push(GridEvent::WidgetCreated { widget });
        // Neighbors displaced by the drop write back too.
        self.apply_engine_changes(false);
        self.events.push(GridEvent::TemplateChanged);
        Ok(widget_id)
    }

    // -----------------------------------------------------------------
    // Interaction writeback
    // -----------------------------------------------------------------

    /// Apply a completed drag: move the node and write the new coordinates
    /// back onto the owning widget. Returns whether anything changed.
    pub fn request_move(&mut self, id: &GridItemId, x: u32, y: u32) -> bool {
        if self.interaction_blocked() {
            return false;
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.propose_move(id, x, y);
        }
        self.apply_engine_changes(true) > 0
    }

    /// Apply a completed resize: resize the node and write the new spans
    /// back onto the owning widget. Returns whether anything changed.
    pub fn request_resize(&mut self, id: &GridItemId, w: u32, h: u32) -> bool {
        if self.interaction_blocked() {
            return false;
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.propose_resize(id, w, h);
        }
        self.apply_engine_changes(true) > 0
    }

    fn interaction_blocked(&self) -> bool {
        self.state != GridState::Ready
            || self.options.as_ref().is_none_or(|o| o.static_grid)
    }

    /// Write engine-side coordinate changes back onto the template.
    ///
    /// Changes referencing a grid item with no matching widget are dropped
    /// silently: a stale node must never break the rendering loop.
    fn apply_engine_changes(&mut self, emit: bool) -> usize {
        let changed = match self.engine.as_mut() {
            Some(engine) => engine.drain_changed(),
            None => return 0,
        };
        let Some(engine) = self.engine.as_ref() else {
            return 0;
        };
        let Some(template) = self.template.as_mut() else {
            return 0;
        };

        let mut applied = 0;
        for id in changed {
            let Some(node) = engine.node(&id) else {
                continue;
            };
            match template.widget_by_grid_item_mut(&id) {
                Some(widget) => {
                    widget.grid_item.x = node.x;
                    widget.grid_item.y = node.y;
                    widget.grid_item.w = node.w;
                    widget.grid_item.h = node.h;
                    applied += 1;
                }
                None => {
                    tracing::debug!(
                        target: "dashgrid::controller",
                        grid_item = %id,
                        "dropping change for stale grid node"
                    );
                }
            }
        }
        if emit && applied > 0 {
            self.events.push(GridEvent::TemplateChanged);
        }
        applied
    }

    // -----------------------------------------------------------------
    // Widget mutation
    // -----------------------------------------------------------------

    /// Apply a settings-panel config update to a widget. The config is
    /// repaired against the manifest before being stored. Returns whether
    /// the stored config changed.
    pub fn update_widget_config(
        &mut self,
        registry: &WidgetRegistry,
        id: &WidgetId,
        config: Value,
    ) -> bool {
        let Some(template) = self.template.as_mut() else {
            return false;
        };
        let Some(widget) = template.widget_mut(id) else {
            tracing::warn!(target: "dashgrid::controller", widget = %id, "config update for unknown widget");
            return false;
        };
        let repaired = match registry.get(&widget.widget_type_id) {
            Ok(manifest) => correct_config_spec(manifest, &config),
            // Unknown type: keep the raw config rather than losing data.
            Err(_) => config,
        };
        if widget.widget_config == repaired {
            return false;
        }
        widget.widget_config = repaired;
        self.events.push(GridEvent::WidgetUpdated { id: id.clone() });
        self.events.push(GridEvent::TemplateChanged);
        true
    }

    /// Delete a widget from the template and the live grid. Deselects it
    /// first when it was selected. Returns whether it existed.
    pub fn delete_widget(&mut self, id: &WidgetId) -> bool {
        if self.selected.as_ref() == Some(id) {
            self.deselect_widget();
        }
        let Some(template) = self.template.as_mut() else {
            return false;
        };
        let Some(removed) = template.remove_widget(id) else {
            return false;
        };
        if let Some(engine) = self.engine.as_mut() {
            engine.remove(&removed.grid_item.id);
        }
        self.events.push(GridEvent::TemplateChanged);
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
