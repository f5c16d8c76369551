//! End-to-end builder scenarios across the model, registry, and layout
//! crates: breakpoint wrapping, palette drops, lightweight column changes,
//! and per-widget failure isolation.

use dashgrid_core::{GridItemId, SequentialIdSource, TemplateId, WidgetId};
use dashgrid_layout::{
    BuilderConfig, GridController, GridState, GridView, SetupOutcome, WidgetViewKind,
    active_preset, plan_render,
};
use dashgrid_model::{
    GridItem, ReconcileAction, RefreshInterval, ScalingPreset, ScreenPreset, Template, Widget,
    diff_templates,
};
use dashgrid_registry::{WidgetRegistry, register_builtin_widgets};
use serde_json::Value;
use web_time::Instant;

fn registry() -> WidgetRegistry {
    let mut reg = WidgetRegistry::new();
    register_builtin_widgets(&mut reg);
    reg
}

fn template(columns: u32, presets: Vec<ScreenPreset>, widgets: Vec<Widget>) -> Template {
    Template {
        id: TemplateId::new("t1"),
        columns,
        max_screen_width: 4000,
        refresh_interval: RefreshInterval::Off,
        screen_presets: presets,
        widgets,
    }
}

fn wrap_preset() -> ScreenPreset {
    ScreenPreset {
        id: "mobile".into(),
        display_name: "Mobile".into(),
        breakpoint: 640,
        scaling_preset: ScalingPreset::WrapToSingleColumn,
    }
}

fn kpi_widget(id: &str, x: u32, y: u32) -> Widget {
    Widget {
        id: WidgetId::new(id),
        display_name: id.into(),
        widget_type_id: "kpi".into(),
        widget_config: Value::Null,
        grid_item: GridItem::new(GridItemId::new(format!("g-{id}")))
            .at(x, y)
            .spanning(2, 2),
    }
}

fn ready_controller(template: Template, edit_mode: bool, viewport: u32) -> GridController {
    let mut controller = GridController::new(BuilderConfig::default());
    controller.set_mounted(true);
    assert_eq!(
        controller.setup(template, edit_mode, viewport, false),
        SetupOutcome::Ready { rebuilt: true }
    );
    controller
}

// Scenario: a 12-column template with a 640px wrap preset viewed at 500px
// collapses to a static single-column grid.
#[test]
fn single_column_wrap_at_phone_width() {
    let t = template(12, vec![wrap_preset()], vec![kpi_widget("w1", 0, 0)]);

    let resolved = active_preset(500, &t.screen_presets).expect("preset must be active");
    assert_eq!(resolved.scaling_preset, ScalingPreset::WrapToSingleColumn);

    let controller = ready_controller(t.clone(), true, 500);
    let options = controller.options().expect("grid is live");
    assert!(options.static_grid);
    assert!(options.one_column_mode);

    // The same decision shows up in a pure render plan.
    let plan = plan_render(&t, &registry(), 500, true);
    let GridView::Active(plan_options) = &plan.grid else {
        panic!("wrap mode still renders the grid");
    };
    assert!(plan_options.static_grid);
    assert!(plan_options.one_column_mode);
}

// Scenario: dropping a "kpi" palette card at cell (3,2) creates exactly one
// widget with default config and a fresh id.
#[test]
fn widget_creation_from_palette_drop() {
    let registry = registry();
    let mut ids = SequentialIdSource::default();
    let t = template(12, vec![], vec![kpi_widget("existing", 0, 0)]);
    let mut controller = ready_controller(t, true, 1200);

    let before = controller.template().unwrap().widgets.len();
    let created = controller
        .drop_from_palette(&registry, "kpi", 3, 2, &mut ids)
        .expect("drop succeeds");

    let after = controller.template().unwrap();
    assert_eq!(after.widgets.len(), before + 1);

    let widget = after.widget(&created).expect("created widget exists");
    let (span_w, span_h) = registry.get("kpi").unwrap().default_span();
    assert_eq!(widget.grid_item.x, 3);
    assert_eq!(widget.grid_item.y, 2);
    assert_eq!(widget.grid_item.w, span_w);
    assert_eq!(widget.grid_item.h, span_h);
    assert_eq!(
        widget.widget_config,
        registry.get("kpi").unwrap().default_config()
    );

    // Fresh id, distinct from every pre-existing widget id.
    let distinct = after
        .widgets
        .iter()
        .filter(|w| w.id == created)
        .count();
    assert_eq!(distinct, 1);
    assert_ne!(created, WidgetId::new("existing"));
}

// Scenario: changing only `columns` from 12 to 8 takes the in-place resize
// path; the rebuild counter proves no full rebuild happened.
#[test]
fn columns_only_change_avoids_rebuild() {
    let t = template(12, vec![wrap_preset()], vec![kpi_widget("w1", 0, 0)]);
    let mut controller = ready_controller(t.clone(), true, 1200);
    let rebuilds = controller.rebuild_count();

    let mut new = t.clone();
    new.columns = 8;
    let diff = diff_templates(&t, &new);
    assert_eq!(diff.changed_keys().len(), 1);

    let action = controller.apply_template(new);
    assert_eq!(action, ReconcileAction::ColumnsInPlace);
    assert_eq!(controller.rebuild_count(), rebuilds);
    assert_eq!(controller.state(), GridState::Ready);
    assert_eq!(controller.options().unwrap().columns, 8);
}

// Scenario: a widget with an unregistered type renders a placeholder while
// its siblings render normally.
#[test]
fn unknown_widget_type_does_not_poison_siblings() {
    let mut unknown = kpi_widget("broken", 0, 0);
    unknown.widget_type_id = "discontinued-type".into();
    let t = template(
        12,
        vec![],
        vec![unknown, kpi_widget("healthy-1", 4, 0), kpi_widget("healthy-2", 8, 0)],
    );

    let plan = plan_render(&t, &registry(), 1200, false);
    assert_eq!(plan.entries.len(), 3);

    let broken = &plan.entries[0];
    assert!(matches!(
        &broken.kind,
        WidgetViewKind::ErrorPlaceholder { widget_type_id } if widget_type_id == "discontinued-type"
    ));
    for entry in &plan.entries[1..] {
        assert!(
            matches!(entry.kind, WidgetViewKind::Content { .. }),
            "sibling {} must render",
            entry.widget_id
        );
    }
}

// Dragging across the wrap breakpoint rebuilds once the quiet window and
// rebuild tick have both run; below the breakpoint the grid is static.
#[test]
fn resize_through_breakpoint_goes_static() {
    let t = template(12, vec![wrap_preset()], vec![kpi_widget("w1", 0, 0)]);
    let mut controller = ready_controller(t, true, 1200);
    assert!(!controller.options().unwrap().static_grid);

    let t0 = Instant::now();
    controller.notify_resize(500, t0);
    // Quiet window elapses, setup runs, mode change defers into a rebuild.
    let outcome = controller.tick(t0 + BuilderConfig::default().resize_window());
    assert!(matches!(outcome, SetupOutcome::Deferred { .. }));
    assert_eq!(controller.state(), GridState::Rebuilding);

    assert_eq!(
        controller.tick(t0 + BuilderConfig::default().resize_window()),
        SetupOutcome::Ready { rebuilt: true }
    );
    assert!(controller.options().unwrap().static_grid);
}

// Deleting the selected widget deselects it before announcing the change,
// and removes it from both the template and the live grid.
#[test]
fn delete_selected_widget_cleans_up() {
    let t = template(12, vec![], vec![kpi_widget("w1", 0, 0), kpi_widget("w2", 4, 0)]);
    let mut controller = ready_controller(t, true, 1200);
    controller.select_widget(&WidgetId::new("w1"));
    controller.drain_events();

    assert!(controller.delete_widget(&WidgetId::new("w1")));
    assert!(controller.selected_widget().is_none());
    assert_eq!(controller.template().unwrap().widgets.len(), 1);

    // Interacting with the deleted widget's grid node is a silent no-op.
    assert!(!controller.request_move(&GridItemId::new("g-w1"), 2, 2));
}
