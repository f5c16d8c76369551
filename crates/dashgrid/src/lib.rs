#![forbid(unsafe_code)]

//! Dashgrid public facade crate.
//!
//! Re-exports the stable surface of the dashboard grid engine: the
//! persisted schema, the widget registry, the live grid controller, and
//! the persistence facade. Hosts embedding the builder should depend on
//! this crate; the `dashgrid-*` crates underneath are implementation
//! detail.

// --- Core re-exports -------------------------------------------------------

pub use dashgrid_core::{
    DashboardId, GridItemId, IdSource, PxRect, PxSize, RandomIdSource, SequentialIdSource,
    TemplateId, WidgetId,
};

// --- Model re-exports ------------------------------------------------------

pub use dashgrid_model::{
    AttributeRef, Dashboard, DashboardAccess, GridItem, ReconcileAction, RefreshInterval,
    ScalingPreset, ScreenPreset, Template, TemplateDiff, TemplateError, TemplateKey, Widget,
    cell_size, clamp_to_bounds, diff_templates, to_pixel_rect,
};

// --- Registry re-exports ---------------------------------------------------

pub use dashgrid_registry::{
    RegistryError, WidgetContent, WidgetContext, WidgetManifest, WidgetRegistry, WidgetSettings,
    correct_config_spec, register_builtin_widgets,
};

// --- Layout re-exports -----------------------------------------------------

pub use dashgrid_layout::{
    BuilderConfig, CellHeight, DropError, GridController, GridEngine, GridEvent, GridNode,
    GridOptions, GridState, GridView, RenderPlan, ResizeDebouncer, SetupOutcome, WidgetView,
    WidgetViewKind, active_preset, plan_render, sort_screen_presets,
};

// --- Store re-exports ------------------------------------------------------

pub use dashgrid_store::{
    Asset, AssetQuery, AssetSource, AuthContext, DashboardResource, DashboardService,
    DashboardSizePreset, InMemoryResource, StoreError, can_edit, can_view,
};

/// Commonly used types for embedding the builder.
pub mod prelude {
    pub use crate::{
        BuilderConfig, Dashboard, DashboardService, DashboardSizePreset, GridController,
        GridEvent, RandomIdSource, Template, Widget, WidgetRegistry, plan_render,
        register_builtin_widgets,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use super::{InMemoryResource, SetupOutcome};

    // Smoke test across the whole surface: create, load, edit, save.
    #[test]
    fn end_to_end_builder_session() {
        let mut registry = WidgetRegistry::new();
        register_builtin_widgets(&mut registry);

        let mut store = InMemoryResource::new();
        let mut ids = RandomIdSource;
        let dashboard = DashboardService::create(
            &mut store,
            None,
            DashboardSizePreset::Desktop,
            "master",
            "user-1",
            &mut ids,
        )
        .unwrap();

        let mut controller = GridController::new(BuilderConfig::default());
        controller.set_mounted(true);
        assert_eq!(
            controller.setup(dashboard.template.clone(), true, 1280, false),
            SetupOutcome::Ready { rebuilt: true }
        );

        let created = controller
            .drop_from_palette(&registry, "linechart", 0, 0, &mut ids)
            .unwrap();
        assert!(controller
            .template()
            .unwrap()
            .widget(&created)
            .is_some());

        let plan = plan_render(controller.template().unwrap(), &registry, 1280, true);
        assert_eq!(plan.entries.len(), 1);

        let mut saved = dashboard;
        saved.template = controller.template().unwrap().clone();
        store_roundtrip(&mut store, saved);
    }

    fn store_roundtrip(store: &mut InMemoryResource, dashboard: Dashboard) {
        use super::DashboardResource;
        let id = dashboard.id.clone();
        let realm = dashboard.realm.clone();
        store.update(&dashboard).unwrap();
        let loaded = store.get(&realm, &id).unwrap();
        assert_eq!(loaded.template, dashboard.template);
    }
}
