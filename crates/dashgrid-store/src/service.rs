#![forbid(unsafe_code)]

//! Dashboard lifecycle on top of the persistence boundary: size-preset
//! templates for new dashboards, identity-breaking duplication, deletion.

use dashgrid_core::{DashboardId, GridItemId, IdSource, TemplateId, WidgetId};
use dashgrid_model::{
    Dashboard, DashboardAccess, RefreshInterval, ScalingPreset, ScreenPreset, Template,
};

use crate::error::StoreError;
use crate::resource::DashboardResource;

/// Starting layout for a freshly created dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardSizePreset {
    /// 12 columns up to 4000px, wrapping to a single column below 640px.
    Desktop,
    /// 4 columns up to 640px, layout kept as-is below the breakpoint.
    Mobile,
}

impl DashboardSizePreset {
    /// Build the default template for this preset with fresh ids.
    #[must_use]
    pub fn template(self, ids: &mut dyn IdSource) -> Template {
        let (columns, max_screen_width, scaling) = match self {
            Self::Desktop => (12, 4000, ScalingPreset::WrapToSingleColumn),
            Self::Mobile => (4, 640, ScalingPreset::KeepLayout),
        };
        Template {
            id: TemplateId::new(ids.next_id()),
            columns,
            max_screen_width,
            refresh_interval: RefreshInterval::Off,
            screen_presets: vec![ScreenPreset {
                id: ids.next_id(),
                display_name: "Mobile".into(),
                breakpoint: 640,
                scaling_preset: scaling,
            }],
            widgets: Vec::new(),
        }
    }
}

/// Create/duplicate/delete semantics over a [`DashboardResource`].
#[derive(Debug, Default)]
pub struct DashboardService;

impl DashboardService {
    /// Create a dashboard.
    ///
    /// With no source dashboard, synthesizes an empty one from the size
    /// preset. With a source, duplicates it: the copy shares no identity
    /// with the source (template id, every widget id, and every grid item
    /// id are fresh) and its display name gains a " copy" suffix. Stale
    /// shared ids would corrupt independent editing sessions.
    pub fn create(
        resource: &mut dyn DashboardResource,
        source: Option<&Dashboard>,
        size: DashboardSizePreset,
        realm: &str,
        owner_id: &str,
        ids: &mut dyn IdSource,
    ) -> Result<Dashboard, StoreError> {
        let dashboard = match source {
            Some(source) => Self::duplicate(source, realm, ids),
            None => Self::synthesize(size, realm, owner_id, ids),
        };
        let stored = resource.create(dashboard)?;
        tracing::info!(
            target: "dashgrid::store",
            dashboard = stored.id.as_str(),
            realm,
            "dashboard created"
        );
        Ok(stored)
    }

    /// Remove a dashboard from the backend. The caller is responsible for
    /// dropping its local copy and clearing the selection if the deleted
    /// dashboard was selected.
    pub fn delete(
        resource: &mut dyn DashboardResource,
        realm: &str,
        id: &DashboardId,
    ) -> Result<(), StoreError> {
        resource.delete(realm, id)?;
        tracing::info!(
            target: "dashgrid::store",
            dashboard = id.as_str(),
            realm,
            "dashboard deleted"
        );
        Ok(())
    }

    fn synthesize(
        size: DashboardSizePreset,
        realm: &str,
        owner_id: &str,
        ids: &mut dyn IdSource,
    ) -> Dashboard {
        Dashboard {
            id: DashboardId::new(ids.next_id()),
            realm: realm.to_owned(),
            display_name: "New dashboard".into(),
            owner_id: owner_id.to_owned(),
            view_access: DashboardAccess::Shared,
            edit_access: DashboardAccess::Shared,
            template: size.template(ids),
        }
    }

    fn duplicate(source: &Dashboard, realm: &str, ids: &mut dyn IdSource) -> Dashboard {
        let mut copy = source.clone();
        copy.id = DashboardId::new(ids.next_id());
        copy.realm = realm.to_owned();
        copy.display_name = format!("{} copy", source.display_name);
        copy.template.id = TemplateId::new(ids.next_id());
        for widget in &mut copy.template.widgets {
            widget.id = WidgetId::new(ids.next_id());
            widget.grid_item.id = GridItemId::new(ids.next_id());
        }
        copy
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::InMemoryResource;
    use dashgrid_core::{RandomIdSource, SequentialIdSource};
    use dashgrid_model::{GridItem, Widget};
    use serde_json::Value;
    use std::collections::BTreeSet;

    fn widget(id: &str, grid_id: &str) -> Widget {
        Widget {
            id: WidgetId::new(id),
            display_name: id.into(),
            widget_type_id: "kpi".into(),
            widget_config: Value::Null,
            grid_item: GridItem::new(GridItemId::new(grid_id)).spanning(2, 2),
        }
    }

    fn source_dashboard(widget_count: usize) -> Dashboard {
        let widgets = (0..widget_count)
            .map(|i| widget(&format!("w{i}"), &format!("g{i}")))
            .collect();
        Dashboard {
            id: DashboardId::new("source"),
            realm: "master".into(),
            display_name: "Energy overview".into(),
            owner_id: "user-1".into(),
            view_access: DashboardAccess::Shared,
            edit_access: DashboardAccess::Private,
            template: Template {
                id: TemplateId::new("t-source"),
                columns: 12,
                max_screen_width: 4000,
                refresh_interval: RefreshInterval::Off,
                screen_presets: Vec::new(),
                widgets,
            },
        }
    }

    #[test]
    fn desktop_preset_defaults() {
        let mut ids = SequentialIdSource::default();
        let t = DashboardSizePreset::Desktop.template(&mut ids);
        assert_eq!(t.columns, 12);
        assert_eq!(t.max_screen_width, 4000);
        assert_eq!(t.screen_presets.len(), 1);
        assert_eq!(t.screen_presets[0].breakpoint, 640);
        assert_eq!(
            t.screen_presets[0].scaling_preset,
            ScalingPreset::WrapToSingleColumn
        );
        assert!(t.validate().is_ok());
    }

    #[test]
    fn mobile_preset_defaults() {
        let mut ids = SequentialIdSource::default();
        let t = DashboardSizePreset::Mobile.template(&mut ids);
        assert_eq!(t.columns, 4);
        assert_eq!(t.max_screen_width, 640);
        assert_eq!(
            t.screen_presets[0].scaling_preset,
            ScalingPreset::KeepLayout
        );
    }

    #[test]
    fn create_synthesizes_from_preset() {
        let mut store = InMemoryResource::new();
        let mut ids = SequentialIdSource::default();
        let created = DashboardService::create(
            &mut store,
            None,
            DashboardSizePreset::Desktop,
            "master",
            "user-1",
            &mut ids,
        )
        .unwrap();

        assert_eq!(created.realm, "master");
        assert_eq!(created.owner_id, "user-1");
        assert!(created.template.widgets.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplication_shares_no_identity() {
        let mut store = InMemoryResource::new();
        let mut ids = RandomIdSource;
        let source = source_dashboard(5);

        let copy = DashboardService::create(
            &mut store,
            Some(&source),
            DashboardSizePreset::Desktop,
            "master",
            "user-1",
            &mut ids,
        )
        .unwrap();

        assert_ne!(copy.id, source.id);
        assert_ne!(copy.template.id, source.template.id);
        assert_eq!(copy.display_name, "Energy overview copy");
        assert_eq!(copy.template.widgets.len(), 5);

        let source_widget_ids: BTreeSet<&str> = source
            .template
            .widgets
            .iter()
            .map(|w| w.id.as_str())
            .collect();
        let copy_widget_ids: BTreeSet<&str> = copy
            .template
            .widgets
            .iter()
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(copy_widget_ids.len(), 5, "copied widget ids must be distinct");
        assert!(
            copy_widget_ids.is_disjoint(&source_widget_ids),
            "copied widget ids must not overlap the source"
        );

        let copy_grid_ids: BTreeSet<&str> = copy
            .template
            .widgets
            .iter()
            .map(|w| w.grid_item.id.as_str())
            .collect();
        assert_eq!(copy_grid_ids.len(), 5);

        // Non-identity content is preserved.
        assert_eq!(copy.template.widgets[0].widget_type_id, "kpi");
        assert_eq!(copy.template.widgets[0].grid_item.w, 2);
    }

    #[test]
    fn duplication_is_valid_template() {
        let mut store = InMemoryResource::new();
        let mut ids = SequentialIdSource::default();
        let source = source_dashboard(3);
        let copy = DashboardService::create(
            &mut store,
            Some(&source),
            DashboardSizePreset::Desktop,
            "master",
            "user-1",
            &mut ids,
        )
        .unwrap();
        assert!(copy.validate().is_ok());
    }

    #[test]
    fn delete_propagates_not_found() {
        let mut store = InMemoryResource::new();
        let err =
            DashboardService::delete(&mut store, "master", &DashboardId::new("missing"))
                .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn failed_create_leaves_store_unchanged() {
        let mut store = InMemoryResource::new();
        let mut ids = SequentialIdSource::default();
        let first = DashboardService::create(
            &mut store,
            None,
            DashboardSizePreset::Desktop,
            "master",
            "user-1",
            &mut ids,
        )
        .unwrap();

        // Recreating the same id collides; the store keeps exactly one copy.
        let duplicate_id = Dashboard {
            display_name: "clash".into(),
            ..first.clone()
        };
        assert!(store.create(duplicate_id).is_err());
        assert_eq!(store.len(), 1);
    }
}
