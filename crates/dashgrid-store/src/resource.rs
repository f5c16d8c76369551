#![forbid(unsafe_code)]

//! The dashboard persistence boundary.
//!
//! Hosts implement [`DashboardResource`] over their REST transport; the
//! in-memory implementation backs tests and embedded use. Dashboards are
//! scoped by realm: a lookup with the right id but the wrong realm is a
//! miss.

use std::collections::BTreeMap;

use dashgrid_core::DashboardId;
use dashgrid_model::Dashboard;

use crate::error::StoreError;

/// CRUD boundary for persisted dashboards.
pub trait DashboardResource {
    /// All dashboards of a realm.
    fn get_all(&self, realm: &str) -> Result<Vec<Dashboard>, StoreError>;

    /// One dashboard by realm and id.
    fn get(&self, realm: &str, id: &DashboardId) -> Result<Dashboard, StoreError>;

    /// Persist a new dashboard. Returns the stored record.
    fn create(&mut self, dashboard: Dashboard) -> Result<Dashboard, StoreError>;

    /// Overwrite an existing dashboard.
    fn update(&mut self, dashboard: &Dashboard) -> Result<(), StoreError>;

    /// Remove a dashboard. Callers clear their local copy and selection.
    fn delete(&mut self, realm: &str, id: &DashboardId) -> Result<(), StoreError>;
}

/// Map-backed resource for tests and embedded hosts.
#[derive(Debug, Default)]
pub struct InMemoryResource {
    records: BTreeMap<(String, String), Dashboard>,
}

impl InMemoryResource {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored dashboards across all realms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn key(realm: &str, id: &DashboardId) -> (String, String) {
        (realm.to_owned(), id.as_str().to_owned())
    }
}

impl DashboardResource for InMemoryResource {
    fn get_all(&self, realm: &str) -> Result<Vec<Dashboard>, StoreError> {
        Ok(self
            .records
            .values()
            .filter(|d| d.realm == realm)
            .cloned()
            .collect())
    }

    fn get(&self, realm: &str, id: &DashboardId) -> Result<Dashboard, StoreError> {
        self.records
            .get(&Self::key(realm, id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                realm: realm.to_owned(),
                id: id.as_str().to_owned(),
            })
    }

    fn create(&mut self, dashboard: Dashboard) -> Result<Dashboard, StoreError> {
        let key = Self::key(&dashboard.realm, &dashboard.id);
        if self.records.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                realm: dashboard.realm.clone(),
                id: dashboard.id.as_str().to_owned(),
            });
        }
        self.records.insert(key, dashboard.clone());
        Ok(dashboard)
    }

    fn update(&mut self, dashboard: &Dashboard) -> Result<(), StoreError> {
        let key = Self::key(&dashboard.realm, &dashboard.id);
        match self.records.get_mut(&key) {
            Some(stored) => {
                *stored = dashboard.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                realm: dashboard.realm.clone(),
                id: dashboard.id.as_str().to_owned(),
            }),
        }
    }

    fn delete(&mut self, realm: &str, id: &DashboardId) -> Result<(), StoreError> {
        self.records
            .remove(&Self::key(realm, id))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                realm: realm.to_owned(),
                id: id.as_str().to_owned(),
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
