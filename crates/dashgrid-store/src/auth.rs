#![forbid(unsafe_code)]

//! The consumed authorization boundary and dashboard access rules.

use dashgrid_model::{Dashboard, DashboardAccess};

/// Role required to modify dashboards.
pub const ROLE_WRITE_INSIGHTS: &str = "write:insights";

/// Identity capability consumed from the session provider.
pub trait AuthContext {
    /// The current user's id.
    fn user_id(&self) -> &str;

    /// Whether the current user holds a role.
    fn has_role(&self, role: &str) -> bool;

    /// Whether the current user bypasses access checks entirely.
    fn is_super_user(&self) -> bool;
}

/// Whether the user may view a dashboard.
///
/// Private dashboards are visible to their owner only; everything else in
/// the realm is visible.
#[must_use]
pub fn can_view(dashboard: &Dashboard, auth: &dyn AuthContext) -> bool {
    if auth.is_super_user() {
        return true;
    }
    match dashboard.view_access {
        DashboardAccess::Private => dashboard.owner_id == auth.user_id(),
        DashboardAccess::Public | DashboardAccess::Shared => true,
    }
}

/// Whether the user may edit a dashboard.
///
/// Editing additionally requires the write role; private edit access is
/// owner-only.
#[must_use]
pub fn can_edit(dashboard: &Dashboard, auth: &dyn AuthContext) -> bool {
    if auth.is_super_user() {
        return true;
    }
    if !auth.has_role(ROLE_WRITE_INSIGHTS) {
        return false;
    }
    match dashboard.edit_access {
        DashboardAccess::Private => dashboard.owner_id == auth.user_id(),
        DashboardAccess::Public | DashboardAccess::Shared => true,
    }
}

/// Fixed identity for tests.
#[derive(Debug, Clone)]
pub struct StaticAuth {
    pub user_id: String,
    pub roles: Vec<String>,
    pub super_user: bool,
}

impl StaticAuth {
    /// A regular user with the given roles.
    #[must_use]
    pub fn user(user_id: impl Into<String>, roles: &[&str]) -> Self {
        Self {
            user_id: user_id.into(),
            roles: roles.iter().map(|r| (*r).to_owned()).collect(),
            super_user: false,
        }
    }
}

impl AuthContext for StaticAuth {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    fn is_super_user(&self) -> bool {
        self.super_user
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
