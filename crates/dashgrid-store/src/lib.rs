#![forbid(unsafe_code)]

//! Persistence facade and external boundaries for dashgrid.
//!
//! Dashboards live behind the [`DashboardResource`] boundary; widget data
//! comes through [`AssetSource`]; identity questions go to [`AuthContext`].
//! All three are traits so hosts plug in their transport and tests plug in
//! fixtures. The [`DashboardService`] on top owns the semantics the
//! boundaries do not: size-preset templates for new dashboards and
//! identity-breaking duplication.

pub mod assets;
pub mod auth;
pub mod error;
pub mod resource;
pub mod service;

pub use assets::{Asset, AssetQuery, AssetSource, StaticAssetSource};
pub use auth::{AuthContext, ROLE_WRITE_INSIGHTS, StaticAuth, can_edit, can_view};
pub use error::StoreError;
pub use resource::{DashboardResource, InMemoryResource};
pub use service::{DashboardService, DashboardSizePreset};
