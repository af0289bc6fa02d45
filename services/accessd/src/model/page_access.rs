//! Page access override records.
//!
//! # Purpose
//! Defines the persisted (role, page) capability override. Capability fields
//! stay optional here; defaults are applied by `pagegate_authz::effective_grant`.
use chrono::{DateTime, Utc};
use pagegate_authz::{Page, Role, StoredAccess};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct PageAccessEntry {
    #[schema(value_type = String, example = "editor")]
    pub role: Role,
    #[schema(value_type = String, example = "/blog/create")]
    pub page: Page,
    #[serde(rename = "canView")]
    pub can_view: Option<bool>,
    #[serde(rename = "canAdd")]
    pub can_add: Option<bool>,
    #[serde(rename = "canEdit")]
    pub can_edit: Option<bool>,
    #[serde(rename = "canDelete")]
    pub can_delete: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl PageAccessEntry {
    pub fn new(role: Role, page: Page, access: StoredAccess) -> Self {
        Self {
            role,
            page,
            can_view: access.can_view,
            can_add: access.can_add,
            can_edit: access.can_edit,
            can_delete: access.can_delete,
            updated_at: Utc::now(),
        }
    }

    pub fn stored(&self) -> StoredAccess {
        StoredAccess {
            can_view: self.can_view,
            can_add: self.can_add,
            can_edit: self.can_edit,
            can_delete: self.can_delete,
        }
    }
}
