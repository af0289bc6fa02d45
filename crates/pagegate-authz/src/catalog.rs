//! Role catalog: coarse permission strings per role, plus route requirements.
//!
//! # Purpose
//! Holds the static role -> permission table and the page -> required
//! permission table used for coarse checks ("may this identity reach the
//! editor dashboard at all?").
//!
//! # How it fits
//! The catalog is built once at start-up (optionally overridden by
//! configuration) and shared read-only with the resolver. Page-level grants
//! are a separate concern handled by [`crate::effective_grant`].
//!
//! # Key invariants
//! - The admin role passes every check before the granted set is consulted.
//!   Every `has_*` helper applies this, so a partial admin table cannot lock
//!   admins out.
//! - Lookups are pure and infallible; unknown roles cannot be represented.
//!
//! # Examples
//! ```rust
//! use pagegate_authz::{RoleCatalog, Role, has_permission, permissions};
//!
//! let catalog = RoleCatalog::standard();
//! let granted = catalog.permissions_for_roles(&[Role::Editor]);
//! assert!(has_permission(&granted, permissions::POSTS_WRITE, &[Role::Editor]));
//! assert!(!has_permission(&granted, permissions::USERS_WRITE, &[Role::Editor]));
//! ```
//!
//! # Common pitfalls
//! - Checking `granted.contains(..)` directly skips the admin bypass.
use crate::{AuthzResult, Page, Role};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub mod permissions {
    pub const ADMIN_DASHBOARD: &str = "admin.dashboard";
    pub const ADMIN_USERS: &str = "admin.users";
    pub const ADMIN_SETTINGS: &str = "admin.settings";
    pub const POSTS_READ: &str = "posts.read";
    pub const POSTS_WRITE: &str = "posts.write";
    pub const POSTS_DELETE: &str = "posts.delete";
    pub const USERS_READ: &str = "users.read";
    pub const USERS_WRITE: &str = "users.write";
    pub const USERS_DELETE: &str = "users.delete";
    pub const EDITOR_DASHBOARD: &str = "editor.dashboard";
    pub const VIEWER_DASHBOARD: &str = "viewer.dashboard";
}

use permissions::*;

const ADMIN_PERMISSIONS: &[&str] = &[
    ADMIN_DASHBOARD,
    ADMIN_USERS,
    ADMIN_SETTINGS,
    POSTS_READ,
    POSTS_WRITE,
    POSTS_DELETE,
    USERS_READ,
    USERS_WRITE,
    USERS_DELETE,
    EDITOR_DASHBOARD,
    VIEWER_DASHBOARD,
];

const EDITOR_PERMISSIONS: &[&str] = &[
    POSTS_READ,
    POSTS_WRITE,
    POSTS_DELETE,
    USERS_READ,
    EDITOR_DASHBOARD,
    VIEWER_DASHBOARD,
];

const VIEWER_PERMISSIONS: &[&str] = &[POSTS_READ, USERS_READ, VIEWER_DASHBOARD];

static NO_PERMISSIONS: BTreeSet<String> = BTreeSet::new();

/// Immutable role -> permission table and route requirement table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCatalog {
    roles: BTreeMap<Role, BTreeSet<String>>,
    routes: BTreeMap<Page, Vec<String>>,
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl RoleCatalog {
    /// The product's built-in tables.
    pub fn standard() -> Self {
        let roles = [
            (Role::Admin, ADMIN_PERMISSIONS),
            (Role::Editor, EDITOR_PERMISSIONS),
            (Role::Viewer, VIEWER_PERMISSIONS),
        ]
        .into_iter()
        .map(|(role, perms)| (role, perms.iter().map(|p| p.to_string()).collect()))
        .collect();
        let routes = [
            (Page::Admin, ADMIN_DASHBOARD),
            (Page::Editor, EDITOR_DASHBOARD),
            (Page::Dashboard, VIEWER_DASHBOARD),
        ]
        .into_iter()
        .map(|(page, perm)| (page, vec![perm.to_string()]))
        .collect();
        Self { roles, routes }
    }

    /// Replace the permission list of the named roles; others keep the
    /// built-in entries.
    pub fn with_role_overrides(mut self, overrides: &HashMap<String, Vec<String>>) -> AuthzResult<Self> {
        for (raw_role, perms) in overrides {
            let role: Role = raw_role.parse()?;
            self.roles.insert(role, perms.iter().cloned().collect());
        }
        Ok(self)
    }

    pub fn permissions_for(&self, role: Role) -> &BTreeSet<String> {
        self.roles.get(&role).unwrap_or(&NO_PERMISSIONS)
    }

    /// Union of the permission sets of every role given.
    pub fn permissions_for_roles(&self, roles: &[Role]) -> BTreeSet<String> {
        roles
            .iter()
            .flat_map(|role| self.permissions_for(*role).iter().cloned())
            .collect()
    }

    /// Coarse permissions a page requires; empty when the page is unguarded.
    pub fn route_permissions(&self, page: Page) -> &[String] {
        self.routes.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when `roles` satisfy every coarse requirement of `page`.
    pub fn can_access_route(&self, roles: &[Role], page: Page) -> bool {
        let granted = self.permissions_for_roles(roles);
        let required: Vec<&str> = self
            .route_permissions(page)
            .iter()
            .map(String::as_str)
            .collect();
        has_all_permissions(&granted, &required, roles)
    }
}

pub fn has_permission(granted: &BTreeSet<String>, required: &str, roles: &[Role]) -> bool {
    if roles.contains(&Role::Admin) {
        return true;
    }
    granted.contains(required)
}

pub fn has_any_permission(granted: &BTreeSet<String>, required: &[&str], roles: &[Role]) -> bool {
    if roles.contains(&Role::Admin) {
        return true;
    }
    required.iter().any(|perm| granted.contains(*perm))
}

pub fn has_all_permissions(granted: &BTreeSet<String>, required: &[&str], roles: &[Role]) -> bool {
    if roles.contains(&Role::Admin) {
        return true;
    }
    required.iter().all(|perm| granted.contains(*perm))
}
