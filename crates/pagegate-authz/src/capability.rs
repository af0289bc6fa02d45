//! Page-level capabilities and capability sets.
//!
//! # Purpose
//! Names the four things a role may do on a page and bundles them into the
//! resolved grant handed to callers.
//!
//! # Key invariants
//! - `PageCapabilities` is always fully populated; there is no "unset" state
//!   once a grant has been resolved. Unset values only exist in stored records
//!   (see [`crate::StoredAccess`]).
//! - JSON field names are `canView`, `canAdd`, `canEdit`, `canDelete`.
//!
//! # Examples
//! ```rust
//! use pagegate_authz::{Capability, PageCapabilities};
//!
//! let grant = PageCapabilities::view_only();
//! assert!(grant.allows(Capability::View));
//! assert!(!grant.allows(Capability::Edit));
//! ```
use crate::AuthzError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    View,
    Add,
    Edit,
    Delete,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::View,
        Capability::Add,
        Capability::Edit,
        Capability::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Capability::View => "view",
            Capability::Add => "add",
            Capability::Edit => "edit",
            Capability::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Capability {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "view" => Ok(Capability::View),
            "add" => Ok(Capability::Add),
            // "update" is the label the admin console shows for edit.
            "edit" | "update" => Ok(Capability::Edit),
            "delete" => Ok(Capability::Delete),
            other => Err(AuthzError::InvalidCapability(other.to_string())),
        }
    }
}

/// Resolved capability grant for one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCapabilities {
    pub can_view: bool,
    pub can_add: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl PageCapabilities {
    pub const fn all() -> Self {
        Self {
            can_view: true,
            can_add: true,
            can_edit: true,
            can_delete: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            can_view: false,
            can_add: false,
            can_edit: false,
            can_delete: false,
        }
    }

    pub const fn view_only() -> Self {
        Self {
            can_view: true,
            can_add: false,
            can_edit: false,
            can_delete: false,
        }
    }

    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::View => self.can_view,
            Capability::Add => self.can_add,
            Capability::Edit => self.can_edit,
            Capability::Delete => self.can_delete,
        }
    }

    pub fn set(&mut self, capability: Capability, value: bool) {
        match capability {
            Capability::View => self.can_view = value,
            Capability::Add => self.can_add = value,
            Capability::Edit => self.can_edit = value,
            Capability::Delete => self.can_delete = value,
        }
    }

    /// Field-wise OR; used to combine grants across several held roles.
    pub fn union(self, other: Self) -> Self {
        Self {
            can_view: self.can_view || other.can_view,
            can_add: self.can_add || other.can_add,
            can_edit: self.can_edit || other.can_edit,
            can_delete: self.can_delete || other.can_delete,
        }
    }
}
