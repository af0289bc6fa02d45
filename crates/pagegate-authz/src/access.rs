//! Stored page access records and the defaulting policy.
//!
//! # Purpose
//! Turns whatever the page access store holds for a (role, page) pair into a
//! fully populated [`PageCapabilities`] grant.
//!
//! # How it fits
//! The store returns an [`AccessRecord`]; the resolver passes it through
//! [`effective_grant`] and, for the blog list page, [`apply_item_view_fallback`].
//! No other code applies defaults.
//!
//! # Key invariants
//! - Admin is always all-true, whatever the record says.
//! - A missing record means "view only", except `/profile` which is fully open.
//! - An existing record keeps explicit values; unset view falls back to true,
//!   unset add/edit/delete fall back to false. `/profile` edit falls back to true.
//!
//! # Examples
//! ```rust
//! use pagegate_authz::{AccessRecord, Page, Role, StoredAccess, effective_grant};
//!
//! let absent = effective_grant(Role::Editor, Page::BlogCreate, &AccessRecord::Absent);
//! assert!(absent.can_view && !absent.can_add);
//!
//! let stored = AccessRecord::Stored(StoredAccess { can_add: Some(true), ..Default::default() });
//! assert!(effective_grant(Role::Editor, Page::BlogCreate, &stored).can_add);
//! ```
use crate::{AuthzError, AuthzResult, Capability, Page, PageCapabilities, Role};
use serde::{Deserialize, Serialize};

/// Raw stored override; `None` means the field was never written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAccess {
    #[serde(default)]
    pub can_view: Option<bool>,
    #[serde(default)]
    pub can_add: Option<bool>,
    #[serde(default)]
    pub can_edit: Option<bool>,
    #[serde(default)]
    pub can_delete: Option<bool>,
}

impl StoredAccess {
    /// Fully explicit record carrying every field of `grant`.
    pub fn explicit(grant: PageCapabilities) -> Self {
        Self {
            can_view: Some(grant.can_view),
            can_add: Some(grant.can_add),
            can_edit: Some(grant.can_edit),
            can_delete: Some(grant.can_delete),
        }
    }

    pub fn get(&self, capability: Capability) -> Option<bool> {
        match capability {
            Capability::View => self.can_view,
            Capability::Add => self.can_add,
            Capability::Edit => self.can_edit,
            Capability::Delete => self.can_delete,
        }
    }
}

/// Result of a store lookup for one (role, page) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRecord {
    Stored(StoredAccess),
    Absent,
}

impl From<Option<StoredAccess>> for AccessRecord {
    fn from(value: Option<StoredAccess>) -> Self {
        match value {
            Some(access) => AccessRecord::Stored(access),
            None => AccessRecord::Absent,
        }
    }
}

/// Grant used when no record exists for a non-admin role.
pub fn default_grant(page: Page) -> PageCapabilities {
    match page {
        Page::Profile => PageCapabilities::all(),
        _ => PageCapabilities::view_only(),
    }
}

fn fallback(page: Page, capability: Capability) -> bool {
    match (page, capability) {
        (_, Capability::View) => true,
        (Page::Profile, Capability::Edit) => true,
        _ => false,
    }
}

/// Apply the defaulting table to a stored record.
pub fn effective_grant(role: Role, page: Page, record: &AccessRecord) -> PageCapabilities {
    if role.is_admin() {
        return PageCapabilities::all();
    }
    match record {
        AccessRecord::Absent => default_grant(page),
        AccessRecord::Stored(stored) => {
            let mut grant = PageCapabilities::none();
            for capability in Capability::ALL {
                let value = stored
                    .get(capability)
                    .unwrap_or_else(|| fallback(page, capability));
                grant.set(capability, value);
            }
            grant
        }
    }
}

/// Defaulted grant of `record` with one capability overwritten, stored fully
/// explicit so later default changes do not shift it.
pub fn with_capability(
    role: Role,
    page: Page,
    record: &AccessRecord,
    capability: Capability,
    value: bool,
) -> StoredAccess {
    let mut grant = effective_grant(role, page, record);
    grant.set(capability, value);
    StoredAccess::explicit(grant)
}

/// Pages whose grant depends on another page's grant, with the page consulted.
pub fn fallback_source(page: Page) -> Option<Page> {
    match page {
        Page::Blog => Some(Page::BlogItem),
        _ => None,
    }
}

/// Promote blog list view when the role may view individual posts.
///
/// Only `can_view` on [`Page::Blog`] is affected; other pages pass through.
pub fn apply_item_view_fallback(
    page: Page,
    grant: PageCapabilities,
    item_grant: Option<PageCapabilities>,
) -> PageCapabilities {
    if fallback_source(page).is_none() || grant.can_view {
        return grant;
    }
    match item_grant {
        Some(item) if item.can_view => PageCapabilities {
            can_view: true,
            ..grant
        },
        _ => grant,
    }
}

/// Reject page overrides for roles that may not have them.
pub fn ensure_overridable(role: Role) -> AuthzResult<()> {
    if role.is_admin() {
        return Err(AuthzError::AdminOverride);
    }
    Ok(())
}
