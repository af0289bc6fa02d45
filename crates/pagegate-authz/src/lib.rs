//! PageGate authorization model shared by the access service and its clients.
//!
//! # Purpose
//! Defines roles, pages, capabilities, admin-console modules, the static role
//! catalog, and the defaulting policy that turns stored page overrides into a
//! complete grant.
//!
//! # How it fits
//! `accessd` owns persistence and request handling; it calls into this crate
//! for every pure decision. Nothing here performs I/O.
//!
//! # Key invariants
//! - Roles are a closed set: `admin`, `editor`, `viewer`.
//! - Admin holds every coarse permission and every page capability; it never
//!   has stored overrides.
//! - Page keys come from a fixed catalog; concrete paths are mapped onto it with
//!   [`resolve_path`].
//!
//! # Examples
//! ```rust
//! use pagegate_authz::{AccessRecord, Capability, Page, Role, effective_grant, resolve_path};
//!
//! let page = resolve_path("/blog/42/edit").unwrap();
//! assert_eq!(page, Page::BlogItemEdit);
//! let grant = effective_grant(Role::Viewer, page, &AccessRecord::Absent);
//! assert!(grant.allows(Capability::View));
//! assert!(!grant.allows(Capability::Edit));
//! ```
//!
//! # Common pitfalls
//! - Defaulting a store failure to `AccessRecord::Absent` turns an outage into
//!   view access. Propagate the error instead.
//! - Comparing role strings directly instead of parsing into [`Role`].

mod access;
mod capability;
mod catalog;
mod errors;
mod identity;
mod matcher;
mod module;
mod page;
mod role;

pub use access::{
    AccessRecord, StoredAccess, apply_item_view_fallback, default_grant, effective_grant,
    ensure_overridable, fallback_source, with_capability,
};
pub use capability::{Capability, PageCapabilities};
pub use catalog::{
    RoleCatalog, has_all_permissions, has_any_permission, has_permission, permissions,
};
pub use errors::{AuthzError, AuthzResult};
pub use identity::RoleSet;
pub use matcher::{page_pattern, resolve_path};
pub use module::Module;
pub use page::Page;
pub use role::{DEFAULT_ROLE, Role};
