//! Page-level RBAC: resolution, decisions, and module updates.
//!
//! # Purpose
//! Exposes the permission resolver, the access decision facade, and the
//! module-wide capability writer built on top of them.
pub mod decision;
pub mod modules;
pub mod resolver;

pub use decision::AccessDecision;
pub use resolver::{PermissionResolver, RolePageGrant};
