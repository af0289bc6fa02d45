//! Access service authentication and authorization modules.
//!
//! # Purpose
//! Groups identity sign-in, the admin console endpoints, and page-level RBAC.
pub mod admin;
pub mod identity;
pub mod rbac;
