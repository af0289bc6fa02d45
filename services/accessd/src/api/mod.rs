//! Access service HTTP API module.
//!
//! # Purpose
//! Exposes route handler modules plus the error and payload types shared by
//! them and by the admin endpoints.
pub mod catalog;
pub mod decisions;
pub mod error;
pub mod identities;
pub mod openapi;
pub mod role_access;
pub mod system;
pub mod types;
