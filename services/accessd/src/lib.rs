//! PageGate access service library crate.
//!
//! # Purpose
//! Exposes the HTTP API, permission resolution, configuration, and storage
//! backends for use by the `accessd` binary and integration tests.
//!
//! # Notes
//! Pure authorization rules live in `pagegate_authz`; this crate adds I/O.
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod model;
pub mod observability;
pub mod store;
