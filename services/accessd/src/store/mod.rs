//! Persistence interfaces for identity roles and page access overrides.
//!
//! # Purpose
//! Declares the two store traits the resolver reads from and the admin
//! endpoints write to, plus the shared error type.
//!
//! # Key invariants
//! - `admin` never has page access rows; every backend rejects such writes
//!   with [`StoreError::Validation`].
//! - At most one page access row exists per (role, page).
//! - `update_capability` reads and writes every page under one lock or
//!   transaction, so concurrent module updates never drop each other's change.
//! - I/O failures surface as [`StoreError::Unavailable`]; callers must not
//!   translate them into an allow.
use crate::model::{IdentityRecord, PageAccessEntry};
use async_trait::async_trait;
use pagegate_authz::{AccessRecord, AuthzError, Capability, Page, Role, RoleSet, StoredAccess};
use thiserror::Error;

pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Validation(#[from] AuthzError),
    #[error("store unavailable: {0}")]
    Unavailable(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unavailable(err.into())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Unavailable(err.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait IdentityRoleStore: Send + Sync {
    async fn get_identity(&self, identity_id: &str) -> StoreResult<Option<IdentityRecord>>;
    /// Return the identity, creating it with `default_role` if it was never seen.
    async fn ensure_identity(
        &self,
        identity_id: &str,
        default_role: Role,
    ) -> StoreResult<IdentityRecord>;
    /// Replace the role list, creating the identity if needed.
    async fn set_roles(&self, identity_id: &str, roles: RoleSet) -> StoreResult<IdentityRecord>;
    async fn list_identities(&self) -> StoreResult<Vec<IdentityRecord>>;
}

#[async_trait]
pub trait PageAccessStore: Send + Sync {
    async fn get_access(&self, role: Role, page: Page) -> StoreResult<AccessRecord>;
    async fn upsert_access(
        &self,
        role: Role,
        page: Page,
        access: StoredAccess,
    ) -> StoreResult<PageAccessEntry>;
    /// Set `capability` to `value` on every page in `pages` for `role`.
    ///
    /// Each page starts from its current defaulted grant and is stored fully
    /// explicit. The read and the write happen atomically across all pages.
    async fn update_capability(
        &self,
        role: Role,
        pages: &[Page],
        capability: Capability,
        value: bool,
    ) -> StoreResult<Vec<PageAccessEntry>>;
    /// All rows ordered by role, then catalog page order.
    async fn list_access(&self) -> StoreResult<Vec<PageAccessEntry>>;
}

#[async_trait]
pub trait AccessStore: IdentityRoleStore + PageAccessStore {
    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authz_errors_become_validation_errors() {
        let err: StoreError = AuthzError::AdminOverride.into();
        assert!(matches!(err, StoreError::Validation(AuthzError::AdminOverride)));
    }

    #[test]
    fn sqlx_errors_become_unavailable() {
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(err.to_string().starts_with("store unavailable"));
    }
}
