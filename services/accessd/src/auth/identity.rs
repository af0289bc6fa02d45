//! Identity sign-in and role assignment.
//!
//! # Purpose
//! Derives stable identity IDs from an upstream `(issuer, subject)` pair,
//! provisions first-time identities with the default role, and replaces the
//! role list of existing identities.
//!
//! # Key invariants
//! - The same `(issuer, subject)` always maps to the same identity ID.
//! - Sign-in never changes the roles of an identity that already exists.
use crate::auth::rbac::PermissionResolver;
use crate::model::IdentityRecord;
use crate::store::{IdentityRoleStore, StoreResult};
use pagegate_authz::{DEFAULT_ROLE, Role, RoleSet};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

pub fn identity_id(issuer: &str, subject: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(issuer.as_bytes());
    hasher.update(b"|");
    hasher.update(subject.as_bytes());
    hex::encode(hasher.finalize())
}

/// Result of a sign-in: the stored identity plus its coarse permissions.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub identity: IdentityRecord,
    pub permissions: BTreeSet<String>,
}

pub async fn sign_in(
    resolver: &PermissionResolver,
    issuer: &str,
    subject: &str,
) -> StoreResult<SignIn> {
    let id = identity_id(issuer, subject);
    let identity = resolver.store().ensure_identity(&id, DEFAULT_ROLE).await?;
    let permissions = resolver
        .catalog()
        .permissions_for_roles(identity.roles.as_slice());
    tracing::info!(identity_id = %id, role = %identity.primary_role(), "identity signed in");
    Ok(SignIn {
        identity,
        permissions,
    })
}

/// Replace the roles of `identity_id` with the parsed `roles`.
pub async fn assign_roles<T, S>(
    store: &T,
    identity_id: &str,
    roles: &[S],
) -> StoreResult<IdentityRecord>
where
    T: IdentityRoleStore + ?Sized,
    S: AsRef<str>,
{
    let roles = RoleSet::new(Role::parse_list(roles)?)?;
    let record = store.set_roles(identity_id, roles).await?;
    tracing::info!(identity_id, roles = ?record.roles, "identity roles updated");
    Ok(record)
}

/// Promote each configured identity to `admin`.
pub async fn seed_admins<T>(store: &T, identity_ids: &[String]) -> StoreResult<()>
where
    T: IdentityRoleStore + ?Sized,
{
    for id in identity_ids {
        store.set_roles(id, RoleSet::single(Role::Admin)).await?;
        tracing::info!(identity_id = %id, "seeded admin identity");
    }
    Ok(())
}
