//! Role lists held by identities.
//!
//! # Purpose
//! Wraps the ordered, non-empty role list an identity holds.
//!
//! # Key invariants
//! - `RoleSet` is never empty and holds no duplicates.
//! - The first role is the primary role (used for display only); checks use
//!   the whole set.
//!
//! # Examples
//! ```rust
//! use pagegate_authz::{Role, RoleSet};
//!
//! let roles = RoleSet::new(vec![Role::Editor, Role::Viewer]).unwrap();
//! assert_eq!(roles.primary(), Role::Editor);
//! assert!(!roles.is_admin());
//! ```
use crate::{AuthzError, AuthzResult, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Role>", into = "Vec<Role>")]
pub struct RoleSet(Vec<Role>);

impl RoleSet {
    pub fn new(roles: Vec<Role>) -> AuthzResult<Self> {
        let mut unique = Vec::with_capacity(roles.len());
        for role in roles {
            if !unique.contains(&role) {
                unique.push(role);
            }
        }
        if unique.is_empty() {
            return Err(AuthzError::EmptyRoles);
        }
        Ok(Self(unique))
    }

    pub fn single(role: Role) -> Self {
        Self(vec![role])
    }

    pub fn primary(&self) -> Role {
        self.0[0]
    }

    pub fn is_admin(&self) -> bool {
        self.0.iter().any(|role| role.is_admin())
    }

    pub fn as_slice(&self) -> &[Role] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }
}

impl TryFrom<Vec<Role>> for RoleSet {
    type Error = AuthzError;

    fn try_from(value: Vec<Role>) -> Result<Self, Self::Error> {
        RoleSet::new(value)
    }
}

impl From<RoleSet> for Vec<Role> {
    fn from(value: RoleSet) -> Self {
        value.0
    }
}
