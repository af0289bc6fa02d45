use crate::{AuthzError, AuthzResult};
use serde::{Deserialize, Serialize};

/// Closed set of roles an identity may hold.
///
/// `Admin` is special-cased everywhere: it bypasses the permission table and
/// the page access store, and it never has stored page overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Editor,
    Viewer,
}

/// Role assigned to identities the first time they are seen.
pub const DEFAULT_ROLE: Role = Role::Viewer;

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Editor, Role::Viewer];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Parse a list of raw role names, rejecting unknown names and empty lists.
    ///
    /// Duplicates are dropped; first occurrence wins so the primary role is kept.
    pub fn parse_list<S: AsRef<str>>(raw: &[S]) -> AuthzResult<Vec<Role>> {
        let mut roles = Vec::with_capacity(raw.len());
        for value in raw {
            let role: Role = value.as_ref().parse()?;
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        if roles.is_empty() {
            return Err(AuthzError::EmptyRoles);
        }
        Ok(roles)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            "viewer" => Ok(Role::Viewer),
            other => Err(AuthzError::InvalidRole(other.to_string())),
        }
    }
}
