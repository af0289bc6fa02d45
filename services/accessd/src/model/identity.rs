//! Identity role records.
//!
//! # Purpose
//! Defines the persisted role assignment for one identity.
use chrono::{DateTime, Utc};
use pagegate_authz::{Role, RoleSet};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct IdentityRecord {
    pub identity_id: String,
    #[schema(value_type = Vec<String>, example = json!(["viewer"]))]
    pub roles: RoleSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IdentityRecord {
    pub fn new(identity_id: impl Into<String>, roles: RoleSet) -> Self {
        let now = Utc::now();
        Self {
            identity_id: identity_id.into(),
            roles,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn primary_role(&self) -> Role {
        self.roles.primary()
    }
}
