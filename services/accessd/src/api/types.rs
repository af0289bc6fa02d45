//! HTTP API request/response types.
//!
//! # Purpose
//! Defines shared payload shapes for the accessd REST API and OpenAPI schema
//! generation. Capability fields use the camelCase names admin clients expect.
use crate::model::{IdentityRecord, PageAccessEntry};
use pagegate_authz::PageCapabilities;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct FeatureFlags {
    pub durable_storage: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SystemInfo {
    pub api_version: String,
    pub storage_backend: String,
    pub features: FeatureFlags,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct PageInfo {
    pub key: String,
    pub display_name: String,
    pub dynamic: bool,
    pub module: Option<String>,
    /// Coarse permissions required by the route guard; empty when unguarded.
    pub route_permissions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct PageListResponse {
    pub items: Vec<PageInfo>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ResolvePathResponse {
    pub path: String,
    pub page: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ModuleInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub pages: Vec<String>,
    pub capabilities: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ModuleListResponse {
    pub items: Vec<ModuleInfo>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SignInRequest {
    pub issuer: String,
    pub subject: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SignInResponse {
    pub identity: IdentityRecord,
    pub role: String,
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct IdentityListResponse {
    pub items: Vec<IdentityRecord>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct IdentityResponse {
    pub identity: IdentityRecord,
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SetRolesRequest {
    pub roles: Vec<String>,
}

/// Fully defaulted capabilities on one page.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageGrant {
    pub can_view: bool,
    pub can_add: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl From<PageCapabilities> for PageGrant {
    fn from(value: PageCapabilities) -> Self {
        Self {
            can_view: value.can_view,
            can_add: value.can_add,
            can_edit: value.can_edit,
            can_delete: value.can_delete,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct IdentityPagesResponse {
    pub identity_id: String,
    /// Keyed by page path.
    pub pages: BTreeMap<String, PageGrant>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct DecisionRequest {
    pub identity_id: String,
    /// Catalog key such as `/blog/[id]` or a concrete path such as `/blog/42`.
    pub page: String,
    pub action: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ModuleDecisionRequest {
    pub identity_id: String,
    pub module: String,
    pub action: String,
}

/// Coarse route check: the identity's catalog permissions against the page's
/// route requirements.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct RouteDecisionRequest {
    pub identity_id: String,
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct DecisionResponse {
    pub allowed: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct MatrixPage {
    pub key: String,
    pub display_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct RoleAccessMatrixResponse {
    pub pages: Vec<MatrixPage>,
    /// role -> page -> defaulted grant; admin is always all-true.
    pub roles: BTreeMap<String, BTreeMap<String, PageGrant>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpsertPageAccessRequest {
    pub role: String,
    pub page: String,
    #[serde(default)]
    pub can_view: Option<bool>,
    #[serde(default)]
    pub can_add: Option<bool>,
    #[serde(default)]
    pub can_edit: Option<bool>,
    #[serde(default)]
    pub can_delete: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ModuleUpdateRequest {
    pub role: String,
    pub capability: String,
    pub value: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ModuleUpdateResponse {
    pub module: String,
    pub items: Vec<PageAccessEntry>,
    /// Module-wide grant for the role after the update: a capability is set
    /// only when every page of the module allows it.
    pub grant: PageGrant,
}
