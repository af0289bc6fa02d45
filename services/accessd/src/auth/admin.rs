//! Admin console endpoints for role assignment and page access overrides.
//!
//! # Purpose
//! Provides privileged endpoints that change who holds which role and what
//! each non-admin role may do on each page.
//!
//! # Security considerations
//! - The caller is identified by the `x-identity-id` header, which the
//!   upstream authenticating proxy sets. Requests without it get 401.
//! - The caller needs the coarse `admin.dashboard` route permission and page
//!   View on `/admin`. View alone is not enough: `/admin` defaults to viewable
//!   for every role without a stored row.
//! - A store failure during either check rejects the request with 503.
use crate::api::error::{
    ApiError, api_forbidden, api_store_error, api_unauthorized, api_validation_error,
};
use crate::api::types::{
    ModuleUpdateRequest, ModuleUpdateResponse, SetRolesRequest, UpsertPageAccessRequest,
};
use crate::app::AppState;
use crate::auth::identity::assign_roles;
use crate::auth::rbac::modules;
use crate::model::{IdentityRecord, PageAccessEntry};
use crate::observability::record_access_upsert;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use pagegate_authz::{Capability, Module, Page, Role, StoredAccess};

pub const IDENTITY_HEADER: &str = "x-identity-id";

#[utoipa::path(
    put,
    path = "/v1/identities/{identity_id}/roles",
    tag = "admin",
    params(("identity_id" = String, Path, description = "Identity identifier")),
    request_body = SetRolesRequest,
    responses(
        (status = 200, description = "Roles replaced", body = IdentityRecord),
        (status = 400, description = "Unknown role or empty list", body = crate::api::types::ErrorResponse),
        (status = 401, description = "Missing caller identity", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Caller may not use the admin console", body = crate::api::types::ErrorResponse)
    )
)]
pub async fn set_identity_roles(
    Path(identity_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SetRolesRequest>,
) -> Result<Json<IdentityRecord>, ApiError> {
    let caller = require_admin_console(&state, &headers).await?;
    let record = assign_roles(state.store.as_ref(), &identity_id, &body.roles)
        .await
        .map_err(|err| api_store_error("failed to update roles", err))?;
    tracing::info!(caller = %caller, identity_id = %identity_id, "roles changed by admin");
    Ok(Json(record))
}

#[utoipa::path(
    put,
    path = "/v1/role-access",
    tag = "admin",
    request_body = UpsertPageAccessRequest,
    responses(
        (status = 200, description = "Override stored", body = PageAccessEntry),
        (status = 400, description = "Unknown role or page, or admin role", body = crate::api::types::ErrorResponse),
        (status = 401, description = "Missing caller identity", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Caller may not use the admin console", body = crate::api::types::ErrorResponse)
    )
)]
/// Store the override for one (role, page) pair. Omitted capabilities stay
/// unset and fall back to the defaults on read.
pub async fn upsert_page_access(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<UpsertPageAccessRequest>,
) -> Result<Json<PageAccessEntry>, ApiError> {
    require_admin_console(&state, &headers).await?;
    let role = parse_role(&body.role)?;
    let page = Page::parse_key(&body.page).map_err(|err| api_validation_error(&err.to_string()))?;
    let access = StoredAccess {
        can_view: body.can_view,
        can_add: body.can_add,
        can_edit: body.can_edit,
        can_delete: body.can_delete,
    };
    let entry = state
        .store
        .upsert_access(role, page, access)
        .await
        .map_err(|err| api_store_error("failed to store page access", err))?;
    record_access_upsert("page", 1);
    Ok(Json(entry))
}

#[utoipa::path(
    put,
    path = "/v1/role-access/modules/{module}",
    tag = "admin",
    params(("module" = String, Path, description = "Module identifier")),
    request_body = ModuleUpdateRequest,
    responses(
        (status = 200, description = "Every page of the module updated", body = ModuleUpdateResponse),
        (status = 400, description = "Unknown module, role, or capability", body = crate::api::types::ErrorResponse),
        (status = 401, description = "Missing caller identity", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Caller may not use the admin console", body = crate::api::types::ErrorResponse)
    )
)]
pub async fn set_module_capability(
    Path(module): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ModuleUpdateRequest>,
) -> Result<Json<ModuleUpdateResponse>, ApiError> {
    require_admin_console(&state, &headers).await?;
    let module = module
        .parse::<Module>()
        .map_err(|err| api_validation_error(&err.to_string()))?;
    let role = parse_role(&body.role)?;
    let capability = body
        .capability
        .parse::<Capability>()
        .map_err(|err| api_validation_error(&err.to_string()))?;
    let items = modules::set_module_capability(
        state.decisions.resolver(),
        role,
        module,
        capability,
        body.value,
    )
    .await
    .map_err(|err| api_store_error("failed to update module access", err))?;
    let grant = state
        .decisions
        .resolver()
        .module_grant(role, module)
        .await
        .map_err(|err| api_store_error("failed to read module access", err))?;
    Ok(Json(ModuleUpdateResponse {
        module: module.as_str().to_string(),
        items,
        grant: grant.into(),
    }))
}

/// Resolve the caller and require both the `/admin` route permission and
/// View on `/admin`. Returns the caller id.
pub(crate) async fn require_admin_console(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<String, ApiError> {
    let caller =
        extract_identity(headers).ok_or_else(|| api_unauthorized("missing caller identity"))?;
    let route = state
        .decisions
        .can_access_route(caller, Page::Admin)
        .await
        .map_err(|err| api_store_error("failed to check admin access", err))?;
    if !route {
        tracing::warn!(caller, "admin console denied: missing admin.dashboard");
        return Err(api_forbidden("admin console access required"));
    }
    let view = state
        .decisions
        .can_perform(caller, Page::Admin, Capability::View)
        .await
        .map_err(|err| api_store_error("failed to check admin access", err))?;
    if !view {
        return Err(api_forbidden("admin console access required"));
    }
    Ok(caller.to_string())
}

fn extract_identity(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(IDENTITY_HEADER)?.to_str().ok()?.trim();
    (!value.is_empty()).then_some(value)
}

fn parse_role(raw: &str) -> Result<Role, ApiError> {
    raw.parse::<Role>()
        .map_err(|err| api_validation_error(&err.to_string()))
}
