//! OpenAPI schema aggregation for the accessd API.
//!
//! # Purpose
//! Collects all routes and schema types into a single OpenAPI document for docs
//! and client generation.
use crate::api::{
    catalog, decisions, identities, role_access, system,
    types::{
        DecisionRequest, DecisionResponse, ErrorResponse, FeatureFlags, HealthStatus,
        IdentityListResponse, IdentityPagesResponse, IdentityResponse, MatrixPage,
        ModuleDecisionRequest, ModuleInfo, ModuleListResponse, ModuleUpdateRequest,
        ModuleUpdateResponse, PageGrant, PageInfo, PageListResponse, ResolvePathResponse,
        RoleAccessMatrixResponse, RouteDecisionRequest, SetRolesRequest, SignInRequest,
        SignInResponse, SystemInfo, UpsertPageAccessRequest,
    },
};
use crate::auth::admin;
use crate::model::{IdentityRecord, PageAccessEntry};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "pagegate-accessd",
        version = "v1",
        description = "PageGate role and page access HTTP API"
    ),
    paths(
        system::system_info,
        system::system_health,
        catalog::list_pages,
        catalog::resolve_page_path,
        catalog::list_modules,
        identities::sign_in,
        identities::list_identities,
        identities::get_identity,
        identities::identity_pages,
        admin::set_identity_roles,
        decisions::decide,
        decisions::decide_module,
        decisions::decide_route,
        role_access::role_access_matrix,
        admin::upsert_page_access,
        admin::set_module_capability
    ),
    components(schemas(
        FeatureFlags,
        SystemInfo,
        HealthStatus,
        ErrorResponse,
        PageInfo,
        PageListResponse,
        ResolvePathResponse,
        ModuleInfo,
        ModuleListResponse,
        SignInRequest,
        SignInResponse,
        IdentityRecord,
        IdentityListResponse,
        IdentityResponse,
        SetRolesRequest,
        PageGrant,
        IdentityPagesResponse,
        DecisionRequest,
        ModuleDecisionRequest,
        RouteDecisionRequest,
        DecisionResponse,
        MatrixPage,
        RoleAccessMatrixResponse,
        PageAccessEntry,
        UpsertPageAccessRequest,
        ModuleUpdateRequest,
        ModuleUpdateResponse
    )),
    tags(
        (name = "system", description = "System and discovery endpoints"),
        (name = "catalog", description = "Page and module catalog"),
        (name = "identities", description = "Identity sign-in and lookup"),
        (name = "decisions", description = "Access decisions"),
        (name = "role-access", description = "Role access matrix"),
        (name = "admin", description = "Admin console updates")
    )
)]
pub struct ApiDoc;
