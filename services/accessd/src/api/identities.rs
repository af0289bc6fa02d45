//! Identity handlers: sign-in, lookup, and per-page capability listing.
use crate::api::error::{ApiError, api_not_found, api_store_error, api_validation_error};
use crate::api::types::{
    IdentityListResponse, IdentityPagesResponse, IdentityResponse, PageGrant, SignInRequest,
    SignInResponse,
};
use crate::app::AppState;
use crate::auth::identity;
use axum::Json;
use axum::extract::{Path, State};

#[utoipa::path(
    post,
    path = "/v1/identities/sign-in",
    tag = "identities",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Identity provisioned or loaded", body = SignInResponse),
        (status = 400, description = "Missing issuer or subject", body = crate::api::types::ErrorResponse),
        (status = 503, description = "Storage unavailable", body = crate::api::types::ErrorResponse)
    )
)]
/// Record a sign-in from an upstream identity provider.
///
/// First-time identities are created with the default role; existing ones
/// keep their roles.
pub(crate) async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, ApiError> {
    if body.issuer.trim().is_empty() || body.subject.trim().is_empty() {
        return Err(api_validation_error("issuer and subject are required"));
    }
    let signed_in = identity::sign_in(state.decisions.resolver(), &body.issuer, &body.subject)
        .await
        .map_err(|err| api_store_error("failed to sign in", err))?;
    Ok(Json(SignInResponse {
        role: signed_in.identity.primary_role().to_string(),
        identity: signed_in.identity,
        permissions: signed_in.permissions.into_iter().collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/v1/identities",
    tag = "identities",
    responses(
        (status = 200, description = "Known identities", body = IdentityListResponse)
    )
)]
pub(crate) async fn list_identities(
    State(state): State<AppState>,
) -> Result<Json<IdentityListResponse>, ApiError> {
    let items = state
        .store
        .list_identities()
        .await
        .map_err(|err| api_store_error("failed to list identities", err))?;
    Ok(Json(IdentityListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/v1/identities/{identity_id}",
    tag = "identities",
    params(("identity_id" = String, Path, description = "Identity identifier")),
    responses(
        (status = 200, description = "Identity and coarse permissions", body = IdentityResponse),
        (status = 404, description = "Identity not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_identity(
    Path(identity_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<IdentityResponse>, ApiError> {
    let identity = state
        .store
        .get_identity(&identity_id)
        .await
        .map_err(|err| api_store_error("failed to load identity", err))?
        .ok_or_else(|| api_not_found("identity not found"))?;
    let permissions = state
        .decisions
        .resolver()
        .catalog()
        .permissions_for_roles(identity.roles.as_slice())
        .into_iter()
        .collect();
    Ok(Json(IdentityResponse {
        identity,
        permissions,
    }))
}

#[utoipa::path(
    get,
    path = "/v1/identities/{identity_id}/pages",
    tag = "identities",
    params(("identity_id" = String, Path, description = "Identity identifier")),
    responses(
        (status = 200, description = "Resolved capabilities on every page", body = IdentityPagesResponse),
        (status = 503, description = "Storage unavailable", body = crate::api::types::ErrorResponse)
    )
)]
/// Resolved capabilities on every catalog page. Unknown identities get
/// all-false grants rather than 404.
pub(crate) async fn identity_pages(
    Path(identity_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<IdentityPagesResponse>, ApiError> {
    let resolved = state
        .decisions
        .resolver()
        .resolve_all_pages(&identity_id)
        .await
        .map_err(|err| api_store_error("failed to resolve pages", err))?;
    let pages = resolved
        .into_iter()
        .map(|(page, grant)| (page.path().to_string(), PageGrant::from(grant)))
        .collect();
    Ok(Json(IdentityPagesResponse { identity_id, pages }))
}
