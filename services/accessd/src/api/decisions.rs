//! Access decision handlers.
//!
//! # Purpose
//! Answers "may this identity do this action on this page (or module)?" for
//! route guards and UI clients.
//!
//! # Security considerations
//! - A store failure is reported as 503, never as `allowed: true`.
//! - Unknown identities are answered with `allowed: false`, not 404, so the
//!   endpoint does not reveal which identities exist.
use crate::api::error::{ApiError, api_store_error, api_validation_error};
use crate::api::types::{
    DecisionRequest, DecisionResponse, ModuleDecisionRequest, RouteDecisionRequest,
};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;
use pagegate_authz::{AuthzResult, Capability, Module, Page, resolve_path};

/// Accept either a catalog key or a concrete request path.
pub(crate) fn parse_page(raw: &str) -> AuthzResult<Page> {
    Page::parse_key(raw).or_else(|_| resolve_path(raw))
}

#[utoipa::path(
    post,
    path = "/v1/decisions",
    tag = "decisions",
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Decision", body = DecisionResponse),
        (status = 400, description = "Unknown page or action", body = crate::api::types::ErrorResponse),
        (status = 503, description = "Storage unavailable", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn decide(
    State(state): State<AppState>,
    Json(body): Json<DecisionRequest>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let page = parse_page(&body.page).map_err(|err| api_validation_error(&err.to_string()))?;
    let capability = body
        .action
        .parse::<Capability>()
        .map_err(|err| api_validation_error(&err.to_string()))?;
    let allowed = state
        .decisions
        .can_perform(&body.identity_id, page, capability)
        .await
        .map_err(|err| api_store_error("access check failed", err))?;
    tracing::debug!(
        identity_id = %body.identity_id,
        page = %page,
        capability = %capability,
        allowed,
        "page decision"
    );
    Ok(Json(DecisionResponse { allowed }))
}

#[utoipa::path(
    post,
    path = "/v1/decisions/module",
    tag = "decisions",
    request_body = ModuleDecisionRequest,
    responses(
        (status = 200, description = "Decision across every page of the module", body = DecisionResponse),
        (status = 400, description = "Unknown module or action", body = crate::api::types::ErrorResponse),
        (status = 503, description = "Storage unavailable", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn decide_module(
    State(state): State<AppState>,
    Json(body): Json<ModuleDecisionRequest>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let module = body
        .module
        .parse::<Module>()
        .map_err(|err| api_validation_error(&err.to_string()))?;
    let capability = body
        .action
        .parse::<Capability>()
        .map_err(|err| api_validation_error(&err.to_string()))?;
    let allowed = state
        .decisions
        .can_perform_on_module(&body.identity_id, module.pages(), capability)
        .await
        .map_err(|err| api_store_error("access check failed", err))?;
    Ok(Json(DecisionResponse { allowed }))
}

#[utoipa::path(
    post,
    path = "/v1/decisions/route",
    tag = "decisions",
    request_body = RouteDecisionRequest,
    responses(
        (status = 200, description = "Coarse route decision", body = DecisionResponse),
        (status = 400, description = "Unknown page", body = crate::api::types::ErrorResponse),
        (status = 503, description = "Storage unavailable", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn decide_route(
    State(state): State<AppState>,
    Json(body): Json<RouteDecisionRequest>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let page = parse_page(&body.path).map_err(|err| api_validation_error(&err.to_string()))?;
    let allowed = state
        .decisions
        .can_access_route(&body.identity_id, page)
        .await
        .map_err(|err| api_store_error("route check failed", err))?;
    Ok(Json(DecisionResponse { allowed }))
}
