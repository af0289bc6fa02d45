//! Role access matrix handler.
//!
//! Read side of the admin console: the defaulted grant of every role on every
//! catalog page. Writes live in [`crate::auth::admin`].
use crate::api::error::{ApiError, api_store_error};
use crate::api::types::{MatrixPage, PageGrant, RoleAccessMatrixResponse};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;
use pagegate_authz::Page;
use std::collections::BTreeMap;

#[utoipa::path(
    get,
    path = "/v1/role-access",
    tag = "role-access",
    responses(
        (status = 200, description = "Defaulted grants for every role and page", body = RoleAccessMatrixResponse),
        (status = 503, description = "Storage unavailable", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn role_access_matrix(
    State(state): State<AppState>,
) -> Result<Json<RoleAccessMatrixResponse>, ApiError> {
    let cells = state
        .decisions
        .resolver()
        .access_matrix()
        .await
        .map_err(|err| api_store_error("failed to load role access", err))?;
    let mut roles: BTreeMap<String, BTreeMap<String, PageGrant>> = BTreeMap::new();
    for cell in cells {
        roles
            .entry(cell.role.as_str().to_string())
            .or_default()
            .insert(cell.page.path().to_string(), cell.grant.into());
    }
    let pages = Page::ALL
        .into_iter()
        .map(|page| MatrixPage {
            key: page.path().to_string(),
            display_name: page.display_name().to_string(),
        })
        .collect();
    Ok(Json(RoleAccessMatrixResponse { pages, roles }))
}
