//! Page and module catalog handlers.
//!
//! Read-only views of the compile-time catalog; no store access.
use crate::api::error::{ApiError, api_validation_error};
use crate::api::types::{
    ModuleInfo, ModuleListResponse, PageInfo, PageListResponse, ResolvePathResponse,
};
use crate::app::AppState;
use axum::Json;
use axum::extract::{Query, State};
use pagegate_authz::{Module, Page, resolve_path};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResolvePathQuery {
    /// Concrete request path, e.g. `/blog/42/edit`.
    pub path: String,
}

#[utoipa::path(
    get,
    path = "/v1/pages",
    tag = "catalog",
    responses(
        (status = 200, description = "Page catalog in catalog order", body = PageListResponse)
    )
)]
pub(crate) async fn list_pages(State(state): State<AppState>) -> Json<PageListResponse> {
    let catalog = state.decisions.resolver().catalog();
    let items = Page::ALL
        .into_iter()
        .map(|page| PageInfo {
            key: page.path().to_string(),
            display_name: page.display_name().to_string(),
            dynamic: page.is_dynamic(),
            module: Module::of_page(page).map(|module| module.as_str().to_string()),
            route_permissions: catalog.route_permissions(page).to_vec(),
        })
        .collect();
    Json(PageListResponse { items })
}

#[utoipa::path(
    get,
    path = "/v1/pages/resolve",
    tag = "catalog",
    params(ResolvePathQuery),
    responses(
        (status = 200, description = "Catalog page for the path", body = ResolvePathResponse),
        (status = 400, description = "No page matches", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn resolve_page_path(
    Query(query): Query<ResolvePathQuery>,
) -> Result<Json<ResolvePathResponse>, ApiError> {
    let page = resolve_path(&query.path).map_err(|err| api_validation_error(&err.to_string()))?;
    Ok(Json(ResolvePathResponse {
        path: query.path,
        page: page.path().to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/v1/modules",
    tag = "catalog",
    responses(
        (status = 200, description = "Admin console modules", body = ModuleListResponse)
    )
)]
pub(crate) async fn list_modules() -> Json<ModuleListResponse> {
    let items = Module::ALL
        .into_iter()
        .map(|module| ModuleInfo {
            id: module.as_str().to_string(),
            name: module.name().to_string(),
            description: module.description().to_string(),
            pages: module
                .pages()
                .iter()
                .map(|page| page.path().to_string())
                .collect(),
            capabilities: module
                .capabilities()
                .iter()
                .map(|capability| capability.as_str().to_string())
                .collect(),
        })
        .collect();
    Json(ModuleListResponse { items })
}
