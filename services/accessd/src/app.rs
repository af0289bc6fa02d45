//! Access service HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::api::types::FeatureFlags;
use crate::auth;
use crate::auth::rbac::{AccessDecision, PermissionResolver};
use crate::observability;
use crate::store::AccessStore;
use axum::Router;
use pagegate_authz::RoleCatalog;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub api_version: String,
    pub features: FeatureFlags,
    pub store: Arc<dyn AccessStore>,
    pub decisions: AccessDecision,
}

impl AppState {
    pub fn new(store: Arc<dyn AccessStore>, catalog: RoleCatalog) -> Self {
        let resolver = PermissionResolver::new(store.clone(), Arc::new(catalog));
        Self {
            api_version: "v1".to_string(),
            features: FeatureFlags {
                durable_storage: store.is_durable(),
            },
            store,
            decisions: AccessDecision::new(resolver),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });

    Router::new()
        .route(
            "/v1/system/info",
            axum::routing::get(api::system::system_info),
        )
        .route(
            "/v1/system/health",
            axum::routing::get(api::system::system_health),
        )
        .route("/v1/pages", axum::routing::get(api::catalog::list_pages))
        .route(
            "/v1/pages/resolve",
            axum::routing::get(api::catalog::resolve_page_path),
        )
        .route("/v1/modules", axum::routing::get(api::catalog::list_modules))
        .route(
            "/v1/identities",
            axum::routing::get(api::identities::list_identities),
        )
        .route(
            "/v1/identities/sign-in",
            axum::routing::post(api::identities::sign_in),
        )
        .route(
            "/v1/identities/:identity_id",
            axum::routing::get(api::identities::get_identity),
        )
        .route(
            "/v1/identities/:identity_id/roles",
            axum::routing::put(auth::admin::set_identity_roles),
        )
        .route(
            "/v1/identities/:identity_id/pages",
            axum::routing::get(api::identities::identity_pages),
        )
        .route("/v1/decisions", axum::routing::post(api::decisions::decide))
        .route(
            "/v1/decisions/module",
            axum::routing::post(api::decisions::decide_module),
        )
        .route(
            "/v1/decisions/route",
            axum::routing::post(api::decisions::decide_route),
        )
        .route(
            "/v1/role-access",
            axum::routing::get(api::role_access::role_access_matrix)
                .put(auth::admin::upsert_page_access),
        )
        .route(
            "/v1/role-access/modules/:module",
            axum::routing::put(auth::admin::set_module_capability),
        )
        .merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs").url("/v1/openapi.json", ApiDoc::openapi()),
        )
        .layer(trace_layer)
        .with_state(state)
}
