mod common;

use accessd::app::{AppState, build_router};
use accessd::auth::identity::{identity_id, seed_admins};
use accessd::store::memory::InMemoryStore;
use axum::http::StatusCode;
use common::read_json;
use http_helpers::{get_request, json_request, json_request_as};
use pagegate_authz::RoleCatalog;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

type App = axum::routing::RouterIntoService<axum::body::Body, ()>;

async fn app_with_admin(admin: &str) -> App {
    let store = InMemoryStore::new();
    seed_admins(&store, &[admin.to_string()])
        .await
        .expect("seed admin");
    build_router(AppState::new(Arc::new(store), RoleCatalog::standard())).into_service()
}

async fn sign_in(app: &App, subject: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/identities/sign-in",
            json!({"issuer": "https://accounts.example.com", "subject": subject}),
        ))
        .await
        .expect("sign in");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    body["identity"]["identity_id"]
        .as_str()
        .expect("identity id")
        .to_string()
}

async fn decide(app: &App, identity: &str, page: &str, action: &str) -> bool {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/decisions",
            json!({"identity_id": identity, "page": page, "action": action}),
        ))
        .await
        .expect("decision");
    assert_eq!(response.status(), StatusCode::OK);
    read_json(response).await["allowed"]
        .as_bool()
        .expect("allowed")
}

async fn decide_module(app: &App, identity: &str, module: &str, action: &str) -> bool {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/decisions/module",
            json!({"identity_id": identity, "module": module, "action": action}),
        ))
        .await
        .expect("module decision");
    assert_eq!(response.status(), StatusCode::OK);
    read_json(response).await["allowed"]
        .as_bool()
        .expect("allowed")
}

async fn decide_route(app: &App, identity: &str, path: &str) -> bool {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/decisions/route",
            json!({"identity_id": identity, "path": path}),
        ))
        .await
        .expect("route decision");
    assert_eq!(response.status(), StatusCode::OK);
    read_json(response).await["allowed"]
        .as_bool()
        .expect("allowed")
}

#[tokio::test]
async fn system_and_catalog_endpoints() {
    let app = app_with_admin("root").await;

    let response = app
        .clone()
        .oneshot(get_request("/v1/system/info"))
        .await
        .expect("info");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["storage_backend"], "memory");
    assert_eq!(body["features"]["durable_storage"], false);

    let response = app
        .clone()
        .oneshot(get_request("/v1/system/health"))
        .await
        .expect("health");
    assert_eq!(read_json(response).await["status"], "ok");

    let response = app
        .clone()
        .oneshot(get_request("/v1/pages"))
        .await
        .expect("pages");
    let body = read_json(response).await;
    let items = body["items"].as_array().expect("items");
    assert_eq!(items.len(), 8);
    assert_eq!(items[0]["key"], "/admin");
    assert_eq!(items[0]["route_permissions"], json!(["admin.dashboard"]));
    assert_eq!(items[5]["key"], "/blog/[id]");
    assert_eq!(items[5]["dynamic"], true);
    assert_eq!(items[5]["module"], "blog");

    let response = app
        .clone()
        .oneshot(get_request("/v1/modules"))
        .await
        .expect("modules");
    let body = read_json(response).await;
    let profile = &body["items"][0];
    assert_eq!(profile["id"], "profile");
    assert_eq!(profile["capabilities"], json!(["view", "edit"]));

    let response = app
        .clone()
        .oneshot(get_request("/v1/pages/resolve?path=/blog/42/edit"))
        .await
        .expect("resolve");
    assert_eq!(read_json(response).await["page"], "/blog/[id]/edit");

    let response = app
        .clone()
        .oneshot(get_request("/v1/pages/resolve?path=/settings"))
        .await
        .expect("resolve");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get_request("/v1/openapi.json"))
        .await
        .expect("openapi");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn first_sign_in_is_viewer_with_default_grants() {
    let app = app_with_admin("root").await;
    let id = sign_in(&app, "alice").await;
    assert_eq!(id, identity_id("https://accounts.example.com", "alice"));

    let response = app
        .clone()
        .oneshot(get_request(&format!("/v1/identities/{id}")))
        .await
        .expect("identity");
    let body = read_json(response).await;
    assert_eq!(body["identity"]["roles"], json!(["viewer"]));
    assert!(
        body["permissions"]
            .as_array()
            .expect("permissions")
            .contains(&json!("posts.read"))
    );

    let response = app
        .clone()
        .oneshot(get_request(&format!("/v1/identities/{id}/pages")))
        .await
        .expect("pages");
    let body = read_json(response).await;
    assert_eq!(
        body["pages"]["/profile"],
        json!({"canView": true, "canAdd": true, "canEdit": true, "canDelete": true})
    );
    assert_eq!(
        body["pages"]["/blog/create"],
        json!({"canView": true, "canAdd": false, "canEdit": false, "canDelete": false})
    );

    // Signing in again keeps the same record.
    assert_eq!(sign_in(&app, "alice").await, id);
    let response = app
        .clone()
        .oneshot(get_request("/v1/identities"))
        .await
        .expect("list");
    assert_eq!(
        read_json(response).await["items"]
            .as_array()
            .expect("items")
            .len(),
        2
    );
}

#[tokio::test]
async fn decisions_follow_defaults_and_deny_unknown_identities() {
    let app = app_with_admin("root").await;
    let viewer = sign_in(&app, "vic").await;

    assert!(decide(&app, &viewer, "/blog/42", "view").await);
    assert!(decide(&app, &viewer, "/profile", "update").await);
    assert!(!decide(&app, &viewer, "/blog/create", "add").await);
    assert!(!decide(&app, &viewer, "/blog/[id]/edit", "edit").await);

    assert!(!decide(&app, "never-signed-in", "/dashboard", "view").await);
    assert!(!decide(&app, "never-signed-in", "/profile", "view").await);

    assert!(decide(&app, "root", "/admin", "delete").await);
    assert!(decide_module(&app, "root", "blog", "delete").await);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/decisions",
            json!({"identity_id": viewer, "page": "/blog", "action": "publish"}),
        ))
        .await
        .expect("bad action");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get_request("/v1/identities/unknown/pages"))
        .await
        .expect("pages");
    let body = read_json(response).await;
    assert_eq!(body["pages"]["/profile"]["canView"], false);
}

#[tokio::test]
async fn admin_endpoints_require_admin_console_access() {
    let app = app_with_admin("root").await;
    let viewer = sign_in(&app, "vic").await;
    let body = json!({"role": "editor", "page": "/blog/create", "canAdd": true});

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/v1/role-access", body.clone()))
        .await
        .expect("anonymous");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(json_request_as("PUT", "/v1/role-access", &viewer, body.clone()))
        .await
        .expect("viewer");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(read_json(response).await["code"], "forbidden");

    let response = app
        .clone()
        .oneshot(json_request_as("PUT", "/v1/role-access", "root", body))
        .await
        .expect("admin");
    assert_eq!(response.status(), StatusCode::OK);
    let entry = read_json(response).await;
    assert_eq!(entry["canAdd"], true);
    assert_eq!(entry["canView"], serde_json::Value::Null);

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/v1/role-access",
            "root",
            json!({"role": "admin", "page": "/blog", "canView": false}),
        ))
        .await
        .expect("admin row");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/v1/role-access",
            "root",
            json!({"role": "editor", "page": "/settings", "canView": false}),
        ))
        .await
        .expect("unknown page");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn role_assignment_changes_decisions() {
    let app = app_with_admin("root").await;
    let user = sign_in(&app, "eddie").await;

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/v1/role-access",
            "root",
            json!({"role": "editor", "page": "/blog/create", "canAdd": true}),
        ))
        .await
        .expect("grant editor add");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!decide(&app, &user, "/blog/create", "add").await);

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            &format!("/v1/identities/{user}/roles"),
            "root",
            json!({"roles": ["editor"]}),
        ))
        .await
        .expect("promote");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["roles"], json!(["editor"]));
    assert!(decide(&app, &user, "/blog/create", "add").await);

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            &format!("/v1/identities/{user}/roles"),
            "root",
            json!({"roles": []}),
        ))
        .await
        .expect("empty roles");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            &format!("/v1/identities/{user}/roles"),
            "root",
            json!({"roles": ["owner"]}),
        ))
        .await
        .expect("unknown role");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn multiple_roles_combine_by_union() {
    let app = app_with_admin("root").await;
    let user = sign_in(&app, "multi").await;
    for body in [
        json!({"role": "editor", "page": "/blog/create", "canAdd": true}),
        json!({"role": "viewer", "page": "/blog/[id]", "canDelete": true}),
    ] {
        let response = app
            .clone()
            .oneshot(json_request_as("PUT", "/v1/role-access", "root", body))
            .await
            .expect("upsert");
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            &format!("/v1/identities/{user}/roles"),
            "root",
            json!({"roles": ["editor", "viewer"]}),
        ))
        .await
        .expect("roles");
    assert_eq!(response.status(), StatusCode::OK);

    assert!(decide(&app, &user, "/blog/create", "add").await);
    assert!(decide(&app, &user, "/blog/7", "delete").await);
    assert!(!decide(&app, &user, "/blog/7", "edit").await);
}

#[tokio::test]
async fn blog_list_view_falls_back_to_item_view() {
    let app = app_with_admin("root").await;
    let viewer = sign_in(&app, "vic").await;
    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/v1/role-access",
            "root",
            json!({"role": "viewer", "page": "/blog", "canView": false}),
        ))
        .await
        .expect("hide list");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(decide(&app, &viewer, "/blog", "view").await);

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/v1/role-access",
            "root",
            json!({"role": "viewer", "page": "/blog/[id]", "canView": false}),
        ))
        .await
        .expect("hide item");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!decide(&app, &viewer, "/blog", "view").await);
}

#[tokio::test]
async fn viewer_cannot_promote_themselves() {
    let app = app_with_admin("root").await;
    let viewer = sign_in(&app, "mallory").await;
    // `/admin` is viewable by default, but the route needs admin.dashboard.
    assert!(decide(&app, &viewer, "/admin", "view").await);

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            &format!("/v1/identities/{viewer}/roles"),
            &viewer,
            json!({"roles": ["admin"]}),
        ))
        .await
        .expect("self promotion");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/v1/role-access/modules/blog",
            &viewer,
            json!({"role": "viewer", "capability": "delete", "value": true}),
        ))
        .await
        .expect("module update");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/v1/identities/{viewer}")))
        .await
        .expect("identity");
    assert_eq!(read_json(response).await["identity"]["roles"], json!(["viewer"]));

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            &format!("/v1/identities/{viewer}/roles"),
            "root",
            json!({"roles": ["editor"]}),
        ))
        .await
        .expect("promote to editor");
    assert_eq!(response.status(), StatusCode::OK);
    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/v1/role-access",
            &viewer,
            json!({"role": "editor", "page": "/blog", "canDelete": true}),
        ))
        .await
        .expect("editor upsert");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn module_update_applies_to_every_page() {
    let app = app_with_admin("root").await;
    let viewer = sign_in(&app, "vic").await;
    assert!(!decide_module(&app, &viewer, "blog", "add").await);

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/v1/role-access/modules/blog",
            "root",
            json!({"role": "viewer", "capability": "add", "value": true}),
        ))
        .await
        .expect("module update");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["items"].as_array().expect("items").len(), 4);
    assert_eq!(
        body["grant"],
        json!({"canView": true, "canAdd": true, "canEdit": false, "canDelete": false})
    );
    assert!(decide_module(&app, &viewer, "blog", "add").await);
    assert!(decide(&app, &viewer, "/blog/9/edit", "add").await);

    // One page losing the capability fails the whole module check.
    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/v1/role-access",
            "root",
            json!({"role": "viewer", "page": "/blog/create", "canAdd": false}),
        ))
        .await
        .expect("page override");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!decide_module(&app, &viewer, "blog", "add").await);

    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/v1/role-access/modules/dashboard",
            "root",
            json!({"role": "viewer", "capability": "delete", "value": true}),
        ))
        .await
        .expect("unsupported");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn access_matrix_reports_defaults_and_overrides() {
    let app = app_with_admin("root").await;
    let response = app
        .clone()
        .oneshot(json_request_as(
            "PUT",
            "/v1/role-access",
            "root",
            json!({"role": "editor", "page": "/blog/create", "canAdd": true}),
        ))
        .await
        .expect("upsert");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request("/v1/role-access"))
        .await
        .expect("matrix");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["pages"].as_array().expect("pages").len(), 8);
    assert_eq!(body["pages"][0]["display_name"], "Admin Dashboard");
    let all = json!({"canView": true, "canAdd": true, "canEdit": true, "canDelete": true});
    assert_eq!(body["roles"]["admin"]["/blog"], all);
    assert_eq!(body["roles"]["viewer"]["/profile"], all);
    assert_eq!(
        body["roles"]["editor"]["/blog/create"],
        json!({"canView": true, "canAdd": true, "canEdit": false, "canDelete": false})
    );
    assert_eq!(
        body["roles"]["viewer"]["/blog/create"],
        json!({"canView": true, "canAdd": false, "canEdit": false, "canDelete": false})
    );
}

#[tokio::test]
async fn route_decisions_use_coarse_permissions() {
    let app = app_with_admin("root").await;
    let viewer = sign_in(&app, "route-viewer").await;

    assert!(decide_route(&app, &viewer, "/dashboard").await);
    assert!(decide_route(&app, &viewer, "/blog/42").await);
    assert!(!decide_route(&app, &viewer, "/editor").await);
    assert!(!decide_route(&app, &viewer, "/admin").await);
    assert!(decide_route(&app, "root", "/admin").await);
    assert!(!decide_route(&app, "nobody", "/profile").await);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/decisions/route",
            json!({"identity_id": viewer, "path": "/settings"}),
        ))
        .await
        .expect("unknown path");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
