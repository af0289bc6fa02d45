//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction so every accessd endpoint
//! returns the same error shape.
//!
//! # Key invariants and assumptions
//! - Error responses include a stable `code` and a human-readable `message`.
//! - Store outages map to 503, never to a success status.
//!
//! # Security considerations
//! - Store failures are logged server-side; clients only see a generic message.
use crate::api::types::ErrorResponse;
use crate::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Structured API error returned by handlers.
///
/// # Example
/// ```rust
/// use accessd::api::error::api_not_found;
/// use axum::http::StatusCode;
///
/// let err = api_not_found("identity not found");
/// assert_eq!(err.status, StatusCode::NOT_FOUND);
/// ```
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn api_error(status: StatusCode, code: &str, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
            request_id: None,
        },
    }
}

pub fn api_not_found(message: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, "not_found", message)
}

pub fn api_unauthorized(message: &str) -> ApiError {
    api_error(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

pub fn api_forbidden(message: &str) -> ApiError {
    api_error(StatusCode::FORBIDDEN, "forbidden", message)
}

/// Build a 400 Bad Request validation error.
pub fn api_validation_error(message: &str) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "validation_error", message)
}

/// Build a 503 from a store failure.
///
/// # What it does
/// Logs the store error and returns a generic `unavailable` response.
pub fn api_unavailable(message: &str, err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "accessd storage error");
    api_error(StatusCode::SERVICE_UNAVAILABLE, "unavailable", message)
}

/// Map a store error onto its HTTP category.
///
/// Validation failures carry their own message; not-found and outages use
/// `message`.
pub fn api_store_error(message: &str, err: StoreError) -> ApiError {
    match err {
        StoreError::Validation(inner) => api_validation_error(&inner.to_string()),
        StoreError::NotFound(what) => api_not_found(&format!("{what} not found")),
        err @ StoreError::Unavailable(_) => api_unavailable(message, &err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagegate_authz::AuthzError;

    #[test]
    fn api_error_helpers_build_expected_codes() {
        let not_found = api_not_found("missing");
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.body.code, "not_found");

        let unauthorized = api_unauthorized("nope");
        assert_eq!(unauthorized.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unauthorized.body.code, "unauthorized");

        let forbidden = api_forbidden("nope");
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
        assert_eq!(forbidden.body.code, "forbidden");

        let validation = api_validation_error("bad");
        assert_eq!(validation.status, StatusCode::BAD_REQUEST);
        assert_eq!(validation.body.code, "validation_error");
    }

    #[test]
    fn store_errors_map_to_status() {
        let validation = api_store_error("x", StoreError::Validation(AuthzError::AdminOverride));
        assert_eq!(validation.status, StatusCode::BAD_REQUEST);
        assert!(validation.body.message.contains("admin"));

        let missing = api_store_error("x", StoreError::NotFound("identity".to_string()));
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.body.message, "identity not found");

        let down = api_store_error(
            "storage failed",
            StoreError::Unavailable(anyhow::anyhow!("boom")),
        );
        assert_eq!(down.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(down.body.code, "unavailable");
        assert_eq!(down.body.message, "storage failed");
    }
}
