use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    #[error("invalid role: {0}")]
    InvalidRole(String),
    #[error("invalid page: {0}")]
    InvalidPage(String),
    #[error("invalid capability: {0}")]
    InvalidCapability(String),
    #[error("invalid module: {0}")]
    InvalidModule(String),
    #[error("admin access is fixed and cannot be overridden")]
    AdminOverride,
    #[error("identity must hold at least one role")]
    EmptyRoles,
    #[error("module {module} does not expose capability {capability}")]
    UnsupportedCapability { module: String, capability: String },
    #[error("no catalog page matches path {0}")]
    UnmatchedPath(String),
}

pub type AuthzResult<T> = Result<T, AuthzError>;
