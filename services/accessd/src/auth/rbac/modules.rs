//! Module-level capability updates.
//!
//! Setting a capability on a module rewrites every page of the module in one
//! atomic store call, so the AND-based module check flips as a unit.
use crate::auth::rbac::resolver::PermissionResolver;
use crate::model::PageAccessEntry;
use crate::observability::record_access_upsert;
use crate::store::StoreResult;
use pagegate_authz::{Capability, Module, Role, ensure_overridable};

/// Set `capability` to `value` on every page of `module` for `role`.
///
/// Each page keeps its other capabilities as currently resolved (defaults
/// included) and is stored fully explicit afterwards.
pub async fn set_module_capability(
    resolver: &PermissionResolver,
    role: Role,
    module: Module,
    capability: Capability,
    value: bool,
) -> StoreResult<Vec<PageAccessEntry>> {
    ensure_overridable(role)?;
    module.ensure_supports(capability)?;
    let written = resolver
        .store()
        .update_capability(role, module.pages(), capability, value)
        .await?;
    record_access_upsert("module", written.len());
    tracing::info!(
        role = %role,
        module = module.as_str(),
        capability = %capability,
        value,
        pages = written.len(),
        "module capability updated"
    );
    Ok(written)
}
