//! Permission resolution: identity -> roles -> page capabilities.
//!
//! # Purpose and responsibility
//! Merges the static role catalog, stored page overrides, the defaulting
//! policy, the admin bypass, and the blog list fallback into one grant.
//!
//! # Key invariants and assumptions
//! - One `effective_roles` lookup feeds every other step.
//! - An identity with no role record resolves to no permissions at all.
//! - Any held `admin` role short-circuits to all-true without a store read.
//! - Several held roles combine by union, both for coarse permissions and page
//!   capabilities.
//! - Store errors propagate. Nothing in here turns a failed read into a grant.
//!
//! # Security considerations
//! - Callers that need a plain boolean must treat `Err` as deny.
use crate::store::{AccessStore, StoreResult};
use pagegate_authz::{
    AccessRecord, Capability, Module, Page, PageCapabilities, Role, RoleCatalog, RoleSet,
    StoredAccess, apply_item_view_fallback, effective_grant, fallback_source,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Defaulted grant for one (role, page) cell of the access matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolePageGrant {
    pub role: Role,
    pub page: Page,
    pub grant: PageCapabilities,
}

#[derive(Clone)]
pub struct PermissionResolver {
    store: Arc<dyn AccessStore>,
    catalog: Arc<RoleCatalog>,
}

impl PermissionResolver {
    pub fn new(store: Arc<dyn AccessStore>, catalog: Arc<RoleCatalog>) -> Self {
        Self { store, catalog }
    }

    pub fn store(&self) -> &Arc<dyn AccessStore> {
        &self.store
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    /// Roles held by `identity_id`; `None` when the identity has no record.
    pub async fn effective_roles(&self, identity_id: &str) -> StoreResult<Option<RoleSet>> {
        let record = self.store.get_identity(identity_id).await?;
        if record.is_none() {
            tracing::debug!(identity_id, "no role record; resolving to no access");
        }
        Ok(record.map(|record| record.roles))
    }

    /// Defaulted grant for a single role, without the blog list fallback.
    pub async fn resolve_role_page(&self, role: Role, page: Page) -> StoreResult<PageCapabilities> {
        if role.is_admin() {
            return Ok(PageCapabilities::all());
        }
        let record = self.store.get_access(role, page).await?;
        Ok(effective_grant(role, page, &record))
    }

    async fn resolve_role_page_with_fallback(
        &self,
        role: Role,
        page: Page,
    ) -> StoreResult<PageCapabilities> {
        let grant = self.resolve_role_page(role, page).await?;
        let Some(source) = fallback_source(page) else {
            return Ok(grant);
        };
        if grant.can_view {
            return Ok(grant);
        }
        let item = self.resolve_role_page(role, source).await?;
        Ok(apply_item_view_fallback(page, grant, Some(item)))
    }

    pub async fn resolve_for_roles(
        &self,
        roles: &RoleSet,
        page: Page,
    ) -> StoreResult<PageCapabilities> {
        if roles.is_admin() {
            return Ok(PageCapabilities::all());
        }
        let mut combined = PageCapabilities::none();
        for role in roles.iter() {
            let grant = self.resolve_role_page_with_fallback(role, page).await?;
            combined = combined.union(grant);
        }
        Ok(combined)
    }

    pub async fn resolve_page_permissions(
        &self,
        identity_id: &str,
        page: Page,
    ) -> StoreResult<PageCapabilities> {
        match self.effective_roles(identity_id).await? {
            Some(roles) => self.resolve_for_roles(&roles, page).await,
            None => Ok(PageCapabilities::none()),
        }
    }

    /// Capabilities on every catalog page, in catalog order.
    pub async fn resolve_all_pages(
        &self,
        identity_id: &str,
    ) -> StoreResult<BTreeMap<Page, PageCapabilities>> {
        let roles = self.effective_roles(identity_id).await?;
        let mut pages = BTreeMap::new();
        for page in Page::ALL {
            let grant = match &roles {
                Some(roles) => self.resolve_for_roles(roles, page).await?,
                None => PageCapabilities::none(),
            };
            pages.insert(page, grant);
        }
        Ok(pages)
    }

    /// Per capability, true only when every page of the module grants it.
    pub async fn module_grant(&self, role: Role, module: Module) -> StoreResult<PageCapabilities> {
        let mut combined = PageCapabilities::all();
        for page in module.pages() {
            let grant = self.resolve_role_page(role, *page).await?;
            for capability in Capability::ALL {
                combined.set(capability, combined.allows(capability) && grant.allows(capability));
            }
        }
        Ok(combined)
    }

    /// Defaulted grant for every role and page, read with a single store scan.
    pub async fn access_matrix(&self) -> StoreResult<Vec<RolePageGrant>> {
        let stored: HashMap<(Role, Page), StoredAccess> = self
            .store
            .list_access()
            .await?
            .into_iter()
            .map(|entry| ((entry.role, entry.page), entry.stored()))
            .collect();
        let mut cells = Vec::with_capacity(Role::ALL.len() * Page::ALL.len());
        for role in Role::ALL {
            for page in Page::ALL {
                let record: AccessRecord = stored.get(&(role, page)).copied().into();
                cells.push(RolePageGrant {
                    role,
                    page,
                    grant: effective_grant(role, page, &record),
                });
            }
        }
        Ok(cells)
    }
}
