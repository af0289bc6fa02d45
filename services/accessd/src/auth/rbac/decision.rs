//! Access decision facade.
//!
//! # Purpose
//! The single entry point for "may identity X do action A on page P?". Route
//! handlers and the admin guard call this; nothing else should combine grants
//! by hand.
//!
//! # Key invariants
//! - Stateless: the same store contents always give the same answer.
//! - Module checks are a logical AND over the module's pages.
//! - A failed lookup is an `Err`, never `Ok(true)`.
use crate::auth::rbac::resolver::PermissionResolver;
use crate::observability::{DecisionOutcome, record_decision};
use crate::store::StoreResult;
use pagegate_authz::{Capability, Page};

#[derive(Clone)]
pub struct AccessDecision {
    resolver: PermissionResolver,
}

impl AccessDecision {
    pub fn new(resolver: PermissionResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    pub async fn can_perform(
        &self,
        identity_id: &str,
        page: Page,
        capability: Capability,
    ) -> StoreResult<bool> {
        let result = self
            .resolver
            .resolve_page_permissions(identity_id, page)
            .await
            .map(|grant| grant.allows(capability));
        observe(&result);
        result
    }

    /// True only when every page grants `capability`. An empty page list denies.
    pub async fn can_perform_on_module(
        &self,
        identity_id: &str,
        pages: &[Page],
        capability: Capability,
    ) -> StoreResult<bool> {
        let result = self.all_pages_allow(identity_id, pages, capability).await;
        observe(&result);
        result
    }

    async fn all_pages_allow(
        &self,
        identity_id: &str,
        pages: &[Page],
        capability: Capability,
    ) -> StoreResult<bool> {
        if pages.is_empty() {
            return Ok(false);
        }
        let Some(roles) = self.resolver.effective_roles(identity_id).await? else {
            return Ok(false);
        };
        for page in pages {
            let grant = self.resolver.resolve_for_roles(&roles, *page).await?;
            if !grant.allows(capability) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Coarse route guard backed by the role catalog.
    pub async fn can_access_route(&self, identity_id: &str, page: Page) -> StoreResult<bool> {
        let result = self
            .resolver
            .effective_roles(identity_id)
            .await
            .map(|roles| match roles {
                Some(roles) => self.resolver.catalog().can_access_route(roles.as_slice(), page),
                None => false,
            });
        observe(&result);
        result
    }
}

fn observe(result: &StoreResult<bool>) {
    let outcome = match result {
        Ok(true) => DecisionOutcome::Allow,
        Ok(false) => DecisionOutcome::Deny,
        Err(_) => DecisionOutcome::Error,
    };
    record_decision(outcome);
}
