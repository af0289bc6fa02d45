//! In-memory implementation of the access stores.
//!
//! # Purpose
//! Implements [`IdentityRoleStore`] and [`PageAccessStore`] with maps guarded
//! by `tokio::sync::RwLock`. Used for local development, tests, and
//! deployments that do not need durability.
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - Capability updates read and rewrite every page under a single write lock;
//!   readers never observe a half-applied module update.
//! - Concurrent upserts on the same key are last-writer-wins.
//!
//! # Metrics
//! Keeps `pagegate_identities_total` in step with the durable backend.
use super::{AccessStore, IdentityRoleStore, PageAccessStore, StoreResult};
use crate::model::{IdentityRecord, PageAccessEntry};
use async_trait::async_trait;
use chrono::Utc;
use pagegate_authz::{
    AccessRecord, Capability, Page, Role, RoleSet, StoredAccess, ensure_overridable,
    with_capability,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryStore {
    /// Role assignments keyed by identity id.
    identities: Arc<RwLock<HashMap<String, IdentityRecord>>>,
    /// Page overrides keyed by `(role, page)`; ordered for listing.
    page_access: Arc<RwLock<BTreeMap<(Role, Page), PageAccessEntry>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityRoleStore for InMemoryStore {
    async fn get_identity(&self, identity_id: &str) -> StoreResult<Option<IdentityRecord>> {
        Ok(self.identities.read().await.get(identity_id).cloned())
    }

    async fn ensure_identity(
        &self,
        identity_id: &str,
        default_role: Role,
    ) -> StoreResult<IdentityRecord> {
        let mut identities = self.identities.write().await;
        if let Some(existing) = identities.get(identity_id) {
            return Ok(existing.clone());
        }
        let record = IdentityRecord::new(identity_id, RoleSet::single(default_role));
        identities.insert(identity_id.to_string(), record.clone());
        metrics::gauge!("pagegate_identities_total").set(identities.len() as f64);
        Ok(record)
    }

    async fn set_roles(&self, identity_id: &str, roles: RoleSet) -> StoreResult<IdentityRecord> {
        let mut identities = self.identities.write().await;
        let record = match identities.get(identity_id) {
            Some(existing) => IdentityRecord {
                roles,
                updated_at: Utc::now(),
                ..existing.clone()
            },
            None => IdentityRecord::new(identity_id, roles),
        };
        identities.insert(identity_id.to_string(), record.clone());
        metrics::gauge!("pagegate_identities_total").set(identities.len() as f64);
        Ok(record)
    }

    async fn list_identities(&self) -> StoreResult<Vec<IdentityRecord>> {
        let mut items: Vec<IdentityRecord> =
            self.identities.read().await.values().cloned().collect();
        items.sort_by(|a, b| a.identity_id.cmp(&b.identity_id));
        Ok(items)
    }
}

#[async_trait]
impl PageAccessStore for InMemoryStore {
    async fn get_access(&self, role: Role, page: Page) -> StoreResult<AccessRecord> {
        let page_access = self.page_access.read().await;
        Ok(page_access
            .get(&(role, page))
            .map(PageAccessEntry::stored)
            .into())
    }

    async fn upsert_access(
        &self,
        role: Role,
        page: Page,
        access: StoredAccess,
    ) -> StoreResult<PageAccessEntry> {
        ensure_overridable(role)?;
        let entry = PageAccessEntry::new(role, page, access);
        self.page_access
            .write()
            .await
            .insert((role, page), entry.clone());
        Ok(entry)
    }

    async fn update_capability(
        &self,
        role: Role,
        pages: &[Page],
        capability: Capability,
        value: bool,
    ) -> StoreResult<Vec<PageAccessEntry>> {
        ensure_overridable(role)?;
        let mut page_access = self.page_access.write().await;
        let mut entries = Vec::with_capacity(pages.len());
        for page in pages {
            let record: AccessRecord = page_access
                .get(&(role, *page))
                .map(PageAccessEntry::stored)
                .into();
            let access = with_capability(role, *page, &record, capability, value);
            let entry = PageAccessEntry::new(role, *page, access);
            page_access.insert((role, *page), entry.clone());
            entries.push(entry);
        }
        Ok(entries)
    }

    async fn list_access(&self) -> StoreResult<Vec<PageAccessEntry>> {
        Ok(self.page_access.read().await.values().cloned().collect())
    }
}

#[async_trait]
impl AccessStore for InMemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
