//! In-memory collaborator stores for tests/dev and config-seeded deployments.

use std::collections::BTreeMap;
use std::sync::RwLock;

use kafkagate_core::{AccessGrant, Namespace};

use super::{AccessGrantStore, ClusterRegistry, NamespaceStore, StoreError, StoreResult};

fn poisoned(what: &str) -> StoreError {
    StoreError::Unavailable(format!("{what} lock poisoned"))
}

/// Grants keyed by `(owner namespace, cluster, name)`; iteration is ordered.
#[derive(Debug, Default)]
pub struct InMemoryGrantStore {
    inner: RwLock<BTreeMap<(String, String, String), AccessGrant>>,
}

impl InMemoryGrantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and insert (or replace) a grant.
    pub fn upsert(&self, grant: AccessGrant) -> StoreResult<()> {
        grant.validate()?;
        let mut map = self.inner.write().map_err(|_| poisoned("grant store"))?;
        let key = (grant.namespace.clone(), grant.cluster.clone(), grant.name.clone());
        map.insert(key, grant);
        Ok(())
    }

    fn filtered(&self, keep: impl Fn(&AccessGrant) -> bool) -> StoreResult<Vec<AccessGrant>> {
        let map = self.inner.read().map_err(|_| poisoned("grant store"))?;
        Ok(map.values().filter(|g| keep(*g)).cloned().collect())
    }
}

impl AccessGrantStore for InMemoryGrantStore {
    fn find_granted_to(&self, namespace: &str) -> StoreResult<Vec<AccessGrant>> {
        self.filtered(|g| g.granted_to == namespace)
    }

    fn find_public(&self) -> StoreResult<Vec<AccessGrant>> {
        self.filtered(AccessGrant::is_public)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryNamespaceStore {
    inner: RwLock<BTreeMap<String, Namespace>>,
}

impl InMemoryNamespaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, namespace: Namespace) -> StoreResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned("namespace store"))?;
        map.insert(namespace.name.clone(), namespace);
        Ok(())
    }
}

impl NamespaceStore for InMemoryNamespaceStore {
    fn list(&self) -> StoreResult<Vec<Namespace>> {
        let map = self.inner.read().map_err(|_| poisoned("namespace store"))?;
        Ok(map.values().cloned().collect())
    }
}

/// Fixed cluster list, typically from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticClusterRegistry {
    clusters: Vec<String>,
}

impl StaticClusterRegistry {
    pub fn new(clusters: Vec<String>) -> Self {
        Self { clusters }
    }
}

impl ClusterRegistry for StaticClusterRegistry {
    fn managed_clusters(&self) -> StoreResult<Vec<String>> {
        Ok(self.clusters.clone())
    }
}
