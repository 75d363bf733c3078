//! Store-backed [`GrantDirectory`] handed to the claim compiler.

use std::sync::Arc;

use kafkagate_auth::GrantDirectory;
use kafkagate_core::{AccessGrant, Namespace};

use crate::config::SeedData;
use crate::store::{
    AccessGrantStore, ClusterRegistry, InMemoryGrantStore, InMemoryNamespaceStore, NamespaceStore,
    StaticClusterRegistry, StoreError,
};

/// The three collaborators behind one handle. Cheap to clone.
#[derive(Clone)]
pub struct StoreDirectory {
    pub grants: Arc<dyn AccessGrantStore>,
    pub namespaces: Arc<dyn NamespaceStore>,
    pub clusters: Arc<dyn ClusterRegistry>,
}

impl StoreDirectory {
    pub fn new(
        grants: Arc<dyn AccessGrantStore>,
        namespaces: Arc<dyn NamespaceStore>,
        clusters: Arc<dyn ClusterRegistry>,
    ) -> Self {
        Self {
            grants,
            namespaces,
            clusters,
        }
    }

    /// In-memory stores populated from seed data. Fails on the first invalid grant.
    pub fn in_memory(seed: &SeedData, managed_clusters: Vec<String>) -> Result<Self, StoreError> {
        let grants = InMemoryGrantStore::new();
        for grant in &seed.access_grants {
            grants.upsert(grant.clone())?;
        }

        let namespaces = InMemoryNamespaceStore::new();
        for namespace in &seed.namespaces {
            namespaces.upsert(namespace.clone())?;
        }

        tracing::info!(
            namespaces = seed.namespaces.len(),
            access_grants = seed.access_grants.len(),
            managed_clusters = managed_clusters.len(),
            "seeded in-memory stores"
        );

        Ok(Self::new(
            Arc::new(grants),
            Arc::new(namespaces),
            Arc::new(StaticClusterRegistry::new(managed_clusters)),
        ))
    }
}

impl GrantDirectory for StoreDirectory {
    type Error = StoreError;

    fn namespaces(&self) -> Result<Vec<Namespace>, Self::Error> {
        self.namespaces.list()
    }

    fn granted_to(&self, namespace: &str) -> Result<Vec<AccessGrant>, Self::Error> {
        self.grants.find_granted_to(namespace)
    }

    fn public_grants(&self) -> Result<Vec<AccessGrant>, Self::Error> {
        self.grants.find_public()
    }

    fn managed_clusters(&self) -> Result<Vec<String>, Self::Error> {
        self.clusters.managed_clusters()
    }
}
