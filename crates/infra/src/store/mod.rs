//! Collaborator contracts the claim endpoints read from.
//!
//! The grant store, namespace store and cluster registry are owned by the
//! reconciliation side of the control plane; this crate only needs read access.

use std::sync::Arc;

use thiserror::Error;

use kafkagate_core::{AccessGrant, DomainError, Namespace};

pub mod in_memory;

pub use in_memory::{InMemoryGrantStore, InMemoryNamespaceStore, StaticClusterRegistry};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A record was refused on write.
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Access grants, looked up by recipient.
pub trait AccessGrantStore: Send + Sync {
    /// Grants whose recipient is `namespace`.
    fn find_granted_to(&self, namespace: &str) -> StoreResult<Vec<AccessGrant>>;

    /// Grants whose recipient is everyone.
    fn find_public(&self) -> StoreResult<Vec<AccessGrant>>;
}

pub trait NamespaceStore: Send + Sync {
    fn list(&self) -> StoreResult<Vec<Namespace>>;
}

/// Clusters administered by the control plane.
pub trait ClusterRegistry: Send + Sync {
    fn managed_clusters(&self) -> StoreResult<Vec<String>>;
}

impl<S> AccessGrantStore for Arc<S>
where
    S: AccessGrantStore + ?Sized,
{
    fn find_granted_to(&self, namespace: &str) -> StoreResult<Vec<AccessGrant>> {
        (**self).find_granted_to(namespace)
    }

    fn find_public(&self) -> StoreResult<Vec<AccessGrant>> {
        (**self).find_public()
    }
}

impl<S> NamespaceStore for Arc<S>
where
    S: NamespaceStore + ?Sized,
{
    fn list(&self) -> StoreResult<Vec<Namespace>> {
        (**self).list()
    }
}

impl<S> ClusterRegistry for Arc<S>
where
    S: ClusterRegistry + ?Sized,
{
    fn managed_clusters(&self) -> StoreResult<Vec<String>> {
        (**self).managed_clusters()
    }
}
