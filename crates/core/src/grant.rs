//! Access grants: a namespace's permission over a Kafka resource pattern.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Grantee marker for grants visible to every namespace.
pub const PUBLIC_GRANTEE: &str = "*";

/// Kind of Kafka-ecosystem resource a grant applies to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    Topic,
    Connect,
    Group,
    ConnectCluster,
    TransactionalId,
    /// Schema subjects. Never granted directly; claims for it are derived from topics.
    Schema,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Topic => "TOPIC",
            ResourceKind::Connect => "CONNECT",
            ResourceKind::Group => "GROUP",
            ResourceKind::ConnectCluster => "CONNECT_CLUSTER",
            ResourceKind::TransactionalId => "TRANSACTIONAL_ID",
            ResourceKind::Schema => "SCHEMA",
        }
    }
}

impl core::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a grant's resource string is matched.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternKind {
    /// Exact resource name.
    Literal,
    /// Resource name prefix.
    Prefixed,
}

impl core::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            PatternKind::Literal => "LITERAL",
            PatternKind::Prefixed => "PREFIXED",
        })
    }
}

/// Permission level carried by a grant.
///
/// Claims do not distinguish permission levels; the field is kept so grants
/// round-trip through the stores unchanged.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrantPermission {
    Read,
    Write,
    Owner,
}

/// A record authorizing a namespace (or everyone) over a resource pattern on one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    /// Grant name, unique within its owner namespace.
    pub name: String,
    /// Owner namespace that issued the grant.
    pub namespace: String,
    /// Managed cluster the grant applies to.
    pub cluster: String,
    pub resource_kind: ResourceKind,
    pub resource: String,
    pub pattern_kind: PatternKind,
    pub permission: GrantPermission,
    /// Recipient namespace name, or [`PUBLIC_GRANTEE`].
    pub granted_to: String,
}

impl AccessGrant {
    pub fn is_public(&self) -> bool {
        self.granted_to == PUBLIC_GRANTEE
    }

    pub fn is_prefixed(&self) -> bool {
        self.pattern_kind == PatternKind::Prefixed
    }

    /// Reject grants with blank identifying fields, and schema grants, whose
    /// claims are only ever derived from topic grants.
    pub fn validate(&self) -> DomainResult<()> {
        if self.resource_kind == ResourceKind::Schema {
            return Err(DomainError::validation(format!(
                "access grant '{}': {} cannot be granted directly",
                self.name, self.resource_kind
            )));
        }
        let fields = [
            ("name", &self.name),
            ("namespace", &self.namespace),
            ("cluster", &self.cluster),
            ("resource", &self.resource),
            ("grantedTo", &self.granted_to),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!(
                    "access grant '{}': {} must not be blank",
                    self.name, field
                )));
            }
        }
        Ok(())
    }
}
