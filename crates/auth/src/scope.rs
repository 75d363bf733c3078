//! Scope resolution: which grants a set of group memberships can see.

use std::collections::HashSet;
use std::convert::Infallible;

use kafkagate_core::{AccessGrant, Namespace};

use crate::config::ClaimsConfig;

/// Read-only view of the collaborators the compiler needs.
///
/// Implementations are queried once per compilation; nothing is cached
/// between calls so claims always reflect the latest reconciled grants.
pub trait GrantDirectory {
    type Error;

    fn namespaces(&self) -> Result<Vec<Namespace>, Self::Error>;

    /// Grants whose recipient is `namespace`.
    fn granted_to(&self, namespace: &str) -> Result<Vec<AccessGrant>, Self::Error>;

    /// Grants whose recipient is everyone.
    fn public_grants(&self) -> Result<Vec<AccessGrant>, Self::Error>;

    fn managed_clusters(&self) -> Result<Vec<String>, Self::Error>;
}

/// Plain in-memory directory, also handy in tests and benches.
#[derive(Debug, Clone, Default)]
pub struct GrantSnapshot {
    pub namespaces: Vec<Namespace>,
    pub grants: Vec<AccessGrant>,
    pub managed_clusters: Vec<String>,
}

impl GrantDirectory for GrantSnapshot {
    type Error = Infallible;

    fn namespaces(&self) -> Result<Vec<Namespace>, Self::Error> {
        Ok(self.namespaces.clone())
    }

    fn granted_to(&self, namespace: &str) -> Result<Vec<AccessGrant>, Self::Error> {
        Ok(self
            .grants
            .iter()
            .filter(|g| g.granted_to == namespace)
            .cloned()
            .collect())
    }

    fn public_grants(&self) -> Result<Vec<AccessGrant>, Self::Error> {
        Ok(self.grants.iter().filter(|g| g.is_public()).cloned().collect())
    }

    fn managed_clusters(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.managed_clusters.clone())
    }
}

/// How a namespace's group label is compared with the requester's groups.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MembershipTest {
    /// The whole label value must equal one of the groups (flat shapes).
    Verbatim,
    /// The label holds delimiter-separated groups; any overlap matches (grouped shape).
    ///
    /// Label parts are trimmed and empty parts ignored, so `"a, b"` admits `b`
    /// but not `" b"`. Requester groups are compared as sent.
    Delimited,
}

impl MembershipTest {
    pub fn admits(&self, label_value: &str, groups: &[String], delimiter: &str) -> bool {
        match self {
            MembershipTest::Verbatim => groups.iter().any(|g| g == label_value),
            MembershipTest::Delimited if delimiter.is_empty() => {
                let value = label_value.trim();
                groups.iter().any(|g| g == value)
            }
            MembershipTest::Delimited => label_value
                .split(delimiter)
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .any(|part| groups.iter().any(|g| g == part)),
        }
    }
}

/// Outcome of scope resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Requester is in the administrator group; no grants were consulted.
    Administrator,
    /// Every grant visible to the requester, de-duplicated, unordered.
    Grants(Vec<AccessGrant>),
}

/// Resolve requester groups to the administrator shortcut or to visible grants.
///
/// Visible grants are those granted to any namespace whose group label
/// matches, plus every public grant. Namespaces without the label never match.
pub fn resolve_scope<D: GrantDirectory>(
    groups: &[String],
    config: &ClaimsConfig,
    test: MembershipTest,
    directory: &D,
) -> Result<Scope, D::Error> {
    if groups.iter().any(|g| *g == config.admin_group) {
        tracing::debug!(admin_group = %config.admin_group, "administrator shortcut");
        return Ok(Scope::Administrator);
    }

    let mut visible = Vec::new();
    for namespace in directory.namespaces()? {
        let Some(label) = namespace.label(&config.group_label) else {
            continue;
        };
        if test.admits(label, groups, &config.group_delimiter) {
            visible.extend(directory.granted_to(&namespace.name)?);
        }
    }
    visible.extend(directory.public_grants()?);

    let mut seen = HashSet::new();
    visible.retain(|g| seen.insert(g.clone()));

    Ok(Scope::Grants(visible))
}
