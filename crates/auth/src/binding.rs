//! Grouped claim bindings: `(role, patterns, clusters)` triples.
//!
//! Bindings are built from reduced grants in four passes: fold by
//! `(role, resource, pattern kind)`, collapse cluster scope, merge bindings with
//! equal scope, then derive schema bindings from topic bindings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use kafkagate_core::{AccessGrant, PatternKind};

use crate::config::RoleMapping;
use crate::pattern;

/// One grouped claim. `None` patterns or clusters mean "unrestricted" and are
/// left out of the JSON entirely.
///
/// The UI reads a missing `patterns` key the same as an empty list: no
/// pattern restriction. Consumer-group bindings and administrator bindings
/// use the missing-key form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimBinding {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clusters: Option<Vec<String>>,
}

impl ClaimBinding {
    /// A binding with no pattern or cluster restriction.
    pub fn unrestricted(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            patterns: None,
            clusters: None,
        }
    }

    pub fn patterns(&self) -> &[String] {
        self.patterns.as_deref().unwrap_or_default()
    }

    pub fn clusters(&self) -> &[String] {
        self.clusters.as_deref().unwrap_or_default()
    }
}

/// Fold key. Cluster is deliberately absent so one resource granted on several
/// clusters ends up in a single binding.
pub type BindingKey = (String, String, PatternKind);

/// A binding before its cluster scope is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBinding {
    pub pattern: String,
    /// Raw cluster names, first-seen order, no duplicates.
    pub clusters: Vec<String>,
}

/// Group grants by `(role, resource, pattern kind)`.
///
/// Grants whose kind has no role mapping are skipped.
pub fn fold_grants(grants: &[AccessGrant], roles: &RoleMapping) -> BTreeMap<BindingKey, PendingBinding> {
    grants.iter().fold(BTreeMap::new(), |mut acc, grant| {
        let Some(role) = roles.get(&grant.resource_kind) else {
            tracing::debug!(kind = %grant.resource_kind, grant = %grant.name, "no role mapped for kind");
            return acc;
        };

        let pending = acc
            .entry((role.clone(), grant.resource.clone(), grant.pattern_kind))
            .or_insert_with(|| PendingBinding {
                pattern: pattern::literal_or_prefix_regex(&grant.resource, grant.pattern_kind),
                clusters: Vec::new(),
            });
        if !pending.clusters.contains(&grant.cluster) {
            pending.clusters.push(grant.cluster.clone());
        }
        acc
    })
}

/// Cluster patterns for a set of cluster names: a single wildcard when the
/// names cover every managed cluster, otherwise one anchored pattern per name.
pub fn collapse_cluster_scope(cluster_names: &[String], managed_clusters: &[String]) -> Vec<String> {
    if managed_clusters.iter().all(|c| cluster_names.contains(c)) {
        return pattern::allow_all();
    }
    cluster_names.iter().map(|c| pattern::cluster_regex(c)).collect()
}

/// Resolve each pending binding's cluster scope.
pub fn scoped_bindings(
    pending: BTreeMap<BindingKey, PendingBinding>,
    managed_clusters: &[String],
) -> Vec<ClaimBinding> {
    pending
        .into_iter()
        .map(|((role, _, _), p)| ClaimBinding {
            role,
            patterns: Some(vec![p.pattern]),
            clusters: Some(collapse_cluster_scope(&p.clusters, managed_clusters)),
        })
        .collect()
}

fn same_cluster_scope(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().all(|c| b.contains(c))
}

/// Merge bindings sharing a role and an (order-independent) cluster scope.
///
/// The first binding of each group keeps its position; later patterns are
/// appended without duplicates.
pub fn merge_bindings(bindings: Vec<ClaimBinding>) -> Vec<ClaimBinding> {
    bindings.into_iter().fold(Vec::new(), |mut merged: Vec<ClaimBinding>, binding| {
        let target = merged
            .iter_mut()
            .find(|m| m.role == binding.role && same_cluster_scope(m.clusters(), binding.clusters()));

        match target {
            Some(existing) => {
                let patterns = existing.patterns.get_or_insert_with(Vec::new);
                for p in binding.patterns.unwrap_or_default() {
                    if !patterns.contains(&p) {
                        patterns.push(p);
                    }
                }
            }
            None => merged.push(binding),
        }
        merged
    })
}

/// One schema binding per topic binding, same cluster scope.
pub fn derive_schema_bindings(bindings: &[ClaimBinding], topic_role: &str, schema_role: &str) -> Vec<ClaimBinding> {
    bindings
        .iter()
        .filter(|b| b.role == topic_role)
        .map(|b| ClaimBinding {
            role: schema_role.to_string(),
            patterns: b
                .patterns
                .as_ref()
                .map(|ps| ps.iter().map(|p| pattern::schema_subject_pattern(p)).collect()),
            clusters: b.clusters.clone(),
        })
        .collect()
}

/// Lift the pattern restriction of every consumer-group binding.
///
/// Consumer groups are fully visible as soon as any group grant exists.
pub fn override_group_patterns(bindings: &mut [ClaimBinding], group_role: &str) {
    for binding in bindings.iter_mut().filter(|b| b.role == group_role) {
        binding.patterns = None;
    }
}
