//! Removal of grants whose scope is already covered by a broader grant.

use kafkagate_core::{AccessGrant, ResourceKind};

use crate::pattern;

/// Whether `broader` makes `grant` redundant.
///
/// `broader` must be a different, PREFIXED grant on the same kind and cluster
/// whose resource is a prefix of `grant`'s. Two PREFIXED grants with the same
/// resource cover each other; only the one ordered first by `(name, namespace)`
/// counts as broader so exactly one of them survives.
fn subsumes(broader: &AccessGrant, grant: &AccessGrant) -> bool {
    if broader.name == grant.name
        || !broader.is_prefixed()
        || broader.resource_kind != grant.resource_kind
        || broader.cluster != grant.cluster
        || !grant.resource.starts_with(&broader.resource)
    {
        return false;
    }

    if grant.is_prefixed() && grant.resource == broader.resource {
        let tie_break = (&broader.name, &broader.namespace) < (&grant.name, &grant.namespace);
        if tie_break {
            tracing::debug!(
                kept = %broader.name,
                dropped = %grant.name,
                resource = %grant.resource,
                "identical prefixed grants, keeping one"
            );
        }
        return tie_break;
    }

    true
}

/// Drop every grant subsumed by another grant of the input.
///
/// Each grant is tested against the full input, never against a partially
/// reduced list, so the result does not depend on input order.
pub fn remove_redundant(grants: &[AccessGrant]) -> Vec<AccessGrant> {
    grants
        .iter()
        .filter(|grant| !grants.iter().any(|other| subsumes(other, grant)))
        .cloned()
        .collect()
}

/// Patterns for one resource kind as reported by the flat claim shapes.
///
/// A grant is kept only if no grant of the same kind with a different resource
/// string is a string prefix of it. Pattern kind and cluster are not
/// considered. Never returns an empty list: no surviving grant yields [`pattern::deny_all`].
pub fn maximal_patterns(grants: &[AccessGrant], kind: ResourceKind) -> Vec<String> {
    let of_kind: Vec<&AccessGrant> = grants.iter().filter(|g| g.resource_kind == kind).collect();

    let mut patterns: Vec<String> = Vec::new();
    for grant in &of_kind {
        let covered = of_kind
            .iter()
            .any(|other| other.resource != grant.resource && grant.resource.starts_with(&other.resource));
        if covered {
            continue;
        }

        let regex = pattern::literal_or_prefix_regex(&grant.resource, grant.pattern_kind);
        if !patterns.contains(&regex) {
            patterns.push(regex);
        }
    }

    if patterns.is_empty() {
        return pattern::deny_all();
    }
    patterns
}
