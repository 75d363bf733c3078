//! Grouped claim shape (v3): role bindings scoped by cluster.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use kafkagate_core::{AccessGrant, ResourceKind};

use crate::binding::{self, ClaimBinding};
use crate::claims::ClaimRequest;
use crate::config::ClaimsConfig;
use crate::reduce;
use crate::scope::{self, GrantDirectory, MembershipTest, Scope};

/// Key under which the UI expects the binding list.
pub const BINDING_GROUP_KEY: &str = "group";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimResponseV3 {
    /// `None` (serialized as `null`) when no binding was produced.
    pub groups: Option<BTreeMap<String, Vec<ClaimBinding>>>,
}

impl ClaimResponseV3 {
    pub fn from_bindings(bindings: Vec<ClaimBinding>) -> Self {
        if bindings.is_empty() {
            return Self { groups: None };
        }
        Self {
            groups: Some(BTreeMap::from([(BINDING_GROUP_KEY.to_string(), bindings)])),
        }
    }

    pub fn bindings(&self) -> &[ClaimBinding] {
        self.groups
            .as_ref()
            .and_then(|g| g.get(BINDING_GROUP_KEY))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// One unrestricted binding per administrator role.
pub fn admin_bindings(config: &ClaimsConfig) -> Vec<ClaimBinding> {
    let mut bindings: Vec<ClaimBinding> = Vec::new();
    for role in config.admin_roles.values() {
        if !bindings.iter().any(|b| &b.role == role) {
            bindings.push(ClaimBinding::unrestricted(role.clone()));
        }
    }
    bindings
}

/// Compile visible grants into final bindings.
pub fn compile_bindings(grants: &[AccessGrant], config: &ClaimsConfig, managed_clusters: &[String]) -> Vec<ClaimBinding> {
    let reduced = reduce::remove_redundant(grants);
    let pending = binding::fold_grants(&reduced, &config.roles);
    let scoped = binding::scoped_bindings(pending, managed_clusters);
    let mut bindings = binding::merge_bindings(scoped);

    // Derived schema bindings can share a scope with schema grants already folded in.
    if let (Some(topic_role), Some(schema_role)) = (
        config.role_for(ResourceKind::Topic),
        config.role_for(ResourceKind::Schema),
    ) {
        let schemas = binding::derive_schema_bindings(&bindings, topic_role, schema_role);
        bindings.extend(schemas);
        bindings = binding::merge_bindings(bindings);
    }

    if let Some(group_role) = config.role_for(ResourceKind::Group) {
        binding::override_group_patterns(&mut bindings, group_role);
    }

    bindings
}

/// Compile the grouped claim. An absent request behaves like an empty group list.
pub fn compile_grouped<D: GrantDirectory>(
    config: &ClaimsConfig,
    request: Option<&ClaimRequest>,
    directory: &D,
) -> Result<ClaimResponseV3, D::Error> {
    let groups = request.map(ClaimRequest::groups).unwrap_or_default();

    let grants = match scope::resolve_scope(groups, config, MembershipTest::Delimited, directory)? {
        Scope::Administrator => return Ok(ClaimResponseV3::from_bindings(admin_bindings(config))),
        Scope::Grants(grants) => grants,
    };

    let managed_clusters = directory.managed_clusters()?;
    Ok(ClaimResponseV3::from_bindings(compile_bindings(
        &grants,
        config,
        &managed_clusters,
    )))
}
