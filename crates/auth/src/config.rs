//! Claim compiler configuration.
//!
//! Deserializable so the infra config layer can read it from YAML; every field
//! has a default so partial files work.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use kafkagate_core::ResourceKind;

/// Resource kind → role name understood by the operations UI.
pub type RoleMapping = BTreeMap<ResourceKind, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimsConfig {
    /// Members of this group get the administrator shortcut.
    pub admin_group: String,

    /// Namespace label key holding the group(s) that may see the namespace.
    pub group_label: String,

    /// Separator between group names in the label value (grouped shape only).
    pub group_delimiter: String,

    /// Role per resource kind (grouped shape).
    pub roles: RoleMapping,

    /// Role per resource kind for the administrator shortcut (grouped shape).
    pub admin_roles: RoleMapping,

    /// Role list reported by the flat shapes.
    pub former_roles: Vec<String>,

    /// Role list reported by the flat shapes for administrators.
    pub former_admin_roles: Vec<String>,
}

impl ClaimsConfig {
    pub fn role_for(&self, kind: ResourceKind) -> Option<&str> {
        self.roles.get(&kind).map(String::as_str)
    }
}

impl Default for ClaimsConfig {
    fn default() -> Self {
        let former_roles: Vec<String> = [
            "topic/read",
            "topic/data/read",
            "group/read",
            "registry/read",
            "connect/read",
            "connect/state/update",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let mut former_admin_roles = former_roles.clone();
        former_admin_roles.extend(
            ["topic/insert", "topic/delete", "registry/version/delete"]
                .into_iter()
                .map(String::from),
        );

        Self {
            admin_group: "_".to_string(),
            group_label: "support-group".to_string(),
            group_delimiter: ",".to_string(),
            roles: mapping(&[
                (ResourceKind::Topic, "topic-read"),
                (ResourceKind::Connect, "connect-rw"),
                (ResourceKind::Schema, "registry-read"),
                (ResourceKind::Group, "group-read"),
                (ResourceKind::ConnectCluster, "connect-cluster-read"),
            ]),
            admin_roles: mapping(&[
                (ResourceKind::Topic, "topic-admin"),
                (ResourceKind::Connect, "connect-admin"),
                (ResourceKind::Schema, "registry-admin"),
                (ResourceKind::Group, "group-read"),
                (ResourceKind::ConnectCluster, "connect-cluster-read"),
            ]),
            former_roles,
            former_admin_roles,
        }
    }
}

fn mapping(entries: &[(ResourceKind, &str)]) -> RoleMapping {
    entries
        .iter()
        .map(|(kind, role)| (*kind, (*role).to_string()))
        .collect()
}
