//! Flat claim shapes (v1 and v2).
//!
//! Kept for older UI deployments. Consumer groups are always reported as
//! fully visible here; newer deployments get scoped groups from the grouped shape.

use serde::{Deserialize, Serialize};

use kafkagate_core::ResourceKind;

use crate::claims::ClaimRequest;
use crate::config::ClaimsConfig;
use crate::pattern;
use crate::reduce;
use crate::scope::{self, GrantDirectory, MembershipTest, Scope};

/// The three regex lists of the flat shapes. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimFilters {
    pub topics_filter_regexp: Vec<String>,
    pub connects_filter_regexp: Vec<String>,
    pub consumer_groups_filter_regexp: Vec<String>,
}

impl ClaimFilters {
    pub fn deny_all() -> Self {
        Self {
            topics_filter_regexp: pattern::deny_all(),
            connects_filter_regexp: pattern::deny_all(),
            consumer_groups_filter_regexp: pattern::deny_all(),
        }
    }

    pub fn allow_all() -> Self {
        Self {
            topics_filter_regexp: pattern::allow_all(),
            connects_filter_regexp: pattern::allow_all(),
            consumer_groups_filter_regexp: pattern::allow_all(),
        }
    }
}

/// Shape-independent result of flat compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatClaims {
    pub roles: Vec<String>,
    pub filters: ClaimFilters,
}

/// v1: filters nested under `attributes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimResponseV1 {
    pub roles: Vec<String>,
    pub attributes: ClaimFilters,
}

impl From<FlatClaims> for ClaimResponseV1 {
    fn from(value: FlatClaims) -> Self {
        Self {
            roles: value.roles,
            attributes: value.filters,
        }
    }
}

/// v2: filters at the top level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimResponseV2 {
    pub roles: Vec<String>,
    #[serde(flatten)]
    pub filters: ClaimFilters,
}

impl From<FlatClaims> for ClaimResponseV2 {
    fn from(value: FlatClaims) -> Self {
        Self {
            roles: value.roles,
            filters: value.filters,
        }
    }
}

/// Compile the flat claims shared by v1 and v2.
///
/// - absent request: deny everything
/// - administrator: allow everything with the administrator role list
/// - otherwise: maximal topic and connect patterns, all consumer groups
pub fn compile_flat<D: GrantDirectory>(
    config: &ClaimsConfig,
    request: Option<&ClaimRequest>,
    directory: &D,
) -> Result<FlatClaims, D::Error> {
    let Some(request) = request else {
        tracing::debug!("no claim request, denying all");
        return Ok(FlatClaims {
            roles: config.former_roles.clone(),
            filters: ClaimFilters::deny_all(),
        });
    };

    let grants = match scope::resolve_scope(request.groups(), config, MembershipTest::Verbatim, directory)? {
        Scope::Administrator => {
            return Ok(FlatClaims {
                roles: config.former_admin_roles.clone(),
                filters: ClaimFilters::allow_all(),
            });
        }
        Scope::Grants(grants) => grants,
    };

    Ok(FlatClaims {
        roles: config.former_roles.clone(),
        filters: ClaimFilters {
            topics_filter_regexp: reduce::maximal_patterns(&grants, ResourceKind::Topic),
            connects_filter_regexp: reduce::maximal_patterns(&grants, ResourceKind::Connect),
            consumer_groups_filter_regexp: pattern::allow_all(),
        },
    })
}
