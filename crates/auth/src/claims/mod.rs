//! Claim assembly for the three response shapes.
//!
//! All shapes share scope resolution and pattern synthesis; they differ in
//! membership test, reduction rule and JSON layout:
//! - `legacy`: flat regex lists (v1 nests them under `attributes`, v2 does not)
//! - `grouped`: per-role bindings with cluster scope (v3)

use serde::{Deserialize, Serialize};

use crate::config::ClaimsConfig;
use crate::scope::GrantDirectory;

pub mod grouped;
pub mod legacy;

pub use grouped::{BINDING_GROUP_KEY, ClaimResponseV3};
pub use legacy::{ClaimFilters, ClaimResponseV1, ClaimResponseV2, FlatClaims};

/// Body posted by the operations UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRequest {
    #[serde(default)]
    pub groups: Option<Vec<String>>,
}

impl ClaimRequest {
    pub fn new(groups: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            groups: Some(groups.into_iter().map(Into::into).collect()),
        }
    }

    pub fn groups(&self) -> &[String] {
        self.groups.as_deref().unwrap_or_default()
    }
}

/// Stateless compiler front-end; one instance serves every request.
#[derive(Debug, Clone)]
pub struct ClaimCompiler {
    config: ClaimsConfig,
}

impl ClaimCompiler {
    pub fn new(config: ClaimsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClaimsConfig {
        &self.config
    }

    pub fn compile_v1<D: GrantDirectory>(
        &self,
        request: Option<&ClaimRequest>,
        directory: &D,
    ) -> Result<ClaimResponseV1, D::Error> {
        legacy::compile_flat(&self.config, request, directory).map(ClaimResponseV1::from)
    }

    pub fn compile_v2<D: GrantDirectory>(
        &self,
        request: Option<&ClaimRequest>,
        directory: &D,
    ) -> Result<ClaimResponseV2, D::Error> {
        legacy::compile_flat(&self.config, request, directory).map(ClaimResponseV2::from)
    }

    pub fn compile_v3<D: GrantDirectory>(
        &self,
        request: Option<&ClaimRequest>,
        directory: &D,
    ) -> Result<ClaimResponseV3, D::Error> {
        grouped::compile_grouped(&self.config, request, directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::ClaimBinding;
    use crate::scope::GrantSnapshot;
    use kafkagate_core::{AccessGrant, GrantPermission, Namespace, PUBLIC_GRANTEE, PatternKind, ResourceKind};
    use proptest::prelude::*;

    fn compiler() -> ClaimCompiler {
        ClaimCompiler::new(ClaimsConfig {
            admin_group: "GP-ADMIN".to_string(),
            ..ClaimsConfig::default()
        })
    }

    fn grant(
        name: &str,
        kind: ResourceKind,
        resource: &str,
        pattern: PatternKind,
        cluster: &str,
        granted_to: &str,
    ) -> AccessGrant {
        AccessGrant {
            name: name.to_string(),
            namespace: "ns1".to_string(),
            cluster: cluster.to_string(),
            resource_kind: kind,
            resource: resource.to_string(),
            pattern_kind: pattern,
            permission: GrantPermission::Owner,
            granted_to: granted_to.to_string(),
        }
    }

    fn directory(grants: Vec<AccessGrant>) -> GrantSnapshot {
        GrantSnapshot {
            namespaces: vec![
                Namespace::new("ns1", "local").with_label("support-group", "GP-NS1"),
                Namespace::new("ns2", "local").with_label("support-group", "GP-NS2,GP-OPS"),
            ],
            grants,
            managed_clusters: vec!["local".to_string(), "remote".to_string()],
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn binding(role: &str, patterns: &[&str], clusters: &[&str]) -> ClaimBinding {
        ClaimBinding {
            role: role.to_string(),
            patterns: Some(strings(patterns)),
            clusters: Some(strings(clusters)),
        }
    }

    fn unrestricted_patterns(role: &str, clusters: &[&str]) -> ClaimBinding {
        ClaimBinding {
            role: role.to_string(),
            patterns: None,
            clusters: Some(strings(clusters)),
        }
    }

    #[test]
    fn prefixed_topic_grant_compiles_to_open_pattern() {
        let dir = directory(vec![grant(
            "ns1-acl",
            ResourceKind::Topic,
            "ns1-",
            PatternKind::Prefixed,
            "local",
            "ns1",
        )]);

        let resp = compiler().compile_v1(Some(&ClaimRequest::new(["GP-NS1"])), &dir).unwrap();
        assert_eq!(resp.attributes.topics_filter_regexp, strings(&["^\\Qns1-\\E.*$"]));
        assert_eq!(resp.attributes.connects_filter_regexp, strings(&["^none$"]));
        assert_eq!(resp.attributes.consumer_groups_filter_regexp, strings(&["^.*$"]));
        assert_eq!(resp.roles, ClaimsConfig::default().former_roles);
    }

    #[test]
    fn grant_on_every_managed_cluster_gets_wildcard_cluster() {
        let dir = directory(vec![
            grant("ns1-acl-local", ResourceKind::Topic, "ns1-", PatternKind::Prefixed, "local", "ns1"),
            grant("ns1-acl-remote", ResourceKind::Topic, "ns1-", PatternKind::Prefixed, "remote", "ns1"),
        ]);

        let resp = compiler().compile_v3(Some(&ClaimRequest::new(["GP-NS1"])), &dir).unwrap();
        let topics: Vec<&ClaimBinding> = resp.bindings().iter().filter(|b| b.role == "topic-read").collect();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].clusters(), strings(&["^.*$"]).as_slice());
        assert_eq!(topics[0].patterns(), strings(&["^\\Qns1-\\E.*$"]).as_slice());
    }

    #[test]
    fn literal_grant_under_prefix_is_not_compiled() {
        let grants = vec![
            grant("acl-1", ResourceKind::Topic, "project.topic1", PatternKind::Literal, "local", "ns1"),
            grant("acl-2", ResourceKind::Topic, "project.", PatternKind::Prefixed, "local", "ns1"),
        ];
        let dir = directory(grants);
        let request = ClaimRequest::new(["GP-NS1"]);

        let v3 = compiler().compile_v3(Some(&request), &dir).unwrap();
        let topics: Vec<&ClaimBinding> = v3.bindings().iter().filter(|b| b.role == "topic-read").collect();
        assert_eq!(topics, vec![&binding("topic-read", &["^\\Qproject.\\E.*$"], &["^local$"])]);

        let v2 = compiler().compile_v2(Some(&request), &dir).unwrap();
        assert_eq!(v2.filters.topics_filter_regexp, strings(&["^\\Qproject.\\E.*$"]));
    }

    #[test]
    fn grouped_claims_cover_every_step() {
        let dir = directory(vec![
            grant("t-local", ResourceKind::Topic, "ns1-", PatternKind::Prefixed, "local", "ns1"),
            grant("t-remote", ResourceKind::Topic, "ns1-", PatternKind::Prefixed, "remote", "ns1"),
            grant("t-shared", ResourceKind::Topic, "ns2-topic1", PatternKind::Literal, "local", PUBLIC_GRANTEE),
            grant("c-local", ResourceKind::Connect, "ns1-", PatternKind::Prefixed, "local", "ns1"),
            grant("g-local", ResourceKind::Group, "ns1-", PatternKind::Prefixed, "local", "ns1"),
            grant("g-remote", ResourceKind::Group, "ns1-", PatternKind::Prefixed, "remote", "ns1"),
            grant("tx-local", ResourceKind::TransactionalId, "ns1-", PatternKind::Prefixed, "local", "ns1"),
        ]);

        let resp = compiler().compile_v3(Some(&ClaimRequest::new(["GP-NS1"])), &dir).unwrap();
        assert_eq!(
            resp.bindings(),
            &[
                binding("connect-rw", &["^\\Qns1-\\E.*$"], &["^local$"]),
                unrestricted_patterns("group-read", &["^.*$"]),
                binding("topic-read", &["^\\Qns1-\\E.*$"], &["^.*$"]),
                binding("topic-read", &["^\\Qns2-topic1\\E$"], &["^local$"]),
                binding("registry-read", &["^\\Qns1-\\E.*$"], &["^.*$"]),
                binding("registry-read", &["^\\Qns2-topic1\\E-(key|value)$"], &["^local$"]),
            ]
        );
    }

    #[test]
    fn topics_with_equal_scope_merge_into_one_binding() {
        let dir = directory(vec![
            grant("a", ResourceKind::Topic, "ns1-a", PatternKind::Literal, "local", "ns1"),
            grant("b", ResourceKind::Topic, "ns1-b.", PatternKind::Prefixed, "local", "ns1"),
        ]);

        let resp = compiler().compile_v3(Some(&ClaimRequest::new(["GP-NS1"])), &dir).unwrap();
        assert_eq!(
            resp.bindings(),
            &[
                binding("topic-read", &["^\\Qns1-a\\E$", "^\\Qns1-b.\\E.*$"], &["^local$"]),
                binding(
                    "registry-read",
                    &["^\\Qns1-a\\E-(key|value)$", "^\\Qns1-b.\\E.*$"],
                    &["^local$"],
                ),
            ]
        );
    }

    #[test]
    fn flat_and_grouped_shapes_use_different_membership_tests() {
        let dir = directory(vec![grant(
            "ns2-acl",
            ResourceKind::Topic,
            "ns2-",
            PatternKind::Prefixed,
            "local",
            "ns2",
        )]);
        let request = ClaimRequest::new(["GP-OPS"]);

        let v1 = compiler().compile_v1(Some(&request), &dir).unwrap();
        assert_eq!(v1.attributes.topics_filter_regexp, strings(&["^none$"]));

        let v3 = compiler().compile_v3(Some(&request), &dir).unwrap();
        assert_eq!(v3.bindings()[0].patterns(), strings(&["^\\Qns2-\\E.*$"]).as_slice());
    }

    #[test]
    fn admin_group_gets_full_access_in_every_shape() {
        let dir = directory(vec![grant(
            "ns1-acl",
            ResourceKind::Topic,
            "ns1-",
            PatternKind::Prefixed,
            "local",
            "ns1",
        )]);
        let request = ClaimRequest::new(["GP-NS1", "GP-ADMIN"]);
        let config = ClaimsConfig::default();

        let v1 = compiler().compile_v1(Some(&request), &dir).unwrap();
        assert_eq!(v1.roles, config.former_admin_roles);
        assert_eq!(v1.attributes, ClaimFilters::allow_all());

        let v2 = compiler().compile_v2(Some(&request), &dir).unwrap();
        assert_eq!(v2.filters, ClaimFilters::allow_all());

        let v3 = compiler().compile_v3(Some(&request), &dir).unwrap();
        let roles: Vec<&str> = v3.bindings().iter().map(|b| b.role.as_str()).collect();
        let mut expected: Vec<&str> = config.admin_roles.values().map(String::as_str).collect();
        expected.dedup();
        assert_eq!(roles, expected);
        assert!(v3.bindings().iter().all(|b| b.patterns.is_none() && b.clusters.is_none()));
    }

    #[test]
    fn absent_request_denies_everything_in_flat_shapes() {
        let dir = directory(vec![grant(
            "public",
            ResourceKind::Topic,
            "public-",
            PatternKind::Prefixed,
            "local",
            PUBLIC_GRANTEE,
        )]);

        let v1 = compiler().compile_v1(None, &dir).unwrap();
        assert_eq!(v1.attributes, ClaimFilters::deny_all());
        assert_eq!(v1.roles, ClaimsConfig::default().former_roles);

        // Without a body the grouped shape still sees public grants.
        let v3 = compiler().compile_v3(None, &dir).unwrap();
        assert_eq!(v3.bindings()[0].patterns(), strings(&["^\\Qpublic-\\E.*$"]).as_slice());
    }

    #[test]
    fn nothing_visible_yields_sentinels() {
        let dir = directory(vec![]);
        let request = ClaimRequest::new(["GP-UNKNOWN"]);

        let v2 = compiler().compile_v2(Some(&request), &dir).unwrap();
        assert_eq!(v2.filters.topics_filter_regexp, strings(&["^none$"]));
        assert_eq!(v2.filters.connects_filter_regexp, strings(&["^none$"]));

        let v3 = compiler().compile_v3(Some(&request), &dir).unwrap();
        assert_eq!(v3.groups, None);
        assert_eq!(serde_json::to_value(&v3).unwrap(), serde_json::json!({ "groups": null }));
    }

    #[test]
    fn schema_derivation_skipped_without_schema_role() {
        let mut config = ClaimsConfig::default();
        config.roles.remove(&ResourceKind::Schema);
        let compiler = ClaimCompiler::new(config);

        let dir = directory(vec![grant(
            "ns1-acl",
            ResourceKind::Topic,
            "ns1-",
            PatternKind::Prefixed,
            "local",
            "ns1",
        )]);
        let resp = compiler.compile_v3(Some(&ClaimRequest::new(["GP-NS1"])), &dir).unwrap();
        assert_eq!(resp.bindings().len(), 1);
    }

    #[test]
    fn response_json_layouts() {
        let dir = directory(vec![grant(
            "ns1-acl",
            ResourceKind::Connect,
            "ns1-",
            PatternKind::Prefixed,
            "local",
            "ns1",
        )]);
        let request = ClaimRequest::new(["GP-NS1"]);

        let v1 = serde_json::to_value(compiler().compile_v1(Some(&request), &dir).unwrap()).unwrap();
        assert_eq!(v1["attributes"]["connectsFilterRegexp"], serde_json::json!(["^\\Qns1-\\E.*$"]));
        assert_eq!(v1["attributes"]["consumerGroupsFilterRegexp"], serde_json::json!(["^.*$"]));

        let v2 = serde_json::to_value(compiler().compile_v2(Some(&request), &dir).unwrap()).unwrap();
        assert_eq!(v2["connectsFilterRegexp"], serde_json::json!(["^\\Qns1-\\E.*$"]));
        assert!(v2.get("attributes").is_none());

        let v3 = serde_json::to_value(compiler().compile_v3(Some(&request), &dir).unwrap()).unwrap();
        assert_eq!(
            v3,
            serde_json::json!({
                "groups": {
                    "group": [
                        { "role": "connect-rw", "patterns": ["^\\Qns1-\\E.*$"], "clusters": ["^local$"] }
                    ]
                }
            })
        );
    }

    #[test]
    fn schema_grant_merges_with_derived_schema_binding() {
        let dir = directory(vec![
            grant("t-local", ResourceKind::Topic, "ns1-", PatternKind::Prefixed, "local", "ns1"),
            grant("s-local", ResourceKind::Schema, "ns1-", PatternKind::Prefixed, "local", "ns1"),
        ]);

        let resp = compiler().compile_v3(Some(&ClaimRequest::new(["GP-NS1"])), &dir).unwrap();
        assert_eq!(
            resp.bindings(),
            &[
                binding("registry-read", &["^\\Qns1-\\E.*$"], &["^local$"]),
                binding("topic-read", &["^\\Qns1-\\E.*$"], &["^local$"]),
            ]
        );
    }

    #[test]
    fn request_without_groups_field_parses() {
        let req: ClaimRequest = serde_json::from_str("{}").unwrap();
        assert!(req.groups().is_empty());
    }

    fn arb_grant() -> impl Strategy<Value = AccessGrant> {
        arb_grant_of(vec![ResourceKind::Topic, ResourceKind::Connect, ResourceKind::Group])
    }

    fn arb_grant_of(kinds: Vec<ResourceKind>) -> impl Strategy<Value = AccessGrant> {
        (
            0u8..8,
            prop::sample::select(kinds),
            prop::sample::select(vec!["ns1-", "ns1-a", "ns1-a.", "ns2-", "x"]),
            any::<bool>(),
            prop::sample::select(vec!["local", "remote"]),
            prop::sample::select(vec!["ns1", "ns2", PUBLIC_GRANTEE]),
        )
            .prop_map(|(n, kind, resource, prefixed, cluster, granted_to)| {
                let pattern = if prefixed { PatternKind::Prefixed } else { PatternKind::Literal };
                grant(&format!("acl-{n}"), kind, resource, pattern, cluster, granted_to)
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: compiling an unchanged snapshot twice gives the same claims.
        #[test]
        fn compilation_is_idempotent(grants in prop::collection::vec(arb_grant(), 0..12)) {
            let dir = directory(grants);
            let request = ClaimRequest::new(["GP-NS1", "GP-OPS"]);
            let c = compiler();

            prop_assert_eq!(c.compile_v1(Some(&request), &dir).unwrap(), c.compile_v1(Some(&request), &dir).unwrap());
            prop_assert_eq!(c.compile_v3(Some(&request), &dir).unwrap(), c.compile_v3(Some(&request), &dir).unwrap());
        }

        /// Property: no shape ever emits an empty pattern list.
        #[test]
        fn no_empty_pattern_lists(grants in prop::collection::vec(arb_grant(), 0..12)) {
            let dir = directory(grants);
            let request = ClaimRequest::new(["GP-NS1"]);
            let c = compiler();

            let v2 = c.compile_v2(Some(&request), &dir).unwrap();
            prop_assert!(!v2.filters.topics_filter_regexp.is_empty());
            prop_assert!(!v2.filters.connects_filter_regexp.is_empty());

            let v3 = c.compile_v3(Some(&request), &dir).unwrap();
            if let Some(groups) = &v3.groups {
                prop_assert!(!groups[BINDING_GROUP_KEY].is_empty());
            }
            for b in v3.bindings() {
                prop_assert!(b.patterns.as_ref().is_none_or(|p| !p.is_empty()));
                prop_assert!(!b.clusters().is_empty());
            }
        }

        /// Property: no binding repeats a pattern or cluster, and no two bindings
        /// share a role and a cluster set.
        #[test]
        fn bindings_hold_no_duplicates(grants in prop::collection::vec(
            arb_grant_of(vec![ResourceKind::Topic, ResourceKind::Schema, ResourceKind::Group]),
            0..12,
        )) {
            let dir = directory(grants);
            let resp = compiler().compile_v3(Some(&ClaimRequest::new(["GP-NS1", "GP-OPS"])), &dir).unwrap();

            let mut scopes: Vec<(String, Vec<String>)> = Vec::new();
            for b in resp.bindings() {
                let mut patterns = b.patterns().to_vec();
                patterns.sort();
                patterns.dedup();
                prop_assert_eq!(patterns.len(), b.patterns().len());

                let mut clusters = b.clusters().to_vec();
                clusters.sort();
                clusters.dedup();
                prop_assert_eq!(clusters.len(), b.clusters().len());

                let scope = (b.role.clone(), clusters);
                prop_assert!(!scopes.contains(&scope), "duplicate scope {:?}", scope);
                scopes.push(scope);
            }
        }

        /// Property: every topic binding has exactly one schema binding with the same clusters.
        #[test]
        fn schema_binding_per_topic_binding(grants in prop::collection::vec(arb_grant(), 0..12)) {
            let dir = directory(grants);
            let resp = compiler().compile_v3(Some(&ClaimRequest::new(["GP-NS1"])), &dir).unwrap();

            let topics: Vec<&ClaimBinding> = resp.bindings().iter().filter(|b| b.role == "topic-read").collect();
            let schemas: Vec<&ClaimBinding> = resp.bindings().iter().filter(|b| b.role == "registry-read").collect();
            prop_assert_eq!(topics.len(), schemas.len());
            for (t, s) in topics.iter().zip(schemas.iter()) {
                prop_assert_eq!(t.clusters(), s.clusters());
            }
        }

        /// Property: group bindings never carry a pattern restriction.
        #[test]
        fn group_bindings_are_unrestricted(grants in prop::collection::vec(arb_grant(), 0..12)) {
            let dir = directory(grants);
            let resp = compiler().compile_v3(Some(&ClaimRequest::new(["GP-NS1"])), &dir).unwrap();
            for b in resp.bindings().iter().filter(|b| b.role == "group-read") {
                prop_assert!(b.patterns.is_none());
            }
        }
    }
}
