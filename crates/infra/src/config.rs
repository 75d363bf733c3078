//! Service configuration: environment variables, optionally overridden by YAML.
//!
//! `KAFKAGATE_CONFIG` names a YAML file; keys present there win over the
//! environment. Every key is optional.

use std::fs;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use serde::Deserialize;

use kafkagate_auth::{ClaimsConfig, RoleMapping};
use kafkagate_core::{AccessGrant, Namespace};

pub const CONFIG_PATH_ENV: &str = "KAFKAGATE_CONFIG";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub claims: ClaimsConfig,
    pub managed_clusters: Vec<String>,
    pub seed: SeedData,
}

/// Resources loaded into the in-memory stores at start-up.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub namespaces: Vec<Namespace>,
    #[serde(default)]
    pub access_grants: Vec<AccessGrant>,
}

#[derive(Debug, Default, Deserialize)]
struct ClaimsOverride {
    admin_group: Option<String>,
    group_label: Option<String>,
    group_delimiter: Option<String>,
    roles: Option<RoleMapping>,
    admin_roles: Option<RoleMapping>,
    former_roles: Option<Vec<String>>,
    former_admin_roles: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct AppConfigOverride {
    bind_addr: Option<String>,
    claims: Option<ClaimsOverride>,
    managed_clusters: Option<Vec<String>>,
    seed: Option<SeedData>,
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = lookup("KAFKAGATE_BIND")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .with_context(|| "parse KAFKAGATE_BIND")?;

        let mut claims = ClaimsConfig::default();
        if let Some(value) = lookup("KAFKAGATE_ADMIN_GROUP") {
            claims.admin_group = value;
        }
        if let Some(value) = lookup("KAFKAGATE_GROUP_LABEL") {
            claims.group_label = value;
        }
        if let Some(value) = lookup("KAFKAGATE_GROUP_DELIMITER") {
            claims.group_delimiter = value;
        }

        let managed_clusters = lookup("KAFKAGATE_MANAGED_CLUSTERS")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            claims,
            managed_clusters,
            seed: SeedData::default(),
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read {CONFIG_PATH_ENV}: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        Ok(config)
    }

    /// Apply a YAML override document on top of the current values.
    pub fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: AppConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse kafkagate config yaml")?;

        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.managed_clusters {
            self.managed_clusters = value;
        }
        if let Some(value) = override_cfg.seed {
            for grant in &value.access_grants {
                grant
                    .validate()
                    .with_context(|| format!("seed access grant '{}'", grant.name))?;
            }
            self.seed = value;
        }
        if let Some(claims) = override_cfg.claims {
            self.apply_claims(claims);
        }
        Ok(())
    }

    fn apply_claims(&mut self, claims: ClaimsOverride) {
        let target = &mut self.claims;
        if let Some(value) = claims.admin_group {
            target.admin_group = value;
        }
        if let Some(value) = claims.group_label {
            target.group_label = value;
        }
        if let Some(value) = claims.group_delimiter {
            target.group_delimiter = value;
        }
        if let Some(value) = claims.roles {
            target.roles = value;
        }
        if let Some(value) = claims.admin_roles {
            target.admin_roles = value;
        }
        if let Some(value) = claims.former_roles {
            target.former_roles = value;
        }
        if let Some(value) = claims.former_admin_roles {
            target.former_admin_roles = value;
        }
    }
}
