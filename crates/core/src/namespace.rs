//! Namespaces: the tenancy unit that receives access grants.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A namespace as seen by the claim compiler: its name and labels.
///
/// Group membership is declared through a label (the key is configuration);
/// the compiler never interprets any other label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    #[serde(default)]
    pub cluster: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl Namespace {
    pub fn new(name: impl Into<String>, cluster: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cluster: cluster.into(),
            labels: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}
