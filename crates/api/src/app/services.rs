//! Service wiring: one compiler and one collaborator directory per process.

use anyhow::{Context, Result};

use kafkagate_auth::ClaimCompiler;
use kafkagate_infra::{AppConfig, StoreDirectory};

/// Everything a claim handler needs. Shared read-only across requests.
#[derive(Clone)]
pub struct ClaimServices {
    pub compiler: ClaimCompiler,
    pub directory: StoreDirectory,
}

impl ClaimServices {
    pub fn new(compiler: ClaimCompiler, directory: StoreDirectory) -> Self {
        Self { compiler, directory }
    }
}

/// Build services from configuration, seeding the in-memory stores.
pub fn build_services(config: &AppConfig) -> Result<ClaimServices> {
    let directory = StoreDirectory::in_memory(&config.seed, config.managed_clusters.clone())
        .with_context(|| "seed collaborator stores")?;

    Ok(ClaimServices::new(ClaimCompiler::new(config.claims.clone()), directory))
}
