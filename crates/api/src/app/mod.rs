//! HTTP API application wiring (Axum router + service wiring).
//!
//! This folder is structured like:
//! - `services.rs`: compiler + collaborator wiring
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request body parsing
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use kafkagate_infra::AppConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> Result<Router> {
    let services = Arc::new(services::build_services(config)?);
    Ok(router_with(services))
}

/// Router over already-built services (tests inject their own collaborators).
pub fn router_with(services: Arc<services::ClaimServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
