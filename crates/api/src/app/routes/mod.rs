use axum::{routing::post, Router};

pub mod claims;
pub mod system;

/// Router for the claim endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/akhq-claim", post(claims::claim_v1))
        .route("/akhq-claim/v2", post(claims::claim_v2))
        .route("/akhq-claim/v3", post(claims::claim_v3))
}
