//! Claim endpoints polled by the operations UI at login.
//!
//! The three versions coexist for UI deployments of different ages; they
//! differ only in response layout and group-label matching.

use std::sync::Arc;

use axum::{body::Bytes, extract::Extension, http::StatusCode, response::IntoResponse, Json};

use kafkagate_auth::ClaimRequest;

use crate::app::{dto, errors, services::ClaimServices};

fn group_count(request: &Option<ClaimRequest>) -> usize {
    request.as_ref().map_or(0, |r| r.groups().len())
}

/// POST /akhq-claim - flat claims nested under `attributes`
pub async fn claim_v1(
    Extension(services): Extension<Arc<ClaimServices>>,
    body: Bytes,
) -> axum::response::Response {
    let request = match dto::parse_claim_request(&body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    match services.compiler.compile_v1(request.as_ref(), &services.directory) {
        Ok(claims) => {
            tracing::info!(
                shape = "v1",
                groups = group_count(&request),
                topics = claims.attributes.topics_filter_regexp.len(),
                connects = claims.attributes.connects_filter_regexp.len(),
                "compiled claims"
            );
            (StatusCode::OK, Json(claims)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// POST /akhq-claim/v2 - flat claims at the top level
pub async fn claim_v2(
    Extension(services): Extension<Arc<ClaimServices>>,
    body: Bytes,
) -> axum::response::Response {
    let request = match dto::parse_claim_request(&body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    match services.compiler.compile_v2(request.as_ref(), &services.directory) {
        Ok(claims) => {
            tracing::info!(
                shape = "v2",
                groups = group_count(&request),
                topics = claims.filters.topics_filter_regexp.len(),
                connects = claims.filters.connects_filter_regexp.len(),
                "compiled claims"
            );
            (StatusCode::OK, Json(claims)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// POST /akhq-claim/v3 - grouped role bindings
pub async fn claim_v3(
    Extension(services): Extension<Arc<ClaimServices>>,
    body: Bytes,
) -> axum::response::Response {
    let request = match dto::parse_claim_request(&body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    match services.compiler.compile_v3(request.as_ref(), &services.directory) {
        Ok(claims) => {
            let bindings = claims.bindings().len();
            if bindings == 0 {
                tracing::debug!(shape = "v3", "no bindings, omitting groups");
            }
            tracing::info!(shape = "v3", groups = group_count(&request), bindings, "compiled claims");
            (StatusCode::OK, Json(claims)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
