use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use kafkagate_infra::StoreError;

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    tracing::warn!(error = %err, "collaborator lookup failed");
    match err {
        StoreError::Unavailable(msg) => json_error(StatusCode::BAD_GATEWAY, "upstream_error", msg),
        StoreError::Invalid(err) => json_error(StatusCode::BAD_GATEWAY, "upstream_error", err.to_string()),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
