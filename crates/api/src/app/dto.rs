use axum::body::Bytes;
use axum::http::StatusCode;

use kafkagate_auth::ClaimRequest;

use crate::app::errors;

/// Parse an optional claim request body.
///
/// An empty body or a JSON `null` means "no request"; the flat shapes answer
/// that with deny-all claims.
pub fn parse_claim_request(body: &Bytes) -> Result<Option<ClaimRequest>, axum::response::Response> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice::<Option<ClaimRequest>>(body).map_err(|e| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_request", e.to_string())
    })
}
