use axum::{
    extract::Request,
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::Response,
};

use crate::config;
use crate::error::ApiError;

/// Rejects bodies whose declared length exceeds `api.max_request_size_bytes`
/// before anything is read. Undeclared lengths are capped by `DefaultBodyLimit`
/// in the JSON extractor instead.
pub async fn reject_oversized_body(request: Request, next: Next) -> Result<Response, ApiError> {
    let limit = config::config().api.max_request_size_bytes;

    let declared = request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    if let Some(length) = declared {
        if length > limit as u64 {
            tracing::debug!("Rejecting {} byte body on {} (limit {})", length, request.uri().path(), limit);
            return Err(ApiError::payload_too_large(format!(
                "Request body too large (limit is {} bytes)",
                limit
            )));
        }
    }

    Ok(next.run(request).await)
}
