//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of bytes of a request or response body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
/// Multipart bodies (file uploads) are passed through without being read.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let request = if is_multipart(request.headers()) {
        tracing::info!(
            "Received request: {} {} with a multipart body",
            request.method(),
            request.uri()
        );
        request
    } else {
        let (parts, body_text) = match into_parts_and_text(request.into_parts()).await {
            Ok(parts_and_text) => parts_and_text,
            Err(error) => {
                tracing::error!("Could not read request body for logging: {error}");
                return StatusCode::BAD_REQUEST.into_response();
            }
        };
        log_body(
            &format!("Received request: {} {}", parts.method, parts.uri),
            &body_text,
        );
        Request::from_parts(parts, Body::from(body_text))
    };

    let response = next.run(request).await;

    let (parts, body_text) = match into_parts_and_text(response.into_parts()).await {
        Ok(parts_and_text) => parts_and_text,
        Err(error) => {
            tracing::error!("Could not read response body for logging: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_body(&format!("Sending response: {}", parts.status), &body_text);

    Response::from_parts(parts, Body::from(body_text))
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|content_type| content_type.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("multipart/"))
}

async fn into_parts_and_text<P>((parts, body): (P, Body)) -> Result<(P, String), axum::Error> {
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await?;

    Ok((parts, String::from_utf8_lossy(&body_bytes).to_string()))
}

fn log_body(message: &str, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        let mut end = LOG_BODY_LENGTH_LIMIT;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        tracing::info!("{message}\nbody: {}...", &body[..end]);
        tracing::debug!("Full body: {body:?}");
    } else {
        tracing::info!("{message}\nbody: {body:?}");
    }
}
