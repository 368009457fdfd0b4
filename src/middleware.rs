//! Request-scoped middleware: correlation IDs and access logging.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;
use uuid::Uuid;

/// Correlation ID attached to every request.
///
/// Callers may supply their own `x-request-id`; otherwise one is minted.
/// The ID lands in request extensions for handlers and is echoed back on
/// the response.
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(request).await;
    if let Ok(value) = id.parse() {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// Correlation ID stored in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Access log: one line per completed request, keyed by correlation ID.
pub async fn access_log(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_default();

    let start = std::time::Instant::now();
    let response = next.run(request).await;

    info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        request_id = %id,
        "http_request"
    );

    response
}
