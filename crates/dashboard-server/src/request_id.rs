use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest inbound id that is echoed back; longer ones are replaced.
const MAX_INBOUND_LEN: usize = 128;

/// Request id carried in request extensions.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// The caller's id when it is usable, otherwise a fresh UUID v4.
fn resolve_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty() && s.len() <= MAX_INBOUND_LEN)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Tags the request span and response with a request id.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let id = resolve_request_id(request.headers());

    tracing::Span::current().record("request_id", id.as_str());
    request.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
