//! Request correlation ids.
//!
//! Each request carries an id taken from an upstream `x-request-id` header or
//! freshly generated. The id is recorded on the request span, tagged on the
//! Sentry scope, stored in the request extensions as [`RequestId`], and echoed
//! back in the response headers.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Upstream ids longer than this are replaced with a generated one.
const MAX_UPSTREAM_LEN: usize = 128;

/// The correlation id of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reuse a well-formed upstream id or generate a new UUID v4.
    fn from_upstream(header: Option<&HeaderValue>) -> Self {
        let upstream = header
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty() && id.len() <= MAX_UPSTREAM_LEN);
        Self(upstream.map_or_else(|| Uuid::new_v4().to_string(), String::from))
    }
}

/// Middleware that tags every request with a [`RequestId`].
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_upstream(request.headers().get(REQUEST_ID_HEADER));

    Span::current().record("request_id", request_id.0.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id.0);
    });

    let header = HeaderValue::from_str(&request_id.0).ok();
    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;
    if let Some(value) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_id_is_reused() {
        let header = HeaderValue::from_static("edge-1234");
        assert_eq!(RequestId::from_upstream(Some(&header)).0, "edge-1234");
    }

    #[test]
    fn test_missing_or_bad_upstream_id_is_replaced() {
        let generated = RequestId::from_upstream(None);
        assert!(Uuid::parse_str(&generated.0).is_ok());

        let blank = HeaderValue::from_static("   ");
        assert!(Uuid::parse_str(&RequestId::from_upstream(Some(&blank)).0).is_ok());

        let long = HeaderValue::from_str(&"x".repeat(MAX_UPSTREAM_LEN + 1)).unwrap();
        assert!(Uuid::parse_str(&RequestId::from_upstream(Some(&long)).0).is_ok());
    }
}
