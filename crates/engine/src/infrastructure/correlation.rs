//! Correlation ID tracking for request tracing.
//!
//! Every HTTP request gets a [`CorrelationId`]: the caller's `x-correlation-id`
//! header when it holds a valid UUID, a fresh v4 otherwise. The id is recorded
//! on the request span and echoed back in the response header.

use std::fmt;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Correlation ID for tracking one request through logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reuse a caller-supplied id if it parses.
    pub fn from_header(value: Option<&HeaderValue>) -> Self {
        value
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(Self)
            .unwrap_or_default()
    }

    /// Short format (first 8 characters) for logging.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Middleware: attach a correlation id to the request, its span and its response.
pub async fn propagate(mut request: Request, next: Next) -> Response {
    let id = CorrelationId::from_header(request.headers().get(CORRELATION_HEADER));
    request.extensions_mut().insert(id);

    let span = tracing::info_span!(
        "request",
        correlation_id = %id.short(),
        method = %request.method(),
        path = %request.uri().path(),
    );
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        assert_ne!(CorrelationId::new(), CorrelationId::new());
    }

    #[test]
    fn short_format_is_8_chars() {
        assert_eq!(CorrelationId::new().short().len(), 8);
    }

    #[test]
    fn valid_header_is_reused() {
        let raw = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        let header = HeaderValue::from_static(raw);

        let id = CorrelationId::from_header(Some(&header));

        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn garbage_header_gets_a_fresh_id() {
        let header = HeaderValue::from_static("not-a-uuid");

        let id = CorrelationId::from_header(Some(&header));

        assert_eq!(id.to_string().len(), 36);
    }
}
