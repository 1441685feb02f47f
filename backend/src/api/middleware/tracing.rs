//! Per-request span with a correlation id.
//!
//! The id comes from `X-Correlation-ID`, then the trace id of a W3C
//! `traceparent` header, else a fresh UUID. It is echoed back on the response
//! so editors can quote it when reporting a failed save.

use axum::{extract::Request, http::header::HeaderValue, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

const TRACEPARENT_HEADER: &str = "traceparent";

/// Request extension holding the correlation id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trace id segment of `version-traceid-parentid-flags`.
    fn from_traceparent(value: &str) -> Option<Self> {
        let trace_id = value.split('-').nth(1)?;
        if trace_id.is_empty() {
            return None;
        }
        Some(Self(trace_id.to_string()))
    }

    fn from_request(request: &Request) -> Self {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|h| h.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        header(CORRELATION_ID_HEADER)
            .map(|v| Self(v.to_string()))
            .or_else(|| header(TRACEPARENT_HEADER).and_then(Self::from_traceparent))
            .unwrap_or_else(Self::generate)
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub async fn correlation_id_middleware(mut request: Request, next: Next) -> Response {
    let correlation_id = CorrelationId::from_request(&request);
    let method = request.method().clone();
    let uri = request.uri().path().to_string();

    request.extensions_mut().insert(correlation_id.clone());

    let span = tracing::info_span!(
        "http_request",
        correlation_id = %correlation_id,
        method = %method,
        uri = %uri,
    );

    async move {
        let mut response = next.run(request).await;

        if let Ok(value) = HeaderValue::from_str(correlation_id.as_str()) {
            response.headers_mut().insert(CORRELATION_ID_HEADER, value);
        }

        tracing::info!(status = response.status().as_u16(), "Request completed");
        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(headers: &[(&str, &str)]) -> Request {
        let mut builder = Request::builder().uri("/ping");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_explicit_header_wins() {
        let req = request_with(&[
            (CORRELATION_ID_HEADER, "editor-123"),
            (TRACEPARENT_HEADER, "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"),
        ]);
        assert_eq!(CorrelationId::from_request(&req).as_str(), "editor-123");
    }

    #[test]
    fn test_traceparent_fallback() {
        let req = request_with(&[(
            TRACEPARENT_HEADER,
            "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01",
        )]);
        assert_eq!(
            CorrelationId::from_request(&req).as_str(),
            "4bf92f3577b34da6a3ce929d0e0e4736"
        );
    }

    #[test]
    fn test_generated_when_absent_or_blank() {
        let req = request_with(&[(CORRELATION_ID_HEADER, "  "), (TRACEPARENT_HEADER, "garbage")]);
        let id = CorrelationId::from_request(&req);
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }
}
