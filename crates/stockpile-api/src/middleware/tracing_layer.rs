//! # Request/Response Tracing
//!
//! Configures `tower_http::trace::TraceLayer` for structured request
//! logging with tracing spans.

use axum::extract::MatchedPath;
use axum::http::Request;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{MakeSpan, TraceLayer};
use tracing::Span;

/// Span factory naming each request by method, matched route and URI.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str)
            .unwrap_or("unmatched");
        tracing::info_span!(
            "request",
            method = %request.method(),
            route,
            uri = %request.uri()
        )
    }
}

/// Build the `TraceLayer` for the Stockpile API.
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan> {
    TraceLayer::new_for_http().make_span_with(RequestSpan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_constructs_without_panic() {
        let _layer = layer();
    }

    #[test]
    fn span_is_named_request_with_route_fields() {
        tracing::subscriber::with_default(tracing_subscriber::registry(), || {
            let request = Request::builder().uri("/nowhere").body(()).unwrap();
            let span = RequestSpan.make_span(&request);
            let metadata = span.metadata().expect("span enabled under a registry");
            assert_eq!(metadata.name(), "request");
            for field in ["method", "route", "uri"] {
                assert!(metadata.fields().field(field).is_some(), "missing {field}");
            }
        });
    }
}
