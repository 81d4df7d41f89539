//! # Prometheus Metrics
//!
//! Request counters and latency histograms recorded through the `metrics`
//! facade. Without an installed recorder the macros are no-ops; with one,
//! `GET /metrics` renders them in the Prometheus text format.
//!
//! | Metric                                    | Kind      | Labels                  |
//! |-------------------------------------------|-----------|-------------------------|
//! | `stockpile_http_requests_total`           | counter   | method, route, status   |
//! | `stockpile_http_request_duration_seconds` | histogram | method, route           |
//! | `stockpile_validation_failures_total`     | counter   | schema, source          |

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Route label for requests that matched no route.
const UNMATCHED: &str = "unmatched";

/// Middleware that records a request counter and a latency histogram.
///
/// Routes are labelled by their matched template (`/api/items/{id}`), not
/// the raw path, to keep label cardinality bounded.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED.to_string());
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        "stockpile_http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "stockpile_http_request_duration_seconds",
        "method" => method,
        "route" => route
    )
    .record(started.elapsed().as_secs_f64());

    response
}
