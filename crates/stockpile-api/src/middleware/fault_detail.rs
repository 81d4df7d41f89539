//! Fault detail exposure for non-production environments.
//!
//! Internal faults always render a generic 500 envelope and carry their
//! server-side detail in a [`FaultDetail`] response extension. This
//! middleware, mounted only when the environment allows it, copies that
//! detail into the envelope as `details.message`.

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::header::CONTENT_LENGTH;
use axum::middleware::Next;
use axum::response::Response;
use serde_json::json;

use crate::envelope::Envelope;
use crate::error::{FaultDetail, INTERNAL_SERVER_ERROR};

/// Largest fault envelope read back for rewriting.
const MAX_ENVELOPE_BYTES: usize = 64 * 1024;

/// Middleware that adds internal fault details to 500 envelopes.
pub async fn expose_fault_details(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let Some(FaultDetail(detail)) = response.extensions().get::<FaultDetail>().cloned() else {
        return response;
    };

    let (mut parts, body) = response.into_parts();
    let envelope = match to_bytes(body, MAX_ENVELOPE_BYTES).await {
        Ok(bytes) => serde_json::from_slice::<Envelope>(&bytes)
            .unwrap_or_else(|_| Envelope::failure(INTERNAL_SERVER_ERROR)),
        Err(_) => Envelope::failure(INTERNAL_SERVER_ERROR),
    };
    let envelope = envelope.with_details(json!({ "message": detail }));

    let body = match serde_json::to_vec(&envelope) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(%err, "failed to re-encode fault envelope");
            return Response::from_parts(parts, Body::empty());
        }
    };
    parts.headers.remove(CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(body))
}
