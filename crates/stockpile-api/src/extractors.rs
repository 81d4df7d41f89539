//! # Validating Extractors
//!
//! Each extractor reads one request source as an untyped JSON map, runs the
//! DTO's schema over it, and hands the handler a typed value. A rejected
//! request never reaches the handler: the extractor's rejection is an
//! [`AppError`] that renders the 400 envelope with every field violation.
//!
//! | Extractor            | Source                  | Raw values |
//! |----------------------|-------------------------|------------|
//! | [`ValidatedBody`]    | JSON request body       | any JSON   |
//! | [`ValidatedPath`]    | path parameters         | strings    |
//! | [`ValidatedQuery`]   | query string            | strings    |
//!
//! Axum runs extractors in argument order, so a handler taking
//! `ValidatedPath` and then `ValidatedBody` reports path violations first
//! and never reads the body of a request with a bad path.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, FromRequestParts, Query, RawPathParams, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use serde_json::{Map, Value};
use stockpile_schema::{Dto, DtoError};

use crate::error::AppError;

/// Where a raw request map came from. Used in logs and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Body,
    Path,
    Query,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Path => "path",
            Self::Query => "query",
        }
    }
}

/// Validate `raw` against `T`'s schema and convert it.
pub fn validate_source<T: Dto>(raw: &Map<String, Value>, source: Source) -> Result<T, AppError> {
    let schema = T::schema().name();
    match T::parse(raw) {
        Ok(value) => Ok(value),
        Err(DtoError::Invalid(errors)) => {
            tracing::debug!(
                schema,
                source = source.as_str(),
                fields = errors.len(),
                messages = errors.message_count(),
                "request rejected by validation"
            );
            metrics::counter!(
                "stockpile_validation_failures_total",
                "schema" => schema.to_string(),
                "source" => source.as_str()
            )
            .increment(1);
            Err(AppError::Validation(errors))
        }
        Err(err @ DtoError::Conversion { .. }) => {
            tracing::error!(
                schema,
                source = source.as_str(),
                error = %err,
                "validated request did not convert into its DTO"
            );
            Err(AppError::Conversion(err.to_string()))
        }
    }
}

/// Validated JSON request body.
#[derive(Debug, Clone)]
pub struct ValidatedBody<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedBody<T>
where
    T: Dto,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json_content = has_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(body_rejection)?;
        let raw = parse_body(&bytes, json_content)?;
        validate_source(&raw, Source::Body).map(Self)
    }
}

fn body_rejection(err: BytesRejection) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::InvalidJson(err.body_text())
    }
}

/// Turn raw body bytes into a JSON object. A blank body is an empty object.
fn parse_body(bytes: &[u8], json_content: bool) -> Result<Map<String, Value>, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    if !json_content {
        return Err(AppError::InvalidJson(
            "Expected request with `Content-Type: application/json`".to_string(),
        ));
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        )),
        Err(err) => Err(AppError::InvalidJson(err.to_string())),
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = value.split(';').next().unwrap_or_default().trim();
    mime.eq_ignore_ascii_case("application/json")
        || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Validated path parameters.
#[derive(Debug, Clone)]
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: Dto,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = RawPathParams::from_request_parts(parts, state)
            .await
            .map_err(|err| AppError::BadRequest(err.body_text()))?;
        let raw: Map<String, Value> = params
            .iter()
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect();
        validate_source(&raw, Source::Path).map(Self)
    }
}

/// Validated query string.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: Dto,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|err| AppError::BadRequest(err.body_text()))?;
        let raw: Map<String, Value> = pairs
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        validate_source(&raw, Source::Query).map(Self)
    }
}
