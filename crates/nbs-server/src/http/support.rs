// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use nbs_api::{map_error, ApiError, CatalogAdapter};
use nbs_core::sha256_hex;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::AppState;

pub(crate) fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

pub(crate) fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    if let Some(raw) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    make_request_id(state)
}

pub(crate) fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(v) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", v);
    }
    response
}

pub(crate) fn if_none_match(headers: &HeaderMap) -> Option<String> {
    headers
        .get("if-none-match")
        .and_then(|v| v.to_str().ok())
        .map(std::string::ToString::to_string)
}

pub(crate) fn put_cache_headers(headers: &mut HeaderMap, ttl: Duration, etag: &str) {
    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={}", ttl.as_secs())) {
        headers.insert("cache-control", value);
    }
    if let Ok(value) = HeaderValue::from_str(etag) {
        headers.insert("etag", value);
    }
}

pub(crate) fn api_error_response(err: &ApiError, route: &str) -> Response {
    let status = StatusCode::from_u16(map_error(err).status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(route, code = err.code.as_str(), message = %err.message, "request failed");
    } else {
        warn!(route, code = err.code.as_str(), message = %err.message, "request rejected");
    }
    (status, Json(err.to_body())).into_response()
}

/// Runs a catalog call on the blocking pool; SQLite access is synchronous.
pub(crate) async fn run_blocking<T, F>(state: &AppState, call: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&(dyn CatalogAdapter + Send + Sync)) -> Result<T, ApiError> + Send + 'static,
{
    let catalog = state.catalog.clone();
    tokio::task::spawn_blocking(move || call(catalog.as_ref()))
        .await
        .map_err(|err| ApiError::internal(format!("catalog worker failed: {err}")))?
}

pub(crate) fn respond<T: Serialize>(
    result: Result<T, ApiError>,
    status: StatusCode,
    route: &str,
    request_id: &str,
) -> Response {
    let response = match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(err) => api_error_response(&err, route),
    };
    info!(request_id, route, status = response.status().as_u16(), "request served");
    with_request_id(response, request_id)
}

/// JSON with a content-hash entity tag; a matching `if-none-match` gets 304.
pub(crate) fn etagged_json<T: Serialize>(
    headers: &HeaderMap,
    body: &T,
    ttl: Duration,
) -> Result<Response, ApiError> {
    let bytes = serde_json::to_vec(body)
        .map_err(|err| ApiError::internal(format!("response encoding failed: {err}")))?;
    let etag = format!("\"{}\"", sha256_hex(&bytes));
    let mut response = if if_none_match(headers).as_deref() == Some(etag.as_str()) {
        StatusCode::NOT_MODIFIED.into_response()
    } else {
        (StatusCode::OK, [(CONTENT_TYPE, "application/json")], bytes).into_response()
    };
    put_cache_headers(response.headers_mut(), ttl, &etag);
    Ok(response)
}
