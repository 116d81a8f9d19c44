//! Request handlers

use crate::error::ProxyError;
use crate::state::ProxyState;
use axum::extract::{Path, RawQuery, State};
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde_json::Value;
use std::time::Instant;
use tracing::{error, info};

const ALLOW_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Upstream headers never copied back to the browser
const SKIPPED_HEADERS: [&str; 11] = [
    "connection",
    "keep-alive",
    "transfer-encoding",
    "upgrade",
    "te",
    "trailer",
    "proxy-authenticate",
    "proxy-authorization",
    "content-length",
    "content-encoding",
    "content-type",
];

/// `GET /healthz`
pub async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

/// Forward `{prefix}/*path` to the backend
pub async fn forward(
    State(state): State<ProxyState>,
    method: Method,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let target = state.target_url(&path, query.as_deref());
    info!(%method, path = %path, target = %target, "Proxying request");

    let started = Instant::now();
    match relay(&state, &method, &target, &headers, body).await {
        Ok(response) => {
            info!(
                %method,
                path = %path,
                status = response.status().as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Proxy request completed"
            );
            response
        }
        Err(err) => {
            error!(
                %method,
                target = %target,
                error = %err,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Proxy request failed"
            );
            err.into_response_in(state.locale())
        }
    }
}

async fn relay(
    state: &ProxyState,
    method: &Method,
    target: &str,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    let mut request = state
        .http()
        .request(method.clone(), target)
        .header(header::CONTENT_TYPE, content_type);
    for name in [header::ORIGIN, header::REFERER] {
        if let Some(value) = headers.get(&name) {
            request = request.header(name, value.clone());
        }
    }
    if !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS) {
        request = request.body(body);
    }

    let upstream = request.send().await.map_err(|e| {
        if e.is_timeout() {
            ProxyError::Timeout(state.timeout())
        } else if e.is_builder() {
            ProxyError::Unexpected(e.to_string())
        } else {
            ProxyError::Network(e.to_string())
        }
    })?;

    let status = upstream.status();
    let upstream_headers = upstream.headers().clone();
    let text = upstream
        .text()
        .await
        .map_err(|e| ProxyError::ReadBody(e.to_string()))?;
    let payload: Value = serde_json::from_str(&text).unwrap_or(Value::String(text));

    if status == StatusCode::GATEWAY_TIMEOUT {
        return Err(ProxyError::GatewayTimeout);
    }
    if status.is_server_error() {
        let detail = match payload.get("detail") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => format!("Server returned status {}", status.as_u16()),
        };
        return Err(ProxyError::Backend { status, detail });
    }

    let mut response = (status, Json(payload)).into_response();
    let out = response.headers_mut();
    for (name, value) in &upstream_headers {
        if forwardable(name) {
            out.append(name.clone(), value.clone());
        }
    }

    let origin = headers
        .get(header::ORIGIN)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("*"));
    out.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    out.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    out.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    out.insert(header::ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));

    Ok(response)
}

fn forwardable(name: &HeaderName) -> bool {
    let name = name.as_str();
    !name.starts_with("access-control-") && !SKIPPED_HEADERS.contains(&name)
}
