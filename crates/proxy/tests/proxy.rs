//! Proxy behavior against a fake backend on a loopback port

use axum::body::{to_bytes, Body};
use axum::extract::RawQuery;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::time::Duration;
use sunpath_core::i18n::Locale;
use sunpath_proxy::{create_router, ProxySettings, ProxyState};
use tower::ServiceExt;

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn proxy(backend: &str) -> Router {
    let settings = ProxySettings::default()
        .with_backend(backend)
        .with_timeout(Duration::from_millis(300))
        .with_locale(Locale::En);
    create_router(ProxyState::new(settings).unwrap())
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn forwards_post_body_query_and_headers() {
    let backend = spawn(Router::new().route(
        "/api/integrated/calculate",
        post(|RawQuery(query): RawQuery, headers: HeaderMap, body: String| async move {
            let echo = json!({
                "query": query,
                "body": serde_json::from_str::<Value>(&body).unwrap(),
                "content_type": headers.get("content-type").and_then(|v| v.to_str().ok()),
                "origin": headers.get("origin").and_then(|v| v.to_str().ok()),
            });
            (
                [("x-backend", "sunpath"), ("access-control-allow-origin", "http://evil.example")],
                Json(echo),
            )
        }),
    ))
    .await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/proxy/api/integrated/calculate?debug=1")
        .header(header::ORIGIN, "https://sunpath.example")
        .body(Body::from(r#"{"location":{"lat":37.5,"lon":127.0}}"#))
        .unwrap();
    let (status, headers, body) = call(proxy(&backend), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "debug=1");
    assert_eq!(body["body"]["location"]["lat"], 37.5);
    assert_eq!(body["content_type"], "application/json");
    assert_eq!(body["origin"], "https://sunpath.example");

    assert_eq!(headers["x-backend"], "sunpath");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://sunpath.example");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, POST, PUT, PATCH, DELETE, OPTIONS"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type, Authorization");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers.get_all(header::ACCESS_CONTROL_ALLOW_ORIGIN).iter().count(), 1);
}

#[tokio::test]
async fn get_drops_body_and_defaults_origin_to_wildcard() {
    let backend = spawn(Router::new().route(
        "/api/solar/sunrise-sunset",
        get(|body: String| async move { Json(json!({ "received": body.len() })) }),
    ))
    .await;

    let request = Request::builder()
        .uri("/api/proxy/api/solar/sunrise-sunset?lat=37.5&lon=127&date=2025-06-21")
        .body(Body::from("ignored"))
        .unwrap();
    let (status, headers, body) = call(proxy(&backend), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], 0);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn plain_text_becomes_json_string_with_upstream_status() {
    let backend = spawn(Router::new().route(
        "/missing",
        get(|| async { (StatusCode::NOT_FOUND, "no such route") }),
    ))
    .await;

    let (status, headers, body) = call(proxy(&backend), get_request("/api/proxy/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!("no such route"));
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
}

#[tokio::test]
async fn backend_5xx_uses_upstream_detail() {
    let backend = spawn(Router::new().route(
        "/api/integrated/calculate",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "solver crashed"})),
            )
        }),
    ))
    .await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/proxy/api/integrated/calculate")
        .body(Body::from("{}"))
        .unwrap();
    let (status, _, body) = call(proxy(&backend), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Backend server error");
    assert_eq!(body["message"], "The backend server reported an error.");
    assert_eq!(body["detail"], "solver crashed");
}

#[tokio::test]
async fn backend_5xx_without_detail_reports_status() {
    let backend = spawn(Router::new().route(
        "/health",
        get(|| async { (StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").into_response() }),
    ))
    .await;

    let (status, _, body) = call(proxy(&backend), get_request("/api/proxy/health")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["detail"], "Server returned status 502");
}

#[tokio::test]
async fn backend_504_is_gateway_timeout() {
    let backend = spawn(Router::new().route(
        "/health",
        get(|| async { StatusCode::GATEWAY_TIMEOUT }),
    ))
    .await;

    let (status, _, body) = call(proxy(&backend), get_request("/api/proxy/health")).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "Gateway timeout");
    assert_eq!(body["detail"], "The backend server may have hit its own timeout limit.");
}

#[tokio::test]
async fn slow_backend_times_out() {
    let backend = spawn(Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            "late"
        }),
    ))
    .await;

    let (status, _, body) = call(proxy(&backend), get_request("/api/proxy/slow")).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "Request timeout");
    assert_eq!(body["detail"], "The request did not complete within 0.3 seconds.");
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (status, _, body) =
        call(proxy(&format!("http://{addr}")), get_request("/api/proxy/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Network error");
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn healthz_and_unknown_paths() {
    let app = proxy("http://127.0.0.1:9");
    let response = app.clone().oneshot(get_request("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("/elsewhere")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
