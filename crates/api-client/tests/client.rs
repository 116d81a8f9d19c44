//! Client behavior against a fake backend on a loopback port

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sunpath_api_client::{ApiError, ClientConfig, SunpathClient};
use sunpath_core::config::GeocodingConfig;
use sunpath_core::i18n::{t, Locale};
use sunpath_core::model::SolarCalculationRequest;
use sunpath_core::retry::RetryConfig;

const FIXTURE: &str = include_str!("fixtures/seoul_2025-06-21.json");

#[derive(Clone, Default)]
struct Backend {
    hits: Arc<AtomicUsize>,
    request_ids: Arc<Mutex<Vec<String>>>,
    last_body: Arc<Mutex<Option<Value>>>,
}

impl Backend {
    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn record(&self, headers: &HeaderMap) -> usize {
        if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
            self.request_ids.lock().unwrap().push(id.to_string());
        }
        self.hits.fetch_add(1, Ordering::SeqCst)
    }
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> SunpathClient {
    let config = ClientConfig::for_url(base_url)
        .with_retry(RetryConfig::with_retries(3, Duration::from_millis(10)))
        .with_health_retry(RetryConfig::with_retries(1, Duration::from_millis(10)))
        .with_locale(Locale::En);
    SunpathClient::with_config(config).unwrap()
}

fn seoul() -> SolarCalculationRequest {
    SolarCalculationRequest::for_day(37.5665, 126.978, "2025-06-21", 10.0)
}

fn fixture() -> Value {
    serde_json::from_str(FIXTURE).unwrap()
}

#[tokio::test]
async fn calculate_retries_5xx_then_succeeds() {
    let backend = Backend::default();
    let router = Router::new()
        .route(
            "/api/integrated/calculate",
            post(|State(b): State<Backend>, headers: HeaderMap, Json(body): Json<Value>| async move {
                let n = b.record(&headers);
                *b.last_body.lock().unwrap() = Some(body);
                if n < 2 {
                    (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"detail": "warming up"}))).into_response()
                } else {
                    Json(fixture()).into_response()
                }
            }),
        )
        .with_state(backend.clone());
    let url = spawn(router).await;

    let response = client(&url).integrated().calculate(&seoul()).await.unwrap();

    assert_eq!(backend.hits(), 3);
    assert_eq!(response.series.len(), 24);
    assert_eq!(response.summary.max_altitude, 74.6597);

    let ids = backend.request_ids.lock().unwrap().clone();
    assert_eq!(ids.len(), 3);
    assert_ne!(ids[0], ids[1]);

    let sent = backend.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(sent["datetime"]["interval"], 60);
    assert_eq!(sent["options"]["precision"], "high");
}

#[tokio::test]
async fn gateway_timeout_is_not_retried() {
    let backend = Backend::default();
    let router = Router::new()
        .route(
            "/api/integrated/calculate",
            post(|State(b): State<Backend>, headers: HeaderMap| async move {
                b.record(&headers);
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    Json(json!({"error": "Gateway timeout", "message": "backend took too long"})),
                )
            }),
        )
        .with_state(backend.clone());
    let url = spawn(router).await;

    let err = client(&url).integrated().calculate(&seoul()).await.unwrap_err();

    assert_eq!(backend.hits(), 1);
    assert_eq!(err.status(), Some(504));
    assert_eq!(err.to_string(), "backend took too long");
}

#[tokio::test]
async fn client_errors_surface_backend_message() {
    let backend = Backend::default();
    let router = Router::new()
        .route(
            "/api/integrated/calculate",
            post(|State(b): State<Backend>, headers: HeaderMap| async move {
                b.record(&headers);
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"detail": {"message": "Date out of supported range"}})),
                )
            }),
        )
        .with_state(backend.clone());
    let url = spawn(router).await;

    let err = client(&url).integrated().calculate(&seoul()).await.unwrap_err();

    assert_eq!(backend.hits(), 1);
    assert_eq!(err.to_string(), "Date out of supported range");
}

#[tokio::test]
async fn exhausted_5xx_with_html_body_maps_to_backend_error() {
    let backend = Backend::default();
    let router = Router::new()
        .route(
            "/api/integrated/calculate",
            post(|State(b): State<Backend>, headers: HeaderMap| async move {
                b.record(&headers);
                (StatusCode::BAD_GATEWAY, "<html><body>502 Bad Gateway</body></html>")
            }),
        )
        .with_state(backend.clone());
    let url = spawn(router).await;

    let err = client(&url).integrated().calculate(&seoul()).await.unwrap_err();

    assert_eq!(backend.hits(), 4);
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), t(Locale::En, "errors.backendError"));
}

#[tokio::test]
async fn invalid_request_never_reaches_backend() {
    let backend = Backend::default();
    let router = Router::new()
        .route(
            "/api/integrated/calculate",
            post(|State(b): State<Backend>, headers: HeaderMap| async move {
                b.record(&headers);
                StatusCode::OK
            }),
        )
        .with_state(backend.clone());
    let url = spawn(router).await;

    let request = SolarCalculationRequest::for_day(91.0, 126.978, "2025-06-21", 10.0);
    let err = client(&url).integrated().calculate(&request).await.unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(backend.hits(), 0);
}

#[tokio::test]
async fn slow_backend_times_out_without_retry() {
    let backend = Backend::default();
    let router = Router::new()
        .route(
            "/api/integrated/calculate",
            post(|State(b): State<Backend>, headers: HeaderMap| async move {
                b.record(&headers);
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(fixture())
            }),
        )
        .with_state(backend.clone());
    let url = spawn(router).await;

    let config = ClientConfig::for_url(&url)
        .with_timeout(Duration::from_millis(200))
        .with_retry(RetryConfig::with_retries(3, Duration::from_millis(10)));
    let err = SunpathClient::with_config(config)
        .unwrap()
        .integrated()
        .calculate(&seoul())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Timeout(_)));
    assert_eq!(backend.hits(), 1);
}

#[tokio::test]
async fn stalled_body_is_a_timeout() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let head = "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n{\"metadata\":";
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.flush().await;
                tokio::time::sleep(Duration::from_secs(3)).await;
            });
        }
    });

    let config = ClientConfig::for_url(&url)
        .with_timeout(Duration::from_millis(300))
        .with_retry(RetryConfig::with_retries(3, Duration::from_millis(10)))
        .with_locale(Locale::En);
    let err = SunpathClient::with_config(config)
        .unwrap()
        .integrated()
        .calculate(&seoul())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Timeout(_)), "got {err:?}");
    assert_eq!(err.exit_code(), sunpath_core::error::exit_codes::TIMEOUT);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = client(&url).integrated().calculate(&seoul()).await.unwrap_err();
    assert!(matches!(err, ApiError::Request(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn optimize_prefers_detail_and_falls_back() {
    let router = Router::new()
        .route(
            "/api/integrated/optimize",
            post(|Json(body): Json<Value>| async move {
                if body["series"].as_array().map_or(0, Vec::len) == 24 {
                    (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        Json(json!({"message": "generic", "detail": "series too sparse"})),
                    )
                } else {
                    (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({})))
                }
            }),
        );
    let url = spawn(router).await;
    let api = client(&url).integrated();

    let mut data: sunpath_core::model::SolarCalculationResponse = serde_json::from_value(fixture()).unwrap();
    let err = api.optimize(&data).await.unwrap_err();
    assert_eq!(err.to_string(), "series too sparse");

    data.series.truncate(3);
    let err = api.optimize(&data).await.unwrap_err();
    assert_eq!(err.to_string(), "Optimization failed");
}

#[tokio::test]
async fn batch_sends_parallel_flag() {
    let seen = Arc::new(Mutex::new(None::<Value>));
    let router = Router::new()
        .route(
            "/api/integrated/batch",
            post(|State(seen): State<Arc<Mutex<Option<Value>>>>, Json(body): Json<Value>| async move {
                let count = body["requests"].as_array().map_or(0, Vec::len);
                *seen.lock().unwrap() = Some(body);
                Json(json!({
                    "total_requests": count,
                    "successful": 1,
                    "failed": count - 1,
                    "processing_time_ms": 812.5,
                    "results": [
                        {"index": 1, "success": false, "error": "Invalid date"},
                        {"index": 0, "success": true, "result": fixture()}
                    ]
                }))
            }),
        )
        .with_state(seen.clone());
    let url = spawn(router).await;

    let requests = vec![seoul(), SolarCalculationRequest::for_day(35.1796, 129.0756, "2025-12-21", 5.0)];
    let response = client(&url).integrated().batch(requests, true).await.unwrap();

    assert_eq!(response.total_requests, 2);
    assert_eq!(response.results[0].index, 1);
    assert!(response.results[1].result.is_some());
    let body = seen.lock().unwrap().clone().unwrap();
    assert_eq!(body["parallel"], true);
}

#[tokio::test]
async fn sunrise_sunset_passes_query_and_keeps_extra_fields() {
    let router = Router::new().route(
        "/api/solar/sunrise-sunset",
        get(|Query(q): Query<HashMap<String, String>>| async move {
            Json(json!({
                "sunrise": "2025-06-21T05:11:32+09:00",
                "sunset": "2025-06-21T19:56:48+09:00",
                "day_length": 14.75,
                "echo_date": q.get("date").cloned().unwrap_or_default()
            }))
        }),
    );
    let url = spawn(router).await;

    let times = client(&url)
        .solar()
        .sunrise_sunset(37.5665, 126.978, "2025-06-21")
        .await
        .unwrap();
    assert_eq!(times.sunrise, "2025-06-21T05:11:32+09:00");
    assert_eq!(times.extra["echo_date"], "2025-06-21");
    assert_eq!(times.extra["day_length"], 14.75);
}

#[tokio::test]
async fn shadow_failure_uses_fixed_message() {
    let router = Router::new().route(
        "/api/shadow/calculate",
        get(|| async { (StatusCode::BAD_REQUEST, Json(json!({"detail": "bad time"}))) }),
    );
    let url = spawn(router).await;

    let err = client(&url)
        .shadow()
        .calculate(37.5665, 126.978, "2025-06-21", "12:00", 10.0)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to calculate shadow");
}

#[tokio::test]
async fn health_and_cache_report_failures_as_values() {
    let backend = Backend::default();
    let router = Router::new()
        .route(
            "/health",
            get(|State(b): State<Backend>, headers: HeaderMap| async move {
                b.record(&headers);
                StatusCode::INTERNAL_SERVER_ERROR
            }),
        )
        .route(
            "/api/cache/stats",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .with_state(backend.clone());
    let url = spawn(router).await;
    let client = client(&url);

    assert!(!client.health().check().await);
    assert_eq!(backend.hits(), 2);
    assert!(client.cache().stats().await.is_none());
}

#[tokio::test]
async fn healthy_backend() {
    let router = Router::new()
        .route("/health", get(|| async { Json(json!({"status": "healthy"})) }))
        .route(
            "/api/cache/stats",
            get(|| async { Json(json!({"hits": 12, "misses": 3, "size": 15})) }),
        );
    let url = spawn(router).await;
    let client = client(&url);

    assert!(client.health().check().await);
    assert_eq!(client.cache().stats().await.unwrap()["hits"], 12);
}

#[tokio::test]
async fn geocoding_search_and_reverse() {
    let backend = Backend::default();
    let router = Router::new()
        .route(
            "/search",
            get(|State(b): State<Backend>, headers: HeaderMap, Query(q): Query<HashMap<String, String>>| async move {
                b.record(&headers);
                assert_eq!(q.get("format").map(String::as_str), Some("jsonv2"));
                assert_eq!(q.get("countrycodes").map(String::as_str), Some("kr"));
                Json(json!([
                    {"lat": "37.5796", "lon": "126.9770", "display_name": "Gyeongbokgung, Seoul",
                     "address": {"road": "Sajik-ro", "house_number": "161", "city": "Seoul"}},
                    {"lat": "37.5512", "lon": "126.9882", "display_name": "N Seoul Tower, Seoul"}
                ]))
            }),
        )
        .route(
            "/reverse",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(q.get("zoom").map(String::as_str), Some("18"));
                Json(json!({"display_name": "Somewhere", "address": {"road": "Sejong-daero", "city": "Seoul"}}))
            }),
        )
        .with_state(backend.clone());
    let url = spawn(router).await;

    let config = ClientConfig::default().with_geocoding(GeocodingConfig {
        base_url: url.clone(),
        ..GeocodingConfig::default()
    });
    let geocoding = SunpathClient::with_config(config).unwrap().geocoding();

    assert!(geocoding.search(" a ").await.unwrap().is_empty());
    assert_eq!(backend.hits(), 0);

    let hits = geocoding.search("경복궁").await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].display_name, "Sajik-ro 161, Seoul");
    assert_eq!(hits[1].display_name, "N Seoul Tower, Seoul");
    assert!((hits[0].lat - 37.5796).abs() < 1e-9);

    let address = geocoding.reverse(37.5759, 126.9769).await.unwrap();
    assert_eq!(address.as_deref(), Some("Sejong-daero, Seoul"));
}
