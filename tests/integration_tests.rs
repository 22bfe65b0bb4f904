//! Integration tests for OfficeMap against a local stand-in for the GSI service

use std::collections::HashMap;
use std::net::SocketAddr;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::Query,
    http::{Request, StatusCode},
    routing::get,
};
use officemap::config::SearchConfig;
use officemap::{
    AddressSearch, Coordinate, Dashboard, GsiLocator, MapSettings, OfficeMapConfig,
    OfficeMapError, render, web,
};
use serde_json::{Value, json};
use tower::ServiceExt;

fn feature(lon: f64, lat: f64, title: &str) -> Value {
    json!({
        "geometry": {"coordinates": [lon, lat], "type": "Point"},
        "type": "Feature",
        "properties": {"addressCode": "", "title": title}
    })
}

async fn address_search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let q = params.get("q").cloned().unwrap_or_default();
    let body = match q.as_str() {
        "市役所" => json!([
            feature(139.0, 35.0, "市役所 A"),
            feature(141.0, 37.0, "市役所 B"),
        ]),
        "県庁" => json!([feature(135.5, 34.5, "県庁")]),
        "collection" => json!({
            "type": "FeatureCollection",
            "features": [feature(130.0, 33.0, "collection")]
        }),
        _ => json!([]),
    };
    Json(body)
}

/// Start a stand-in search service on an ephemeral port
async fn spawn_stub() -> SocketAddr {
    let app = Router::new()
        .route("/address-search/AddressSearch", get(address_search))
        .route("/broken", get(|| async { "<html>maintenance</html>" }))
        .route(
            "/bad-coordinates",
            get(|| async { Json(json!([{"geometry": {"coordinates": [139.0]}, "properties": "A"}])) }),
        )
        .route(
            "/error",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!([]))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn search_config(addr: SocketAddr, path: &str) -> SearchConfig {
    SearchConfig {
        base_url: format!("http://{addr}"),
        path: path.to_string(),
        timeout_seconds: 1,
    }
}

fn locator(addr: SocketAddr, path: &str) -> GsiLocator {
    GsiLocator::new(&search_config(addr, path)).unwrap()
}

#[tokio::test]
async fn test_search_returns_features_in_order() {
    let addr = spawn_stub().await;
    let locator = locator(addr, "/address-search/AddressSearch");

    let features = locator.search("市役所").await.unwrap();

    assert_eq!(features.len(), 2);
    assert_eq!(features[0].coordinate(), Coordinate::new(139.0, 35.0));
    assert_eq!(features[0].properties["title"], "市役所 A");
    assert_eq!(features[1].properties["title"], "市役所 B");
}

#[tokio::test]
async fn test_search_accepts_feature_collection() {
    let addr = spawn_stub().await;
    let locator = locator(addr, "/address-search/AddressSearch");

    let features = locator.search("collection").await.unwrap();

    assert_eq!(features.len(), 1);
    assert_eq!(features[0].coordinate(), Coordinate::new(130.0, 33.0));
}

#[tokio::test]
async fn test_non_success_status_is_protocol_error() {
    let addr = spawn_stub().await;
    let err = locator(addr, "/error").search("市役所").await.unwrap_err();
    assert_eq!(err, OfficeMapError::Protocol { status: 500 });
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let addr = spawn_stub().await;
    let err = locator(addr, "/broken").search("市役所").await.unwrap_err();
    assert!(matches!(err, OfficeMapError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_short_coordinates_are_decode_error() {
    let addr = spawn_stub().await;
    let err = locator(addr, "/bad-coordinates")
        .search("市役所")
        .await
        .unwrap_err();
    assert!(matches!(err, OfficeMapError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_slow_service_is_timeout() {
    let addr = spawn_stub().await;
    let err = locator(addr, "/slow").search("市役所").await.unwrap_err();
    assert_eq!(err, OfficeMapError::Timeout { seconds: 1 });
    assert!(err.is_connectivity());
}

#[tokio::test]
async fn test_unreachable_service_is_connectivity_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let err = locator(addr, "/address-search/AddressSearch")
        .search("市役所")
        .await
        .unwrap_err();
    assert!(matches!(err, OfficeMapError::Connectivity { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_pipeline_example() {
    let addr = spawn_stub().await;
    let locator = locator(addr, "/address-search/AddressSearch");

    let object = render(&locator, "市役所", &MapSettings::default()).await.unwrap();

    assert_eq!(object.view.center, Coordinate::new(140.0, 36.0));
    assert_eq!(object.view.zoom, 8);
    assert_eq!((object.width, object.height), (800, 600));
    assert_eq!(object.marker_count(), 2);
    assert_eq!(object.view.markers[0].position.lat_lon(), [35.0, 139.0]);
    assert_eq!(object.view.markers[1].position.lat_lon(), [37.0, 141.0]);
    assert_eq!(
        object.view.markers[0].tooltip,
        r#"{"addressCode":"","title":"市役所 A"}"#
    );
}

#[tokio::test]
async fn test_pipeline_empty_result() {
    let addr = spawn_stub().await;
    let locator = locator(addr, "/address-search/AddressSearch");

    let err = render(&locator, "町役場", &MapSettings::default())
        .await
        .unwrap_err();
    assert_eq!(err, OfficeMapError::empty_result("町役場"));
}

async fn dashboard_app(addr: SocketAddr) -> (Arc<Dashboard>, Router) {
    let mut config = OfficeMapConfig::default();
    config.search = search_config(addr, "/address-search/AddressSearch");

    let locator = GsiLocator::new(&config.search).unwrap();
    let dashboard = Arc::new(Dashboard::start(&config, Arc::new(locator)).unwrap());
    dashboard.surface().wait_for_revision(0).await;

    let app = web::app(Arc::clone(&dashboard), Duration::from_secs(5));
    (dashboard, app)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn select_request(place: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/selection")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "place": place }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_dashboard_shows_default_selection() {
    let addr = spawn_stub().await;
    let (_dashboard, app) = dashboard_app(addr).await;

    let response = app
        .clone()
        .oneshot(Request::get("/api/options").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let options = body_json(response).await;
    assert_eq!(options["name"], "place");
    assert_eq!(options["options"], json!(["市役所", "区役所", "県庁"]));
    assert_eq!(options["value"], "市役所");

    let response = app
        .clone()
        .oneshot(Request::get("/api/display").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let display = body_json(response).await;
    assert_eq!(display["status"], "ready");
    assert_eq!(display["object"]["view"]["markers"].as_array().unwrap().len(), 2);

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let page = body_text(response).await;
    assert!(page.contains(r#"<option value="市役所" selected>市役所</option>"#));
    assert!(page.contains(r#"<option value="県庁">県庁</option>"#));
}

#[tokio::test]
async fn test_selection_replaces_map() {
    let addr = spawn_stub().await;
    let (dashboard, app) = dashboard_app(addr).await;

    let response = app.clone().oneshot(select_request("県庁")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let state = body_json(response).await;
    assert_eq!(state["revision"], 1);
    let markers = state["object"]["view"]["markers"].as_array().unwrap();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0]["tooltip"], r#"{"addressCode":"","title":"県庁"}"#);

    let response = app
        .oneshot(Request::get("/map").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let html = body_text(response).await;
    assert!(html.contains("<title>県庁</title>"));
    assert!(!html.contains("市役所 A"));

    assert_eq!(dashboard.control().selection().value, "県庁");
}

#[tokio::test]
async fn test_selection_with_no_results_fails_visibly() {
    let addr = spawn_stub().await;
    let (_dashboard, app) = dashboard_app(addr).await;

    let response = app.clone().oneshot(select_request("区役所")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let state = body_json(response).await;
    assert_eq!(state["status"], "failed");
    assert_eq!(state["place"], "区役所");

    let response = app
        .oneshot(Request::get("/map").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(!body_text(response).await.contains("leaflet"));
}

#[tokio::test]
async fn test_unknown_selection_is_rejected() {
    let addr = spawn_stub().await;
    let (dashboard, app) = dashboard_app(addr).await;

    let response = app.oneshot(select_request("町役場")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(dashboard.control().selection().revision, 0);
}

#[tokio::test]
async fn test_render_endpoint_is_stateless() {
    let addr = spawn_stub().await;
    let (dashboard, app) = dashboard_app(addr).await;

    let uri = format!("/api/render?place={}", urlencoding::encode("県庁"));
    let response = app.oneshot(Request::get(uri).body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let object = body_json(response).await;
    assert_eq!(object["place"], "県庁");
    assert_eq!(object["width"], 800);
    assert_eq!(dashboard.control().selection().value, "市役所");
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_officemap"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("officemap"));
    assert!(stdout.contains("render"));
    assert!(stdout.contains("serve"));
}

#[tokio::test]
async fn test_server_deadline_answers_gateway_timeout() {
    let addr = spawn_stub().await;
    let mut config = OfficeMapConfig::default();
    config.search = search_config(addr, "/slow");

    let locator = GsiLocator::new(&config.search).unwrap();
    let dashboard = Arc::new(Dashboard::start(&config, Arc::new(locator)).unwrap());
    let app = web::app(dashboard, Duration::from_millis(100));

    let uri = format!("/api/render?place={}", urlencoding::encode("県庁"));
    let response = app.oneshot(Request::get(uri).body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
}
