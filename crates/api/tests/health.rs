//! Health endpoint and cross-cutting HTTP behaviour (request IDs, CORS).

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};
use tower::ServiceExt;

#[tokio::test]
async fn health_reports_ok_over_fresh_storage() {
    let app = common::build_test_app();

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    // The reported version is the crate's own.
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = common::build_test_app();

    let response = get(app, "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn a_request_id_is_minted_when_the_client_sends_none() {
    let app = common::build_test_app();

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let id = response
        .headers()
        .get("x-request-id")
        .expect("every response carries x-request-id")
        .to_str()
        .unwrap();
    // Minted ids are UUIDs.
    assert_eq!(id.len(), 36);
}

#[tokio::test]
async fn a_client_supplied_request_id_is_echoed_back() {
    let app = common::build_test_app();

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me-please")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let id = response
        .headers()
        .get("x-request-id")
        .expect("every response carries x-request-id")
        .to_str()
        .unwrap();
    assert_eq!(id, "trace-me-please");
}

/// Build an OPTIONS preflight for `/api/v1/documents` from the given origin.
fn preflight_from(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/documents")
        .header("Origin", origin)
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn preflight_admits_the_configured_origin_only() {
    // The test config allows http://localhost:5173.
    let app = common::build_test_app();

    let response = app
        .clone()
        .oneshot(preflight_from("http://localhost:5173"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .expect("allowed origin must be echoed")
            .to_str()
            .unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers
            .get("access-control-allow-credentials")
            .expect("credentialed requests are allowed")
            .to_str()
            .unwrap(),
        "true"
    );
    let methods = headers
        .get("access-control-allow-methods")
        .expect("preflight must list allowed methods")
        .to_str()
        .unwrap();
    assert!(methods.contains("GET") && methods.contains("DELETE"));

    // An origin outside the allow-list gets no allow-origin grant.
    let response = app
        .oneshot(preflight_from("http://evil.example"))
        .await
        .unwrap();
    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}
