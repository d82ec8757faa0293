//! Integration tests for Bistro.
//!
//! # Test Categories
//!
//! - `cart_engine` - Cart engine scenarios against `bistro-core` alone
//! - `storefront_routes` - Router-level tests driving the axum app with
//!   `tower::ServiceExt::oneshot`, including a local stub order endpoint
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bistro-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used)] // test support code

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use axum::routing::post;
use http_body_util::BodyExt;
use uuid::Uuid;

use bistro_storefront::catalog::Catalog;
use bistro_storefront::config::StorefrontConfig;
use bistro_storefront::middleware::SESSION_COOKIE;
use bistro_storefront::routes::build_app;
use bistro_storefront::state::AppState;

/// Build the storefront app with the bundled catalog and the given order
/// endpoint.
#[must_use]
pub fn test_app(order_endpoint: &str) -> Router {
    let config = StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        order_endpoint: order_endpoint.to_string(),
        catalog_path: None,
    };
    let catalog = Catalog::load(None).unwrap();
    build_app(AppState::new(config, catalog))
}

/// Spawn a stub order endpoint returning the given status; returns its URL.
pub async fn spawn_order_stub(status: StatusCode) -> String {
    serve_stub(Router::new().route("/orders", post(move || async move { status }))).await
}

/// Spawn a stub order endpoint that never answers within a test's lifetime.
pub async fn spawn_stalled_order_stub() -> String {
    let app = Router::new().route(
        "/orders",
        post(|| async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            StatusCode::OK
        }),
    );
    serve_stub(app).await
}

async fn serve_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/orders")
}

/// A GET request carrying the given cart session cookie.
#[must_use]
pub fn get(uri: &str, session: Uuid) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, format!("{SESSION_COOKIE}={session}"))
        .body(Body::empty())
        .unwrap()
}

/// A form-encoded POST request carrying the given cart session cookie.
#[must_use]
pub fn post_form(uri: &str, session: Uuid, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, format!("{SESSION_COOKIE}={session}"))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Collect a response body into a string.
pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
