#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use sudoku_api::auth::jwt::{generate_access_token, JwtConfig};
use sudoku_api::config::{ServerConfig, StorageBackend};
use sudoku_api::router::build_app_router;
use sudoku_api::services::DiagramService;
use sudoku_api::state::AppState;
use sudoku_core::types::UserId;
use sudoku_db::memory::InMemoryDiagramStore;
use sudoku_db::store::DiagramStore;

/// The classic example puzzle and its unique solution.
pub const CLASSIC: &str = concat!(
    "53  7    ", "6  195   ", " 98    6 ", "8   6   3", "4  8 3  1", "7   2   6",
    " 6    28 ", "   419  5", "    8  79",
);
pub const CLASSIC_SOLUTION: &str =
    "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

/// Legal puzzle whose solution starts with `987654321`, which keeps an
/// ascending row-major search busy for a very long time.
pub const HARD: &str = concat!(
    "         ", "     3 85", "  1 2    ", "   5 7   ", "  4   1  ", " 9       ",
    "5      73", "  2 1    ", "    4   9",
);

/// Build a test `ServerConfig` with safe defaults and the in-memory store.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:4321".to_string()],
        request_timeout_secs: 30,
        solve_timeout_secs: 10,
        storage: StorageBackend::Memory,
        database_url: None,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Full application router over `store`, with the production middleware.
pub fn build_test_app_with(store: Arc<dyn DiagramStore>) -> Router {
    let config = test_config();
    let state = AppState {
        diagrams: DiagramService::new(store, Duration::from_secs(config.solve_timeout_secs)),
        config: Arc::new(config),
    };
    build_app_router(state)
}

/// Full application router over a fresh in-memory store.
pub fn build_test_app() -> Router {
    build_test_app_with(Arc::new(InMemoryDiagramStore::new()))
}

/// Bearer token for `user_id`, signed with the test secret.
pub fn token_for(user_id: UserId) -> String {
    generate_access_token(user_id, &test_config().jwt).unwrap()
}

/// Send a request as `user_id` with an optional JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    user_id: UserId,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token_for(user_id)));
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str, user_id: UserId) -> Response<Body> {
    send(app, Method::GET, uri, user_id, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    user_id: UserId,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, user_id, Some(body)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    user_id: UserId,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, user_id, Some(body)).await
}

pub async fn delete(app: Router, uri: &str, user_id: UserId) -> Response<Body> {
    send(app, Method::DELETE, uri, user_id, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
