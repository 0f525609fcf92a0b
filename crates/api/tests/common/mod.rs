#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;

use record_locking_api::auth::jwt::JwtConfig;
use record_locking_api::config::{LockingConfig, ServerConfig, StoreBackend};
use record_locking_api::router::build_app_router;
use record_locking_api::state::AppState;
use record_locking_api::ws::WsManager;
use record_locking_core::memory::{MemoryLockStore, StaticDirectory, StaticPermissions};
use record_locking_core::registry::LockRegistry;
use record_locking_core::status::StatusQueryService;

pub const JWT_SECRET: &str = "integration-test-secret-long-enough-for-hmac";

pub const ARTICLE: &str = "api::article.article";
pub const PAGE: &str = "api::page.page";

/// Publisher on articles and pages.
pub const ADA: &str = "1";
/// May create articles.
pub const GRACE: &str = "2";
/// Read-only on articles.
pub const READER: &str = "3";
/// May create articles but is missing from the user directory.
pub const GHOST: &str = "99";

/// Build a test `ServerConfig` with safe defaults and the in-memory store.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:1337".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
        },
        locking: LockingConfig {
            store: StoreBackend::Memory,
            ..LockingConfig::default()
        },
    }
}

/// Application state over in-memory collaborators seeded with the users above.
pub fn test_state() -> AppState {
    let permissions = StaticPermissions::new()
        .grant(ADA, "plugin::content-manager.explorer.publish", ARTICLE)
        .grant(ADA, "plugin::content-manager.explorer.publish", PAGE)
        .grant(GRACE, "plugin::content-manager.explorer.create", ARTICLE)
        .grant(READER, "plugin::content-manager.explorer.read", ARTICLE)
        .grant(GHOST, "plugin::content-manager.explorer.create", ARTICLE);
    let directory = StaticDirectory::new()
        .with_user(ADA, "Ada", "Lovelace")
        .with_user(GRACE, "Grace", "Hopper")
        .with_user(READER, "Rita", "Reader");

    let registry = Arc::new(LockRegistry::new(
        Arc::new(MemoryLockStore::new()),
        Arc::new(permissions),
    ));
    let status = Arc::new(StatusQueryService::new(
        Arc::clone(&registry),
        Arc::new(directory),
    ));

    AppState {
        config: Arc::new(test_config()),
        registry,
        status,
        ws_manager: Arc::new(WsManager::new()),
    }
}

/// The production router over a fresh [`test_state`].
pub fn build_test_app() -> (Router, AppState) {
    let state = test_state();
    let app = build_app_router(state.clone(), &test_config());
    (app, state)
}

/// Mint a host-style admin token for `user_id`, valid for ten minutes.
pub fn token_for(user_id: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let id = user_id
        .parse::<i64>()
        .map(serde_json::Value::from)
        .unwrap_or_else(|_| serde_json::Value::from(user_id));
    encode(
        &Header::default(),
        &serde_json::json!({ "id": id, "iat": now, "exp": now + 600 }),
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("token encoding should succeed")
}

pub async fn send(app: Router, method: Method, uri: &str, token: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header("authorization", format!("Bearer {token}"));
    }
    app.oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn get_as(app: Router, uri: &str, user_id: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(&token_for(user_id))).await
}

pub async fn post_as(app: Router, uri: &str, user_id: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(&token_for(user_id))).await
}

pub async fn delete_as(app: Router, uri: &str, user_id: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(&token_for(user_id))).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
