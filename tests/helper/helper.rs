use axum::{body::Body, http::Request, response::Response, Router};
use serde::de::DeserializeOwned;
use std::{net::SocketAddr, sync::Arc};

use listings_backend::{
    app::build_app, config::AppConfig, database::AppDatabase, mailer::MemoryMailer,
    state::AppState,
};

/// Full application over a database handle that never connects and a mailer
/// that keeps every mail in memory
pub async fn get_app(mailer: Arc<MemoryMailer>) -> (Router, Arc<AppState>) {
    get_app_with_config(test_config(), mailer).await
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig {
        jwt_secret: "integration-secret".to_owned(),
        ..AppConfig::default()
    };
    // image sources are served by a local mock server
    config.watermark.allow_private_hosts = true;
    config
}

pub async fn get_app_with_config(
    config: AppConfig,
    mailer: Arc<MemoryMailer>,
) -> (Router, Arc<AppState>) {
    let db = AppDatabase::new(&config)
        .await
        .expect("Unable to accquire database client");
    let state = AppState::with_parts(config, Arc::new(db), Box::new(mailer))
        .expect("Unable to build app state");
    let state = Arc::new(state);
    (build_app(state.clone()), state)
}

/// MongoDB used by the tests that need a live database, taken from
/// `TEST_MONGODB_URI`. Those tests are skipped when it is not set.
pub fn test_mongodb_uri() -> Option<String> {
    std::env::var("TEST_MONGODB_URI")
        .ok()
        .filter(|uri| !uri.trim().is_empty())
}

/// Serve the app on a random local port
pub async fn spawn_server(app: Router) -> SocketAddr {
    let server = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
        .serve(app.into_make_service());
    let addr = server.local_addr();
    tokio::spawn(server);
    addr
}

pub fn token_for(state: &AppState, user_type: &str) -> String {
    state
        .jwt_keys
        .generate_token("64b7f0c2a1b2c3d4e5f60718", user_type, "tester@example.com")
        .unwrap()
}

pub fn build_post_request(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

pub fn build_get_request(path: &str, token: Option<&str>) -> Request<Body> {
    let builder = Request::builder().uri(path);
    let builder = if let Some(token) = token {
        builder.header("Authorization", format!("Bearer {token}"))
    } else {
        builder
    };
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json<T: DeserializeOwned>(res: Response) -> T {
    let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
