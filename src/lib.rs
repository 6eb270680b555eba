use std::{net::SocketAddr, sync::Arc};

use config::AppConfig;
use dotenvy::dotenv;
use jobs::spawn_all_jobs;
use state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod app;
pub mod client;
pub mod config;
pub mod constants;
pub mod database;
pub mod handlers;
pub mod jobs;
pub mod jwt;
pub mod mailer;
pub mod models;
pub mod otp_store;
pub mod state;
pub mod swagger;
pub mod utils;
pub mod watermark;

pub async fn start_web_server() {
    // import .env file
    dotenv().ok();
    initialize_logging();
    let config = AppConfig::from_env();
    // create the shared state, the database client connects lazily
    let state = AppState::new(config)
        .await
        .expect("Unable to initialize the app state");
    let state = Arc::new(state);
    if let Err(err) = state.db.ensure_indexes().await {
        tracing::warn!("Unable to create database indexes: {:?}", err);
    }
    spawn_all_jobs(state.clone());
    start_server(state).await;
}

fn initialize_logging() {
    // create default env filter
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or("listings_backend=debug,tower_http=debug".into());

    // initialize tracing subscriber for logging
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

async fn start_server(state: Arc<AppState>) {
    let port = state.config.port;
    // build the socket address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    // create the app instance
    let app = app::build_app(state);
    tracing::debug!("Starting the app in: {addr}");
    // start serving the app in the socket address
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .expect("Unable to start the server");
}
