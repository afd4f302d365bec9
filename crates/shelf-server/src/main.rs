//! Shelf Server
//!
//! Minimal CRUD service for items (name + description), backed by either an
//! embedded SQLite table or a Redis instance. The backend is picked once at
//! startup from the environment; everything above it goes through the same
//! storage trait.

mod config;
mod handlers;
mod services;
mod storage;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::{BackendKind, Config};
use services::ItemService;
use storage::{ItemStore, RedisStore, SqliteStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub items: Arc<ItemService>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting shelf-server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, backend={:?}",
        config.bind_address, config.backend
    );

    let store: Arc<dyn ItemStore> = match config.backend {
        BackendKind::Sqlite => Arc::new(
            SqliteStore::new(&config.database_path)
                .await
                .context("Failed to initialize SQLite store")?,
        ),
        BackendKind::Redis => Arc::new(
            RedisStore::connect(&config.redis_url)
                .await
                .context("Failed to initialize Redis store")?,
        ),
    };

    let state = AppState {
        items: Arc::new(ItemService::new(store)),
    };

    let app = router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::pages::index))
        .route(
            "/items",
            get(handlers::items::list).post(handlers::items::create),
        )
        .route("/testitems", post(handlers::items::create_reporting))
        .route("/items/:id", get(handlers::items::get))
        .route("/items/:id/update", post(handlers::items::update))
        .route("/items/:id/delete", post(handlers::items::delete))
        .with_state(state)
}
