//! Harbor Account API
//!
//! User account microservice.
//!
//! ## REST Endpoints
//!
//! - `POST /api/v1/users/register` - Create an account (multipart, avatar mandatory)
//! - `POST /api/v1/users/login` - Authenticate and receive a token pair
//! - `POST /api/v1/users/logout` - Clear the stored refresh token
//! - `POST /api/v1/users/refresh-token` - Rotate the refresh token
//! - `POST /api/v1/users/change-password` - Change the account password
//! - `GET /api/v1/users/current-user` - Fetch the authenticated profile
//! - `PATCH /api/v1/users/update-account` - Update display name and/or email
//! - `PATCH /api/v1/users/avatar` - Replace the avatar image
//! - `PATCH /api/v1/users/cover-image` - Replace the cover image
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe

mod config;
mod cookies;
mod error;
mod extractors;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use axum::Router;
use harbor_auth_core::AuthService;
use harbor_db::pg::Repositories;
use harbor_media::{CloudinaryUploader, MediaUploader};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::handlers::{health, ready};
use crate::state::AppState;

/// Uploaded images top out well below this; reject anything larger early
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("account_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Harbor Account API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(http_port = config.http_port, "Configuration loaded");

    // Create database pool
    let pool = harbor_db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Create repositories
    let repos = Repositories::new(pool.clone());

    // Create auth service
    let auth = AuthService::new(&config.auth, Arc::new(repos.accounts));

    // Create media uploader
    let media: Arc<dyn MediaUploader> = Arc::new(CloudinaryUploader::new(config.cloudinary.clone()));

    // Create application state
    let state = AppState::new(auth, media, pool, config.clone());

    // Build HTTP router
    let app = build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    tracing::info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_router(state: AppState) -> Router {
    // API v1 user routes
    let api_v1 = Router::new()
        .route("/users/register", post(handlers::register))
        .route("/users/login", post(handlers::login))
        .route("/users/logout", post(handlers::logout))
        .route("/users/refresh-token", post(handlers::refresh))
        .route("/users/change-password", post(handlers::change_password))
        .route("/users/current-user", get(handlers::current_user))
        .route("/users/update-account", patch(handlers::update_account))
        .route("/users/avatar", patch(handlers::update_avatar))
        .route("/users/cover-image", patch(handlers::update_cover_image));

    // Health routes (no middleware - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // CORS
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Multipart body limit (innermost - closest to handler)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    Router::new()
        .nest("/api/v1", api_v1)
        .layer(middleware)
        .merge(health_routes)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
