/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use contactgate_api::{app::{build_router, AppState}, config::Config};
/// use contactgate_shared::render::Renderer;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config, Renderer::new()?);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
/// axum::serve(listener, build_router(state)).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{security::SecurityHeadersLayer, session::require_session},
    routes,
};
use axum::{
    routing::{get, post},
    Router,
};
use contactgate_shared::render::Renderer;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Compiled page templates
    pub renderer: Arc<Renderer>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, renderer: Renderer) -> Self {
        Self {
            db,
            config: Arc::new(config),
            renderer: Arc::new(renderer),
        }
    }

    /// Gets the secret used to sign session tokens
    pub fn session_secret(&self) -> &str {
        &self.config.session.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET  /              # Login form
/// ├── POST /login         # Check credentials, start session
/// ├── GET  /register      # Registration form
/// ├── POST /register      # Create account
/// ├── GET  /logout        # End session
/// ├── GET  /download-csv  # Raw contacts file
/// ├── GET  /health        # Health check
/// ├── GET  /contacts      # Grouped contacts (session required)
/// └── POST /send-email    # Email stub (session required)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Session gate (protected routes only)
/// 2. Logging (tower-http TraceLayer)
/// 3. Security headers
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(routes::pages::login_form))
        .route("/register", get(routes::pages::register_form).post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", get(routes::auth::logout))
        .route("/download-csv", get(routes::contacts::download_csv))
        .route("/health", get(routes::health::health_check));

    let protected_routes = Router::new()
        .route("/contacts", get(routes::contacts::list_contacts))
        .route("/send-email", post(routes::email::send_email))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let production = state.config.api.production;

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SecurityHeadersLayer::new(production))
        .with_state(state)
}
