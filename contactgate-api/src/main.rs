//! # Contactgate Web Server
//!
//! Serves the login and registration forms, the grouped contact list and
//! the raw CSV download.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p contactgate-api
//! ```

use anyhow::Context;
use contactgate_api::{
    app::{build_router, AppState},
    config::Config,
};
use contactgate_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    render::Renderer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contactgate_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Contactgate server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env().context("Failed to load configuration")?;

    if !config.contacts.csv_path.exists() {
        tracing::warn!(
            path = %config.contacts.csv_path.display(),
            "Contacts file not found; /contacts and /download-csv will fail until it exists"
        );
    }
    if config.email.is_configured() {
        tracing::info!("Mail settings found; email delivery stays disabled");
    }

    let pool = create_pool(DatabaseConfig {
        max_connections: config.database.max_connections,
        ..DatabaseConfig::with_url(config.database.url.clone())
    })
    .await
    .context("Failed to connect to database")?;

    run_migrations(&pool).await.context("Failed to run migrations")?;

    let bind_address = config.bind_address();
    let renderer = Renderer::new().context("Failed to compile templates")?;
    let app = build_router(AppState::new(pool.clone(), config, renderer));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, exiting...");
    close_pool(pool).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
