//! # Contactgate Seeder
//!
//! Creates the first account so somebody can log in on a fresh database.
//!
//! Reads `SEED_USERNAME`, `SEED_EMAIL` and `SEED_PASSWORD` plus the usual
//! database settings. An account that already exists is left untouched.
//!
//! ```bash
//! SEED_USERNAME=admin SEED_EMAIL=admin@example.com SEED_PASSWORD=changeme \
//!     cargo run -p contactgate-api --bin contactgate-seed
//! ```

use anyhow::Context;
use contactgate_api::config::database_url;
use contactgate_shared::{
    auth::authenticator::{register, NewAccount},
    db::{
        migrations::{ensure_database_exists, run_migrations},
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    models::user::User,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contactgate_seed=info,contactgate_shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let required = |key: &str| {
        std::env::var(key).with_context(|| format!("{} environment variable is required", key))
    };
    let account = NewAccount {
        username: required("SEED_USERNAME")?,
        email: required("SEED_EMAIL")?,
        password: required("SEED_PASSWORD")?,
    };

    let url = database_url(|key| std::env::var(key).ok())?;
    ensure_database_exists(&url)
        .await
        .context("Failed to create database")?;

    let pool = create_pool(DatabaseConfig {
        max_connections: 1,
        ..DatabaseConfig::with_url(url)
    })
    .await
    .context("Failed to connect to database")?;
    run_migrations(&pool).await.context("Failed to run migrations")?;

    match User::find_by_username(&pool, &account.username).await? {
        Some(existing) => {
            tracing::info!(user_id = %existing.id, username = %existing.username, "User already exists, nothing to do");
        }
        None => {
            let user = register(&pool, account).await.context("Failed to create user")?;
            tracing::info!(user_id = %user.id, username = %user.username, "Seed user created");
        }
    }

    let accounts = User::count(&pool).await.context("Failed to count users")?;
    tracing::info!(accounts, "Credential store ready");

    close_pool(pool).await;
    Ok(())
}
