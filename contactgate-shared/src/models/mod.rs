/// Database models for Contactgate
///
/// # Models
///
/// - `user`: portal accounts (the credential store)
///
/// # Example
///
/// ```no_run
/// use contactgate_shared::models::user::{User, CreateUser};
/// use contactgate_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(
///     &pool,
///     CreateUser {
///         username: "mario".to_string(),
///         email: "mario@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod user;
