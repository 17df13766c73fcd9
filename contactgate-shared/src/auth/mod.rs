/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`session`]: signed session tokens carried in the session cookie
/// - [`authenticator`]: login check and account registration
/// - [`identity`]: turning a session back into a user on each request
///
/// # Example
///
/// ```no_run
/// use contactgate_shared::auth::authenticator::authenticate;
/// use contactgate_shared::auth::session::{create_session_token, SessionClaims};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let user = authenticate(&pool, "mario", "allenamento").await?;
/// let token = create_session_token(&SessionClaims::new(user.id), "secret-of-at-least-32-bytes....")?;
/// # Ok(())
/// # }
/// ```

pub mod authenticator;
pub mod identity;
pub mod password;
pub mod session;
