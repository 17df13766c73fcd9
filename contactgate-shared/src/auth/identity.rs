/// Request identity resolved from a session token
///
/// The API's session gate calls [`resolve_session`] on each protected
/// request and stores the returned [`Identity`] in the request extensions.
/// Handlers read it with Axum's `Extension` extractor:
///
/// ```text
/// async fn handler(Extension(identity): Extension<Identity>) -> String {
///     format!("Ciao, {}", identity.username)
/// }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::session::{validate_session_token, SessionTokenError};
use crate::models::user::User;

/// The logged-in user attached to a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Session the request belongs to
    pub session_id: Uuid,

    /// Username at resolution time
    pub username: String,

    /// Email at resolution time
    pub email: String,
}

impl Identity {
    /// Builds the identity for `user` within session `session_id`
    pub fn new(user: &User, session_id: Uuid) -> Self {
        Self {
            user_id: user.id,
            session_id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Why a request has no usable session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session cookie was sent
    #[error("No session")]
    Missing,

    /// The token failed verification
    #[error(transparent)]
    Token(#[from] SessionTokenError),

    /// The token names a user that no longer exists
    #[error("Session user {0} not found")]
    UnknownUser(Uuid),

    /// The credential store could not be queried
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl SessionError {
    /// True when the visitor should simply be sent to the login page
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, SessionError::Database(_))
    }
}

/// Turns a session token back into the user it was issued to
///
/// # Errors
///
/// `Missing` when `token` is `None`, `Token` when verification fails,
/// `UnknownUser` when the account is gone and `Database` on query failure.
pub async fn resolve_session(
    pool: &PgPool,
    secret: &str,
    token: Option<&str>,
) -> Result<Identity, SessionError> {
    let token = token.ok_or(SessionError::Missing)?;
    let claims = validate_session_token(token, secret)?;

    let user = User::find_by_id(pool, claims.sub)
        .await?
        .ok_or(SessionError::UnknownUser(claims.sub))?;

    Ok(Identity::new(&user, claims.sid))
}
