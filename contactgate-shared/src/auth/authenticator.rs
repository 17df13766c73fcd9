/// Username/password authentication and account registration
///
/// These are the two operations that touch the credential store on behalf
/// of a visitor. HTTP concerns (redirects, cookies, status codes) stay in the
/// API crate; this module only answers "who is this" and "create this".
///
/// # Example
///
/// ```no_run
/// use contactgate_shared::auth::authenticator::{authenticate, register, NewAccount};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// register(
///     &pool,
///     NewAccount {
///         username: "mario".to_string(),
///         email: "mario@example.com".to_string(),
///         password: "allenamento".to_string(),
///     },
/// )
/// .await?;
///
/// let user = authenticate(&pool, "mario", "allenamento").await?;
/// assert_eq!(user.username, "mario");
/// # Ok(())
/// # }
/// ```

use serde::Deserialize;
use sqlx::PgPool;
use tracing::{debug, info};
use validator::Validate;

use super::password::{self, PasswordError};
use crate::models::user::{CreateUser, User};

/// Why a login attempt did not produce a user
#[derive(Debug, thiserror::Error)]
pub enum AuthFailure {
    /// No account has this username
    #[error("Unknown username")]
    NotFound,

    /// The password does not match the stored hash
    #[error("Password does not match")]
    BadCredential,

    /// The credential store could not be queried
    #[error("Credential store error: {0}")]
    Store(#[from] sqlx::Error),

    /// The stored hash could not be checked
    #[error(transparent)]
    Hash(#[from] PasswordError),
}

impl AuthFailure {
    /// True for failures caused by the submitted credentials rather than
    /// by the infrastructure
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, AuthFailure::NotFound | AuthFailure::BadCredential)
    }
}

/// Why an account could not be created
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// Submitted fields failed validation
    #[error("Invalid registration: {0}")]
    Invalid(String),

    /// The username is already taken
    #[error("Username already exists")]
    DuplicateUsername,

    /// Hashing the password failed
    #[error(transparent)]
    Hash(#[from] PasswordError),

    /// The credential store rejected the insert
    #[error("Credential store error: {0}")]
    Store(sqlx::Error),
}

impl From<sqlx::Error> for RegistrationError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RegistrationError::DuplicateUsername
            }
            _ => RegistrationError::Store(err),
        }
    }
}

/// Fields submitted to create an account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAccount {
    /// Login name (kept verbatim)
    #[validate(length(min = 1, max = 255, message = "Username must be 1 to 255 characters"))]
    pub username: String,

    /// Contact email address
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: String,

    /// Plaintext password, hashed before storage and never logged
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Checks a username/password pair against the credential store
///
/// # Errors
///
/// - `NotFound` if no account has exactly this username
/// - `BadCredential` if the password does not match
/// - `Store` / `Hash` for infrastructure failures
pub async fn authenticate(pool: &PgPool, username: &str, password: &str) -> Result<User, AuthFailure> {
    let user = User::find_by_username(pool, username)
        .await?
        .ok_or(AuthFailure::NotFound)?;

    if !password::verify_password(password, &user.password_hash)? {
        debug!(user_id = %user.id, "Password mismatch");
        return Err(AuthFailure::BadCredential);
    }

    debug!(user_id = %user.id, "Credentials accepted");
    Ok(user)
}

/// Creates an account with a hashed password
///
/// # Errors
///
/// - `Invalid` if a field fails validation
/// - `DuplicateUsername` if the username is taken
/// - `Hash` / `Store` for infrastructure failures
pub async fn register(pool: &PgPool, account: NewAccount) -> Result<User, RegistrationError> {
    account
        .validate()
        .map_err(|e| RegistrationError::Invalid(e.to_string()))?;

    let password_hash = password::hash_password(&account.password)?;

    let user = User::create(
        pool,
        CreateUser {
            username: account.username,
            email: account.email,
            password_hash,
        },
    )
    .await?;

    info!(user_id = %user.id, username = %user.username, "Registered new user");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(username: &str, password: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            email: "someone@example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_new_account_validation() {
        assert!(account("mario", "secret").validate().is_ok());
        assert!(account("", "secret").validate().is_err());
        assert!(account("mario", "").validate().is_err());
        assert!(account(&"x".repeat(256), "secret").validate().is_err());
    }

    #[test]
    fn test_whitespace_username_is_kept_verbatim() {
        // No normalization: a single space is a non-empty username.
        assert!(account(" ", "secret").validate().is_ok());
    }

    #[test]
    fn test_credential_failures_classified() {
        assert!(AuthFailure::NotFound.is_credential_failure());
        assert!(AuthFailure::BadCredential.is_credential_failure());
        assert!(!AuthFailure::Store(sqlx::Error::PoolTimedOut).is_credential_failure());
    }

    #[test]
    fn test_non_database_errors_are_store_errors() {
        let err = RegistrationError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, RegistrationError::Store(_)));
    }

    // Database-backed tests live in tests/db_user_tests.rs
}
