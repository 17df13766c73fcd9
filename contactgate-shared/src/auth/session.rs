/// Signed session tokens
///
/// A session is the pair `(session_id, user_id)`. It travels in the session
/// cookie as an HS256-signed JWT, so the server can trust the identity in it
/// without keeping a session table. Logging out clears the cookie.
///
/// # Claims
///
/// - `sub`: user ID
/// - `sid`: session ID, fresh for every login
/// - `iss`: always `"contactgate"`
/// - `iat` / `nbf` / `exp`: issue, not-before and expiry timestamps
///
/// # Example
///
/// ```
/// use contactgate_shared::auth::session::{create_session_token, validate_session_token, SessionClaims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-session-secret-of-at-least-32-bytes";
/// let claims = SessionClaims::new(Uuid::new_v4());
/// let token = create_session_token(&claims, secret)?;
///
/// let validated = validate_session_token(&token, secret)?;
/// assert_eq!(validated.sid, claims.sid);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer written into and required from every session token
pub const SESSION_ISSUER: &str = "contactgate";

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE_NAME: &str = "contactgate_session";

/// Lifetime used when none is configured
pub fn default_session_ttl() -> Duration {
    Duration::hours(24)
}

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum SessionTokenError {
    /// Failed to sign token
    #[error("Failed to create session token: {0}")]
    CreateError(String),

    /// Signature, issuer or format check failed
    #[error("Invalid session token: {0}")]
    Invalid(String),

    /// Token has expired
    #[error("Session token has expired")]
    Expired,
}

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Session ID
    pub sid: Uuid,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Opens a new session for `user_id` with the default lifetime
    pub fn new(user_id: Uuid) -> Self {
        Self::with_ttl(user_id, default_session_ttl())
    }

    /// Opens a new session for `user_id` that expires after `ttl`
    pub fn with_ttl(user_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            sid: Uuid::new_v4(),
            iss: SESSION_ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

/// Signs session claims into a token string
pub fn create_session_token(claims: &SessionClaims, secret: &str) -> Result<String, SessionTokenError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| SessionTokenError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies a session token and returns its claims
///
/// Checks the signature, the issuer, `exp` and `nbf`.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims, SessionTokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[SESSION_ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    // Expired sessions are rejected on the dot.
    validation.leeway = 0;

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionTokenError::Expired,
            _ => SessionTokenError::Invalid(e.to_string()),
        }
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_new_claims() {
        let user_id = Uuid::new_v4();
        let claims = SessionClaims::new(user_id);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, SESSION_ISSUER);
        assert_eq!(claims.exp - claims.iat, default_session_ttl().num_seconds());
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_each_login_gets_a_new_session_id() {
        let user_id = Uuid::new_v4();
        assert_ne!(SessionClaims::new(user_id).sid, SessionClaims::new(user_id).sid);
    }

    #[test]
    fn test_create_and_validate() {
        let claims = SessionClaims::new(Uuid::new_v4());
        let token = create_session_token(&claims, SECRET).expect("Should create token");

        let validated = validate_session_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated, claims);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = SessionClaims::new(Uuid::new_v4());
        let token = create_session_token(&claims, SECRET).unwrap();

        let result = validate_session_token(&token, "another-secret-key-at-least-32-bytes");
        assert!(matches!(result, Err(SessionTokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_session_rejected() {
        let claims = SessionClaims::with_ttl(Uuid::new_v4(), Duration::seconds(-3600));
        assert!(claims.exp < Utc::now().timestamp());

        let token = create_session_token(&claims, SECRET).unwrap();
        assert!(matches!(
            validate_session_token(&token, SECRET),
            Err(SessionTokenError::Expired)
        ));
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let mut claims = SessionClaims::new(Uuid::new_v4());
        claims.iss = "someone-else".to_string();
        let token = create_session_token(&claims, SECRET).unwrap();

        assert!(validate_session_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            validate_session_token("not.a.token", SECRET),
            Err(SessionTokenError::Invalid(_))
        ));
    }
}
