/// Error handling for the web server
///
/// This module provides a unified error type that maps to HTTP responses.
/// Handlers return `ApiResult<T>`; failures become a 500 with a short
/// plain-text body. Details only ever reach the server log.
///
/// Credential failures are not errors here: the login handler turns them
/// into a redirect back to the login form.
///
/// # Example
///
/// ```
/// use contactgate_api::error::{ApiError, ApiResult};
///
/// async fn handler() -> ApiResult<String> {
///     let body = std::fs::read_to_string("notes.txt")
///         .map_err(|e| ApiError::Internal(e.to_string()))?;
///     Ok(body)
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contactgate_shared::{
    auth::{authenticator::RegistrationError, session::SessionTokenError},
    contacts::IngestError,
    render::RenderError,
};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Body sent for registration failures
pub const REGISTRATION_FAILED: &str = "Error registering user.";

/// Body sent when the contacts file cannot be downloaded
pub const DOWNLOAD_FAILED: &str = "Error downloading the file.";

/// Body sent for every other server error
pub const INTERNAL_ERROR: &str = "Internal Server Error";

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Account creation failed (500)
    Registration(RegistrationError),

    /// The contacts file could not be opened for download (500)
    Download(String),

    /// Internal server error (500)
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Registration(err) => write!(f, "Registration failed: {}", err),
            ApiError::Download(msg) => write!(f, "Download failed: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self {
            ApiError::Registration(RegistrationError::DuplicateUsername) => {
                tracing::warn!("Registration rejected: username already exists");
                REGISTRATION_FAILED
            }
            ApiError::Registration(RegistrationError::Invalid(msg)) => {
                tracing::warn!("Registration rejected: {}", msg);
                REGISTRATION_FAILED
            }
            ApiError::Registration(err) => {
                tracing::error!("Registration failed: {}", err);
                REGISTRATION_FAILED
            }
            ApiError::Download(msg) => {
                tracing::error!("Error downloading the file: {}", msg);
                DOWNLOAD_FAILED
            }
            ApiError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                INTERNAL_ERROR
            }
        };

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        ApiError::Registration(err)
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        ApiError::Internal(format!("Contacts file: {}", err))
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<SessionTokenError> for ApiError {
    fn from(err: SessionTokenError) -> Self {
        ApiError::Internal(format!("Session token: {}", err))
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(format!("Database error: {}", err))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Background task failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    async fn body_of(err: ApiError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::Internal("boom".to_string());
        assert_eq!(err.to_string(), "Internal error: boom");

        let err = ApiError::Registration(RegistrationError::DuplicateUsername);
        assert_eq!(err.to_string(), "Registration failed: Username already exists");
    }

    #[tokio::test]
    async fn test_duplicate_username_is_generic_500() {
        let (status, body) = body_of(RegistrationError::DuplicateUsername.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, REGISTRATION_FAILED);
    }

    #[tokio::test]
    async fn test_ingest_error_hides_detail() {
        let err = IngestError::Io {
            path: PathBuf::from("/secret/location.csv"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };

        let (status, body) = body_of(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, INTERNAL_ERROR);
        assert!(!body.contains("secret"));
    }

    #[tokio::test]
    async fn test_download_error_body() {
        let (status, body) = body_of(ApiError::Download("gone".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, DOWNLOAD_FAILED);
    }
}
