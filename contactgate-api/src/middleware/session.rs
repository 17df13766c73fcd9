/// Session gate for protected pages
///
/// Reads the session cookie, resolves it to an [`Identity`] and stores that
/// in the request extensions. Visitors without a valid session are
/// redirected to the login form; a stale cookie is cleared on the way.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use contactgate_api::{app::AppState, middleware::session::require_session};
/// use contactgate_shared::auth::identity::Identity;
///
/// async fn me(Extension(identity): Extension<Identity>) -> String {
///     identity.username
/// }
///
/// # fn example(state: AppState) -> Router<AppState> {
/// Router::new()
///     .route("/me", get(me))
///     .layer(middleware::from_fn_with_state(state, require_session))
/// # }
/// ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use contactgate_shared::auth::{
    identity::{resolve_session, Identity},
    session::SESSION_COOKIE_NAME,
};
use tracing::debug;

use crate::{app::AppState, error::ApiError};

/// Path of the login form, where unauthenticated visitors are sent
pub const LOGIN_PATH: &str = "/";

/// Middleware guarding routes that need a logged-in user
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let token = jar.get(SESSION_COOKIE_NAME).map(|c| c.value().to_owned());

    match resolve_session(&state.db, state.session_secret(), token.as_deref()).await {
        Ok(identity) => {
            debug!(user_id = %identity.user_id, session_id = %identity.session_id, "Session resolved");
            req.extensions_mut().insert::<Identity>(identity);
            next.run(req).await
        }
        Err(err) if err.is_unauthenticated() => {
            debug!(reason = %err, path = %req.uri().path(), "Redirecting to login");
            let jar = if token.is_some() { clear_session_cookie(jar) } else { jar };
            (jar, Redirect::to(LOGIN_PATH)).into_response()
        }
        Err(err) => ApiError::Internal(format!("Session lookup: {}", err)).into_response(),
    }
}

/// Cookie carrying a freshly issued session token
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Removes the session cookie from the browser
pub fn clear_session_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("token".to_string(), true);

        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.value(), "token");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_insecure_cookie_in_development() {
        let cookie = session_cookie("token".to_string(), false);
        assert_eq!(cookie.secure(), Some(false));
    }

    #[test]
    fn test_clear_session_cookie() {
        let jar = CookieJar::new().add(session_cookie("token".to_string(), false));
        let jar = clear_session_cookie(jar);
        assert!(jar.get(SESSION_COOKIE_NAME).is_none());
    }
}
