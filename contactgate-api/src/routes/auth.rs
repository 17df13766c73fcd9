/// Login, registration and logout
///
/// # Endpoints
///
/// - `POST /login` - Check credentials, set the session cookie
/// - `POST /register` - Create an account
/// - `GET /logout` - Clear the session cookie
///
/// All three answer with a redirect. A failed login goes back to the login
/// form without saying why; a failed registration is a generic 500.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::session::{clear_session_cookie, session_cookie, LOGIN_PATH},
};
use axum::{
    extract::{rejection::FormRejection, State},
    response::Redirect,
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use contactgate_shared::auth::{
    authenticator::{self, NewAccount, RegistrationError},
    session::{create_session_token, SessionClaims, SESSION_COOKIE_NAME},
};
use serde::Deserialize;
use tracing::{debug, info};

/// Where a successful login lands
pub const CONTACTS_PATH: &str = "/contacts";

/// Login form fields
///
/// Missing fields read as empty and simply fail authentication.
#[derive(Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

/// `POST /login`
///
/// A body that is not a urlencoded form counts as a failed login.
///
/// # Errors
///
/// - `500 Internal Server Error`: credential store or token failure
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<LoginForm>, FormRejection>,
) -> ApiResult<(CookieJar, Redirect)> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            info!(reason = %rejection.body_text(), "Login rejected: unreadable form");
            return Ok((jar, Redirect::to(LOGIN_PATH)));
        }
    };

    let user = match authenticator::authenticate(&state.db, &form.username, &form.password).await {
        Ok(user) => user,
        Err(err) if err.is_credential_failure() => {
            info!(reason = %err, "Login rejected");
            return Ok((jar, Redirect::to(LOGIN_PATH)));
        }
        Err(err) => return Err(ApiError::Internal(format!("Login failed: {}", err))),
    };

    let claims = SessionClaims::with_ttl(user.id, state.config.session_ttl());
    let token = create_session_token(&claims, state.session_secret())?;

    info!(user_id = %user.id, session_id = %claims.sid, "User logged in");

    let cookie = session_cookie(token, state.config.api.production);
    Ok((jar.add(cookie), Redirect::to(CONTACTS_PATH)))
}

/// `POST /register`
///
/// # Errors
///
/// - `500 Internal Server Error`: body "Error registering user." for
///   malformed forms, invalid fields, taken usernames and store failures
pub async fn register(
    State(state): State<AppState>,
    form: Result<Form<NewAccount>, FormRejection>,
) -> ApiResult<Redirect> {
    let Form(account) = form.map_err(|e| RegistrationError::Invalid(e.body_text()))?;

    authenticator::register(&state.db, account).await?;

    Ok(Redirect::to(LOGIN_PATH))
}

/// `GET /logout`
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    if jar.get(SESSION_COOKIE_NAME).is_some() {
        info!("User logged out");
    } else {
        debug!("Logout without a session cookie");
    }

    (clear_session_cookie(jar), Redirect::to(LOGIN_PATH))
}
