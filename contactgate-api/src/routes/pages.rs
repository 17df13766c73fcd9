/// Form pages
///
/// Both pages are static apart from the shared head partial.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, response::Html};

/// `GET /`
pub async fn login_form(State(state): State<AppState>) -> ApiResult<Html<String>> {
    Ok(Html(state.renderer.login_page()?))
}

/// `GET /register`
pub async fn register_form(State(state): State<AppState>) -> ApiResult<Html<String>> {
    Ok(Html(state.renderer.register_page()?))
}
