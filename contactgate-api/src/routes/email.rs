/// Email stub
///
/// `POST /send-email` accepts a recipient, subject and message from a
/// logged-in user and reports success. Delivery is switched off: no mail
/// connection is opened, whatever the `EMAIL_*` settings say.

use crate::app::AppState;
use axum::{extract::State, Extension, Form};
use contactgate_shared::auth::identity::Identity;
use serde::Deserialize;
use tracing::info;

/// Body returned for every request
pub const EMAIL_STUB_RESPONSE: &str = "Email sending is not set up yet, but the request was received.";

/// Email form fields, all optional
#[derive(Debug, Default, Deserialize)]
pub struct EmailForm {
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /send-email`
///
/// Always answers 200. Logs the recipient and subject, never the message.
pub async fn send_email(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    form: Option<Form<EmailForm>>,
) -> &'static str {
    let form = form.map(|Form(f)| f).unwrap_or_default();

    info!(
        user_id = %identity.user_id,
        recipient = form.email.as_deref().unwrap_or(""),
        subject = form.subject.as_deref().unwrap_or(""),
        message_len = form.message.as_deref().map_or(0, str::len),
        mail_configured = state.config.email.is_configured(),
        "Email send requested; delivery is disabled"
    );

    EMAIL_STUB_RESPONSE
}
