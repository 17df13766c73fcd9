/// Contact list endpoints
///
/// # Endpoints
///
/// - `GET /contacts` - Contacts grouped by source (session required)
/// - `GET /download-csv` - The contacts file, byte for byte
///
/// The file is read from disk on every request.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
    Extension,
};
use contactgate_shared::{
    auth::identity::Identity,
    contacts::{group, ingest, ContactField},
};
use std::path::Path;
use tokio_util::io::ReaderStream;
use tracing::debug;

/// Fallback download name when the configured path has no usable file name
const DEFAULT_DOWNLOAD_NAME: &str = "contacts.csv";

/// `GET /contacts`
///
/// # Errors
///
/// - `500 Internal Server Error`: the file is missing, unreadable or
///   malformed
pub async fn list_contacts(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Html<String>> {
    let path = state.config.contacts.csv_path.clone();
    let mode = state.config.contacts.parse_mode;

    let rows = tokio::task::spawn_blocking(move || ingest(path, mode)).await??;
    let grouped = group(rows, ContactField::Source);

    debug!(
        user_id = %identity.user_id,
        groups = grouped.len(),
        rows = grouped.total_rows(),
        "Rendering contacts"
    );

    Ok(Html(state.renderer.contacts_page(&identity.username, &grouped)?))
}

/// `GET /download-csv`
///
/// Streams the file as `text/csv` with an attachment disposition.
///
/// # Errors
///
/// - `500 Internal Server Error`: body "Error downloading the file." when
///   the file cannot be opened
pub async fn download_csv(State(state): State<AppState>) -> ApiResult<Response> {
    let path = &state.config.contacts.csv_path;
    let download_error = |e: std::io::Error| ApiError::Download(format!("{}: {}", path.display(), e));

    let file = tokio::fs::File::open(path).await.map_err(download_error)?;
    let metadata = file.metadata().await.map_err(download_error)?;
    if !metadata.is_file() {
        return Err(ApiError::Download(format!("{} is not a regular file", path.display())));
    }

    debug!(path = %path.display(), bytes = metadata.len(), "Streaming contacts file");

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download_name(path)),
        ),
    ];

    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}

/// File name offered to the browser, restricted to characters that are
/// safe inside a quoted header parameter
fn download_name(path: &Path) -> String {
    let name: String = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .chars()
        .filter(|c| (c.is_ascii_graphic() && *c != '"' && *c != '\\') || *c == ' ')
        .collect();

    if name.trim().is_empty() {
        DEFAULT_DOWNLOAD_NAME.to_string()
    } else {
        name
    }
}
