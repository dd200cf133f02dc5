// src/handlers/preview.rs

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderValue, Method, header},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::file::{FileInfo, FileQuery, PreviewPayload},
    state::AppState,
    utils::{
        admission::{admit_file, admit_request},
        html::{SanitizePolicy, sanitize},
    },
};

/// Browser-enforced backstop for the embed response, independent of sanitization.
pub const EMBED_CSP: &str = "default-src 'self' 'unsafe-inline'; script-src 'none'; object-src 'none'; frame-ancestors 'self'";

/// Returns the sanitized file wrapped in JSON for client-side rendering.
pub async fn preview(
    State(state): State<AppState>,
    method: Method,
    query: Result<Query<FileQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let file_id = file_id_param(query);
    let (info, content) = load_sanitized(&state, &method, file_id.as_deref()).await?;

    Ok(Json(PreviewPayload {
        content,
        filename: info.name,
        file_id: info.id,
    }))
}

/// Returns the sanitized file as a document for an iframe.
pub async fn content(
    State(state): State<AppState>,
    method: Method,
    query: Result<Query<FileQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let file_id = file_id_param(query);
    let (_, content) = load_sanitized(&state, &method, file_id.as_deref()).await?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8")),
            (header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN")),
            (header::CONTENT_SECURITY_POLICY, HeaderValue::from_static(EMBED_CSP)),
            (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        ],
        content,
    ))
}

/// A query string that does not parse (e.g. a repeated `file_id`) counts as
/// a missing id, so the admission check still decides the response.
fn file_id_param(query: Result<Query<FileQuery>, QueryRejection>) -> Option<String> {
    match query {
        Ok(Query(query)) => query.file_id,
        Err(rejection) => {
            tracing::debug!("Unparseable query string: {}", rejection);
            None
        }
    }
}

/// Shared pipeline: admit, fetch metadata, admit the file, fetch bytes, sanitize.
///
/// Both endpoints enforce the size ceiling. Settings are read once so the
/// whole request sees a single snapshot.
async fn load_sanitized(
    state: &AppState,
    method: &Method,
    file_id: Option<&str>,
) -> Result<(FileInfo, String), AppError> {
    let file_id = admit_request(method, file_id)?;
    let settings = state.settings.current();

    let info = state.store.file_info(file_id).await.map_err(|e| {
        tracing::debug!(file_id = %file_id, "File lookup failed: {}", e);
        AppError::from(e)
    })?;

    admit_file(&info, Some(settings.max_file_size_bytes())).map_err(|e| {
        tracing::info!(file_id = %file_id, name = %info.name, size = info.size, "File rejected: {}", e);
        e
    })?;

    let raw = state.store.file_bytes(file_id).await?;

    let content = sanitize(&raw, &SanitizePolicy::from(settings.as_ref()));
    tracing::debug!(
        file_id = %file_id,
        raw_len = raw.len(),
        sanitized_len = content.len(),
        "File sanitized"
    );

    Ok((info, content))
}
