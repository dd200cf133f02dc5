// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::{settings::SettingsError, storage::StorageError};

/// Global Application Error Enum.
/// Every variant is terminal for the current request; nothing is retried.
#[derive(Debug)]
pub enum AppError {
    // 405 Method Not Allowed
    MethodNotAllowed,

    // 400 Bad Request (missing query parameter)
    MissingParameter(&'static str),

    // 400 Bad Request (extension outside the web-file allow-list)
    UnsupportedFileType,

    // 400 Bad Request (over the configured size ceiling)
    FileTooLarge,

    // 404 Not Found
    FileNotFound,

    // 500 Internal Server Error (storage read failed)
    ReadFailure(String),

    // 500 Internal Server Error (plugin settings could not be loaded)
    ConfigurationLoadFailure(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::MissingParameter(_)
            | AppError::UnsupportedFileType
            | AppError::FileTooLarge => StatusCode::BAD_REQUEST,
            AppError::FileNotFound => StatusCode::NOT_FOUND,
            AppError::ReadFailure(_) | AppError::ConfigurationLoadFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short message safe to show to the caller.
    pub fn public_message(&self) -> String {
        match self {
            AppError::MethodNotAllowed => "Method not allowed".to_string(),
            AppError::MissingParameter(name) => format!("{} parameter is required", name),
            AppError::UnsupportedFileType => "File is not an HTML file".to_string(),
            AppError::FileTooLarge => "File is too large".to_string(),
            AppError::FileNotFound => "File not found".to_string(),
            AppError::ReadFailure(_) => "Failed to read file".to_string(),
            AppError::ConfigurationLoadFailure(_) => "Internal Server Error".to_string(),
        }
    }
}

/// Implements `IntoResponse` for `AppError`.
/// Internal details are logged, never sent back to the caller.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::ReadFailure(detail) => {
                tracing::error!("Failed to read file: {}", detail);
            }
            AppError::ConfigurationLoadFailure(detail) => {
                tracing::error!("Configuration load failure: {}", detail);
            }
            _ => {}
        }

        let body = Json(json!({
            "error": self.public_message(),
        }));

        (self.status(), body).into_response()
    }
}

/// Storage lookups surface as not-found or read failures, never as admission errors.
impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) => AppError::FileNotFound,
            StorageError::Read(msg) => AppError::ReadFailure(msg),
        }
    }
}

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        AppError::ConfigurationLoadFailure(err.to_string())
    }
}
