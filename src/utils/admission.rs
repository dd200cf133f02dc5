// src/utils/admission.rs

//! Pre-flight checks run before any file content is read.

use axum::http::Method;

use crate::{error::AppError, models::file::FileInfo};

/// Extensions the viewer will render, lower-case with the leading dot.
pub const WEB_EXTENSIONS: &[&str] = &[".html", ".htm", ".xhtml", ".xml", ".svg", ".css", ".js"];

/// Checks the parts of a request known before storage is touched:
/// the method and the `file_id` parameter. Returns the trimmed id.
pub fn admit_request<'a>(method: &Method, file_id: Option<&'a str>) -> Result<&'a str, AppError> {
    if *method != Method::GET {
        return Err(AppError::MethodNotAllowed);
    }

    match file_id.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(AppError::MissingParameter("file_id")),
    }
}

/// Checks file metadata: the extension always, the size when a limit is given.
pub fn admit_file(info: &FileInfo, max_size_bytes: Option<u64>) -> Result<(), AppError> {
    if !is_web_file(&info.name) {
        return Err(AppError::UnsupportedFileType);
    }

    if let Some(limit) = max_size_bytes {
        if info.size > limit {
            return Err(AppError::FileTooLarge);
        }
    }

    Ok(())
}

pub fn is_web_file(name: &str) -> bool {
    extension(name)
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            WEB_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Extension of the final path segment, dot included ("a/b.tar.gz" -> ".gz").
fn extension(name: &str) -> Option<&str> {
    let segment = name.rsplit(['/', '\\']).next().unwrap_or(name);
    segment.rfind('.').map(|idx| &segment[idx..])
}
