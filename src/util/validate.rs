//! Client-side checks run before an upload.

use thiserror::Error;

/// Largest accepted upload: 100 MiB.
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Accepted content types. Entries ending in `*` match by prefix.
pub const ALLOWED_TYPES: &[&str] = &[
    "image/*",
    "video/*",
    "audio/*",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "text/*",
    "application/json",
    "application/zip",
];

/// Why a file was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRejection {
    #[error("File size exceeds 100MB limit")]
    TooLarge,

    #[error("File type not supported")]
    UnsupportedType,
}

fn type_allowed(content_type: &str) -> bool {
    ALLOWED_TYPES.iter().any(|pattern| match pattern.strip_suffix('*') {
        Some(prefix) => content_type.starts_with(prefix),
        None => content_type == *pattern,
    })
}

/// Check a file's size and content type against the upload policy.
pub fn validate_file(size: u64, content_type: &str) -> Result<(), FileRejection> {
    if size > MAX_FILE_SIZE {
        return Err(FileRejection::TooLarge);
    }
    if !type_allowed(content_type) {
        return Err(FileRejection::UnsupportedType);
    }
    Ok(())
}
