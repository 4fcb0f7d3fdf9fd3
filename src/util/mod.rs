//! Formatting and validation helpers.

mod debounce;
mod format;
mod validate;

pub use debounce::Debouncer;
pub use format::{FileIcon, format_date, format_date_at, format_file_size};
pub use validate::{ALLOWED_TYPES, FileRejection, MAX_FILE_SIZE, validate_file};
