//! Display helpers for file listings.

use chrono::{DateTime, Local, Utc};

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Human-readable size using 1024-based units, e.g. `1536` -> `"1.5 KB"`.
///
/// Picks the largest unit whose scaled value is at least 1 (capped at TB)
/// and rounds to two decimals, dropping trailing zeros.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[unit])
}

/// Icon category for a content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileIcon {
    Image,
    Video,
    Audio,
    Archive,
    Document,
}

impl FileIcon {
    pub fn for_content_type(content_type: &str) -> Self {
        if content_type.starts_with("image/") {
            FileIcon::Image
        } else if content_type.starts_with("video/") {
            FileIcon::Video
        } else if content_type.starts_with("audio/") {
            FileIcon::Audio
        } else if content_type.contains("zip") || content_type.contains("archive") {
            FileIcon::Archive
        } else {
            FileIcon::Document
        }
    }

    /// Style class name.
    pub fn class(&self) -> &'static str {
        match self {
            FileIcon::Image => "image",
            FileIcon::Video => "video",
            FileIcon::Audio => "audio",
            FileIcon::Archive => "archive",
            FileIcon::Document => "document",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            FileIcon::Image => "🖼️",
            FileIcon::Video => "🎥",
            FileIcon::Audio => "🎵",
            FileIcon::Archive => "📦",
            FileIcon::Document => "📄",
        }
    }
}

/// [`format_date_at`] relative to the current time.
pub fn format_date(date: DateTime<Utc>) -> String {
    format_date_at(date, Utc::now())
}

/// Relative label for recent dates, local date and time otherwise.
///
/// The distance is rounded up to whole days: anything within the last 24
/// hours reads "Yesterday", then "N days ago" up to six days.
pub fn format_date_at(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    let diff_ms = (now - date).num_milliseconds().abs();
    let days = (diff_ms + DAY_MS - 1) / DAY_MS;

    if days == 1 {
        "Yesterday".to_string()
    } else if days < 7 {
        format!("{} days ago", days)
    } else {
        date.with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }
}
