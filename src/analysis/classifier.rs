//! Usage category classification for stored objects.
//!
//! The declared MIME type wins when it is recognised. Records with no content
//! type, or with a generic one such as `application/octet-stream`, fall back
//! to the filename extension. Anything left over is `Other`.

use crate::types::Category;

const PHOTO_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "svg", "tif", "tiff", "ico", "heic", "heif",
    "avif",
];

const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "avi", "mkv", "webm", "m4v", "wmv", "flv", "mpg", "mpeg", "3gp",
];

const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "ogg", "oga", "flac", "aac", "m4a", "wma", "opus", "aiff",
];

const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "rtf", "csv", "md", "odt",
    "ods", "odp",
];

/// Exact `application/*` types counted as documents
const DOCUMENT_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/rtf",
    "application/vnd.ms-excel",
    "application/vnd.ms-powerpoint",
];

/// Office container families counted as documents
const DOCUMENT_MIME_PREFIXES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.",
    "application/vnd.oasis.opendocument.",
];

/// Stateless classifier from declared content type and filename to [`Category`]
pub struct CategoryClassifier;

impl CategoryClassifier {
    /// Classify one object, case-insensitively
    ///
    /// ```
    /// use storage_health::analysis::CategoryClassifier;
    /// use storage_health::types::Category;
    ///
    /// assert_eq!(CategoryClassifier::classify("image/png", "x"), Category::Photos);
    /// assert_eq!(CategoryClassifier::classify("", "x.mp3"), Category::Audio);
    /// assert_eq!(CategoryClassifier::classify("", "x.unknown"), Category::Other);
    /// ```
    pub fn classify(content_type: &str, filename: &str) -> Category {
        Self::from_mime_type(content_type)
            .or_else(|| Self::from_extension(filename))
            .unwrap_or(Category::Other)
    }

    /// Category implied by a MIME type, ignoring parameters such as `; charset=utf-8`
    pub fn from_mime_type(content_type: &str) -> Option<Category> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence.is_empty() {
            return None;
        }

        if essence.starts_with("image/") {
            Some(Category::Photos)
        } else if essence.starts_with("video/") {
            Some(Category::Videos)
        } else if essence.starts_with("audio/") {
            Some(Category::Audio)
        } else if essence.starts_with("text/")
            || DOCUMENT_MIME_TYPES.contains(&essence.as_str())
            || DOCUMENT_MIME_PREFIXES
                .iter()
                .any(|prefix| essence.starts_with(prefix))
        {
            Some(Category::Documents)
        } else {
            None
        }
    }

    /// Category implied by the filename extension alone
    pub fn from_extension(filename: &str) -> Option<Category> {
        let extension = file_extension(filename)?;
        let extension = extension.as_str();

        if PHOTO_EXTENSIONS.contains(&extension) {
            Some(Category::Photos)
        } else if VIDEO_EXTENSIONS.contains(&extension) {
            Some(Category::Videos)
        } else if AUDIO_EXTENSIONS.contains(&extension) {
            Some(Category::Audio)
        } else if DOCUMENT_EXTENSIONS.contains(&extension) {
            Some(Category::Documents)
        } else {
            None
        }
    }
}

/// Lowercased text after the last dot of the final path segment
fn file_extension(filename: &str) -> Option<String> {
    let name = filename.rsplit('/').next().unwrap_or(filename);
    let (stem, extension) = name.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        // Dotfiles like ".env" have no extension
        return None;
    }
    Some(extension.to_ascii_lowercase())
}
