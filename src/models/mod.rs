use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One uploaded image, as handed over by the HTTP layer.
///
/// The filename is informational only; nothing is keyed by it. The buffer is
/// consumed once per pipeline call and never persisted as-is.
#[derive(Debug, Clone)]
pub struct InputImage {
    pub filename: String,
    pub data: Vec<u8>,
    pub content_type: String,
}

/// A single requested thumbnail size.
///
/// Either a named preset resolved against the configured preset table, or an
/// explicit custom box where at least one dimension is set. Modeling this as
/// a tagged variant keeps the resize branch exhaustive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeRequest {
    Preset(String),
    Custom {
        width: Option<u32>,
        height: Option<u32>,
    },
}

/// A thumbnail as persisted by the store.
///
/// The identifier is generated at save time, immutable, and the sole
/// retrieval key. `original_filename` is an annotation recorded on save and
/// not populated on retrieval.
#[derive(Debug, Clone)]
pub struct StoredThumbnail {
    pub id: String,
    pub path: PathBuf,
    pub content_type: String,
    pub original_filename: Option<String>,
}

/// Result-facing metadata for one generated thumbnail variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailMetadata {
    /// Identifier used to retrieve the thumbnail
    pub id: String,
    /// URL to fetch the thumbnail
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// Name of the preset used, if any
    pub preset: Option<String>,
    /// True if generated from a named preset size
    pub is_preset: bool,
}

/// All variants generated for one uploaded image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageThumbnails {
    pub original_filename: String,
    pub content_type: String,
    pub thumbnails: Vec<ThumbnailMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadThumbnailsResponse {
    pub items: Vec<ImageThumbnails>,
}
