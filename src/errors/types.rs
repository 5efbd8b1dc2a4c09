//! Error type definitions for the thumbnail service
//!
//! The service has a deliberately small error taxonomy: every failure a
//! caller can observe is either a problem with the uploaded input, a lookup
//! for an identifier that was never issued, or a storage-side fault.

use thiserror::Error;

/// Top-level error type for the thumbnail pipeline and storage layer
///
/// The web layer maps each variant to an HTTP status: `InvalidImage` is a
/// client error (400), `NotFound` maps to 404, and `Storage` is a
/// server-side fault (500). Nothing in the core retries on any of them.
#[derive(Error, Debug)]
pub enum ThumbnailError {
    /// Bad upload: corrupt bytes, oversized content, unsupported
    /// content-type, unknown preset name, or an empty batch
    #[error("Invalid image: {message}")]
    InvalidImage { message: String },

    /// No stored thumbnail exists for the requested identifier
    #[error("Thumbnail not found: {id}")]
    NotFound { id: String },

    /// I/O failure creating the storage root, writing, or reading
    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl ThumbnailError {
    /// Create an invalid image error with a custom message
    pub fn invalid_image<S: Into<String>>(message: S) -> Self {
        Self::InvalidImage {
            message: message.into(),
        }
    }

    /// Create a not found error for a thumbnail identifier
    pub fn not_found<S: Into<String>>(id: S) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a storage error with a custom message
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ThumbnailError>;
