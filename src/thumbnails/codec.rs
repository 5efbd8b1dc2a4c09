//! Decoding uploads and encoding thumbnails to the canonical output format.
//!
//! Every stored thumbnail is PNG regardless of the upload format.

use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

use crate::errors::{Result, ThumbnailError};

/// Content-type of the canonical output format.
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Decode raw upload bytes into an in-memory raster.
///
/// `load_from_memory` fully materializes pixel data, so truncated or
/// corrupt files fail here rather than surfacing later in the resize pass.
pub fn decode_image(data: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(data).map_err(|e| {
        ThumbnailError::invalid_image(format!("uploaded file is not a valid image: {e}"))
    })
}

/// Re-encode a raster as PNG.
///
/// Encoding an internally produced raster into PNG does not fail in
/// practice; an error here is reported as a server-side fault.
pub fn encode_png(image: &DynamicImage) -> Result<(Vec<u8>, &'static str)> {
    let mut png_data = Vec::new();
    let mut cursor = Cursor::new(&mut png_data);
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| ThumbnailError::storage(format!("failed to encode PNG: {e}")))?;
    Ok((png_data, PNG_CONTENT_TYPE))
}
