use image::DynamicImage;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{PresetSize, ThumbnailConfig};
use crate::errors::{Result, ThumbnailError};
use crate::models::{
    ImageThumbnails, InputImage, SizeRequest, ThumbnailMetadata, UploadThumbnailsResponse,
};
use crate::storage::ThumbnailStore;

use super::codec;
use super::resize::{self, ResizeTarget};

/// Batch orchestrator for thumbnail generation and retrieval.
///
/// Constructed once at startup with its storage capability and
/// configuration, then shared across requests. A batch either succeeds for
/// every image and every requested size, or the whole call fails.
#[derive(Clone)]
pub struct ThumbnailService {
    storage: Arc<dyn ThumbnailStore>,
    config: ThumbnailConfig,
    base_url: String,
}

impl ThumbnailService {
    pub fn new(
        storage: Arc<dyn ThumbnailStore>,
        config: ThumbnailConfig,
        base_url: &str,
    ) -> Self {
        Self {
            storage,
            config,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Generate thumbnails for a batch of uploaded images.
    ///
    /// Validation fails fast: an empty batch, an unknown preset name, an
    /// oversized image or an unsupported content-type rejects the whole
    /// request before any further image is processed.
    pub async fn generate_thumbnails(
        &self,
        images: Vec<InputImage>,
        presets: Option<Vec<String>>,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<UploadThumbnailsResponse> {
        if images.is_empty() {
            return Err(ThumbnailError::invalid_image(
                "at least one image must be provided",
            ));
        }

        let requests = self.resolve_size_requests(presets, width, height)?;

        info!(
            images = images.len(),
            variants_per_image = requests.len(),
            "starting thumbnail batch"
        );

        let mut items = Vec::with_capacity(images.len());
        for image in &images {
            items.push(self.process_image(image, &requests).await?);
        }

        Ok(UploadThumbnailsResponse { items })
    }

    /// Retrieve stored thumbnail bytes and their content-type.
    pub async fn get_thumbnail_content(&self, id: &str) -> Result<(Vec<u8>, String)> {
        let (record, data) = self.storage.open(id).await?;
        Ok((data, record.content_type))
    }

    /// Resolve presets and custom dimensions into the ordered size-request
    /// list. With nothing requested, the configured default preset applies.
    fn resolve_size_requests(
        &self,
        presets: Option<Vec<String>>,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<Vec<SizeRequest>> {
        if width == Some(0) || height == Some(0) {
            return Err(ThumbnailError::invalid_image(
                "width and height must be positive",
            ));
        }

        let mut preset_names = presets.unwrap_or_default();
        if preset_names.is_empty() && width.is_none() && height.is_none() {
            preset_names.push(self.config.default_preset.clone());
        }

        let unknown: Vec<&str> = preset_names
            .iter()
            .filter(|name| !self.config.presets.contains_key(name.as_str()))
            .map(|name| name.as_str())
            .collect();
        if !unknown.is_empty() {
            return Err(ThumbnailError::invalid_image(format!(
                "unknown preset(s): {}",
                unknown.join(", ")
            )));
        }

        let mut requests: Vec<SizeRequest> =
            preset_names.into_iter().map(SizeRequest::Preset).collect();
        if width.is_some() || height.is_some() {
            requests.push(SizeRequest::Custom { width, height });
        }
        Ok(requests)
    }

    async fn process_image(
        &self,
        image: &InputImage,
        requests: &[SizeRequest],
    ) -> Result<ImageThumbnails> {
        if image.data.len() > self.config.max_image_bytes {
            return Err(ThumbnailError::invalid_image(format!(
                "image {} exceeds max size of {} bytes",
                image.filename, self.config.max_image_bytes
            )));
        }
        if !self.config.is_content_type_accepted(&image.content_type) {
            return Err(ThumbnailError::invalid_image(format!(
                "unsupported content type for {}: {}",
                image.filename, image.content_type
            )));
        }

        // Decode once; every requested size reuses this raster.
        let base_image = codec::decode_image(&image.data)?;
        debug!(
            filename = %image.filename,
            width = base_image.width(),
            height = base_image.height(),
            "decoded upload"
        );

        let mut thumbnails = Vec::with_capacity(requests.len());
        for request in requests {
            thumbnails.push(self.generate_variant(&base_image, image, request).await?);
        }

        info!(
            filename = %image.filename,
            variants = thumbnails.len(),
            "generated thumbnails"
        );

        Ok(ImageThumbnails {
            original_filename: image.filename.clone(),
            content_type: image.content_type.clone(),
            thumbnails,
        })
    }

    async fn generate_variant(
        &self,
        base_image: &DynamicImage,
        input: &InputImage,
        request: &SizeRequest,
    ) -> Result<ThumbnailMetadata> {
        let (target, preset) = self.resolve_target(request)?;
        let (resized, width, height) = resize::resize_preserving_aspect(base_image, target, false);
        let (content, content_type) = codec::encode_png(&resized)?;

        let stored = self
            .storage
            .save(&content, content_type, Some(&input.filename))
            .await?;
        debug!(id = %stored.id, width, height, "stored thumbnail variant");

        Ok(ThumbnailMetadata {
            url: format!("{}/thumbnails/{}", self.base_url, stored.id),
            id: stored.id,
            width,
            height,
            is_preset: preset.is_some(),
            preset,
        })
    }

    fn resolve_target(&self, request: &SizeRequest) -> Result<(ResizeTarget, Option<String>)> {
        match request {
            SizeRequest::Preset(name) => {
                let PresetSize { width, height } =
                    *self.config.presets.get(name).ok_or_else(|| {
                        ThumbnailError::invalid_image(format!("unknown preset(s): {name}"))
                    })?;
                Ok((ResizeTarget::Fit { width, height }, Some(name.clone())))
            }
            SizeRequest::Custom { width, height } => {
                let target = ResizeTarget::from_dimensions(*width, *height).ok_or_else(|| {
                    ThumbnailError::invalid_image("custom size requires a width or a height")
                })?;
                Ok((target, None))
            }
        }
    }
}
