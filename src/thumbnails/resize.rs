//! Aspect-preserving resize.
//!
//! Dimension math is kept in a pure function so it can be tested without
//! touching pixel data.

use image::{imageops::FilterType, DynamicImage};

/// Resolved resize constraint: one axis pinned, or fit within a box.
///
/// A target always carries at least one dimension, so the scale-ratio
/// branch below is exhaustive with no unrepresentable states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeTarget {
    Width(u32),
    Height(u32),
    Fit { width: u32, height: u32 },
}

impl ResizeTarget {
    /// Build a target from optional dimensions; `None` when neither is set.
    pub fn from_dimensions(width: Option<u32>, height: Option<u32>) -> Option<Self> {
        match (width, height) {
            (Some(width), Some(height)) => Some(Self::Fit { width, height }),
            (Some(width), None) => Some(Self::Width(width)),
            (None, Some(height)) => Some(Self::Height(height)),
            (None, None) => None,
        }
    }
}

/// Compute final dimensions for an aspect-preserving resize.
///
/// For a `Fit` target the smaller of the two axis ratios wins, so the
/// result fits within the box. With `allow_upscale` false the ratio is
/// clamped to 1.0 and the image is never enlarged. Each axis rounds
/// independently and is clamped to at least one pixel.
pub fn scaled_dimensions(
    orig_width: u32,
    orig_height: u32,
    target: ResizeTarget,
    allow_upscale: bool,
) -> (u32, u32) {
    let ratio = match target {
        ResizeTarget::Fit { width, height } => {
            let width_ratio = width as f64 / orig_width as f64;
            let height_ratio = height as f64 / orig_height as f64;
            width_ratio.min(height_ratio)
        }
        ResizeTarget::Width(width) => width as f64 / orig_width as f64,
        ResizeTarget::Height(height) => height as f64 / orig_height as f64,
    };

    let ratio = if !allow_upscale && ratio > 1.0 {
        1.0
    } else {
        ratio
    };

    let new_width = ((orig_width as f64 * ratio).round() as u32).max(1);
    let new_height = ((orig_height as f64 * ratio).round() as u32).max(1);
    (new_width, new_height)
}

/// Resize a raster to satisfy `target`, preserving aspect ratio.
///
/// Returns the resized raster along with its final dimensions. When the
/// computed dimensions equal the original, the raster is copied back
/// without a resampling pass.
pub fn resize_preserving_aspect(
    image: &DynamicImage,
    target: ResizeTarget,
    allow_upscale: bool,
) -> (DynamicImage, u32, u32) {
    let (orig_width, orig_height) = (image.width(), image.height());
    let (new_width, new_height) = scaled_dimensions(orig_width, orig_height, target, allow_upscale);

    if new_width == orig_width && new_height == orig_height {
        return (image.clone(), orig_width, orig_height);
    }

    let resized = image.resize_exact(new_width, new_height, FilterType::Lanczos3);
    (resized, new_width, new_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_only_scales_height_proportionally() {
        // 200x100 with target width 100 → exactly 100x50
        assert_eq!(
            scaled_dimensions(200, 100, ResizeTarget::Width(100), false),
            (100, 50)
        );
    }

    #[test]
    fn height_only_scales_width_proportionally() {
        // 200x100 with target height 25 → exactly 50x25
        assert_eq!(
            scaled_dimensions(200, 100, ResizeTarget::Height(25), false),
            (50, 25)
        );
    }

    #[test]
    fn fit_uses_minimum_ratio() {
        // 100x50 into a 64x64 box: width ratio wins → 64x32
        assert_eq!(
            scaled_dimensions(
                100,
                50,
                ResizeTarget::Fit {
                    width: 64,
                    height: 64
                },
                false
            ),
            (64, 32)
        );
    }

    #[test]
    fn no_upscale_clamps_ratio() {
        assert_eq!(
            scaled_dimensions(200, 100, ResizeTarget::Width(400), false),
            (200, 100)
        );
        assert_eq!(
            scaled_dimensions(
                100,
                50,
                ResizeTarget::Fit {
                    width: 1024,
                    height: 1024
                },
                false
            ),
            (100, 50)
        );
    }

    #[test]
    fn upscale_allowed_when_requested() {
        assert_eq!(
            scaled_dimensions(200, 100, ResizeTarget::Width(400), true),
            (400, 200)
        );
    }

    #[test]
    fn dimensions_never_collapse_to_zero() {
        // Extreme downscale of a 1000x1 strip keeps both axes at >= 1
        assert_eq!(
            scaled_dimensions(1000, 1, ResizeTarget::Width(10), false),
            (10, 1)
        );
    }

    #[test]
    fn fit_result_never_exceeds_original_without_upscale() {
        let cases = [
            (640u32, 480u32, 64u32, 64u32),
            (480, 640, 256, 64),
            (33, 97, 1024, 1024),
            (1, 1, 64, 64),
        ];
        for (ow, oh, tw, th) in cases {
            let (w, h) = scaled_dimensions(
                ow,
                oh,
                ResizeTarget::Fit {
                    width: tw,
                    height: th,
                },
                false,
            );
            assert!(w <= ow && h <= oh, "{ow}x{oh} into {tw}x{th} gave {w}x{h}");
        }
    }

    #[test]
    fn aspect_ratio_preserved_within_rounding() {
        let (w, h) = scaled_dimensions(
            641,
            479,
            ResizeTarget::Fit {
                width: 100,
                height: 100,
            },
            false,
        );
        let orig_aspect = 641.0 / 479.0;
        let new_aspect = w as f64 / h as f64;
        // One pixel of rounding on the smaller axis bounds the drift
        assert!((orig_aspect - new_aspect).abs() < orig_aspect / h as f64);
    }

    #[test]
    fn from_dimensions_maps_all_combinations() {
        assert_eq!(
            ResizeTarget::from_dimensions(Some(10), Some(20)),
            Some(ResizeTarget::Fit {
                width: 10,
                height: 20
            })
        );
        assert_eq!(
            ResizeTarget::from_dimensions(Some(10), None),
            Some(ResizeTarget::Width(10))
        );
        assert_eq!(
            ResizeTarget::from_dimensions(None, Some(20)),
            Some(ResizeTarget::Height(20))
        );
        assert_eq!(ResizeTarget::from_dimensions(None, None), None);
    }

    fn test_raster(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    }

    #[test]
    fn resize_produces_exact_computed_dimensions() {
        let source = test_raster(200, 100);
        let (resized, w, h) = resize_preserving_aspect(&source, ResizeTarget::Width(100), false);
        assert_eq!((w, h), (100, 50));
        assert_eq!((resized.width(), resized.height()), (100, 50));
    }

    #[test]
    fn noop_resize_returns_copy_with_original_dimensions() {
        let source = test_raster(120, 80);
        let (resized, w, h) = resize_preserving_aspect(&source, ResizeTarget::Width(500), false);
        assert_eq!((w, h), (120, 80));
        assert_eq!(resized.to_rgb8(), source.to_rgb8());
    }
}
