//! Thumbnail transform: decode, shrink to fit, flatten transparency onto
//! white and re-encode as a progressive JPEG.
//!
//! Everything here is synchronous and CPU bound. Callers on the async
//! runtime should run [`resize`] through `spawn_blocking`.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use jpeg_encoder::{ColorType, Encoder};
use lambda_runtime::tracing;

use crate::error::{HandlerError, TransformError};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Bounding box and encoder quality for one invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ThumbnailSpec {
    max_dimension: u32,
    quality: u8,
}

impl ThumbnailSpec {
    pub(crate) fn new(max_dimension: u32, quality: u8) -> Result<Self, HandlerError> {
        if max_dimension == 0 {
            return Err(HandlerError::InvalidConfig(
                "max dimension must be greater than zero".to_string(),
            ));
        }
        if !(1..=100).contains(&quality) {
            return Err(HandlerError::InvalidConfig(format!(
                "JPEG quality must be between 1 and 100, got {quality}"
            )));
        }
        Ok(Self {
            max_dimension,
            quality,
        })
    }

    pub(crate) fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    pub(crate) fn quality(&self) -> u8 {
        self.quality
    }
}

#[derive(Debug)]
pub(crate) struct Thumbnail {
    pub(crate) data: Vec<u8>,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

/// Produces a JPEG no larger than the spec's bounding box. Images that
/// already fit are re-encoded at their original size.
pub(crate) fn resize(image_bytes: &[u8], spec: &ThumbnailSpec) -> Result<Thumbnail, TransformError> {
    let img = image::load_from_memory(image_bytes)?;
    let (orig_w, orig_h) = (img.width(), img.height());
    let color = img.color();
    tracing::debug!(
        original_width = orig_w,
        original_height = orig_h,
        color = ?color,
        input_size = image_bytes.len(),
        "Decoded original image"
    );

    // Flatten before resampling so transparent colours never reach opaque edges.
    let opaque = flatten_onto_white(img);

    let (width, height) = thumbnail_dimensions(orig_w, orig_h, spec.max_dimension);
    let resized = if (width, height) == (orig_w, orig_h) {
        opaque
    } else {
        opaque.resize_exact(width, height, FilterType::Lanczos3)
    };

    let (pixels, color_type) = match resized {
        DynamicImage::ImageLuma8(gray) => (gray.into_raw(), ColorType::Luma),
        other => (other.to_rgb8().into_raw(), ColorType::Rgb),
    };
    let data = encode_progressive_jpeg(&pixels, width, height, color_type, spec.quality)?;

    tracing::debug!(
        width,
        height,
        output_size = data.len(),
        "Thumbnail encoded"
    );

    Ok(Thumbnail {
        data,
        width,
        height,
    })
}

/// Shrinks `(width, height)` so the longer side equals `max_dimension`,
/// keeping the aspect ratio. Never enlarges.
pub(crate) fn thumbnail_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width <= max_dimension && height <= max_dimension {
        return (width, height);
    }

    let scale = f64::from(max_dimension) / f64::from(width.max(height));
    let scaled = |side: u32| ((f64::from(side) * scale).round() as u32).clamp(1, max_dimension);

    if width >= height {
        (max_dimension, scaled(height))
    } else {
        (scaled(width), max_dimension)
    }
}

/// Drops any alpha channel by compositing over white. Grayscale stays
/// grayscale, every other layout becomes 8-bit RGB.
fn flatten_onto_white(img: DynamicImage) -> DynamicImage {
    if img.color().has_alpha() {
        let top = img.to_rgba8();
        let mut background = RgbaImage::from_pixel(top.width(), top.height(), WHITE);
        imageops::overlay(&mut background, &top, 0, 0);
        return DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(background).to_rgb8());
    }

    match img {
        gray @ DynamicImage::ImageLuma8(_) => gray,
        luma16 @ DynamicImage::ImageLuma16(_) => DynamicImage::ImageLuma8(luma16.to_luma8()),
        rgb @ DynamicImage::ImageRgb8(_) => rgb,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

fn encode_progressive_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    color_type: ColorType,
    quality: u8,
) -> Result<Vec<u8>, TransformError> {
    let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(TransformError::Encode(format!(
                "{width}x{height} exceeds the JPEG size limit"
            )))
        }
    };

    let mut data = Vec::new();
    let mut encoder = Encoder::new(&mut data, quality);
    encoder.set_progressive(true);
    encoder
        .encode(pixels, w, h, color_type)
        .map_err(|e| TransformError::Encode(e.to_string()))?;

    Ok(data)
}
