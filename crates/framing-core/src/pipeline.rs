//! The framing pipeline: decode → scale → place → composite → encode.
//!
//! One invocation takes a photo and a sequence of overlays and produces
//! one PNG per overlay, in overlay order. With no overlays it still
//! produces a single framed output (the photo alone on the canvas).
//!
//! Everything here is deterministic: the same input and configuration
//! always produce byte-identical PNGs.

use std::io::Cursor;

use dpframe_common::{DpframeError, DpframeResult};
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, GenericImageView, ImageEncoder, ImageFormat, RgbaImage};

use crate::overlay::FrameOverlay;
use crate::placement::{compute_placement, CanvasSpec};

/// Ceilings applied before and after header inspection so a hostile
/// upload cannot force an outsized decode.
#[derive(Debug, Clone, Copy)]
pub struct DecodeLimits {
    /// Maximum pixel count of the decoded image.
    pub max_pixels: u64,
    /// Maximum estimated RGBA byte size of the decoded image.
    pub max_bytes: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_pixels: 64_000_000,
            max_bytes: 256 * 1024 * 1024,
        }
    }
}

/// A decoded input photo. Immutable; lives for one pipeline invocation.
#[derive(Debug, Clone)]
pub struct InputImage {
    format: ImageFormat,
    pixels: RgbaImage,
}

impl InputImage {
    /// Decode an uploaded photo with default limits.
    pub fn decode(bytes: &[u8]) -> DpframeResult<Self> {
        Self::decode_with_limits(bytes, &DecodeLimits::default())
    }

    /// Decode an uploaded photo, enforcing `limits`.
    ///
    /// Dimensions are read from the header first so oversized images are
    /// rejected before any pixel data is decoded.
    pub fn decode_with_limits(bytes: &[u8], limits: &DecodeLimits) -> DpframeResult<Self> {
        if bytes.is_empty() {
            return Err(DpframeError::NoInput);
        }

        let format = image::guess_format(bytes)
            .map_err(|e| DpframeError::decode(format!("unrecognized image format: {e}")))?;

        let (header_w, header_h) = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| DpframeError::decode(format!("unreadable image header: {e}")))?
            .into_dimensions()
            .map_err(|e| DpframeError::decode(format!("unreadable image dimensions: {e}")))?;
        check_limits(header_w, header_h, limits)?;

        let decoded = image::load_from_memory(bytes)
            .map_err(|e| DpframeError::decode(format!("image decode failed: {e}")))?;
        let (w, h) = decoded.dimensions();
        check_limits(w, h, limits)?;

        tracing::debug!("Decoded {:?} input: {}x{}", format, w, h);

        Ok(Self {
            format,
            pixels: decoded.to_rgba8(),
        })
    }

    /// Detected source format.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Decoded dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

fn check_limits(width: u32, height: u32, limits: &DecodeLimits) -> DpframeResult<()> {
    let pixels = (width as u64)
        .checked_mul(height as u64)
        .ok_or_else(|| DpframeError::resource_limit("pixel count overflow"))?;
    if pixels > limits.max_pixels {
        return Err(DpframeError::resource_limit(format!(
            "{pixels} pixels exceeds the {} pixel limit",
            limits.max_pixels
        )));
    }
    let bytes = pixels
        .checked_mul(4)
        .ok_or_else(|| DpframeError::resource_limit("byte estimate overflow"))?;
    if bytes > limits.max_bytes {
        return Err(DpframeError::resource_limit(format!(
            "{bytes} decoded bytes exceeds the {} byte limit",
            limits.max_bytes
        )));
    }
    Ok(())
}

/// One framed result: PNG bytes plus the overlay role that produced it.
#[derive(Debug, Clone)]
pub struct OutputImage {
    /// Overlay name, or `"plain"` for the no-overlay output.
    pub role: String,
    /// Canvas width (always the CanvasSpec width).
    pub width: u32,
    /// Canvas height (always the CanvasSpec height).
    pub height: u32,
    /// Encoded PNG bytes.
    pub png: Vec<u8>,
}

/// Frame `input` on `canvas` once per overlay.
///
/// Returns one [`OutputImage`] per overlay in the order supplied, or a
/// single `"plain"` output when `overlays` is empty. A failure anywhere
/// aborts the whole call; there is no partial success.
pub fn frame(
    input: &InputImage,
    canvas: &CanvasSpec,
    overlays: &[FrameOverlay],
) -> DpframeResult<Vec<OutputImage>> {
    let (input_w, input_h) = input.dimensions();
    let placement = compute_placement(input_w, input_h, canvas)?;

    tracing::debug!(
        "Placing {}x{} photo at ({}, {}) as {}x{} (scale {:.4})",
        input_w,
        input_h,
        placement.x,
        placement.y,
        placement.width,
        placement.height,
        placement.scale,
    );

    // Scale once; every overlay shares the same placed photo.
    let scaled = if (placement.width, placement.height) == (input_w, input_h) {
        input.pixels.clone()
    } else {
        imageops::resize(
            &input.pixels,
            placement.width,
            placement.height,
            FilterType::Lanczos3,
        )
    };

    // Background first, photo second. Reversing the order would hide the
    // photo behind an opaque background.
    let mut base = RgbaImage::from_pixel(canvas.width, canvas.height, canvas.background.pixel());
    imageops::overlay(&mut base, &scaled, placement.x as i64, placement.y as i64);

    if overlays.is_empty() {
        return Ok(vec![OutputImage {
            role: "plain".to_string(),
            width: canvas.width,
            height: canvas.height,
            png: encode_png(&base)?,
        }]);
    }

    let mut outputs = Vec::with_capacity(overlays.len());
    for overlay in overlays {
        let mut composed = base.clone();
        imageops::overlay(&mut composed, overlay.image(), 0, 0);
        outputs.push(OutputImage {
            role: overlay.name().to_string(),
            width: canvas.width,
            height: canvas.height,
            png: encode_png(&composed)?,
        });
    }
    Ok(outputs)
}

/// Encode an RGBA canvas as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> DpframeResult<Vec<u8>> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| DpframeError::encode(format!("PNG encode failed: {e}")))?;
    Ok(out)
}
