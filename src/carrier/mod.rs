// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Lossless carrier codec.
//!
//! Decodes a PNG container into a flat sequence of 8-bit channel samples and
//! writes the same sequence back out as PNG. PNG is the only container this
//! crate accepts: any lossy step (JPEG thumbnails, WebP previews) would
//! rewrite the least-significant bits that carry the embedded key.
//!
//! Sample order is raster order: pixels row by row, left to right, and within
//! each pixel the channels in the order the layout stores them (`R, G, B[, A]`
//! or `L[, A]`).
//!
//! Supports:
//! - 8-bit grayscale, grayscale + alpha, RGB and RGBA, kept as stored
//! - Palette images (expanded to RGB/RGBA by the decoder)
//! - 16-bit images, converted to 8-bit RGB/RGBA at decode
//!
//! Re-encoding an unmodified carrier is sample-for-sample stable, and
//! encoding the same carrier twice yields identical bytes.

pub mod error;

use std::io::Cursor;

use image::codecs::png::{CompressionType, FilterType, PngDecoder, PngEncoder};
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageEncoder, ImageFormat};

use crate::config::CarrierLimits;
use error::{CarrierError, Result};

/// Channel layout of a decoded carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    /// One luminance sample per pixel.
    Gray,
    /// Luminance + alpha.
    GrayAlpha,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
}

impl ChannelLayout {
    /// Number of samples per pixel.
    pub fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::GrayAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    fn color_type(self) -> ExtendedColorType {
        match self {
            Self::Gray => ExtendedColorType::L8,
            Self::GrayAlpha => ExtendedColorType::La8,
            Self::Rgb => ExtendedColorType::Rgb8,
            Self::Rgba => ExtendedColorType::Rgba8,
        }
    }
}

/// A decoded carrier: dimensions, layout and the flat sample buffer.
///
/// The buffer length always equals `width * height * layout.channels()`;
/// every constructor enforces it, which is what makes [`CarrierImage::encode`]
/// total.
#[derive(Clone, PartialEq, Eq)]
pub struct CarrierImage {
    width: u32,
    height: u32,
    layout: ChannelLayout,
    samples: Vec<u8>,
}

impl CarrierImage {
    /// Build a carrier from raw samples in raster order.
    ///
    /// # Errors
    /// - [`CarrierError::EmptyImage`] if either dimension is zero.
    /// - [`CarrierError::SampleCountMismatch`] if `samples` has the wrong length.
    pub fn from_samples(width: u32, height: u32, layout: ChannelLayout, samples: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CarrierError::EmptyImage);
        }
        let expected = width as usize * height as usize * layout.channels();
        if samples.len() != expected {
            return Err(CarrierError::SampleCountMismatch { expected, actual: samples.len() });
        }
        Ok(Self { width, height, layout, samples })
    }

    /// Decode a PNG container using the default [`CarrierLimits`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::decode_with_limits(bytes, &CarrierLimits::default())
    }

    /// Decode a PNG container, rejecting carriers beyond `limits`.
    ///
    /// # Errors
    /// - [`CarrierError::UnsupportedFormat`] if the bytes are not PNG.
    /// - [`CarrierError::ImageTooLarge`] / [`CarrierError::EmptyImage`] on bad dimensions.
    /// - [`CarrierError::Decode`] if the PNG stream is corrupt.
    pub fn decode_with_limits(bytes: &[u8], limits: &CarrierLimits) -> Result<Self> {
        sniff_png(bytes)?;

        let decoder = PngDecoder::new(Cursor::new(bytes)).map_err(|e| CarrierError::Decode(e.to_string()))?;
        let (width, height) = decoder.dimensions();
        validate_dimensions(width, height, limits)?;

        let image = DynamicImage::from_decoder(decoder).map_err(|e| CarrierError::Decode(e.to_string()))?;
        let (layout, samples) = flatten(image);

        tracing::debug!(width, height, ?layout, "decoded carrier");
        Self::from_samples(width, height, layout, samples)
    }

    /// Encode as PNG.
    ///
    /// Total for any carrier this type can hold. Output is deterministic:
    /// the same samples always produce the same bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.samples.len() / 2 + 1024);
        PngEncoder::new_with_quality(&mut out, CompressionType::Default, FilterType::Adaptive)
            .write_image(&self.samples, self.width, self.height, self.layout.color_type())
            .expect("PNG encode of a length-checked in-memory buffer should not fail");
        out
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel layout.
    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    /// Total number of 8-bit samples (width × height × channels).
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// The flat sample buffer in raster order.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Mutable access to the samples. The length cannot change.
    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }

    /// Consume the carrier, returning the sample buffer.
    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }
}

impl std::fmt::Debug for CarrierImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarrierImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("layout", &self.layout)
            .field("samples", &self.samples.len())
            .finish()
    }
}

/// Validate carrier dimensions against `limits`.
///
/// # Errors
/// - [`CarrierError::EmptyImage`] if either dimension is zero.
/// - [`CarrierError::ImageTooLarge`] if a side exceeds `max_dimension` or the
///   pixel count exceeds `max_pixels`.
pub fn validate_dimensions(width: u32, height: u32, limits: &CarrierLimits) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(CarrierError::EmptyImage);
    }
    if width > limits.max_dimension
        || height > limits.max_dimension
        || u64::from(width) * u64::from(height) > limits.max_pixels
    {
        return Err(CarrierError::ImageTooLarge { width, height });
    }
    Ok(())
}

/// Reject anything whose magic bytes are not PNG.
fn sniff_png(bytes: &[u8]) -> Result<()> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => Ok(()),
        Ok(other) => {
            let name = other.extensions_str().first().copied().unwrap_or("unknown");
            Err(CarrierError::UnsupportedFormat(name.to_string()))
        }
        Err(_) => Err(CarrierError::UnsupportedFormat("unknown".to_string())),
    }
}

/// Split a decoded image into layout + raw 8-bit samples.
fn flatten(image: DynamicImage) -> (ChannelLayout, Vec<u8>) {
    match image {
        DynamicImage::ImageLuma8(buf) => (ChannelLayout::Gray, buf.into_raw()),
        DynamicImage::ImageLumaA8(buf) => (ChannelLayout::GrayAlpha, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => (ChannelLayout::Rgb, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (ChannelLayout::Rgba, buf.into_raw()),
        other => {
            tracing::debug!(color = ?other.color(), "converting carrier to 8-bit samples");
            if other.color().has_alpha() {
                (ChannelLayout::Rgba, other.to_rgba8().into_raw())
            } else {
                (ChannelLayout::Rgb, other.to_rgb8().into_raw())
            }
        }
    }
}
