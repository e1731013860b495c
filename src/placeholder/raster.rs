//! Hash → pixels → data URI.
//!
//! Decoding itself is delegated to the `blurhash` crate. This module owns the
//! contract around it: how large the raster is, what happens with bad input,
//! and how the pixels become a string a stylesheet can embed.
//!
//! All intermediate buffers live in a [`RasterScratch`]. Each call borrows it
//! mutably, so one scratch can never serve two decodes at once; keep one per
//! backend and reuse it.

use super::backend::PlaceholderError;
use super::params::Quality;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;

const BYTES_PER_PIXEL: usize = 4;

/// Largest raster edge a placeholder is ever decoded at.
pub const MAX_RASTER_EDGE: u32 = 100;

/// Pixel dimensions of a decoded placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterSize {
    pub width: u32,
    pub height: u32,
}

impl RasterSize {
    fn byte_len(self) -> usize {
        self.width as usize * self.height as usize * BYTES_PER_PIXEL
    }
}

/// Raster size for an image of `width`x`height`: the longer edge becomes
/// `max_edge`, the shorter one keeps the aspect ratio (at least 1px).
/// `max_edge` is capped at [`MAX_RASTER_EDGE`].
///
/// Returns `None` while either dimension (or `max_edge`) is zero.
///
/// # Examples
/// ```
/// # use image_focus::placeholder::{RasterSize, raster_size};
/// assert_eq!(raster_size(2400, 1400, 100), Some(RasterSize { width: 100, height: 58 }));
/// assert_eq!(raster_size(0, 1400, 100), None);
/// ```
pub fn raster_size(width: u32, height: u32, max_edge: u32) -> Option<RasterSize> {
    if width == 0 || height == 0 || max_edge == 0 {
        return None;
    }
    let max_edge = max_edge.min(MAX_RASTER_EDGE);
    let scaled = |short: u32, long: u32| {
        ((max_edge as f64 * short as f64 / long as f64).round() as u32).max(1)
    };
    let size = if width > height {
        RasterSize {
            width: max_edge,
            height: scaled(height, width),
        }
    } else if height > width {
        RasterSize {
            width: scaled(width, height),
            height: max_edge,
        }
    } else {
        RasterSize {
            width: max_edge,
            height: max_edge,
        }
    };
    Some(size)
}

/// Reusable buffers for decode + export.
#[derive(Debug, Default)]
pub struct RasterScratch {
    rgba: Vec<u8>,
    rgb: Vec<u8>,
    jpeg: Vec<u8>,
    decoded: Option<RasterSize>,
}

impl RasterScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `hash` into RGBA pixels of `size`, overwriting the previous
    /// contents of this scratch.
    pub fn decode(
        &mut self,
        hash: &str,
        size: RasterSize,
        punch: f32,
    ) -> Result<&[u8], PlaceholderError> {
        self.decoded = None;
        if size.width == 0 || size.height == 0 {
            return Err(PlaceholderError::InvalidSize {
                width: size.width,
                height: size.height,
            });
        }
        // The decoder slices by byte offset; non-ASCII input would split a
        // character instead of failing cleanly.
        if !hash.is_ascii() {
            return Err(invalid(hash, "contains non-ASCII characters"));
        }

        let pixels = blurhash::decode(hash, size.width, size.height, punch)
            .map_err(|e| invalid(hash, &e.to_string()))?;
        if pixels.len() != size.byte_len() {
            return Err(invalid(
                hash,
                &format!(
                    "decoder produced {} bytes, expected {}",
                    pixels.len(),
                    size.byte_len()
                ),
            ));
        }

        self.rgba.clear();
        self.rgba.extend_from_slice(&pixels);
        self.decoded = Some(size);
        Ok(&self.rgba)
    }

    /// Export the most recently decoded raster as a JPEG data URI.
    ///
    /// Identical pixels and quality always produce the identical string.
    pub fn export_data_uri(&mut self, quality: Quality) -> Result<String, PlaceholderError> {
        let size = self.decoded.ok_or(PlaceholderError::NothingDecoded)?;

        // JPEG has no alpha channel; blurhash output is opaque anyway.
        self.rgb.clear();
        self.rgb.extend(
            self.rgba
                .chunks_exact(BYTES_PER_PIXEL)
                .flat_map(|px| [px[0], px[1], px[2]]),
        );

        self.jpeg.clear();
        JpegEncoder::new_with_quality(&mut self.jpeg, quality.value()).encode(
            &self.rgb,
            size.width,
            size.height,
            ExtendedColorType::Rgb8,
        )?;

        Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(&self.jpeg)))
    }
}

/// Decode `hash` at `size` using `scratch` (see [`RasterScratch::decode`]).
pub fn decode_hash<'a>(
    hash: &str,
    size: RasterSize,
    punch: f32,
    scratch: &'a mut RasterScratch,
) -> Result<&'a [u8], PlaceholderError> {
    scratch.decode(hash, size, punch)
}

fn invalid(hash: &str, reason: &str) -> PlaceholderError {
    PlaceholderError::InvalidHash {
        hash: hash.to_string(),
        reason: reason.to_string(),
    }
}
