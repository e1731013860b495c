//! Parameter types for placeholder rendering.
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 92). Clamped on construction.
//! - [`PlaceholderParams`]: raster bound, quality and contrast for one backend.

use super::raster::MAX_RASTER_EDGE;
use crate::config::PlaceholderConfig;

/// Quality setting for the placeholder JPEG (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(92)
    }
}

/// Everything a backend needs to turn a hash into an embeddable image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceholderParams {
    /// Longer edge of the decoded raster, in pixels (1-100).
    pub max_edge: u32,
    pub quality: Quality,
    /// Contrast boost passed to the hash decoder (1.0 = as encoded).
    pub punch: f32,
}

impl PlaceholderParams {
    pub fn from_config(config: &PlaceholderConfig) -> Self {
        Self {
            max_edge: config.max_edge.clamp(1, MAX_RASTER_EDGE),
            quality: Quality::new(config.quality),
            punch: config.punch,
        }
    }
}

impl Default for PlaceholderParams {
    fn default() -> Self {
        Self::from_config(&PlaceholderConfig::default())
    }
}
