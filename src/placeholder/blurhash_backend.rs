//! Production placeholder backend.
//!
//! | Step | Crate / function |
//! |---|---|
//! | Size | [`raster_size`] (longer edge bounded by `max_edge`) |
//! | Decode | `blurhash::decode` into the backend's [`RasterScratch`] |
//! | Encode | `image::codecs::jpeg::JpegEncoder` |
//! | Embed | `base64` → `data:image/jpeg;base64,…` |

use super::backend::{PlaceholderBackend, PlaceholderError};
use super::params::PlaceholderParams;
use super::raster::{RasterScratch, raster_size};

/// Blurhash backend owning a single scratch buffer.
#[derive(Debug, Default)]
pub struct BlurhashBackend {
    params: PlaceholderParams,
    scratch: RasterScratch,
}

impl BlurhashBackend {
    pub fn new(params: PlaceholderParams) -> Self {
        Self {
            params,
            scratch: RasterScratch::new(),
        }
    }

    pub fn params(&self) -> &PlaceholderParams {
        &self.params
    }
}

impl PlaceholderBackend for BlurhashBackend {
    fn render(&mut self, hash: &str, width: u32, height: u32) -> Result<String, PlaceholderError> {
        let size = raster_size(width, height, self.params.max_edge)
            .ok_or(PlaceholderError::InvalidSize { width, height })?;
        self.scratch.decode(hash, size, self.params.punch)?;
        let uri = self.scratch.export_data_uri(self.params.quality)?;
        log::debug!(
            "rendered placeholder {hash} at {}x{} ({} bytes)",
            size.width,
            size.height,
            uri.len()
        );
        Ok(uri)
    }
}
