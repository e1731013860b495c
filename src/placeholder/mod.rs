//! Loading placeholders from perceptual hashes.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Size** | [`raster_size`] |
//! | **Decode** | `blurhash::decode` via [`decode_hash`] |
//! | **Export** | `image` JPEG encoder + `base64` data URI |
//!
//! The module is split into:
//! - **Raster**: sizing, decoding and export around a reusable [`RasterScratch`]
//! - **Parameters**: [`Quality`] and [`PlaceholderParams`]
//! - **Backend**: [`PlaceholderBackend`] trait + [`BlurhashBackend`]

pub mod backend;
pub mod blurhash_backend;
mod params;
mod raster;

pub use backend::{PlaceholderBackend, PlaceholderError};
pub use blurhash_backend::BlurhashBackend;
pub use params::{PlaceholderParams, Quality};
pub use raster::{MAX_RASTER_EDGE, RasterScratch, RasterSize, decode_hash, raster_size};

/// A 1x1 transparent GIF, used as the background when there is no hash to
/// show (or the hash could not be decoded).
pub const TRANSPARENT_PIXEL: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";
