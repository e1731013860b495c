//! Build focus descriptors from image files.
//!
//! | Step | Crate / function |
//! |---|---|
//! | Discover | `walkdir::WalkDir` (directories), extension filter |
//! | Decode | `image::ImageReader` |
//! | Sample | `DynamicImage::thumbnail` to `sample_edge` |
//! | Hash | `blurhash::encode` |
//! | Batch | `rayon` parallel iterator |
//!
//! The focal point itself comes from the caller; stamping fills in what can
//! be measured from the file: intrinsic size and placeholder hash.

use crate::config::StampConfig;
use crate::focus::{Fit, FocusDescriptor, FocusPoint};
use image::{ImageFormat, ImageReader};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum StampError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("blurhash encoding failed for {path}: {reason}")]
    Hash { path: PathBuf, reason: String },
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Image file extensions with a decoder compiled in.
pub fn supported_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| supported_extensions().contains(&ext.as_str()))
}

/// Read `path` and return a descriptor for `point` carrying the image's
/// intrinsic size and a blurhash of its content.
pub fn stamp(
    path: &Path,
    point: FocusPoint,
    fit: Fit,
    config: &StampConfig,
) -> Result<FocusDescriptor, StampError> {
    let img = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|source| StampError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    let (width, height) = (img.width(), img.height());

    let edge = config.sample_edge.max(1);
    let sample = img.thumbnail(edge, edge).to_rgba8();
    let hash = blurhash::encode(
        config.components_x,
        config.components_y,
        sample.width(),
        sample.height(),
        sample.as_raw(),
    )
    .map_err(|e| StampError::Hash {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    log::debug!(
        "stamped {} ({width}x{height}, sampled {}x{})",
        path.display(),
        sample.width(),
        sample.height()
    );
    Ok(FocusDescriptor::new(point)
        .with_size(width, height)
        .with_fit(fit)
        .with_blurhash(hash))
}

/// Expand `inputs` into a sorted list of image files.
///
/// Files are kept as given, whatever their extension. Directories are walked
/// recursively and filtered to [`supported_extensions`].
pub fn collect_images(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, StampError> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }
        let mut found = Vec::new();
        for entry in WalkDir::new(input) {
            let entry = entry?;
            if entry.file_type().is_file() && is_supported(entry.path()) {
                found.push(entry.into_path());
            }
        }
        found.sort();
        files.extend(found);
    }
    Ok(files)
}

/// Outcome of stamping one file in a batch.
#[derive(Debug)]
pub struct Stamped {
    pub path: PathBuf,
    pub result: Result<FocusDescriptor, StampError>,
}

/// Stamp every image under `inputs` in parallel. One failing file does not
/// stop the others; results keep the order of [`collect_images`].
pub fn stamp_all(
    inputs: &[PathBuf],
    point: FocusPoint,
    fit: Fit,
    config: &StampConfig,
) -> Result<Vec<Stamped>, StampError> {
    let files = collect_images(inputs)?;
    log::debug!("stamping {} files", files.len());
    Ok(files
        .into_par_iter()
        .map(|path| {
            let result = stamp(&path, point, fit, config);
            if let Err(e) = &result {
                log::warn!("{e}");
            }
            Stamped { path, result }
        })
        .collect())
}
