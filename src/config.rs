//! Configuration module.
//!
//! Handles loading, validating, and merging `focus.toml`. Stock defaults are
//! the base layer; a user file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! `focus.toml` is read from the directory given with `--config` (the current
//! directory when omitted):
//!
//! ```text
//! project/
//! ├── focus.toml       # Overrides stock defaults
//! └── images/
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [placeholder]
//! max_edge = 100            # Longer edge of the decoded placeholder raster (1-100)
//! quality = 92              # JPEG quality of the embedded placeholder (1-100)
//! punch = 1.0               # Blurhash contrast factor
//!
//! [stamp]
//! components_x = 4          # Horizontal blurhash components (1-9)
//! components_y = 3          # Vertical blurhash components (1-9)
//! sample_edge = 64          # Images are downsampled to this edge before hashing
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::placeholder::MAX_RASTER_EDGE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the config directory.
pub const CONFIG_FILE: &str = "focus.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `focus.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FocusConfig {
    /// Placeholder rendering (raster size, JPEG quality, contrast).
    pub placeholder: PlaceholderConfig,
    /// Blurhash generation when stamping image files.
    pub stamp: StampConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl FocusConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_RASTER_EDGE).contains(&self.placeholder.max_edge) {
            return Err(ConfigError::Validation(
                "placeholder.max_edge must be 1-100".into(),
            ));
        }
        if !(1..=100).contains(&self.placeholder.quality) {
            return Err(ConfigError::Validation(
                "placeholder.quality must be 1-100".into(),
            ));
        }
        if !self.placeholder.punch.is_finite() || self.placeholder.punch <= 0.0 {
            return Err(ConfigError::Validation(
                "placeholder.punch must be a positive number".into(),
            ));
        }
        for (name, value) in [
            ("stamp.components_x", self.stamp.components_x),
            ("stamp.components_y", self.stamp.components_y),
        ] {
            if !(1..=9).contains(&value) {
                return Err(ConfigError::Validation(format!("{name} must be 1-9")));
            }
        }
        if self.stamp.sample_edge == 0 {
            return Err(ConfigError::Validation(
                "stamp.sample_edge must be non-zero".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Placeholder rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaceholderConfig {
    /// Longer edge of the decoded raster, in pixels.
    pub max_edge: u32,
    /// JPEG quality for the exported data URI.
    pub quality: u32,
    /// Contrast factor passed to the blurhash decoder.
    pub punch: f32,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            max_edge: 100,
            quality: 92,
            punch: 1.0,
        }
    }
}

/// Blurhash generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StampConfig {
    pub components_x: u32,
    pub components_y: u32,
    /// Longer edge of the thumbnail the hash is computed from.
    pub sample_edge: u32,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            components_x: 4,
            components_y: 3,
            sample_edge: 64,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel stamping workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(FocusConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `focus.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `focus.toml`.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    log::debug!("loaded {}", config_path.display());
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<FocusConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: FocusConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `focus.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<FocusConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `focus.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# image-focus configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Loading placeholders
# ---------------------------------------------------------------------------
[placeholder]
# Longer edge of the decoded placeholder raster, in pixels. The shorter edge
# follows the image's aspect ratio. The browser scales it up. At most 100.
max_edge = 100

# JPEG quality of the embedded placeholder (1-100).
quality = 92

# Contrast factor applied while decoding the hash. Values above 1.0 make
# the placeholder more saturated.
punch = 1.0

# ---------------------------------------------------------------------------
# Stamping image files
# ---------------------------------------------------------------------------
[stamp]
# Blurhash components along each axis (1-9). More components keep more
# detail and make the hash longer.
components_x = 4
components_y = 3

# Images are downsampled so their longer edge is this many pixels before
# hashing. The hash only holds low frequencies, so a small sample is enough.
sample_edge = 64

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers when stamping a directory.
# Omit to use all CPU cores. Larger values are clamped to the core count.
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = FocusConfig::default();
        assert_eq!(config.placeholder.max_edge, 100);
        assert_eq!(config.placeholder.quality, 92);
        assert_eq!(config.placeholder.punch, 1.0);
        assert_eq!(config.stamp.components_x, 4);
        assert_eq!(config.stamp.components_y, 3);
        assert_eq!(config.stamp.sample_edge, 64);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[placeholder]
quality = 70
"#;
        let config: FocusConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.placeholder.quality, 70);
        // Defaults preserved
        assert_eq!(config.placeholder.max_edge, 100);
        assert_eq!(config.stamp, StampConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml = r#"
[placeholder]
qualty = 70
"#;
        assert!(toml::from_str::<FocusConfig>(toml).is_err());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, FocusConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[placeholder]
max_edge = 32
punch = 1.5

[stamp]
components_x = 6
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.placeholder.max_edge, 32);
        assert_eq!(config.placeholder.punch, 1.5);
        assert_eq!(config.stamp.components_x, 6);
        // Unspecified values should be defaults
        assert_eq!(config.placeholder.quality, 92);
        assert_eq!(config.stamp.components_y, 3);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[placeholder]\nquality = 0\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn load_raw_config_ignores_other_file_names() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[placeholder]\nquality = 10\n").unwrap();
        assert!(load_raw_config(tmp.path()).unwrap().is_none());
    }

    // =========================================================================
    // Processing
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let config = ProcessingConfig {
            max_processes: None,
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("quality = 92").unwrap();
        let overlay: toml::Value = toml::from_str("quality = 70").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("quality").unwrap().as_integer(), Some(70));
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[stamp]\nsample_edge = 32\n").unwrap();
        let merged = merge_toml(base, overlay);
        let stamp = merged.get("stamp").unwrap();
        assert_eq!(stamp.get("sample_edge").unwrap().as_integer(), Some(32));
        assert_eq!(stamp.get("components_x").unwrap().as_integer(), Some(4));
        assert!(merged.get("placeholder").is_some());
    }

    #[test]
    fn resolve_config_without_overlay_is_default() {
        let config = resolve_config(stock_defaults_value().unwrap(), None).unwrap();
        assert_eq!(config, FocusConfig::default());
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(FocusConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_quality_bounds() {
        let mut config = FocusConfig::default();
        config.placeholder.quality = 100;
        assert!(config.validate().is_ok());
        config.placeholder.quality = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_max_edge_bounds() {
        let mut config = FocusConfig::default();
        config.placeholder.max_edge = 100;
        assert!(config.validate().is_ok());
        config.placeholder.max_edge = 101;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("placeholder.max_edge"));
        config.placeholder.max_edge = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_components_range() {
        let mut config = FocusConfig::default();
        config.stamp.components_y = 10;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("stamp.components_y"));
    }

    #[test]
    fn validate_punch_positive() {
        let mut config = FocusConfig::default();
        config.placeholder.punch = 0.0;
        assert!(config.validate().is_err());
        config.placeholder.punch = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zero_processes() {
        let mut config = FocusConfig::default();
        config.processing.max_processes = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn stock_config_toml_is_valid_and_matches_defaults() {
        let config: FocusConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, FocusConfig::default());
    }
}
