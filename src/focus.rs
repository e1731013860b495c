//! The focus descriptor: the value every other module operates on.
//!
//! A descriptor pairs a focal point with the metadata needed to honor it at
//! render time: the image's intrinsic size, the fit discipline, and an
//! optional blurhash for the loading placeholder.
//!
//! ## Coordinate convention
//!
//! ```text
//!            y = +1
//!              ▲
//!   x = -1 ◄───┼───► x = +1
//!              ▼
//!            y = -1
//! ```
//!
//! `(0, 0)` is the image center. Positive `y` is **above** center, which is
//! the opposite of screen coordinates. Every conversion to and from screen
//! space flips the sign of the vertical axis.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A focal point with both axes clamped to `[-1, 1]`.
///
/// The only way to build one is through [`FocusPoint::new`], so a stored
/// point is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawPoint")]
pub struct FocusPoint {
    x: f64,
    y: f64,
}

#[derive(Deserialize)]
struct RawPoint {
    x: f64,
    y: f64,
}

impl From<RawPoint> for FocusPoint {
    fn from(raw: RawPoint) -> Self {
        Self::new(raw.x, raw.y)
    }
}

impl FocusPoint {
    pub const CENTER: FocusPoint = FocusPoint { x: 0.0, y: 0.0 };

    /// Build a point, clamping each axis into `[-1, 1]`. NaN maps to 0.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) }
}

/// Cropping discipline to honor when the container's aspect ratio differs
/// from the image's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    /// Scale to fill the container; the overflowing axis is cropped.
    #[default]
    Cover,
    /// Scale to fit entirely; the short axis is letterboxed.
    Contain,
}

impl Fit {
    pub fn as_str(self) -> &'static str {
        match self {
            Fit::Cover => "cover",
            Fit::Contain => "contain",
        }
    }

    /// Lenient parse: anything other than `contain` is `cover`.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for Fit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Fit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cover" => Ok(Fit::Cover),
            "contain" => Ok(Fit::Contain),
            other => Err(format!("unknown fit mode '{other}' (expected cover|contain)")),
        }
    }
}

/// Focal point plus the image metadata needed to apply it.
///
/// `width`/`height` are the intrinsic pixel dimensions captured alongside the
/// focus. They are 0 while unknown, and shift computation refuses to run
/// until both are positive.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FocusDescriptor {
    #[serde(flatten)]
    pub point: FocusPoint,
    pub width: u32,
    pub height: u32,
    pub fit: Fit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blurhash: Option<String>,
}

impl FocusDescriptor {
    /// A centered descriptor with unknown dimensions, `cover` fit and no
    /// placeholder.
    pub fn new(point: FocusPoint) -> Self {
        Self {
            point,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_fit(mut self, fit: Fit) -> Self {
        self.fit = fit;
        self
    }

    /// Set the placeholder hash. Empty strings mean "no placeholder".
    pub fn with_blurhash(mut self, blurhash: impl Into<String>) -> Self {
        let hash = blurhash.into();
        self.blurhash = (!hash.is_empty()).then_some(hash);
        self
    }

    pub fn x(&self) -> f64 {
        self.point.x()
    }

    pub fn y(&self) -> f64 {
        self.point.y()
    }

    /// Both intrinsic dimensions are known.
    pub fn has_size(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_clamps_out_of_range_axes() {
        let p = FocusPoint::new(1.7, -3.0);
        assert_eq!(p.x(), 1.0);
        assert_eq!(p.y(), -1.0);
    }

    #[test]
    fn point_maps_nan_to_center() {
        let p = FocusPoint::new(f64::NAN, 0.4);
        assert_eq!(p.x(), 0.0);
        assert_eq!(p.y(), 0.4);
    }

    #[test]
    fn deserialized_point_is_clamped() {
        let d: FocusDescriptor =
            serde_json::from_str(r#"{"x": 4.0, "y": -0.5, "width": 10, "height": 10, "fit": "cover"}"#)
                .unwrap();
        assert_eq!(d.x(), 1.0);
        assert_eq!(d.y(), -0.5);
    }

    #[test]
    fn fit_defaults_to_cover() {
        assert_eq!(Fit::default(), Fit::Cover);
        assert_eq!(Fit::parse_lenient("contain"), Fit::Contain);
        assert_eq!(Fit::parse_lenient("CONTAIN"), Fit::Contain);
        assert_eq!(Fit::parse_lenient("fill"), Fit::Cover);
        assert_eq!(Fit::parse_lenient(""), Fit::Cover);
    }

    #[test]
    fn empty_blurhash_is_absent() {
        let d = FocusDescriptor::default().with_blurhash("");
        assert_eq!(d.blurhash, None);
        let d = d.with_blurhash("LEHV6nWB2yk8pyo0adR*.7kCMdnj");
        assert_eq!(d.blurhash.as_deref(), Some("LEHV6nWB2yk8pyo0adR*.7kCMdnj"));
    }

    #[test]
    fn has_size_requires_both_dimensions() {
        assert!(!FocusDescriptor::default().has_size());
        assert!(!FocusDescriptor::default().with_size(100, 0).has_size());
        assert!(FocusDescriptor::default().with_size(100, 50).has_size());
    }

    #[test]
    fn serializes_flat() {
        let d = FocusDescriptor::new(FocusPoint::new(0.25, -0.5))
            .with_size(800, 600)
            .with_fit(Fit::Contain);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["x"], 0.25);
        assert_eq!(json["y"], -0.5);
        assert_eq!(json["fit"], "contain");
        assert!(json.get("blurhash").is_none());
    }
}
