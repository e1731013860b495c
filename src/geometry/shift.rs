//! Focus → crop position.
//!
//! The result is a pair of percentages in the CSS `object-position` /
//! `background-position` sense: `0%` aligns the image's left (top) edge with
//! the container's, `100%` aligns the right (bottom) edges, `50%` centers.

use super::Size;
use crate::focus::{Fit, FocusDescriptor};
use std::fmt;

/// Position percentages, each within `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shift {
    pub x: f64,
    pub y: f64,
}

impl Shift {
    pub const CENTER: Shift = Shift { x: 50.0, y: 50.0 };
}

impl Default for Shift {
    fn default() -> Self {
        Self::CENTER
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}% {}%", self.x, self.y)
    }
}

/// Compute the crop position that keeps `focus` in view inside `container`.
///
/// Returns `None` until both the container and the descriptor's intrinsic
/// size are measurable.
///
/// Only one axis ever moves. The axis whose size ratio (`image / container`)
/// is larger is the one being cropped under `cover`, and the one being
/// letterboxed under `contain` is the other; the remaining axis stays at 50%.
///
/// # Examples
/// ```
/// # use image_focus::focus::{FocusDescriptor, FocusPoint};
/// # use image_focus::geometry::{Size, compute_shift};
/// let focus = FocusDescriptor::new(FocusPoint::new(0.28, -0.33)).with_size(2400, 1400);
/// let shift = compute_shift(&focus, Size::new(120.0, 120.0)).unwrap();
/// assert!(shift.x > 50.0);
/// assert_eq!(shift.y, 50.0);
/// ```
pub fn compute_shift(focus: &FocusDescriptor, container: Size) -> Option<Shift> {
    let image = Size::from((focus.width, focus.height));
    if !container.is_measurable() || !image.is_measurable() {
        return None;
    }

    let w_ratio = image.width / container.width;
    let h_ratio = image.height / container.height;
    let mut shift = Shift::CENTER;

    match focus.fit {
        Fit::Cover => {
            if w_ratio > h_ratio {
                shift.x = cover_offset(container.width, image.width / h_ratio, focus.x());
            } else if w_ratio < h_ratio {
                shift.y = cover_offset(container.height, image.height / w_ratio, -focus.y());
            }
        }
        Fit::Contain => {
            if w_ratio < h_ratio {
                shift.x = focus.x() * 50.0 + 50.0;
            } else if w_ratio > h_ratio {
                shift.y = 100.0 - (focus.y() * 50.0 + 50.0);
            }
        }
    }

    Some(Shift {
        x: clamp_percent(shift.x),
        y: clamp_percent(shift.y),
    })
}

/// Offset along the cropped axis.
///
/// `scaled` is the image's rendered length on that axis after it has been
/// scaled so the other axis exactly fills the container. The focus term is
/// amplified by `container / overflow`: a barely-overflowing image needs a
/// large percentage to move its few spare pixels, a hugely overflowing one
/// tends to the plain `50 + 50f` mapping.
fn cover_offset(container: f64, scaled: f64, focus: f64) -> f64 {
    let overflow = (scaled - container) / container;
    if focus == 0.0 || overflow <= 0.0 {
        return 50.0;
    }
    50.0 + 50.0 * focus + (1.0 / overflow) * 50.0 * focus
}

fn clamp_percent(v: f64) -> f64 {
    if v.is_nan() { 50.0 } else { v.clamp(0.0, 100.0) }
}
