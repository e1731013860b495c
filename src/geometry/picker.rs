//! Pointer ↔ focus mapping for the interactive picker.
//!
//! The picker shows the whole image with `object-fit: contain`, so on one
//! axis the visible content is narrower than the box and sits between two
//! empty margins. Both mappings correct for that letterbox so a focus value
//! always describes a position within the *visible* image.

use super::{Point, Rect, Size};
use crate::focus::FocusPoint;

/// Letterbox geometry shared by both directions.
struct Letterbox {
    /// The image fills the box width; the vertical axis is letterboxed.
    wide: bool,
    /// Rendered content width if the image filled the box height.
    real_width: f64,
    /// Rendered content height if the image filled the box width.
    real_height: f64,
}

impl Letterbox {
    fn new(bbox: Rect, intrinsic: Size) -> Option<Self> {
        if !bbox.size().is_measurable() || !intrinsic.is_measurable() {
            return None;
        }
        Some(Self {
            wide: intrinsic.width / bbox.width > intrinsic.height / bbox.height,
            real_width: bbox.height * (intrinsic.width / intrinsic.height),
            real_height: bbox.width * (intrinsic.height / intrinsic.width),
        })
    }
}

/// Map a pointer sample over `bbox` to a focal point.
///
/// Pointers outside the box (a drag continuing past the edge) saturate at
/// `±1`. Screen-down movement decreases `y`.
pub fn pointer_to_focus(pointer: Point, bbox: Rect, intrinsic: Size) -> Option<FocusPoint> {
    let lb = Letterbox::new(bbox, intrinsic)?;
    let offset_x = pointer.x - bbox.left;
    let offset_y = pointer.y - bbox.top;

    let x_scale = if lb.wide { 1.0 } else { lb.real_height / bbox.height };
    let y_scale = if lb.wide { lb.real_width / bbox.width } else { 1.0 };

    let x = (offset_x / bbox.width - 0.5) * 2.0 * x_scale;
    let y = (offset_y / bbox.height - 0.5) * -2.0 * y_scale;
    Some(FocusPoint::new(x, y))
}

/// Where the picker handle sits for `focus`, in the same viewport coordinates
/// as [`pointer_to_focus`] takes.
pub fn focus_to_pointer(focus: FocusPoint, bbox: Rect, intrinsic: Size) -> Option<Point> {
    let lb = Letterbox::new(bbox, intrinsic)?;
    let along_x = focus.x() / 2.0 + 0.5;
    let along_y = focus.y() / -2.0 + 0.5;

    let offset_x = if lb.wide {
        bbox.width * along_x
    } else {
        lb.real_width * along_x + (bbox.width - lb.real_width) / 2.0
    };
    let offset_y = if lb.wide {
        lb.real_height * along_y + (bbox.height - lb.real_height) / 2.0
    } else {
        bbox.height * along_y
    };

    Some(Point::new(bbox.left + offset_x, bbox.top + offset_y))
}
