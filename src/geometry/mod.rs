//! Crop geometry: pure functions, no state.
//!
//! | Operation | Function |
//! |---|---|
//! | **Shift** (focus → position percentages) | [`compute_shift`] |
//! | **Pick** (pointer → focus) | [`pointer_to_focus`] |
//! | **Handle** (focus → pointer) | [`focus_to_pointer`] |
//!
//! Every function returns `None` while a dimension is still zero or
//! non-finite. That is the normal state of an image that has not finished
//! loading, not an error; callers retry on the next layout signal.

mod picker;
mod shift;

pub use picker::{focus_to_pointer, pointer_to_focus};
pub use shift::{Shift, compute_shift};

/// A width/height pair in CSS pixels (or intrinsic pixels for images).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both sides are finite and strictly positive.
    pub fn is_measurable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(f64::from(width), f64::from(height))
    }
}

/// A pointer position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rendered box in viewport coordinates (a bounding client rect).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }
}
