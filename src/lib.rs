//! # image-focus
//!
//! Focal-point cropping for responsive images, with a blurred placeholder
//! that crossfades into the real image once it has loaded.
//!
//! An author marks the part of an image that must stay visible. That point,
//! the image's intrinsic size, its fit mode and a blurhash travel together as
//! one short attribute-safe string. At render time the crate turns the
//! string and a container size into `object-position` percentages that keep
//! the focal point in frame, and runs each image through a small reveal
//! state machine so the placeholder never pops.
//!
//! # Architecture
//!
//! ```text
//!   focus string ──codec──► FocusDescriptor ──geometry──► Shift (object-position)
//!                                  │
//!   host signals ──► FocusRegistry ├──► RevealController ──► ImageStyle
//!   (resize, load,         │       │          │
//!    mutation, drag)       │       │    PlaceholderBackend (blurhash → data URI)
//!                          │       │
//!                          └── Timeline (virtual clock for crossfade timers)
//! ```
//!
//! Everything below the registry is pure or single-owner. The registry never
//! calls back into the host: the host feeds it signals and reads styles and
//! change notifications back out.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`focus`] | `FocusPoint`, `Fit`, `FocusDescriptor`: the shared value types |
//! | [`codec`] | Versioned base64/JSON string form of a descriptor |
//! | [`geometry`] | Shift calculation and the picker's pointer ↔ focus mapping |
//! | [`placeholder`] | Blurhash decoding, raster sizing, JPEG data-URI export |
//! | [`style`] | Typed inline style produced by the reveal process |
//! | [`reveal`] | Per-image `Loading → Transitioning → Complete` state machine |
//! | [`timeline`] | Virtual clock and ordered timer queue |
//! | [`registry`] | Element tracking, layout coalescing, picker drags, notifications |
//! | [`stamp`] | Measure image files and compute their blurhash |
//! | [`config`] | `focus.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Inverted Vertical Axis
//!
//! Focus `y` grows *upwards*, like a math plot, while screen coordinates grow
//! downwards. The sign flip happens in exactly two places: the vertical
//! branch of [`geometry::compute_shift`] and the picker mapping in
//! [`geometry::pointer_to_focus`]. Both have tests pinned to the direction.
//!
//! ## No Timers Inside the Library
//!
//! The crossfade needs delays (a paint delay, then the CSS transition). The
//! reveal controller returns them as values and the registry queues them on
//! a [`timeline::Timeline`] driven by the host's clock. Tests advance time
//! explicitly; nothing sleeps.
//!
//! ## "Not Yet Computable" Is Not an Error
//!
//! Images report zero size until they load and containers until they lay
//! out. Geometry returns `None` for those inputs and the registry retries on
//! the next signal, logging at trace level only.

pub mod codec;
pub mod config;
pub mod focus;
pub mod geometry;
pub mod output;
pub mod placeholder;
pub mod registry;
pub mod reveal;
pub mod stamp;
pub mod style;
pub mod timeline;

pub use codec::{CodecError, decode, encode};
pub use focus::{Fit, FocusDescriptor, FocusPoint};
pub use registry::{Attribute, ElementId, FocusChange, FocusRegistry};

#[cfg(test)]
pub(crate) mod test_helpers;
