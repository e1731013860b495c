//! Typed inline style for a focused image.
//!
//! [`ImageStyle`] is what the reveal process *produces*; a host turns it into
//! real style properties with [`ImageStyle::declarations`]. Keeping it typed
//! lets tests assert on "hidden" or "showing the placeholder" instead of
//! string-matching CSS.

use crate::focus::Fit;
use crate::geometry::Shift;
use crate::placeholder::TRANSPARENT_PIXEL;
use std::fmt::Write as _;

/// Crossfade length for the background swap, in milliseconds.
pub const CROSSFADE_DURATION_MS: u64 = 320;

/// Delay before the crossfade starts, in milliseconds.
pub const CROSSFADE_DELAY_MS: u64 = 280;

/// Off-frame object position used to hide the real image while the
/// placeholder shows through the background.
pub const HIDDEN_POSITION: &str = "-1000vw";

/// Where the real image content sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectPosition {
    /// Pushed out of the visible crop window.
    Hidden,
    At(Shift),
}

/// The background layer stack.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Background {
    /// No background image.
    #[default]
    None,
    /// Showing the placeholder. `None` is the transparent pixel: no hash, or
    /// an undecodable one.
    Placeholder(Option<String>),
    /// Crossfading from the placeholder to the real source.
    Crossfade { source: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageStyle {
    pub object_fit: Fit,
    pub object_position: ObjectPosition,
    pub background: Background,
    pub background_position: Shift,
}

impl Default for ImageStyle {
    fn default() -> Self {
        Self {
            object_fit: Fit::Cover,
            object_position: ObjectPosition::Hidden,
            background: Background::None,
            background_position: Shift::CENTER,
        }
    }
}

impl ImageStyle {
    pub fn is_hidden(&self) -> bool {
        self.object_position == ObjectPosition::Hidden
    }

    /// CSS property/value pairs, in a stable order.
    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        let position = match self.object_position {
            ObjectPosition::Hidden => HIDDEN_POSITION.to_string(),
            ObjectPosition::At(shift) => shift.to_string(),
        };
        let background_image = match &self.background {
            Background::None => String::new(),
            Background::Placeholder(uri) => {
                css_url(uri.as_deref().unwrap_or(TRANSPARENT_PIXEL))
            }
            Background::Crossfade { source } => css_url(source),
        };
        vec![
            ("object-fit", self.object_fit.to_string()),
            ("object-position", position),
            ("background-image", background_image),
            ("background-position", self.background_position.to_string()),
            ("background-size", self.object_fit.to_string()),
            ("background-repeat", "no-repeat".to_string()),
            ("transition", transition()),
        ]
    }

    /// All declarations as one `style` attribute value. Empty values are
    /// skipped.
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for (property, value) in self.declarations() {
            if value.is_empty() {
                continue;
            }
            if !css.is_empty() {
                css.push(' ');
            }
            let _ = write!(css, "{property}: {value};");
        }
        css
    }
}

fn transition() -> String {
    format!("background-image {CROSSFADE_DURATION_MS}ms ease-in-out {CROSSFADE_DELAY_MS}ms")
}

fn css_url(uri: &str) -> String {
    format!("url(\"{}\")", uri.replace('"', "%22"))
}
