//! Progressive reveal: placeholder → crossfade → real image.
//!
//! One [`RevealController`] per tracked image. It never sleeps or spawns;
//! when it needs to act later it hands back a [`RevealTimer`] and the owner
//! fires it once the delay has elapsed (see [`crate::timeline`]).
//!
//! ```text
//!            load signal              PAINT_DELAY           crossfade done
//! Loading ───────────────► Transitioning ────► (crossfade) ─────────────► Complete
//!    ▲                                                                      │
//!    └──────────────────────────── source changed ──────────────────────────┘
//! ```
//!
//! The short paint delay guarantees the placeholder has been drawn before the
//! background is swapped; without it the real image pops in instead of
//! fading.
//!
//! Every timer carries the controller's *generation*. A source change bumps
//! the generation, so timers scheduled for the previous source arrive stale
//! and do nothing.

use crate::focus::FocusDescriptor;
use crate::geometry::{Shift, Size, compute_shift};
use crate::placeholder::PlaceholderBackend;
use crate::style::{
    Background, CROSSFADE_DELAY_MS, CROSSFADE_DURATION_MS, ImageStyle, ObjectPosition,
};
use std::time::Duration;
use thiserror::Error;

/// Delay between the load signal and the start of the crossfade.
pub const PAINT_DELAY: Duration = Duration::from_millis(10);

/// Delay between the crossfade starting and the real image taking over.
pub const COMPLETE_DELAY: Duration =
    Duration::from_millis(CROSSFADE_DELAY_MS + CROSSFADE_DURATION_MS + 10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevealState {
    Loading,
    Transitioning,
    Complete,
}

/// Shift or placeholder work attempted before the image or its container
/// has a measurable size. Expected while loading; retry on the next signal.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("image or container dimensions are not known yet")]
pub struct NotYetComputable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Swap the background to the real source and start the fade.
    Crossfade,
    /// Fade finished: show the real image in place.
    Complete,
}

/// A continuation the owner must fire after `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTimer {
    pub generation: u64,
    pub kind: TimerKind,
    pub delay: Duration,
}

/// Everything the controller looks at on one layout pass.
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    /// Source identity of the image (its `src`).
    pub src: &'a str,
    pub focus: &'a FocusDescriptor,
    /// Rendered box of the element.
    pub container: Size,
    /// The load-complete signal has arrived for `src`.
    pub loaded: bool,
}

#[derive(Debug)]
pub struct RevealController {
    state: RevealState,
    generation: u64,
    source: Option<String>,
    /// Hash the current placeholder was rendered from. Outer `None` means
    /// nothing has been installed since the last reset.
    installed_hash: Option<Option<String>>,
    placeholder: Option<String>,
    shift: Shift,
    style: ImageStyle,
}

impl Default for RevealController {
    fn default() -> Self {
        Self::new()
    }
}

impl RevealController {
    pub fn new() -> Self {
        Self {
            state: RevealState::Loading,
            generation: 0,
            source: None,
            installed_hash: None,
            placeholder: None,
            shift: Shift::CENTER,
            style: ImageStyle::default(),
        }
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn style(&self) -> &ImageStyle {
        &self.style
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// The rendered placeholder URI, if one is installed.
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Apply one layout pass.
    ///
    /// Returns a timer to schedule when this pass started the transition.
    /// Calling it again with unchanged inputs changes nothing.
    pub fn observe<B: PlaceholderBackend>(
        &mut self,
        obs: &Observation<'_>,
        backend: &mut B,
    ) -> Result<Option<RevealTimer>, NotYetComputable> {
        if self.source.as_deref() != Some(obs.src) {
            self.reset(obs.src);
        }

        let shift = compute_shift(obs.focus, obs.container).ok_or(NotYetComputable)?;
        self.shift = shift;
        self.style.object_fit = obs.focus.fit;
        self.style.background_position = shift;

        if self.state != RevealState::Complete
            && self.installed_hash.as_ref() != Some(&obs.focus.blurhash)
        {
            self.install_placeholder(obs.focus, backend);
        }

        match self.state {
            RevealState::Loading if obs.loaded => {
                self.state = RevealState::Transitioning;
                log::debug!("{}: loading → transitioning", obs.src);
                return Ok(Some(self.timer(TimerKind::Crossfade, PAINT_DELAY)));
            }
            RevealState::Complete => {
                self.style.object_position = ObjectPosition::At(shift);
            }
            _ => {}
        }
        Ok(None)
    }

    /// Fire a timer previously returned by [`observe`](Self::observe) or
    /// [`fire`](Self::fire). Returns the follow-up timer, if any.
    ///
    /// Stale timers (from before a source change) and timers that no longer
    /// match the current state are ignored.
    pub fn fire(&mut self, timer: RevealTimer) -> Option<RevealTimer> {
        if timer.generation != self.generation {
            log::debug!(
                "ignoring stale {:?} timer (generation {} != {})",
                timer.kind,
                timer.generation,
                self.generation
            );
            return None;
        }

        match (timer.kind, self.state) {
            (TimerKind::Crossfade, RevealState::Transitioning) => {
                let source = self.source.clone()?;
                self.style.background = Background::Crossfade { source };
                Some(self.timer(TimerKind::Complete, COMPLETE_DELAY))
            }
            (TimerKind::Complete, RevealState::Transitioning) => {
                self.state = RevealState::Complete;
                self.style.object_position = ObjectPosition::At(self.shift);
                self.style.background = Background::None;
                self.placeholder = None;
                log::debug!(
                    "{}: transitioning → complete",
                    self.source.as_deref().unwrap_or_default()
                );
                None
            }
            _ => None,
        }
    }

    /// Start over for a new source: hide the image, forget the placeholder,
    /// invalidate outstanding timers.
    pub fn reset(&mut self, src: &str) {
        if self.source.is_some() {
            log::debug!("source changed to {src}; resetting reveal");
        }
        self.source = Some(src.to_string());
        self.state = RevealState::Loading;
        self.generation += 1;
        self.installed_hash = None;
        self.placeholder = None;
        self.style.object_position = ObjectPosition::Hidden;
        self.style.background = Background::None;
    }

    fn install_placeholder<B: PlaceholderBackend>(
        &mut self,
        focus: &FocusDescriptor,
        backend: &mut B,
    ) {
        let uri = focus.blurhash.as_deref().and_then(|hash| {
            backend
                .render(hash, focus.width, focus.height)
                .map_err(|e| log::warn!("no placeholder: {e}"))
                .ok()
        });
        self.installed_hash = Some(focus.blurhash.clone());
        self.placeholder = uri.clone();
        // Once the crossfade has started the real image is the background;
        // the new placeholder is kept but not shown.
        if !matches!(self.style.background, Background::Crossfade { .. }) {
            self.style.background = Background::Placeholder(uri);
        }
    }

    fn timer(&self, kind: TimerKind, delay: Duration) -> RevealTimer {
        RevealTimer {
            generation: self.generation,
            kind,
            delay,
        }
    }
}
