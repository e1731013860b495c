//! Tracks focused images and routes host signals to their controllers.
//!
//! The host owns the real elements. It tells the registry what happened
//! (an element appeared, was resized, had an attribute rewritten, finished
//! loading, was dragged) and reads back the style to apply. The registry
//! never calls into the host.
//!
//! | Host signal | Method |
//! |---|---|
//! | element appears / disappears | [`observe`](FocusRegistry::observe) / [`unobserve`](FocusRegistry::unobserve) |
//! | resize | [`resize`](FocusRegistry::resize) |
//! | attribute rewritten | [`attribute_changed`](FocusRegistry::attribute_changed) |
//! | image loaded | [`load_complete`](FocusRegistry::load_complete) |
//! | animation frame | [`frame`](FocusRegistry::frame) |
//! | clock tick | [`advance_to`](FocusRegistry::advance_to) |
//! | pointer drag | [`begin_drag`](FocusRegistry::begin_drag) / [`drag_to`](FocusRegistry::drag_to) / [`end_drag`](FocusRegistry::end_drag) |
//!
//! Layout work is coalesced: any number of signals between two frames cause
//! at most one recomputation per element. Descriptor changes are published to
//! every [`subscribe`](FocusRegistry::subscribe)d channel as [`FocusChange`].

use crate::codec;
use crate::focus::{FocusDescriptor, FocusPoint};
use crate::geometry::{Point, Rect, Size, focus_to_pointer, pointer_to_focus};
use crate::placeholder::PlaceholderBackend;
use crate::reveal::{Observation, RevealController, RevealState, RevealTimer};
use crate::style::ImageStyle;
use crate::timeline::Timeline;
use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

/// Host-assigned identity of a tracked element.
pub type ElementId = u64;

/// An attribute the host saw change.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// The encoded focus attribute; `None` when it was removed.
    Focus(Option<String>),
    /// The image source.
    Src(String),
}

/// Published whenever an element's descriptor changes.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusChange {
    pub id: ElementId,
    pub descriptor: FocusDescriptor,
}

/// Result of a drag sample: the new descriptor and the string the host
/// should write back to the focus attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Picked {
    pub descriptor: FocusDescriptor,
    pub encoded: String,
}

#[derive(Debug, Default)]
struct PickerSession {
    dragging: bool,
}

#[derive(Debug)]
struct Tracked {
    /// Distinguishes this registration from an earlier one with the same id.
    instance: u64,
    src: String,
    encoded: Option<String>,
    focus: FocusDescriptor,
    container: Size,
    loaded: bool,
    layout_pending: bool,
    reveal: RevealController,
    picker: Option<PickerSession>,
}

#[derive(Debug)]
struct PendingTimer {
    id: ElementId,
    instance: u64,
    timer: RevealTimer,
}

pub struct FocusRegistry<B> {
    backend: B,
    elements: HashMap<ElementId, Tracked>,
    layout_queue: VecDeque<ElementId>,
    timeline: Timeline<PendingTimer>,
    subscribers: Vec<Sender<FocusChange>>,
    next_instance: u64,
}

impl<B: PlaceholderBackend> FocusRegistry<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            elements: HashMap::new(),
            layout_queue: VecDeque::new(),
            timeline: Timeline::new(),
            subscribers: Vec::new(),
            next_instance: 0,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.timeline.now()
    }

    /// Timers waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.timeline.len()
    }

    /// Start tracking `id`, or update an element already tracked.
    pub fn observe(&mut self, id: ElementId, src: impl Into<String>, focus: Option<&str>) {
        let src = src.into();
        if self.elements.contains_key(&id) {
            self.attribute_changed(id, Attribute::Src(src));
            self.attribute_changed(id, Attribute::Focus(focus.map(str::to_string)));
            return;
        }

        let instance = self.next_instance;
        self.next_instance += 1;
        self.elements.insert(
            id,
            Tracked {
                instance,
                src,
                encoded: focus.map(str::to_string),
                focus: decode_or_default(id, focus),
                container: Size::default(),
                loaded: false,
                layout_pending: false,
                reveal: RevealController::new(),
                picker: None,
            },
        );
        log::debug!("tracking element {id}");
        self.request_layout(id);
    }

    /// Stop tracking `id`. Its pending timers never fire.
    pub fn unobserve(&mut self, id: ElementId) -> bool {
        if self.elements.remove(&id).is_none() {
            return false;
        }
        let dropped = self.timeline.cancel_where(|t| t.id == id);
        log::debug!("untracked element {id} ({dropped} timers dropped)");
        true
    }

    pub fn resize(&mut self, id: ElementId, width: f64, height: f64) {
        let Some(el) = self.elements.get_mut(&id) else {
            return;
        };
        el.container = Size::new(width, height);
        self.request_layout(id);
    }

    pub fn attribute_changed(&mut self, id: ElementId, attribute: Attribute) {
        let Some(el) = self.elements.get_mut(&id) else {
            return;
        };
        match attribute {
            Attribute::Src(src) => {
                if el.src == src {
                    return;
                }
                // Reset now: timers armed for the old source must not fire
                // before the next frame gets to it.
                el.reveal.reset(&src);
                el.src = src;
                el.loaded = false;
                let dropped = self.timeline.cancel_where(|t| t.id == id);
                log::debug!("element {id}: source changed ({dropped} timers dropped)");
            }
            Attribute::Focus(encoded) => {
                if el.encoded == encoded {
                    return;
                }
                let focus = decode_or_default(id, encoded.as_deref());
                el.encoded = encoded;
                if el.focus == focus {
                    return;
                }
                el.focus = focus.clone();
                self.publish(FocusChange {
                    id,
                    descriptor: focus,
                });
            }
        }
        self.request_layout(id);
    }

    /// The host finished loading the element's current source.
    pub fn load_complete(&mut self, id: ElementId) {
        let Some(el) = self.elements.get_mut(&id) else {
            return;
        };
        if el.loaded {
            return;
        }
        el.loaded = true;
        self.request_layout(id);
    }

    /// Run every pending layout. Returns how many elements were laid out.
    pub fn frame(&mut self) -> usize {
        let mut ran = 0;
        while let Some(id) = self.layout_queue.pop_front() {
            let Some(el) = self.elements.get_mut(&id) else {
                continue;
            };
            if !el.layout_pending {
                continue;
            }
            el.layout_pending = false;
            ran += 1;

            if el.picker.is_some() {
                continue;
            }
            let obs = Observation {
                src: &el.src,
                focus: &el.focus,
                container: el.container,
                loaded: el.loaded,
            };
            match el.reveal.observe(&obs, &mut self.backend) {
                Ok(Some(timer)) => {
                    let instance = el.instance;
                    self.timeline.schedule(
                        timer.delay,
                        PendingTimer {
                            id,
                            instance,
                            timer,
                        },
                    );
                }
                Ok(None) => {}
                Err(e) => log::trace!("element {id}: {e}"),
            }
        }
        ran
    }

    /// Advance the virtual clock to `now`, firing every timer that falls due.
    /// Returns how many timers fired.
    pub fn advance_to(&mut self, now: Duration) -> usize {
        let mut fired = 0;
        while let Some((_, pending)) = self.timeline.pop_due(now) {
            fired += 1;
            let Some(el) = self.elements.get_mut(&pending.id) else {
                continue;
            };
            if el.instance != pending.instance {
                continue;
            }
            if let Some(next) = el.reveal.fire(pending.timer) {
                self.timeline.schedule(
                    next.delay,
                    PendingTimer {
                        timer: next,
                        ..pending
                    },
                );
            }
        }
        fired
    }

    pub fn advance_by(&mut self, delta: Duration) -> usize {
        self.advance_to(self.timeline.now() + delta)
    }

    pub fn style(&self, id: ElementId) -> Option<&ImageStyle> {
        self.elements.get(&id).map(|el| el.reveal.style())
    }

    pub fn state(&self, id: ElementId) -> Option<RevealState> {
        self.elements.get(&id).map(|el| el.reveal.state())
    }

    pub fn descriptor(&self, id: ElementId) -> Option<&FocusDescriptor> {
        self.elements.get(&id).map(|el| &el.focus)
    }

    /// The focus attribute as last seen or written.
    pub fn encoded(&self, id: ElementId) -> Option<&str> {
        self.elements.get(&id).and_then(|el| el.encoded.as_deref())
    }

    /// Receive every subsequent [`FocusChange`]. Dropping the receiver
    /// unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<FocusChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Turn `id` into an editable picker. Picker elements are left alone by
    /// the reveal process. Returns `false` if `id` is not tracked.
    pub fn attach_picker(&mut self, id: ElementId) -> bool {
        let Some(el) = self.elements.get_mut(&id) else {
            return false;
        };
        if el.picker.is_none() {
            el.picker = Some(PickerSession::default());
            log::debug!("picker attached to element {id}");
        }
        true
    }

    pub fn detach_picker(&mut self, id: ElementId) {
        if let Some(el) = self.elements.get_mut(&id)
            && el.picker.take().is_some()
        {
            log::debug!("picker detached from element {id}");
            self.request_layout(id);
        }
    }

    pub fn is_picker(&self, id: ElementId) -> bool {
        self.elements.get(&id).is_some_and(|el| el.picker.is_some())
    }

    /// Pointer pressed on a picker. Applies the first sample.
    pub fn begin_drag(&mut self, id: ElementId, pointer: Point, bbox: Rect) -> Option<Picked> {
        let session = self.elements.get_mut(&id)?.picker.as_mut()?;
        session.dragging = true;
        self.drag_to(id, pointer, bbox)
    }

    /// A pointer sample during a drag. Samples outside a drag are ignored.
    pub fn drag_to(&mut self, id: ElementId, pointer: Point, bbox: Rect) -> Option<Picked> {
        let el = self.elements.get_mut(&id)?;
        if !el.picker.as_ref().is_some_and(|p| p.dragging) {
            return None;
        }
        let intrinsic = Size::from((el.focus.width, el.focus.height));
        let Some(point) = pointer_to_focus(pointer, bbox, intrinsic) else {
            log::trace!("element {id}: picker box or image size not known yet");
            return None;
        };

        el.focus.point = point;
        let encoded = codec::encode(&el.focus);
        el.encoded = Some(encoded.clone());
        let descriptor = el.focus.clone();
        self.publish(FocusChange {
            id,
            descriptor: descriptor.clone(),
        });
        Some(Picked {
            descriptor,
            encoded,
        })
    }

    pub fn end_drag(&mut self, id: ElementId) {
        if let Some(session) = self.elements.get_mut(&id).and_then(|el| el.picker.as_mut()) {
            session.dragging = false;
        }
    }

    /// Where the picker handle belongs inside `bbox` for the current focus.
    pub fn handle_position(&self, id: ElementId, bbox: Rect) -> Option<Point> {
        let el = self.elements.get(&id)?;
        let intrinsic = Size::from((el.focus.width, el.focus.height));
        focus_to_pointer(el.focus.point, bbox, intrinsic)
    }

    fn request_layout(&mut self, id: ElementId) {
        if let Some(el) = self.elements.get_mut(&id)
            && !el.layout_pending
        {
            el.layout_pending = true;
            self.layout_queue.push_back(id);
        }
    }

    fn publish(&mut self, change: FocusChange) {
        self.subscribers
            .retain(|tx| tx.send(change.clone()).is_ok());
    }
}

fn decode_or_default(id: ElementId, encoded: Option<&str>) -> FocusDescriptor {
    let Some(encoded) = encoded else {
        return FocusDescriptor::default();
    };
    codec::decode(encoded).unwrap_or_else(|e| {
        log::warn!("element {id}: {e}; using default focus");
        FocusDescriptor::default()
    })
}
