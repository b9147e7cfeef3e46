//! Gesture consumer interface and the forwarding layer in front of it.
//!
//! Consumers implement [`ActionHandler`] and register it with the
//! dispatcher. The dispatcher and every detector talk to the consumer
//! only through an [`ActionForwarder`], which answers "handled" on the
//! consumer's behalf when nothing is registered.

pub mod recorder;

use crate::input::gestures::SwipeDirection;
use glam::Vec2;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use recorder::{GestureEvent, GestureRecorder};

/// Callbacks for recognized touch gestures.
///
/// Every method has a default body, so a consumer only overrides what it
/// cares about. Methods returning `bool` report whether the consumer
/// handled the notification; the defaults report `true`.
///
/// Callbacks run while the dispatcher's state lock is held, on either the
/// input thread or the hold-timer thread. They must not call back into the
/// dispatcher.
pub trait ActionHandler: Send {
    /// The touch sequence was cancelled.
    fn on_touch_abort(&mut self) {}

    /// A single pointer went down.
    fn on_single_touch_start(&mut self, _position: Vec2) -> bool {
        true
    }

    /// A single pointer stayed down past the hold timeout.
    fn on_single_touch_hold(&mut self, _position: Vec2) -> bool {
        true
    }

    /// A held single pointer moved.
    fn on_single_touch_move(&mut self, _position: Vec2, _offset: Vec2, _velocity: Vec2) -> bool {
        true
    }

    /// A single pointer was lifted without panning.
    fn on_single_touch_end(&mut self, _position: Vec2) -> bool {
        true
    }

    /// A second pointer joined a single touch.
    fn on_multi_touch_start(&mut self, _position: Vec2, _pointers: usize) -> bool {
        true
    }

    /// An additional pointer went down.
    fn on_multi_touch_down(&mut self, _position: Vec2, _pointer: usize) -> bool {
        true
    }

    /// Two pointers stayed down past the hold timeout.
    fn on_multi_touch_hold(&mut self, _position: Vec2, _pointers: usize) -> bool {
        true
    }

    /// One of several pointers moved.
    fn on_multi_touch_move(
        &mut self,
        _position: Vec2,
        _offset: Vec2,
        _velocity: Vec2,
        _pointer: usize,
    ) -> bool {
        true
    }

    /// One of several pointers was lifted.
    fn on_multi_touch_up(&mut self, _position: Vec2, _pointer: usize) -> bool {
        true
    }

    /// A single pointer started panning from `position`.
    fn on_touch_gesture_start(&mut self, _position: Vec2) -> bool {
        true
    }

    /// A panning pointer moved by `offset` since the last event.
    fn on_touch_gesture_pan(&mut self, _position: Vec2, _offset: Vec2, _velocity: Vec2) -> bool {
        true
    }

    /// A gesture ended; `offset` is measured from where the pointer went down.
    fn on_touch_gesture_end(&mut self, _position: Vec2, _offset: Vec2, _velocity: Vec2) -> bool {
        true
    }

    /// A short touch without movement.
    fn on_tap(&mut self, _position: Vec2, _pointers: usize) {}

    /// A touch held without movement past the hold timeout.
    fn on_long_press(&mut self, _position: Vec2, _pointers: usize) {}

    /// A fast straight movement.
    fn on_swipe(
        &mut self,
        _direction: SwipeDirection,
        _from: Vec2,
        _to: Vec2,
        _velocity: Vec2,
        _pointers: usize,
    ) {
    }

    /// Two pointers changed their distance; `zoom` is relative to the initial distance.
    fn on_zoom_pinch(&mut self, _center: Vec2, _zoom: f32) {}

    /// Two pointers rotated; `angle` is the accumulated rotation in degrees.
    fn on_rotate(&mut self, _center: Vec2, _angle: f32) {}
}

type HandlerSlot = Option<Box<dyn ActionHandler>>;

/// Shared single-slot holder for the registered consumer.
///
/// Cloning yields another handle to the same slot; the dispatcher and all
/// of its detectors hold one each.
#[derive(Clone, Default)]
pub struct ActionForwarder {
    slot: Arc<Mutex<HandlerSlot>>,
}

impl std::fmt::Debug for ActionForwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionForwarder")
            .field("registered", &self.is_registered())
            .finish()
    }
}

impl ActionForwarder {
    /// Create an empty forwarder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler`, replacing any previous one.
    pub fn register(&self, handler: Box<dyn ActionHandler>) {
        let replaced = self.lock().replace(handler).is_some();
        tracing::debug!(replaced, "Action handler registered");
    }

    /// Remove the registered handler, returning it.
    pub fn unregister(&self) -> Option<Box<dyn ActionHandler>> {
        let previous = self.lock().take();
        if previous.is_some() {
            tracing::debug!("Action handler unregistered");
        }
        previous
    }

    /// Whether a handler is registered.
    pub fn is_registered(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, HandlerSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handled(&self, call: impl FnOnce(&mut dyn ActionHandler) -> bool) -> bool {
        match self.lock().as_deref_mut() {
            Some(handler) => call(handler),
            None => true,
        }
    }

    fn notify(&self, call: impl FnOnce(&mut dyn ActionHandler)) {
        if let Some(handler) = self.lock().as_deref_mut() {
            call(handler);
        }
    }

    pub fn touch_abort(&self) {
        self.notify(|h| h.on_touch_abort());
    }

    pub fn single_touch_start(&self, position: Vec2) -> bool {
        self.handled(|h| h.on_single_touch_start(position))
    }

    pub fn single_touch_hold(&self, position: Vec2) -> bool {
        self.handled(|h| h.on_single_touch_hold(position))
    }

    pub fn single_touch_move(&self, position: Vec2, offset: Vec2, velocity: Vec2) -> bool {
        self.handled(|h| h.on_single_touch_move(position, offset, velocity))
    }

    pub fn single_touch_end(&self, position: Vec2) -> bool {
        self.handled(|h| h.on_single_touch_end(position))
    }

    pub fn multi_touch_start(&self, position: Vec2, pointers: usize) -> bool {
        self.handled(|h| h.on_multi_touch_start(position, pointers))
    }

    pub fn multi_touch_down(&self, position: Vec2, pointer: usize) -> bool {
        self.handled(|h| h.on_multi_touch_down(position, pointer))
    }

    pub fn multi_touch_hold(&self, position: Vec2, pointers: usize) -> bool {
        self.handled(|h| h.on_multi_touch_hold(position, pointers))
    }

    pub fn multi_touch_move(
        &self,
        position: Vec2,
        offset: Vec2,
        velocity: Vec2,
        pointer: usize,
    ) -> bool {
        self.handled(|h| h.on_multi_touch_move(position, offset, velocity, pointer))
    }

    pub fn multi_touch_up(&self, position: Vec2, pointer: usize) -> bool {
        self.handled(|h| h.on_multi_touch_up(position, pointer))
    }

    pub fn touch_gesture_start(&self, position: Vec2) -> bool {
        self.handled(|h| h.on_touch_gesture_start(position))
    }

    pub fn touch_gesture_pan(&self, position: Vec2, offset: Vec2, velocity: Vec2) -> bool {
        self.handled(|h| h.on_touch_gesture_pan(position, offset, velocity))
    }

    pub fn touch_gesture_end(&self, position: Vec2, offset: Vec2, velocity: Vec2) -> bool {
        self.handled(|h| h.on_touch_gesture_end(position, offset, velocity))
    }

    pub fn tap(&self, position: Vec2, pointers: usize) {
        self.notify(|h| h.on_tap(position, pointers));
    }

    pub fn long_press(&self, position: Vec2, pointers: usize) {
        self.notify(|h| h.on_long_press(position, pointers));
    }

    pub fn swipe(
        &self,
        direction: SwipeDirection,
        from: Vec2,
        to: Vec2,
        velocity: Vec2,
        pointers: usize,
    ) {
        self.notify(|h| h.on_swipe(direction, from, to, velocity, pointers));
    }

    pub fn zoom_pinch(&self, center: Vec2, zoom: f32) {
        self.notify(|h| h.on_zoom_pinch(center, zoom));
    }

    pub fn rotate(&self, center: Vec2, angle: f32) {
        self.notify(|h| h.on_rotate(center, angle));
    }
}
