//! Recording gesture consumer.
//!
//! Stores every callback it receives as a [`GestureEvent`] in a shared log
//! so the sequence can be inspected after the fact.

use super::ActionHandler;
use crate::input::gestures::SwipeDirection;
use glam::Vec2;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One consumer notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GestureEvent {
    TouchAbort,
    SingleTouchStart {
        position: Vec2,
    },
    SingleTouchHold {
        position: Vec2,
    },
    SingleTouchMove {
        position: Vec2,
        offset: Vec2,
        velocity: Vec2,
    },
    SingleTouchEnd {
        position: Vec2,
    },
    MultiTouchStart {
        position: Vec2,
        pointers: usize,
    },
    MultiTouchDown {
        position: Vec2,
        pointer: usize,
    },
    MultiTouchHold {
        position: Vec2,
        pointers: usize,
    },
    MultiTouchMove {
        position: Vec2,
        offset: Vec2,
        velocity: Vec2,
        pointer: usize,
    },
    MultiTouchUp {
        position: Vec2,
        pointer: usize,
    },
    GestureStart {
        position: Vec2,
    },
    GesturePan {
        position: Vec2,
        offset: Vec2,
        velocity: Vec2,
    },
    GestureEnd {
        position: Vec2,
        offset: Vec2,
        velocity: Vec2,
    },
    Tap {
        position: Vec2,
        pointers: usize,
    },
    LongPress {
        position: Vec2,
        pointers: usize,
    },
    Swipe {
        direction: SwipeDirection,
        from: Vec2,
        to: Vec2,
        velocity: Vec2,
        pointers: usize,
    },
    ZoomPinch {
        center: Vec2,
        zoom: f32,
    },
    Rotate {
        center: Vec2,
        angle: f32,
    },
}

impl GestureEvent {
    /// Whether this is one of the high-level convenience gestures rather
    /// than a raw phase notification.
    pub fn is_gesture(&self) -> bool {
        matches!(
            self,
            GestureEvent::Tap { .. }
                | GestureEvent::LongPress { .. }
                | GestureEvent::Swipe { .. }
                | GestureEvent::ZoomPinch { .. }
                | GestureEvent::Rotate { .. }
        )
    }
}

/// An [`ActionHandler`] that records everything it is told.
///
/// Clones share the same log, so one clone can be registered while another
/// is kept for inspection.
#[derive(Debug, Clone)]
pub struct GestureRecorder {
    events: Arc<Mutex<Vec<GestureEvent>>>,
    /// Answer given to callbacks that report "handled"
    handled: bool,
}

impl Default for GestureRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureRecorder {
    /// Create a recorder that reports every callback as handled.
    pub fn new() -> Self {
        Self {
            events: Arc::default(),
            handled: true,
        }
    }

    /// Create a recorder that reports every callback as not handled.
    pub fn unhandled() -> Self {
        Self {
            handled: false,
            ..Self::new()
        }
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<GestureEvent> {
        self.lock().clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<GestureEvent> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of recorded events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&GestureEvent) -> bool) -> usize {
        self.lock().iter().filter(|&event| predicate(event)).count()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<GestureEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, event: GestureEvent) {
        tracing::debug!(?event, "Gesture recorded");
        self.lock().push(event);
    }

    fn answer(&self, event: GestureEvent) -> bool {
        self.record(event);
        self.handled
    }
}

impl ActionHandler for GestureRecorder {
    fn on_touch_abort(&mut self) {
        self.record(GestureEvent::TouchAbort);
    }

    fn on_single_touch_start(&mut self, position: Vec2) -> bool {
        self.answer(GestureEvent::SingleTouchStart { position })
    }

    fn on_single_touch_hold(&mut self, position: Vec2) -> bool {
        self.answer(GestureEvent::SingleTouchHold { position })
    }

    fn on_single_touch_move(&mut self, position: Vec2, offset: Vec2, velocity: Vec2) -> bool {
        self.answer(GestureEvent::SingleTouchMove {
            position,
            offset,
            velocity,
        })
    }

    fn on_single_touch_end(&mut self, position: Vec2) -> bool {
        self.answer(GestureEvent::SingleTouchEnd { position })
    }

    fn on_multi_touch_start(&mut self, position: Vec2, pointers: usize) -> bool {
        self.answer(GestureEvent::MultiTouchStart { position, pointers })
    }

    fn on_multi_touch_down(&mut self, position: Vec2, pointer: usize) -> bool {
        self.answer(GestureEvent::MultiTouchDown { position, pointer })
    }

    fn on_multi_touch_hold(&mut self, position: Vec2, pointers: usize) -> bool {
        self.answer(GestureEvent::MultiTouchHold { position, pointers })
    }

    fn on_multi_touch_move(
        &mut self,
        position: Vec2,
        offset: Vec2,
        velocity: Vec2,
        pointer: usize,
    ) -> bool {
        self.answer(GestureEvent::MultiTouchMove {
            position,
            offset,
            velocity,
            pointer,
        })
    }

    fn on_multi_touch_up(&mut self, position: Vec2, pointer: usize) -> bool {
        self.answer(GestureEvent::MultiTouchUp { position, pointer })
    }

    fn on_touch_gesture_start(&mut self, position: Vec2) -> bool {
        self.answer(GestureEvent::GestureStart { position })
    }

    fn on_touch_gesture_pan(&mut self, position: Vec2, offset: Vec2, velocity: Vec2) -> bool {
        self.answer(GestureEvent::GesturePan {
            position,
            offset,
            velocity,
        })
    }

    fn on_touch_gesture_end(&mut self, position: Vec2, offset: Vec2, velocity: Vec2) -> bool {
        self.answer(GestureEvent::GestureEnd {
            position,
            offset,
            velocity,
        })
    }

    fn on_tap(&mut self, position: Vec2, pointers: usize) {
        self.record(GestureEvent::Tap { position, pointers });
    }

    fn on_long_press(&mut self, position: Vec2, pointers: usize) {
        self.record(GestureEvent::LongPress { position, pointers });
    }

    fn on_swipe(
        &mut self,
        direction: SwipeDirection,
        from: Vec2,
        to: Vec2,
        velocity: Vec2,
        pointers: usize,
    ) {
        self.record(GestureEvent::Swipe {
            direction,
            from,
            to,
            velocity,
            pointers,
        });
    }

    fn on_zoom_pinch(&mut self, center: Vec2, zoom: f32) {
        self.record(GestureEvent::ZoomPinch { center, zoom });
    }

    fn on_rotate(&mut self, center: Vec2, angle: f32) {
        self.record(GestureEvent::Rotate { center, angle });
    }
}
