//! Pinch (zoom) detection.
//!
//! Compares the current distance between two pointers with their distance
//! when they went down. The zoom factor is reported around the midpoint of
//! the two down positions.

use super::{GestureDetector, PointerSlots};
use crate::actions::ActionForwarder;
use crate::input::touch::Pointer;

/// Recognizes two pointers moving towards or away from each other.
pub struct PinchDetector {
    actions: ActionForwarder,
    slots: PointerSlots,
}

impl PinchDetector {
    pub fn new(actions: ActionForwarder) -> Self {
        Self {
            actions,
            slots: PointerSlots::default(),
        }
    }
}

impl GestureDetector for PinchDetector {
    fn name(&self) -> &'static str {
        "pinch"
    }

    fn on_touch_down(&mut self, index: usize, pointer: &Pointer) -> bool {
        self.slots.press(index, pointer)
    }

    fn on_touch_up(&mut self, index: usize, _pointer: &Pointer) -> bool {
        if self.slots.get(index).is_some_and(|p| p.valid()) {
            self.slots.lift(index);
            return true;
        }
        false
    }

    fn on_touch_move(&mut self, index: usize, pointer: &Pointer) -> bool {
        if !self.slots.track(index, pointer) {
            return false;
        }

        let Some((first, second)) = self.slots.pair() else {
            return false;
        };
        if !(first.moving || second.moving) {
            return false;
        }

        let base = (first.down.pos() - second.down.pos()).length();
        if base <= f32::EPSILON {
            return false;
        }

        let current = (first.current.pos() - second.current.pos()).length();
        let center = (first.down.pos() + second.down.pos()) / 2.0;
        let zoom = current / base;

        tracing::trace!(zoom, base, current, "Pinch frame");
        self.actions.zoom_pinch(center, zoom);
        true
    }

    fn is_done(&self) -> bool {
        self.slots.finished()
    }
}
