//! Rotation detection.
//!
//! Measures the signed angle between the vector joining two pointers in
//! the previous frame and in the current one, and accumulates it for the
//! lifetime of the two-pointer contact.

use super::{GestureDetector, PointerSlots};
use crate::actions::ActionForwarder;
use crate::input::touch::Pointer;
use glam::DVec2;

/// Recognizes two pointers turning around each other.
pub struct RotateDetector {
    actions: ActionForwarder,
    slots: PointerSlots,
    /// Accumulated rotation in degrees
    angle: f64,
}

impl RotateDetector {
    pub fn new(actions: ActionForwarder) -> Self {
        Self {
            actions,
            slots: PointerSlots::default(),
            angle: 0.0,
        }
    }

    /// Accumulated rotation in degrees.
    pub fn angle(&self) -> f32 {
        self.angle as f32
    }
}

/// Signed angle in degrees from `from` to `to`, `None` when undefined.
fn signed_angle(from: DVec2, to: DVec2) -> Option<f64> {
    let length = from.length() * to.length();
    if length <= 0.0 {
        return None;
    }

    let angle = (from.dot(to) / length).acos().to_degrees();
    if angle.is_nan() {
        return None;
    }

    let cross = from.x * to.y - to.x * from.y;
    Some(if cross < 0.0 { -angle } else { angle })
}

impl GestureDetector for RotateDetector {
    fn name(&self) -> &'static str {
        "rotate"
    }

    fn on_touch_down(&mut self, index: usize, pointer: &Pointer) -> bool {
        if !self.slots.press(index, pointer) {
            return false;
        }
        self.angle = 0.0;
        true
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

        let last = first.last.pos().as_dvec2() - second.last.pos().as_dvec2();
        let current = first.current.pos().as_dvec2() - second.current.pos().as_dvec2();
        let center = (first.current.pos() + second.current.pos()) / 2.0;

        let step = signed_angle(last, current);
        self.slots.settle();

        match step {
            Some(step) if step != 0.0 => {
                self.angle += step;
                tracing::trace!(step, total = self.angle, "Rotate frame");
                self.actions.rotate(center, self.angle as f32);
                true
            }
            _ => false,
        }
    }

    fn is_done(&self) -> bool {
        self.slots.finished()
    }
}
