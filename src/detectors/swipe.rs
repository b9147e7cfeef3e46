//! Swipe detection.
//!
//! Every direction starts out possible. Each movement prunes the set: a
//! step backwards against a direction rules it out, and so does drifting
//! too far sideways from its axis. A direction counts as travelled once the
//! displacement along its axis passes the minimum distance. When the last
//! pointer lifts quickly enough and a travelled direction survived, the
//! swipe is reported.

use super::{GestureDetector, PointerSlots};
use crate::actions::ActionForwarder;
use crate::config::SwipeSettings;
use crate::input::dpi::ScreenDpi;
use crate::input::gestures::SwipeDirection;
use crate::input::touch::Pointer;
use glam::Vec2;

/// Recognizes fast straight movements.
pub struct SwipeDetector {
    actions: ActionForwarder,
    dpi: ScreenDpi,
    settings: SwipeSettings,
    slots: PointerSlots,
    /// Directions not ruled out yet
    directions: SwipeDirection,
    /// Axes along which the minimum distance was travelled
    travelled: SwipeDirection,
    /// Most pointers down at the same time
    pointers: usize,
    done: bool,
}

impl SwipeDetector {
    pub fn new(actions: ActionForwarder, dpi: ScreenDpi, settings: SwipeSettings) -> Self {
        Self {
            actions,
            dpi,
            settings,
            slots: PointerSlots::default(),
            directions: SwipeDirection::empty(),
            travelled: SwipeDirection::empty(),
            pointers: 0,
            done: false,
        }
    }

    /// Directions still possible.
    pub fn directions(&self) -> SwipeDirection {
        self.directions
    }

    /// Directions both possible and travelled far enough.
    pub fn detected(&self) -> SwipeDirection {
        self.directions & self.travelled
    }

    fn prune(&mut self, index: usize) {
        let Some(pointer) = self.slots.get(index) else {
            return;
        };

        // Rule out anything this step moved away from.
        let step = pointer.current.pos() - pointer.last.pos();
        self.directions
            .remove(SwipeDirection::heading(step).opposite());

        let total = pointer.total_delta().abs();
        let dpi = self.dpi.get();

        if total.y > self.settings.max_deviation(total.x, dpi) {
            self.directions.remove(SwipeDirection::HORIZONTAL);
        }
        if total.x > self.settings.max_deviation(total.y, dpi) {
            self.directions.remove(SwipeDirection::VERTICAL);
        }

        let min_distance = self.settings.min_distance(dpi);
        if total.x > min_distance {
            self.travelled |= SwipeDirection::HORIZONTAL;
        }
        if total.y > min_distance {
            self.travelled |= SwipeDirection::VERTICAL;
        }

        tracing::trace!(
            index,
            directions = %self.directions,
            travelled = %self.travelled,
            "Swipe candidates updated"
        );
    }
}

impl GestureDetector for SwipeDetector {
    fn name(&self) -> &'static str {
        "swipe"
    }

    fn on_touch_down(&mut self, index: usize, pointer: &Pointer) -> bool {
        if self.done {
            return false;
        }

        let first = self.slots.active() == 0;
        if !self.slots.press(index, pointer) {
            return false;
        }
        if first {
            self.directions = SwipeDirection::all();
            self.travelled = SwipeDirection::empty();
        }
        self.pointers = self.pointers.max(self.slots.active());
        true
    }

    fn on_touch_up(&mut self, index: usize, pointer: &Pointer) -> bool {
        if self.done || !self.slots.track(index, pointer) {
            return false;
        }
        self.prune(index);

        if self.slots.active() > 1 {
            self.slots.lift(index);
            return true;
        }

        self.done = true;
        let detected = self.detected();
        let Some(lifted) = self.slots.get(index).copied() else {
            return false;
        };
        self.slots.lift(index);

        if detected.is_empty() || lifted.duration() > self.settings.max_duration_nanos() {
            tracing::trace!(
                %detected,
                duration_ns = lifted.duration(),
                "No swipe recognized"
            );
            return true;
        }

        let velocity = lifted.velocity(false).unwrap_or(Vec2::ZERO);
        tracing::debug!(direction = %detected, pointers = self.pointers, "Swipe recognized");
        self.actions.swipe(
            detected,
            lifted.down.pos(),
            lifted.current.pos(),
            velocity,
            self.pointers,
        );
        true
    }

    fn on_touch_move(&mut self, index: usize, pointer: &Pointer) -> bool {
        if self.done || !self.slots.track(index, pointer) {
            return false;
        }
        self.prune(index);
        true
    }

    fn is_done(&self) -> bool {
        self.done
    }
}
