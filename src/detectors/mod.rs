//! Gesture detectors.
//!
//! A detector recognizes one gesture family from the same per-pointer
//! touch stream the dispatcher sees. Each keeps its own copy of the
//! pointers it tracks and reports through a shared [`ActionForwarder`].
//!
//! Detectors are created together when the primary pointer goes down and
//! are discarded once [`GestureDetector::is_done`] reports that every
//! tracked pointer was lifted.

pub mod pinch;
pub mod rotate;
pub mod swipe;

use crate::actions::ActionForwarder;
use crate::config::SwipeSettings;
use crate::input::dpi::ScreenDpi;
use crate::input::touch::{Pointer, MAX_POINTERS};

pub use pinch::PinchDetector;
pub use rotate::RotateDetector;
pub use swipe::SwipeDetector;

/// A unit recognizing one gesture family.
///
/// `index` is the dispatcher's pointer slot and `pointer` its current view
/// of that pointer. Methods return whether the notification was used.
pub trait GestureDetector: Send {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// A pointer went down.
    fn on_touch_down(&mut self, index: usize, pointer: &Pointer) -> bool;

    /// A pointer was lifted.
    fn on_touch_up(&mut self, index: usize, pointer: &Pointer) -> bool;

    /// A pointer moved.
    fn on_touch_move(&mut self, index: usize, pointer: &Pointer) -> bool;

    /// A pointer's coordinates were refreshed outside of a move event.
    fn on_touch_update(&mut self, _index: usize, _pointer: &Pointer) -> bool {
        true
    }

    /// Whether every tracked pointer was lifted.
    fn is_done(&self) -> bool;
}

/// Build the swipe, pinch and rotate detectors for a new gesture.
pub fn standard_set(
    actions: &ActionForwarder,
    dpi: &ScreenDpi,
    swipe: &SwipeSettings,
) -> Vec<Box<dyn GestureDetector>> {
    vec![
        Box::new(SwipeDetector::new(actions.clone(), dpi.clone(), swipe.clone())),
        Box::new(PinchDetector::new(actions.clone())),
        Box::new(RotateDetector::new(actions.clone())),
    ]
}

/// A detector's private copy of up to [`MAX_POINTERS`] pointers.
#[derive(Debug, Clone, Default)]
pub(crate) struct PointerSlots {
    slots: [Pointer; MAX_POINTERS],
    /// Whether any pointer was ever pressed
    started: bool,
}

impl PointerSlots {
    pub(crate) fn get(&self, index: usize) -> Option<&Pointer> {
        self.slots.get(index)
    }

    /// Number of pointers currently down.
    pub(crate) fn active(&self) -> usize {
        self.slots.iter().filter(|p| p.valid()).count()
    }

    /// Both slots hold a pointer that is down.
    pub(crate) fn pair(&self) -> Option<(&Pointer, &Pointer)> {
        let [first, second] = &self.slots;
        (first.valid() && second.valid()).then_some((first, second))
    }

    /// All pointers were lifted after at least one went down.
    pub(crate) fn finished(&self) -> bool {
        self.started && self.active() == 0
    }

    /// Start tracking `pointer` in slot `index`.
    pub(crate) fn press(&mut self, index: usize, pointer: &Pointer) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        *slot = *pointer;
        slot.last = slot.down;
        slot.current = slot.down;
        self.started = true;
        true
    }

    /// Follow a tracked pointer to its new position.
    pub(crate) fn track(&mut self, index: usize, pointer: &Pointer) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) if slot.valid() => {
                slot.last = slot.current;
                slot.current = pointer.current;
                slot.moving |= pointer.moving;
                true
            }
            _ => false,
        }
    }

    /// Make the current positions the reference for the next movement.
    pub(crate) fn settle(&mut self) {
        for slot in self.slots.iter_mut().filter(|p| p.valid()) {
            slot.last = slot.current;
        }
    }

    /// Stop tracking slot `index`; the second pointer takes over slot 0
    /// when the primary is lifted.
    pub(crate) fn lift(&mut self, index: usize) {
        if index >= MAX_POINTERS {
            return;
        }
        self.slots[index].reset();
        if index == 0 && self.slots[1].valid() {
            self.slots[0] = self.slots[1];
            self.slots[1].reset();
        }
    }
}
