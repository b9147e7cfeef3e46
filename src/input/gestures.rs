//! Gesture vocabulary shared by the dispatcher, the detectors and consumers.
//!
//! Provides the overall gesture state and the swipe direction set.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Overall gesture state tracked by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GestureState {
    /// No contact, or nothing recognized yet
    #[default]
    Unknown,
    /// One pointer down, not moving
    SingleTouch,
    /// One pointer held down past the hold timeout
    SingleTouchHold,
    /// One pointer dragging
    Pan,
    /// A second pointer joined
    MultiTouchStart,
    /// Two pointers held down past the hold timeout
    MultiTouchHold,
    /// Two pointers moving
    MultiTouch,
    /// One of two pointers was lifted
    MultiTouchDone,
}

impl GestureState {
    /// Whether this state is part of a two-pointer gesture.
    pub fn is_multi_touch(&self) -> bool {
        matches!(
            self,
            GestureState::MultiTouchStart
                | GestureState::MultiTouchHold
                | GestureState::MultiTouch
                | GestureState::MultiTouchDone
        )
    }
}

impl std::fmt::Display for GestureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GestureState::Unknown => write!(f, "Unknown"),
            GestureState::SingleTouch => write!(f, "SingleTouch"),
            GestureState::SingleTouchHold => write!(f, "SingleTouchHold"),
            GestureState::Pan => write!(f, "Pan"),
            GestureState::MultiTouchStart => write!(f, "MultiTouchStart"),
            GestureState::MultiTouchHold => write!(f, "MultiTouchHold"),
            GestureState::MultiTouch => write!(f, "MultiTouch"),
            GestureState::MultiTouchDone => write!(f, "MultiTouchDone"),
        }
    }
}

bitflags! {
    /// Set of swipe directions still considered possible.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct SwipeDirection: u8 {
        const LEFT = 0b0001;
        const RIGHT = 0b0010;
        const UP = 0b0100;
        const DOWN = 0b1000;

        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        const VERTICAL = Self::UP.bits() | Self::DOWN.bits();
    }
}

impl SwipeDirection {
    /// Directions a movement by `delta` is heading (screen coordinates, y down).
    pub fn heading(delta: Vec2) -> Self {
        let mut heading = SwipeDirection::empty();
        if delta.x > 0.0 {
            heading |= SwipeDirection::RIGHT;
        } else if delta.x < 0.0 {
            heading |= SwipeDirection::LEFT;
        }
        if delta.y > 0.0 {
            heading |= SwipeDirection::DOWN;
        } else if delta.y < 0.0 {
            heading |= SwipeDirection::UP;
        }
        heading
    }

    /// The direction on each axis opposite to this set.
    pub fn opposite(self) -> Self {
        let mut opposite = SwipeDirection::empty();
        if self.contains(SwipeDirection::LEFT) {
            opposite |= SwipeDirection::RIGHT;
        }
        if self.contains(SwipeDirection::RIGHT) {
            opposite |= SwipeDirection::LEFT;
        }
        if self.contains(SwipeDirection::UP) {
            opposite |= SwipeDirection::DOWN;
        }
        if self.contains(SwipeDirection::DOWN) {
            opposite |= SwipeDirection::UP;
        }
        opposite
    }
}

impl std::fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "None");
        }

        let names: Vec<&str> = self.iter_names().map(|(name, _)| name).collect();
        write!(f, "{}", names.join("|"))
    }
}
