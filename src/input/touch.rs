//! Touch samples and tracked pointers.
//!
//! Provides the value types the dispatcher and the gesture detectors
//! share: a single timestamped [`Touch`] sample and a [`Pointer`] that
//! remembers where a contact went down, where it was last seen and
//! where it is now.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Maximum number of simultaneously tracked pointers.
pub const MAX_POINTERS: usize = 2;

const NANOS_PER_SECOND: f32 = 1_000_000_000.0;

/// Raw touch event kinds delivered by a platform adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchInput {
    /// The platform cancelled the whole touch sequence
    Abort,
    /// A pointer touched the screen
    Down,
    /// A pointer was lifted
    Up,
    /// A pointer moved
    Move,
}

impl std::fmt::Display for TouchInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TouchInput::Abort => write!(f, "Abort"),
            TouchInput::Down => write!(f, "Down"),
            TouchInput::Up => write!(f, "Up"),
            TouchInput::Move => write!(f, "Move"),
        }
    }
}

/// A touch event with named fields, for callers that prefer it over the
/// positional `handle_touch_input` signature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchSample {
    /// Event kind
    pub event: TouchInput,
    /// Horizontal position in pixels
    pub x: f32,
    /// Vertical position in pixels
    pub y: f32,
    /// Monotonic timestamp in nanoseconds
    pub time: i64,
    /// Pointer index
    #[serde(default)]
    pub pointer: i32,
    /// Contact radius reported by the device, 0 if unknown
    #[serde(default)]
    pub size: f32,
}

impl TouchSample {
    /// Create a sample for the primary pointer with unknown contact size.
    pub fn new(event: TouchInput, x: f32, y: f32, time: i64) -> Self {
        Self {
            event,
            x,
            y,
            time,
            pointer: 0,
            size: 0.0,
        }
    }

    /// Set the pointer index.
    pub fn with_pointer(mut self, pointer: i32) -> Self {
        self.pointer = pointer;
        self
    }

    /// Set the contact size.
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }
}

/// A single timestamped touch position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    /// Horizontal position in pixels
    pub x: f32,
    /// Vertical position in pixels
    pub y: f32,
    /// Monotonic timestamp in nanoseconds
    pub time: i64,
}

impl Default for Touch {
    fn default() -> Self {
        Self::INVALID
    }
}

impl Touch {
    /// A touch that fails [`Touch::valid`].
    pub const INVALID: Touch = Touch {
        x: -1.0,
        y: -1.0,
        time: -1,
    };

    /// Create a new touch sample.
    pub fn new(x: f32, y: f32, time: i64) -> Self {
        Self { x, y, time }
    }

    /// Whether this sample holds real data.
    pub fn valid(&self) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.time >= 0
    }

    /// Position as a vector.
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Reset to the invalid sample.
    pub fn reset(&mut self) {
        *self = Self::INVALID;
    }
}

/// State of one tracked contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    /// Where the contact went down
    pub down: Touch,
    /// Previous position
    pub last: Touch,
    /// Current position
    pub current: Touch,
    /// Whether the contact travelled further than its own size from `down`
    pub moving: bool,
    /// Contact radius in pixels
    pub size: f32,
}

impl Default for Pointer {
    fn default() -> Self {
        Self {
            down: Touch::INVALID,
            last: Touch::INVALID,
            current: Touch::INVALID,
            moving: false,
            size: 0.0,
        }
    }
}

impl Pointer {
    /// Whether the pointer is currently down.
    pub fn valid(&self) -> bool {
        self.down.valid()
    }

    /// Forget everything about this pointer.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Start tracking a contact at `touch`.
    pub fn press(&mut self, touch: Touch, size: f32) {
        self.down = touch;
        self.last = touch;
        self.current = touch;
        self.moving = false;
        self.size = size;
    }

    /// Distance travelled from `down` to `current`.
    pub fn travel(&self) -> f32 {
        (self.current.pos() - self.down.pos()).length()
    }

    /// Mark the pointer as moving once it left its own contact area.
    ///
    /// Returns `true` only on the transition.
    pub fn refresh_moving(&mut self) -> bool {
        if self.moving || !self.valid() {
            return false;
        }
        if self.travel() > self.size {
            self.moving = true;
            return true;
        }
        false
    }

    /// Velocity in pixels per second, measured from `last` or from `down`.
    ///
    /// `None` when no time has passed between the two samples.
    pub fn velocity(&self, from_last: bool) -> Option<Vec2> {
        let from = if from_last { self.last } else { self.down };
        let elapsed = self.current.time - from.time;
        if elapsed <= 0 {
            return None;
        }

        let seconds = elapsed as f32 / NANOS_PER_SECOND;
        Some((self.current.pos() - from.pos()) / seconds)
    }

    /// Offset between `current` and `last`.
    pub fn delta(&self) -> Vec2 {
        self.current.pos() - self.last.pos()
    }

    /// Offset between `current` and `down`.
    pub fn total_delta(&self) -> Vec2 {
        self.current.pos() - self.down.pos()
    }

    /// Time in nanoseconds since the contact went down.
    pub fn duration(&self) -> i64 {
        self.current.time - self.down.time
    }
}
