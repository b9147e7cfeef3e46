//! TouchGesture - multi-touch gesture recognition
//!
//! Turns a stream of raw per-pointer touch events into high-level gestures:
//! tap, long press, pan, swipe, pinch zoom and rotation. Recognized
//! gestures are delivered to a registered [`ActionHandler`].
//!
//! ```
//! use touchgesture::{GestureRecorder, TouchInput, TouchInputDispatcher};
//!
//! let dispatcher = TouchInputDispatcher::new();
//! let recorder = GestureRecorder::new();
//! dispatcher.register_handler(Box::new(recorder.clone()));
//!
//! dispatcher.handle_touch_input(TouchInput::Down, 100.0, 100.0, 0, 0, 0.0);
//! dispatcher.handle_touch_input(TouchInput::Up, 100.0, 100.0, 40_000_000, 0, 0.0);
//! assert_eq!(recorder.len(), 3);
//! ```

pub mod actions;
pub mod config;
pub mod detectors;
pub mod input;
pub mod replay;

// Re-export commonly used types
pub use actions::{ActionForwarder, ActionHandler, GestureEvent, GestureRecorder};
pub use config::{GestureConfig, SwipeSettings};
pub use detectors::GestureDetector;
pub use input::{GestureState, SwipeDirection, TouchInput, TouchInputDispatcher};
pub use replay::{ReplaySummary, TouchScript};
