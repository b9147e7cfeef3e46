//! Touch input handling.
//!
//! Raw pointer events enter through [`TouchInputDispatcher`], which tracks
//! up to [`MAX_POINTERS`] contacts, runs the gesture state machine and
//! drives the hold timer.

pub mod dispatcher;
pub mod dpi;
pub mod gestures;
pub mod hold_timer;
pub mod touch;

// Re-export types
pub use dispatcher::TouchInputDispatcher;
pub use dpi::ScreenDpi;
pub use gestures::{GestureState, SwipeDirection};
pub use touch::{Pointer, Touch, TouchInput, TouchSample, MAX_POINTERS};
