//! Unit tests for the touch dispatcher state machine.

use glam::Vec2;
use touchgesture::{GestureEvent, GestureRecorder, GestureState, TouchInput, TouchInputDispatcher};

const MS: i64 = 1_000_000;

fn setup() -> (TouchInputDispatcher, GestureRecorder) {
    let dispatcher = TouchInputDispatcher::new();
    let recorder = GestureRecorder::new();
    dispatcher.register_handler(Box::new(recorder.clone()));
    (dispatcher, recorder)
}

/// Test that a short stationary touch is a single tap.
#[test]
fn test_tap() {
    let (input, recorder) = setup();

    assert!(input.handle_touch_input(TouchInput::Down, 300.0, 400.0, 0, 0, 0.0));
    assert!(input.handle_touch_input(TouchInput::Up, 300.0, 400.0, 80 * MS, 0, 0.0));

    assert_eq!(
        recorder.events(),
        vec![
            GestureEvent::SingleTouchStart {
                position: Vec2::new(300.0, 400.0)
            },
            GestureEvent::SingleTouchEnd {
                position: Vec2::new(300.0, 400.0)
            },
            GestureEvent::Tap {
                position: Vec2::new(300.0, 400.0),
                pointers: 1
            },
        ]
    );
    assert_eq!(input.gesture_state(), GestureState::Unknown);
}

/// Test that jitter within the contact size still taps.
#[test]
fn test_tap_with_jitter() {
    let (input, recorder) = setup();

    input.handle_touch_input(TouchInput::Down, 300.0, 400.0, 0, 0, 12.0);
    input.handle_touch_input(TouchInput::Move, 305.0, 396.0, 20 * MS, 0, 0.0);
    input.handle_touch_input(TouchInput::Move, 302.0, 398.0, 40 * MS, 0, 0.0);
    input.handle_touch_input(TouchInput::Up, 302.0, 398.0, 60 * MS, 0, 0.0);

    assert_eq!(recorder.count(|e| matches!(e, GestureEvent::Tap { pointers: 1, .. })), 1);
    assert_eq!(recorder.count(|e| matches!(e, GestureEvent::GestureStart { .. })), 0);
}

/// Test that abort always returns to the initial state.
#[test]
fn test_abort_from_every_phase() {
    let (input, recorder) = setup();

    // From pan
    input.handle_touch_input(TouchInput::Down, 100.0, 100.0, 0, 0, 0.0);
    input.handle_touch_input(TouchInput::Move, 200.0, 100.0, 10 * MS, 0, 0.0);
    assert_eq!(input.gesture_state(), GestureState::Pan);
    assert!(input.handle_touch_input(TouchInput::Abort, 0.0, 0.0, 20 * MS, 0, 0.0));
    assert_eq!(input.gesture_state(), GestureState::Unknown);
    assert_eq!(input.active_detectors(), 0);

    // From multi-touch done
    input.handle_touch_input(TouchInput::Down, 100.0, 100.0, 30 * MS, 0, 0.0);
    input.handle_touch_input(TouchInput::Down, 200.0, 100.0, 40 * MS, 1, 0.0);
    input.handle_touch_input(TouchInput::Up, 200.0, 100.0, 50 * MS, 1, 0.0);
    assert_eq!(input.gesture_state(), GestureState::MultiTouchDone);
    assert!(input.handle_touch_input(TouchInput::Abort, 0.0, 0.0, 60 * MS, 0, 0.0));
    assert_eq!(input.gesture_state(), GestureState::Unknown);
    assert_eq!(input.active_detectors(), 0);

    // From idle
    assert!(input.handle_touch_input(TouchInput::Abort, 0.0, 0.0, 70 * MS, 0, 0.0));

    assert_eq!(recorder.count(|e| *e == GestureEvent::TouchAbort), 3);
    assert_eq!(recorder.count(|e| matches!(e, GestureEvent::Tap { .. })), 0);
}

/// Test that pointers beyond the tracked range never mutate state.
#[test]
fn test_out_of_range_pointer_rejected() {
    let (input, recorder) = setup();
    input.handle_touch_input(TouchInput::Down, 100.0, 100.0, 0, 0, 0.0);
    input.handle_touch_input(TouchInput::Down, 200.0, 100.0, MS, 1, 0.0);
    let before = (input.pointer(0), input.pointer(1), recorder.len());

    for event in [TouchInput::Down, TouchInput::Move, TouchInput::Up] {
        assert!(!input.handle_touch_input(event, 50.0, 50.0, 2 * MS, 2, 0.0));
        assert!(!input.handle_touch_input(event, 50.0, 50.0, 2 * MS, -1, 0.0));
    }
    assert!(!input.update_touch_pointer(2, 50.0, 50.0, 2 * MS, 0.0));

    assert_eq!(input.gesture_state(), GestureState::MultiTouchStart);
    assert_eq!((input.pointer(0), input.pointer(1), recorder.len()), before);
    assert!(input.pointer(2).is_none());
}

/// Test that a duplicate secondary down leaves the tracked pointer alone.
#[test]
fn test_duplicate_secondary_down_dropped() {
    let (input, _) = setup();
    input.handle_touch_input(TouchInput::Down, 100.0, 100.0, 0, 0, 0.0);
    input.handle_touch_input(TouchInput::Down, 200.0, 100.0, MS, 1, 0.0);
    let secondary = input.pointer(1);

    assert!(!input.handle_touch_input(TouchInput::Down, 300.0, 100.0, 2 * MS, 1, 0.0));
    assert_eq!(input.pointer(1), secondary);
}

/// Test that repeating the same coordinate update changes nothing.
#[test]
fn test_update_is_idempotent() {
    let (input, recorder) = setup();
    input.handle_touch_input(TouchInput::Down, 100.0, 100.0, 0, 0, 0.0);

    for _ in 0..5 {
        assert!(input.update_touch_pointer(0, 104.0, 102.0, 10 * MS, 0.0));
    }

    assert_eq!(input.gesture_state(), GestureState::SingleTouch);
    assert_eq!(recorder.len(), 1);
    let pointer = input.pointer(0).unwrap();
    assert_eq!(pointer.current.pos(), Vec2::new(104.0, 102.0));
    assert_eq!(pointer.last, pointer.current);
    assert!(!pointer.moving);
}

/// Test that an update followed by a move drives the pan.
#[test]
fn test_update_then_move_pans() {
    let (input, recorder) = setup();
    input.handle_touch_input(TouchInput::Down, 100.0, 100.0, 0, 0, 0.0);

    assert!(input.update_touch_pointer(0, 160.0, 100.0, 30 * MS, 0.0));
    assert!(input.pointer(0).unwrap().moving);
    assert_eq!(input.gesture_state(), GestureState::SingleTouch);

    input.handle_touch_input(TouchInput::Move, 160.0, 100.0, 30 * MS, 0, 0.0);
    assert_eq!(input.gesture_state(), GestureState::Pan);
    assert_eq!(recorder.count(|e| matches!(e, GestureEvent::GestureStart { .. })), 1);
}

/// Test that updating a pointer that is not down is rejected.
#[test]
fn test_update_unknown_pointer() {
    let (input, _) = setup();
    assert!(!input.update_touch_pointer(0, 1.0, 1.0, 0, 0.0));
    assert!(!input.update_touch_pointer(0, 1.0, 1.0, -5, 0.0));
}

/// Test that the DPI drives the default contact size.
#[test]
fn test_screen_dpi() {
    let (input, _) = setup();
    assert_eq!(input.screen_dpi(), 160.0);
    assert!(input.set_screen_dpi(320.0));
    assert!(!input.set_screen_dpi(f32::NAN));
    assert!(!input.set_screen_dpi(0.0));
    assert_eq!(input.screen_dpi(), 320.0);

    input.handle_touch_input(TouchInput::Down, 10.0, 10.0, 0, 0, 0.0);
    assert_eq!(input.pointer(0).unwrap().size, 40.0);
}

/// Test that a new primary down restarts recognition.
#[test]
fn test_primary_down_restarts() {
    let (input, recorder) = setup();
    input.handle_touch_input(TouchInput::Down, 100.0, 100.0, 0, 0, 0.0);
    input.handle_touch_input(TouchInput::Move, 200.0, 100.0, 10 * MS, 0, 0.0);
    assert_eq!(input.gesture_state(), GestureState::Pan);

    input.handle_touch_input(TouchInput::Down, 50.0, 50.0, 20 * MS, 0, 0.0);
    assert_eq!(input.gesture_state(), GestureState::SingleTouch);
    assert_eq!(input.active_detectors(), 3);
    assert_eq!(input.pointer(0).unwrap().down.pos(), Vec2::new(50.0, 50.0));
    assert_eq!(recorder.count(|e| matches!(e, GestureEvent::SingleTouchStart { .. })), 2);
}

/// Test that events work without any registered handler.
#[test]
fn test_without_handler() {
    let input = TouchInputDispatcher::new();
    assert!(input.handle_touch_input(TouchInput::Down, 10.0, 10.0, 0, 0, 0.0));
    assert!(input.handle_touch_input(TouchInput::Up, 10.0, 10.0, MS, 0, 0.0));
    assert!(input.unregister_handler().is_none());
}
