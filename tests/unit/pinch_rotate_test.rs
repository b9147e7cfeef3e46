//! Unit tests for pinch and rotate recognition through the dispatcher.

use glam::Vec2;
use touchgesture::{GestureEvent, GestureRecorder, GestureState, TouchInput, TouchInputDispatcher};

const MS: i64 = 1_000_000;

fn setup() -> (TouchInputDispatcher, GestureRecorder) {
    let dispatcher = TouchInputDispatcher::new();
    let recorder = GestureRecorder::new();
    dispatcher.register_handler(Box::new(recorder.clone()));
    (dispatcher, recorder)
}

fn last_zoom(recorder: &GestureRecorder) -> Option<(Vec2, f32)> {
    recorder.events().into_iter().rev().find_map(|e| match e {
        GestureEvent::ZoomPinch { center, zoom } => Some((center, zoom)),
        _ => None,
    })
}

fn last_rotation(recorder: &GestureRecorder) -> Option<(Vec2, f32)> {
    recorder.events().into_iter().rev().find_map(|e| match e {
        GestureEvent::Rotate { center, angle } => Some((center, angle)),
        _ => None,
    })
}

/// Test that spreading two fingers reports the distance ratio.
#[test]
fn test_pinch_out() {
    let (input, recorder) = setup();

    input.handle_touch_input(TouchInput::Down, 100.0, 100.0, 0, 0, 0.0);
    input.handle_touch_input(TouchInput::Down, 200.0, 100.0, 10 * MS, 1, 0.0);
    input.handle_touch_input(TouchInput::Move, 50.0, 100.0, 50 * MS, 0, 0.0);
    input.handle_touch_input(TouchInput::Move, 250.0, 100.0, 50 * MS, 1, 0.0);

    assert_eq!(input.gesture_state(), GestureState::MultiTouch);
    let (center, zoom) = last_zoom(&recorder).expect("no zoom reported");
    assert_eq!(center, Vec2::new(150.0, 100.0));
    assert!((zoom - 2.0).abs() < 1e-5);

    // Collinear movement never rotates.
    assert!(last_rotation(&recorder).is_none());
}

/// Test that pinching in reports a factor below one.
#[test]
fn test_pinch_in() {
    let (input, recorder) = setup();

    input.handle_touch_input(TouchInput::Down, 100.0, 200.0, 0, 0, 0.0);
    input.handle_touch_input(TouchInput::Down, 100.0, 600.0, 10 * MS, 1, 0.0);
    input.handle_touch_input(TouchInput::Move, 100.0, 300.0, 50 * MS, 0, 0.0);
    input.handle_touch_input(TouchInput::Move, 100.0, 400.0, 50 * MS, 1, 0.0);

    let (_, zoom) = last_zoom(&recorder).expect("no zoom reported");
    assert!((zoom - 0.25).abs() < 1e-5);
}

/// Test that turning two fingers accumulates the rotation angle.
#[test]
fn test_rotate_quarter_turn() {
    let (input, recorder) = setup();
    let center = Vec2::new(300.0, 300.0);
    let radius = 100.0_f32;

    input.handle_touch_input(TouchInput::Down, center.x + radius, center.y, 0, 0, 0.0);
    input.handle_touch_input(TouchInput::Down, center.x - radius, center.y, MS, 1, 0.0);

    let steps = 18;
    for step in 1..=steps {
        let angle = (90.0_f32 * step as f32 / steps as f32).to_radians();
        let offset = Vec2::new(angle.cos(), angle.sin()) * radius;
        let time = (10 + step as i64 * 10) * MS;
        let first = center + offset;
        let second = center - offset;
        input.handle_touch_input(TouchInput::Move, first.x, first.y, time, 0, 0.0);
        input.handle_touch_input(TouchInput::Move, second.x, second.y, time, 1, 0.0);
    }

    let (rotation_center, angle) = last_rotation(&recorder).expect("no rotation reported");
    assert!((angle - 90.0).abs() < 1e-3, "angle was {angle}");
    assert!((rotation_center - center).length() < 1e-3);

    // Distance is preserved, so any zoom stays at one.
    if let Some((_, zoom)) = last_zoom(&recorder) {
        assert!((zoom - 1.0).abs() < 1e-4);
    }
}

/// Test that a single finger never pinches or rotates.
#[test]
fn test_single_pointer_has_no_multi_gestures() {
    let (input, recorder) = setup();

    input.handle_touch_input(TouchInput::Down, 100.0, 100.0, 0, 0, 0.0);
    input.handle_touch_input(TouchInput::Move, 300.0, 300.0, 50 * MS, 0, 0.0);
    input.handle_touch_input(TouchInput::Up, 300.0, 300.0, 900 * MS, 0, 0.0);

    assert!(last_zoom(&recorder).is_none());
    assert!(last_rotation(&recorder).is_none());
}
