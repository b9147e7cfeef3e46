//! Integration tests for replaying touch scripts from disk.

use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use touchgesture::replay::{ReplayError, ReplayStep};
use touchgesture::{
    GestureConfig, GestureEvent, GestureRecorder, SwipeDirection, TouchInput, TouchInputDispatcher,
    TouchScript,
};

fn write_script(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Test a script that waits long enough for a long press.
#[test]
fn test_replay_long_press() {
    let file = write_script(
        r#"{
            "name": "long press",
            "steps": [
                { "step": "touch", "event": "down", "x": 40, "y": 40, "time_ms": 0 },
                { "step": "wait", "ms": 300 },
                { "step": "touch", "event": "up", "x": 40, "y": 40, "time_ms": 300 }
            ]
        }"#,
    );

    let script = TouchScript::load(file.path()).unwrap();
    let config = GestureConfig::default().with_hold_timeout(Duration::from_millis(100));
    let dispatcher = TouchInputDispatcher::with_config(config);
    let recorder = GestureRecorder::new();
    dispatcher.register_handler(Box::new(recorder.clone()));

    let summary = script.play(&dispatcher);
    assert_eq!(summary.applied, 3);
    assert_eq!(summary.rejected, 0);

    let gestures: Vec<_> = recorder
        .events()
        .into_iter()
        .filter(|e| e.is_gesture())
        .collect();
    assert_eq!(
        gestures,
        vec![GestureEvent::LongPress {
            position: glam::Vec2::new(40.0, 40.0),
            pointers: 1
        }]
    );
}

/// Test a swipe script using coordinate updates.
#[test]
fn test_replay_swipe_with_updates() {
    let file = write_script(
        r#"{
            "steps": [
                { "step": "dpi", "value": 160 },
                { "step": "touch", "event": "down", "x": 300, "y": 500, "time_ms": 0, "size": 10 },
                { "step": "update", "x": 300, "y": 420, "time_ms": 30 },
                { "step": "touch", "event": "move", "x": 300, "y": 420, "time_ms": 30 },
                { "step": "update", "x": 302, "y": 320, "time_ms": 60 },
                { "step": "touch", "event": "move", "x": 302, "y": 320, "time_ms": 60 },
                { "step": "touch", "event": "up", "x": 302, "y": 320, "time_ms": 90 }
            ]
        }"#,
    );

    let script = TouchScript::load(file.path()).unwrap();
    assert!(matches!(
        script.steps[2],
        ReplayStep::Update { pointer: 0, .. }
    ));

    let dispatcher = TouchInputDispatcher::new();
    let recorder = GestureRecorder::new();
    dispatcher.register_handler(Box::new(recorder.clone()));

    let summary = script.play(&dispatcher);
    assert_eq!(summary.rejected, 0);
    assert_eq!(
        recorder.count(|e| matches!(
            e,
            GestureEvent::Swipe {
                direction: SwipeDirection::UP,
                pointers: 1,
                ..
            }
        )),
        1
    );
}

/// Test that a recorded script survives writing to disk.
#[test]
fn test_script_written_and_loaded() {
    let script = TouchScript {
        name: Some("tap".to_string()),
        steps: vec![
            ReplayStep::Touch {
                event: TouchInput::Down,
                x: 10.0,
                y: 20.0,
                time_ms: 0,
                pointer: 0,
                size: 0.0,
            },
            ReplayStep::Touch {
                event: TouchInput::Up,
                x: 10.0,
                y: 20.0,
                time_ms: 30,
                pointer: 0,
                size: 0.0,
            },
        ],
    };

    let file = write_script(&script.to_json_string().unwrap());
    assert_eq!(TouchScript::load(file.path()).unwrap(), script);
}

/// Test that broken script files report a parse error.
#[test]
fn test_broken_script_file() {
    let file = write_script(r#"{ "steps": [ { "step": "jump" } ] }"#);
    assert!(matches!(
        TouchScript::load(file.path()),
        Err(ReplayError::ParseError(_))
    ));
}
