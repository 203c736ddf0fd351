//! Replay tests: recorded JSON-lines sessions through the frame loop into
//! the JSON sink, plus config files feeding the engine.

use std::io::Write;

use hand_pointer::actions::{JsonSink, RecordingSink};
use hand_pointer::config::{Config, ConfigError};
use hand_pointer::gesture::{GestureConfig, ScreenBounds, Session};
use hand_pointer::input::FrameReader;
use hand_pointer::run_loop::{run, RunError, Timing};

const SCREEN: ScreenBounds = ScreenBounds {
    width: 1000,
    height: 500,
};

/// 21-point MediaPipe frame with the thumb tip at (0.3, 0.6) and the index
/// tip at `index`. Every other point sits far from the thumb.
fn mediapipe_line(t: f64, index: (f64, f64)) -> String {
    let points: Vec<String> = (0..21)
        .map(|i| match i {
            4 => "[0.3, 0.6]".to_string(),
            8 => format!("[{}, {}]", index.0, index.1),
            _ => format!("[0.9, {}]", 0.04 * i as f64),
        })
        .collect();
    format!(r#"{{"t": {}, "landmarks": [{}]}}"#, t, points.join(", "))
}

fn session() -> Session {
    let mut config = GestureConfig::for_screen(SCREEN);
    config.smoothing_factor = 1.0;
    Session::new(config)
}

fn replay_json(input: &str) -> Result<Vec<String>, RunError> {
    let mut session = session();
    let mut sink = JsonSink::new(Vec::new());
    run(
        FrameReader::new(input.as_bytes()),
        &mut session,
        &mut sink,
        Timing::Stream,
        || false,
    )?;
    let out = String::from_utf8(sink.into_inner()).unwrap();
    Ok(out.lines().map(str::to_string).collect())
}

// ==================== Replay Tests ====================

#[test]
fn test_replay_click_to_json() {
    let input = [
        mediapipe_line(0.0, (0.5, 0.2)),
        mediapipe_line(0.1, (0.31, 0.6)),
        mediapipe_line(0.2, (0.5, 0.2)),
    ]
    .join("\n");

    let lines = replay_json(&input).unwrap();
    assert_eq!(
        lines,
        vec![
            r#"{"action":"pointer_move","x":500,"y":100}"#,
            r#"{"action":"pointer_move","x":310,"y":300}"#,
            r#"{"action":"pointer_button_down"}"#,
            r#"{"action":"pointer_move","x":500,"y":100}"#,
            r#"{"action":"pointer_button_up"}"#,
        ]
    );
}

#[test]
fn test_replay_releases_button_at_end_of_input() {
    let input = [
        mediapipe_line(0.0, (0.5, 0.2)),
        mediapipe_line(0.1, (0.31, 0.6)),
    ]
    .join("\n");

    let lines = replay_json(&input).unwrap();
    assert_eq!(lines.last().map(String::as_str), Some(r#"{"action":"pointer_button_up"}"#));
}

#[test]
fn test_replay_hand_loss_frames() {
    let input = [
        mediapipe_line(0.0, (0.31, 0.6)),
        r#"{"t": 0.1, "landmarks": null}"#.to_string(),
        r#"{"t": 0.2}"#.to_string(),
    ]
    .join("\n");

    let mut session = session();
    let mut sink = RecordingSink::new();
    let summary = run(
        FrameReader::new(input.as_bytes()),
        &mut session,
        &mut sink,
        Timing::Stream,
        || false,
    )
    .unwrap();

    assert_eq!(summary.frames, 3);
    assert_eq!(summary.hand_frames, 1);
    assert_eq!(sink.count(|a| *a == hand_pointer::actions::Action::PointerButtonUp), 1);
}

#[test]
fn test_replay_rejects_backwards_time() {
    let input = [mediapipe_line(1.0, (0.5, 0.2)), mediapipe_line(0.5, (0.5, 0.2))].join("\n");

    let err = replay_json(&input).unwrap_err();
    assert!(matches!(err, RunError::TimestampWentBackwards { line: 2, .. }));
}

#[test]
fn test_replay_reports_bad_frame_line() {
    let input = format!("{}\n\n{{\"t\": 0.2, \"landmarks\": [[0.1, 0.1]]}}", mediapipe_line(0.0, (0.5, 0.2)));

    let err = replay_json(&input).unwrap_err();
    assert_eq!(
        err.to_string(),
        "line 3: invalid landmarks: expected 21 hand points, got 1"
    );
}

// ==================== Config Tests ====================

#[test]
fn test_config_file_drives_engine() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[gesture]\npinch_threshold = 0.1\nsmoothing_factor = 1.0\n\n[screen]\nwidth = 800\nheight = 600"
    )
    .unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    let screen = config.screen.bounds().unwrap();
    let gesture = config.gesture_config(screen).unwrap();
    assert_eq!(gesture.pinch_threshold, 0.1);
    assert_eq!(gesture.screen, ScreenBounds::new(800, 600));
}

#[test]
fn test_config_with_out_of_range_value_is_invalid() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[gesture]\nsmoothing_factor = 0.0").unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    let err = config.gesture_config(SCREEN).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "smoothing_factor", .. }));
}
