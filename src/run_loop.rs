//! Synchronous frame loop.
//!
//! Reads landmark frames, advances the [`Session`] one tick per frame and
//! hands each frame's actions to the sink. Whatever ends the loop (end of
//! input, Ctrl+C or an error), a held button is released before returning.

use std::io::BufRead;
use std::time::{Duration, Instant};

use crate::actions::{ActionSink, SinkError};
use crate::gesture::Session;
use crate::input::{FrameReader, InputError};

/// Where frame timestamps come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timing {
    /// Time elapsed since the loop started, read when each frame arrives
    #[default]
    Wall,
    /// The `t` field of each frame (recorded sessions, deterministic replay)
    Stream,
}

/// Errors that stop the loop.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("line {line}: frame has no timestamp (required with stream timing)")]
    MissingTimestamp { line: usize },

    #[error("line {line}: timestamp {current:?} is earlier than previous frame {previous:?}")]
    TimestampWentBackwards {
        line: usize,
        previous: Duration,
        current: Duration,
    },
}

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub frames: usize,
    pub hand_frames: usize,
    pub actions: usize,
}

/// Run until the input ends or `stop` returns true.
pub fn run<R, S>(
    frames: FrameReader<R>,
    session: &mut Session,
    sink: &mut S,
    timing: Timing,
    stop: impl Fn() -> bool,
) -> Result<RunSummary, RunError>
where
    R: BufRead,
    S: ActionSink + ?Sized,
{
    let mut summary = RunSummary::default();
    let result = drive(frames, session, sink, timing, &stop, &mut summary);

    let release = session.shutdown();
    if !release.is_empty() {
        log::info!("Releasing held button on exit");
    }
    summary.actions += release.len();
    let released = sink.apply_all(&release);

    result?;
    released?;

    log::info!(
        "Processed {} frames ({} with a hand), {} actions",
        summary.frames,
        summary.hand_frames,
        summary.actions
    );
    Ok(summary)
}

fn drive<R, S>(
    frames: FrameReader<R>,
    session: &mut Session,
    sink: &mut S,
    timing: Timing,
    stop: &impl Fn() -> bool,
    summary: &mut RunSummary,
) -> Result<(), RunError>
where
    R: BufRead,
    S: ActionSink + ?Sized,
{
    let start = Instant::now();
    let mut previous: Option<Duration> = None;

    for frame in frames {
        if stop() {
            log::debug!("Stop requested, leaving frame loop");
            break;
        }
        let frame = frame?;

        let now = match timing {
            Timing::Wall => start.elapsed(),
            Timing::Stream => {
                let t = frame
                    .timestamp
                    .ok_or(RunError::MissingTimestamp { line: frame.line })?;
                if let Some(prev) = previous {
                    if t < prev {
                        return Err(RunError::TimestampWentBackwards {
                            line: frame.line,
                            previous: prev,
                            current: t,
                        });
                    }
                }
                t
            }
        };
        previous = Some(now);

        let actions = session.tick(frame.hand.as_ref(), now);
        summary.frames += 1;
        if frame.hand.is_some() {
            summary.hand_frames += 1;
        }
        summary.actions += actions.len();

        sink.apply_all(&actions)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Action, RecordingSink};
    use crate::gesture::{GestureConfig, ScreenBounds};

    fn session() -> Session {
        Session::new(GestureConfig::for_screen(ScreenBounds::new(1920, 1080)))
    }

    fn hand_line(t: f64, thumb_to_index: f64) -> String {
        format!(
            r#"{{"t": {t}, "landmarks": {{"wrist": [0.5, 0.9], "thumb_mcp": [0.4, 0.75], "thumb_tip": [0.3, 0.6], "index_pip": [0.45, 0.5], "index_tip": [{ix}, 0.6], "middle_mcp": [0.52, 0.6], "middle_tip": [0.52, 0.3], "ring_pip": [0.58, 0.5], "ring_tip": [0.58, 0.33], "pinky_pip": [0.64, 0.55], "pinky_tip": [0.64, 0.4]}}}}"#,
            t = t,
            ix = 0.3 + thumb_to_index
        )
    }

    #[test]
    fn test_stream_timing_replays_clicks() {
        let input = [
            hand_line(0.0, 0.2),
            hand_line(0.1, 0.01),
            hand_line(0.2, 0.2),
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
        assert_eq!(summary.hand_frames, 3);
        assert_eq!(sink.count(|a| *a == Action::PointerButtonDown), 1);
        assert_eq!(sink.count(|a| *a == Action::PointerButtonUp), 1);
        assert_eq!(sink.count(Action::is_pointer_move), 3);
    }

    #[test]
    fn test_held_button_released_at_end_of_input() {
        let input = hand_line(0.0, 0.01);
        let mut session = session();
        let mut sink = RecordingSink::new();

        run(
            FrameReader::new(input.as_bytes()),
            &mut session,
            &mut sink,
            Timing::Stream,
            || false,
        )
        .unwrap();

        assert_eq!(sink.actions.last(), Some(&Action::PointerButtonUp));
        assert!(!session.state().is_button_held());
    }

    #[test]
    fn test_error_still_releases() {
        let input = format!("{}\n{{broken", hand_line(0.0, 0.01));
        let mut session = session();
        let mut sink = RecordingSink::new();

        let err = run(
            FrameReader::new(input.as_bytes()),
            &mut session,
            &mut sink,
            Timing::Stream,
            || false,
        )
        .unwrap_err();

        assert!(matches!(err, RunError::Input(InputError::Json { line: 2, .. })));
        assert_eq!(sink.actions.last(), Some(&Action::PointerButtonUp));
    }

    #[test]
    fn test_out_of_range_timestamp_still_releases() {
        let input = format!("{}\n{{\"t\": 1e20, \"landmarks\": null}}", hand_line(0.0, 0.01));
        let mut session = session();
        let mut sink = RecordingSink::new();

        let err = run(
            FrameReader::new(input.as_bytes()),
            &mut session,
            &mut sink,
            Timing::Stream,
            || false,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            RunError::Input(InputError::InvalidTimestamp { line: 2, .. })
        ));
        assert_eq!(sink.actions.last(), Some(&Action::PointerButtonUp));
        assert!(!session.state().is_button_held());
    }

    #[test]
    fn test_stream_timing_requires_timestamps() {
        let input = r#"{"landmarks": null}"#;
        let mut session = session();
        let mut sink = RecordingSink::new();
        let err = run(
            FrameReader::new(input.as_bytes()),
            &mut session,
            &mut sink,
            Timing::Stream,
            || false,
        )
        .unwrap_err();
        assert!(matches!(err, RunError::MissingTimestamp { line: 1 }));
    }

    #[test]
    fn test_backwards_timestamp_rejected() {
        let input = "{\"t\": 1.0}\n{\"t\": 0.5}\n";
        let mut session = session();
        let mut sink = RecordingSink::new();
        let err = run(
            FrameReader::new(input.as_bytes()),
            &mut session,
            &mut sink,
            Timing::Stream,
            || false,
        )
        .unwrap_err();
        assert!(matches!(err, RunError::TimestampWentBackwards { line: 2, .. }));
    }

    #[test]
    fn test_wall_timing_ignores_missing_timestamps() {
        let input = "{\"landmarks\": null}\n{\"landmarks\": null}\n";
        let mut session = session();
        let mut sink = RecordingSink::new();
        let summary = run(
            FrameReader::new(input.as_bytes()),
            &mut session,
            &mut sink,
            Timing::Wall,
            || false,
        )
        .unwrap();
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.hand_frames, 0);
        assert!(sink.actions.is_empty());
    }

    #[test]
    fn test_stop_flag_ends_loop() {
        let input = "{\"landmarks\": null}\n{\"landmarks\": null}\n";
        let mut session = session();
        let mut sink = RecordingSink::new();
        let summary = run(
            FrameReader::new(input.as_bytes()),
            &mut session,
            &mut sink,
            Timing::Wall,
            || true,
        )
        .unwrap();
        assert_eq!(summary.frames, 0);
    }
}
