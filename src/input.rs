//! Landmark frame input.
//!
//! The landmark model runs out of process and writes one JSON object per
//! frame:
//!
//! ```text
//! {"t": 1.25, "landmarks": {"thumb_tip": [0.41, 0.52], "index_tip": {"x": 0.44, "y": 0.31}, ...}}
//! {"t": 1.28, "landmarks": [[0.5, 0.9], [0.46, 0.82], ...]}   // 21-point MediaPipe order
//! {"t": 1.31, "landmarks": null}                              // no hand
//! ```
//!
//! `t` is seconds on any monotonic clock and may be omitted when the caller
//! timestamps frames itself. Blank lines and `#` comments are skipped.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::time::Duration;

use serde::Deserialize;

use crate::landmarks::{Landmark, LandmarkError, LandmarkSet, Point};

/// Errors reading the frame stream.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to read frame input: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: malformed frame: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Landmarks broke the model contract (missing or non-finite keypoints)
    #[error("line {line}: invalid landmarks: {source}")]
    InvalidInput {
        line: usize,
        #[source]
        source: LandmarkError,
    },

    #[error("line {line}: invalid timestamp {value}")]
    InvalidTimestamp { line: usize, value: f64 },
}

/// One decoded frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameInput {
    /// 1-based source line
    pub line: usize,
    pub timestamp: Option<Duration>,
    /// `None` when no hand was detected
    pub hand: Option<LandmarkSet>,
}

#[derive(Deserialize)]
struct RawFrame {
    #[serde(default)]
    t: Option<f64>,
    #[serde(default)]
    landmarks: Option<RawLandmarks>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLandmarks {
    Indexed(Vec<Point>),
    Named(BTreeMap<String, Point>),
}

impl RawLandmarks {
    fn into_set(self) -> Result<LandmarkSet, LandmarkError> {
        match self {
            RawLandmarks::Indexed(points) => LandmarkSet::from_mediapipe(&points),
            RawLandmarks::Named(points) => LandmarkSet::from_points(
                points
                    .into_iter()
                    .filter_map(|(name, point)| Landmark::from_name(&name).map(|l| (l, point))),
            ),
        }
    }
}

/// Parse a single frame line.
pub fn parse_frame(text: &str, line: usize) -> Result<FrameInput, InputError> {
    let raw: RawFrame =
        serde_json::from_str(text).map_err(|source| InputError::Json { line, source })?;

    let timestamp = raw
        .t
        .map(|value| {
            Duration::try_from_secs_f64(value)
                .map_err(|_| InputError::InvalidTimestamp { line, value })
        })
        .transpose()?;

    let hand = raw
        .landmarks
        .map(RawLandmarks::into_set)
        .transpose()
        .map_err(|source| InputError::InvalidInput { line, source })?;

    Ok(FrameInput {
        line,
        timestamp,
        hand,
    })
}

/// Iterator of frames over a line-oriented reader.
pub struct FrameReader<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        FrameReader {
            reader,
            line: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for FrameReader<R> {
    type Item = Result<FrameInput, InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(InputError::Io(e))),
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            return Some(parse_frame(text, self.line));
        }
    }
}
