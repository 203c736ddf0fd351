//! Per-frame hand geometry.
//!
//! A [`LandmarkSet`] is the snapshot the external landmark model produces for
//! one camera frame: eleven named keypoints in normalized image coordinates.
//! Sets are validated when built and never mutated afterwards.

use std::fmt;

use serde::Deserialize;

/// A 2D point in normalized image space (`[0, 1]` on both axes).
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(from = "PointRepr")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Reflected across the vertical center line (`x -> 1 - x`).
    pub fn mirrored(&self) -> Point {
        Point {
            x: 1.0 - self.x,
            y: self.y,
        }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Accepts `[x, y]` or `{"x": .., "y": ..}` (extra fields such as `z` ignored).
#[derive(Deserialize)]
#[serde(untagged)]
enum PointRepr {
    Pair([f64; 2]),
    Object { x: f64, y: f64 },
}

impl From<PointRepr> for Point {
    fn from(repr: PointRepr) -> Self {
        match repr {
            PointRepr::Pair([x, y]) => Point { x, y },
            PointRepr::Object { x, y } => Point { x, y },
        }
    }
}

/// Named hand keypoints consumed by the gesture core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Landmark {
    Wrist,
    ThumbMcp,
    ThumbTip,
    IndexPip,
    IndexTip,
    MiddleMcp,
    MiddleTip,
    RingPip,
    RingTip,
    PinkyPip,
    PinkyTip,
}

impl Landmark {
    pub const ALL: [Landmark; 11] = [
        Landmark::Wrist,
        Landmark::ThumbMcp,
        Landmark::ThumbTip,
        Landmark::IndexPip,
        Landmark::IndexTip,
        Landmark::MiddleMcp,
        Landmark::MiddleTip,
        Landmark::RingPip,
        Landmark::RingTip,
        Landmark::PinkyPip,
        Landmark::PinkyTip,
    ];

    /// Number of points in the MediaPipe hand topology.
    pub const MEDIAPIPE_POINTS: usize = 21;

    pub fn name(self) -> &'static str {
        match self {
            Landmark::Wrist => "wrist",
            Landmark::ThumbMcp => "thumb_mcp",
            Landmark::ThumbTip => "thumb_tip",
            Landmark::IndexPip => "index_pip",
            Landmark::IndexTip => "index_tip",
            Landmark::MiddleMcp => "middle_mcp",
            Landmark::MiddleTip => "middle_tip",
            Landmark::RingPip => "ring_pip",
            Landmark::RingTip => "ring_tip",
            Landmark::PinkyPip => "pinky_pip",
            Landmark::PinkyTip => "pinky_tip",
        }
    }

    pub fn from_name(name: &str) -> Option<Landmark> {
        Landmark::ALL.into_iter().find(|l| l.name() == name)
    }

    /// Index of this keypoint in the 21-point MediaPipe hand model.
    pub fn mediapipe_index(self) -> usize {
        match self {
            Landmark::Wrist => 0,
            Landmark::ThumbMcp => 2,
            Landmark::ThumbTip => 4,
            Landmark::IndexPip => 6,
            Landmark::IndexTip => 8,
            Landmark::MiddleMcp => 9,
            Landmark::MiddleTip => 12,
            Landmark::RingPip => 14,
            Landmark::RingTip => 16,
            Landmark::PinkyPip => 18,
            Landmark::PinkyTip => 20,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Contract violations in landmark input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LandmarkError {
    #[error("missing keypoint '{0}'")]
    MissingKeypoint(Landmark),

    #[error("keypoint '{landmark}' has a non-finite coordinate ({x}, {y})")]
    NonFinite { landmark: Landmark, x: f64, y: f64 },

    #[error("expected {expected} hand points, got {found}")]
    WrongPointCount { expected: usize, found: usize },
}

/// One frame's worth of hand keypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: [Point; 11],
}

impl LandmarkSet {
    /// Build a set from `(landmark, point)` pairs.
    ///
    /// Every keypoint in [`Landmark::ALL`] must be present. Later duplicates
    /// overwrite earlier ones.
    pub fn from_points<I>(points: I) -> Result<Self, LandmarkError>
    where
        I: IntoIterator<Item = (Landmark, Point)>,
    {
        let mut slots: [Option<Point>; 11] = [None; 11];
        for (landmark, point) in points {
            slots[landmark.slot()] = Some(point);
        }

        let mut resolved = [Point::default(); 11];
        for landmark in Landmark::ALL {
            let point = slots[landmark.slot()].ok_or(LandmarkError::MissingKeypoint(landmark))?;
            if !point.is_finite() {
                return Err(LandmarkError::NonFinite {
                    landmark,
                    x: point.x,
                    y: point.y,
                });
            }
            resolved[landmark.slot()] = point;
        }

        Ok(LandmarkSet { points: resolved })
    }

    /// Build a set from the full 21-point MediaPipe hand output.
    pub fn from_mediapipe(points: &[Point]) -> Result<Self, LandmarkError> {
        if points.len() != Landmark::MEDIAPIPE_POINTS {
            return Err(LandmarkError::WrongPointCount {
                expected: Landmark::MEDIAPIPE_POINTS,
                found: points.len(),
            });
        }
        Self::from_points(
            Landmark::ALL
                .into_iter()
                .map(|l| (l, points[l.mediapipe_index()])),
        )
    }

    /// The same hand seen in a horizontally flipped image.
    pub fn mirrored(&self) -> LandmarkSet {
        LandmarkSet {
            points: self.points.map(|p| p.mirrored()),
        }
    }

    pub fn get(&self, landmark: Landmark) -> Point {
        self.points[landmark.slot()]
    }

    /// Distance between two keypoints in normalized units.
    pub fn distance(&self, a: Landmark, b: Landmark) -> f64 {
        self.get(a).distance(&self.get(b))
    }
}
