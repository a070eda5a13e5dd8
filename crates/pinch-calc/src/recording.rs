//! Recorded hand-landmark scripts and their replay adapters
//!
//! A recording lists, per frame, the detected hands (21 `[x, y]` points each)
//! and an optional key pressed after the frame. Landmarks are normalized to
//! `0..1` unless `normalized: false`, in which case they are pixels.

use std::collections::VecDeque;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::FileFormat;
use crate::gesture::{HandLandmarks, LandmarkError};
use crate::grid::Point;
use crate::session::{FrameSource, HandTracker, KeyInput, SessionError, SessionResult};

/// Result type for recordings
pub type RecordingResult<T> = Result<T, RecordingError>;

/// Recording load failures
#[derive(Debug, Error)]
pub enum RecordingError {
    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path attempted
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// YAML parse failure
    #[error("invalid recording YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON parse failure
    #[error("invalid recording JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A hand has the wrong number of points
    #[error("frame {frame}, hand {hand}: {source}")]
    Landmarks {
        /// Zero-based frame index
        frame: usize,
        /// Zero-based hand index
        hand: usize,
        /// Underlying error
        #[source]
        source: LandmarkError,
    },

    /// Normalized landmarks need a frame size
    #[error("recording frame size must be positive, got {width}x{height}")]
    FrameSize {
        /// Width
        width: u32,
        /// Height
        height: u32,
    },
}

const fn default_width() -> u32 {
    900
}

const fn default_height() -> u32 {
    700
}

const fn default_normalized() -> bool {
    true
}

/// One recorded frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Hands, each a list of `[x, y]` points
    #[serde(default)]
    pub hands: Vec<Vec<[f64; 2]>>,
    /// Key pressed after this frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<u32>,
}

impl RecordedFrame {
    /// A frame with a single closed pinch at `point` (pixels)
    #[must_use]
    pub fn pinch(point: Point) -> Self {
        Self::from_hand(&HandLandmarks::pinched_at(point))
    }

    /// A frame with a single open hand pointing at `point` (pixels)
    #[must_use]
    pub fn open(point: Point) -> Self {
        Self::from_hand(&HandLandmarks::open_at(point, 200.0))
    }

    /// A frame with no hands
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_hand(hand: &HandLandmarks) -> Self {
        Self {
            hands: vec![hand.points().iter().map(|p| [p.x, p.y]).collect()],
            key: None,
        }
    }

    /// Sets the key pressed after this frame
    #[must_use]
    pub const fn with_key(mut self, key: u32) -> Self {
        self.key = Some(key);
        self
    }
}

/// A full recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Width used to scale normalized landmarks
    #[serde(default = "default_width")]
    pub width: u32,
    /// Height used to scale normalized landmarks
    #[serde(default = "default_height")]
    pub height: u32,
    /// Whether landmarks are in `0..1`
    #[serde(default = "default_normalized")]
    pub normalized: bool,
    /// Frames in order
    #[serde(default)]
    pub frames: Vec<RecordedFrame>,
}

impl Default for Recording {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            normalized: default_normalized(),
            frames: Vec::new(),
        }
    }
}

impl Recording {
    /// A pixel-space recording of the given frames
    #[must_use]
    pub fn in_pixels(frames: Vec<RecordedFrame>) -> Self {
        Self {
            normalized: false,
            frames,
            ..Self::default()
        }
    }

    /// Parses YAML
    pub fn from_yaml_str(text: &str) -> RecordingResult<Self> {
        Ok(serde_yaml_ng::from_str(text)?)
    }

    /// Parses JSON
    pub fn from_json_str(text: &str) -> RecordingResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads a file, picking the format from its extension
    pub fn load(path: &Path) -> RecordingResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| RecordingError::Io {
            path: path.display().to_string(),
            source,
        })?;
        match FileFormat::from_path(path) {
            FileFormat::Json => Self::from_json_str(&text),
            FileFormat::Yaml => Self::from_yaml_str(&text),
        }
    }

    /// Renders as YAML
    pub fn to_yaml(&self) -> RecordingResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Validates every hand and converts to pixel-space replay adapters
    pub fn replay(&self) -> RecordingResult<Replay> {
        if self.normalized && (self.width == 0 || self.height == 0) {
            return Err(RecordingError::FrameSize {
                width: self.width,
                height: self.height,
            });
        }

        let mut frames = VecDeque::with_capacity(self.frames.len());
        let mut keys = VecDeque::with_capacity(self.frames.len());
        for (frame_index, frame) in self.frames.iter().enumerate() {
            let hands = frame
                .hands
                .iter()
                .enumerate()
                .map(|(hand_index, points)| self.hand(frame_index, hand_index, points))
                .collect::<RecordingResult<Vec<_>>>()?;
            frames.push_back(ReplayFrame { hands });
            keys.push_back(frame.key);
        }

        Ok(Replay {
            source: ReplaySource::new(frames),
            tracker: ReplayTracker,
            keys: ScriptedKeys::new(keys),
        })
    }

    fn hand(&self, frame: usize, hand: usize, points: &[[f64; 2]]) -> RecordingResult<HandLandmarks> {
        let points: Vec<Point> = points.iter().map(|&[x, y]| Point::new(x, y)).collect();
        let landmarks = HandLandmarks::from_points(&points)
            .map_err(|source| RecordingError::Landmarks { frame, hand, source })?;
        Ok(if self.normalized {
            landmarks.to_pixels(self.width, self.height)
        } else {
            landmarks
        })
    }
}

/// The three adapters a session needs to replay a recording
#[derive(Debug)]
pub struct Replay {
    /// Frame source
    pub source: ReplaySource,
    /// Tracker reading the hands out of each frame
    pub tracker: ReplayTracker,
    /// Keys pressed after each frame
    pub keys: ScriptedKeys,
}

/// A replayed frame: hands already in pixels
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayFrame {
    /// Hands in detection order
    pub hands: Vec<HandLandmarks>,
}

/// Frame source over recorded frames
#[derive(Debug, Default)]
pub struct ReplaySource {
    frames: VecDeque<ReplayFrame>,
    open: bool,
}

impl ReplaySource {
    /// Creates a source over `frames`
    #[must_use]
    pub fn new(frames: VecDeque<ReplayFrame>) -> Self {
        Self {
            frames,
            open: false,
        }
    }

    /// Whether the source is currently held open
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Frames not yet read
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for ReplaySource {
    type Frame = ReplayFrame;

    fn open(&mut self) -> SessionResult<()> {
        self.open = true;
        Ok(())
    }

    fn read_frame(&mut self) -> SessionResult<Option<ReplayFrame>> {
        if !self.open {
            return Err(SessionError::CaptureUnavailable(
                "replay source read before open".to_string(),
            ));
        }
        Ok(self.frames.pop_front())
    }

    fn release(&mut self) {
        self.open = false;
    }
}

/// Tracker that hands back the recorded hands
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayTracker;

impl HandTracker<ReplayFrame> for ReplayTracker {
    fn detect(&mut self, frame: &ReplayFrame) -> SessionResult<Vec<HandLandmarks>> {
        Ok(frame.hands.clone())
    }
}

/// Key input from a fixed script, one entry per poll
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<Option<u32>>,
}

impl ScriptedKeys {
    /// Creates a key script
    #[must_use]
    pub fn new(keys: VecDeque<Option<u32>>) -> Self {
        Self { keys }
    }
}

impl KeyInput for ScriptedKeys {
    fn poll_key(&mut self) -> Option<u32> {
        self.keys.pop_front().flatten()
    }
}
