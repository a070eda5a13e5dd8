//! Frame loop: capture, detect, bridge, render, poll for exit
//!
//! Everything hardware-facing sits behind a trait so the loop runs the same
//! against a camera or a recorded script.

use std::collections::VecDeque;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::core::AngleMode;
use crate::gesture::{GestureBridge, HandLandmarks};
use crate::grid::ButtonGrid;
use crate::render::{render_frame, FrameView, RenderError, Surface};
use crate::state::CalculatorState;

/// Most recent dispatched labels kept in a [`SessionReport`]
pub const DISPATCH_HISTORY: usize = 256;

/// Result type for sessions
pub type SessionResult<T> = Result<T, SessionError>;

/// Session failures
#[derive(Debug, Error)]
pub enum SessionError {
    /// The capture device could not be opened
    #[error("capture unavailable: {0}")]
    CaptureUnavailable(String),

    /// Reading a frame failed mid-session
    #[error("frame capture failed at frame {frame}: {message}")]
    Capture {
        /// Zero-based frame index
        frame: usize,
        /// Backend message
        message: String,
    },

    /// Hand detection failed
    #[error("hand tracking failed: {0}")]
    Tracker(String),

    /// Drawing failed
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Source of frames, such as a camera
pub trait FrameSource {
    /// One captured frame
    type Frame;

    /// Acquires the device
    fn open(&mut self) -> SessionResult<()>;

    /// Reads the next frame; `Ok(None)` when the source is exhausted
    fn read_frame(&mut self) -> SessionResult<Option<Self::Frame>>;

    /// Releases the device; must tolerate repeated calls
    fn release(&mut self);
}

/// Detects hands in a frame
pub trait HandTracker<F> {
    /// Returns detected hands in frame pixel coordinates, first hand first
    fn detect(&mut self, frame: &F) -> SessionResult<Vec<HandLandmarks>>;
}

/// Keyboard polled once per frame
pub trait KeyInput {
    /// Key pressed since the last poll
    fn poll_key(&mut self) -> Option<u32>;
}

/// Keeps a [`FrameSource`] open; releases it when dropped
#[derive(Debug)]
pub struct CaptureGuard<'a, S: FrameSource> {
    source: &'a mut S,
}

impl<'a, S: FrameSource> CaptureGuard<'a, S> {
    /// Opens the source
    pub fn acquire(source: &'a mut S) -> SessionResult<Self> {
        source.open()?;
        Ok(Self { source })
    }

    /// Reads the next frame
    pub fn read_frame(&mut self) -> SessionResult<Option<S::Frame>> {
        self.source.read_frame()
    }
}

impl<S: FrameSource> Drop for CaptureGuard<'_, S> {
    fn drop(&mut self) {
        self.source.release();
        debug!("capture released");
    }
}

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// The exit key was pressed
    ExitKey,
    /// The frame source ran out
    SourceExhausted,
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExitKey => write!(f, "exit key"),
            Self::SourceExhausted => write!(f, "source exhausted"),
        }
    }
}

/// Summary of a finished session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    /// Frames processed
    pub frames: usize,
    /// Number of buttons dispatched
    pub dispatch_count: usize,
    /// The last [`DISPATCH_HISTORY`] labels dispatched, oldest first
    pub dispatched: Vec<String>,
    /// Final display text
    pub expression: String,
    /// Final angle mode
    pub angle_mode: AngleMode,
    /// Final memory value
    pub memory: f64,
    /// Why the loop ended
    pub exit_reason: ExitReason,
}

/// A calculator driven frame by frame
#[derive(Debug, Clone)]
pub struct Session {
    config: AppConfig,
    state: CalculatorState,
    bridge: GestureBridge,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl Session {
    /// Creates a session with a fresh calculator
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let grid = ButtonGrid::with_geometry(config.geometry);
        Self {
            bridge: GestureBridge::new(grid, config.gesture),
            state: CalculatorState::new(),
            config,
        }
    }

    /// Returns the configuration
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the calculator
    #[must_use]
    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    /// Returns the gesture bridge
    #[must_use]
    pub fn bridge(&self) -> &GestureBridge {
        &self.bridge
    }

    /// Runs until the exit key is pressed or the source runs dry.
    ///
    /// The source is released on every return path.
    pub fn run<S, T, K, D>(
        &mut self,
        source: &mut S,
        tracker: &mut T,
        keys: &mut K,
        surface: &mut D,
    ) -> SessionResult<SessionReport>
    where
        S: FrameSource,
        T: HandTracker<S::Frame>,
        K: KeyInput,
        D: Surface + ?Sized,
    {
        let mut capture = CaptureGuard::acquire(source)?;
        info!(
            width = self.config.frame_width,
            height = self.config.frame_height,
            "session started"
        );

        let mut frames = 0;
        let mut dispatch_count = 0;
        let mut dispatched = VecDeque::with_capacity(DISPATCH_HISTORY);
        let exit_reason = loop {
            let frame = match capture.read_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break ExitReason::SourceExhausted,
                Err(err) => {
                    warn!(frame = frames, error = %err, "frame capture failed");
                    return Err(err);
                }
            };

            let hands = tracker.detect(&frame)?;
            let outcome = self.bridge.process_frame(&hands, &mut self.state);
            if let Some(label) = outcome.dispatched_label() {
                if dispatched.len() == DISPATCH_HISTORY {
                    dispatched.pop_front();
                }
                dispatched.push_back(label);
                dispatch_count += 1;
            }

            let view = FrameView {
                state: &self.state,
                grid: self.bridge.grid(),
                outcome: &outcome,
                width: f64::from(self.config.frame_width),
                height: f64::from(self.config.frame_height),
            };
            render_frame(surface, &view)?;
            frames += 1;

            if keys.poll_key() == Some(self.config.exit_key) {
                break ExitReason::ExitKey;
            }
        };

        info!(frames, reason = %exit_reason, expression = self.state.expression(), "session ended");
        Ok(SessionReport {
            frames,
            dispatch_count,
            dispatched: dispatched.into_iter().map(String::from).collect(),
            expression: self.state.expression().to_string(),
            angle_mode: self.state.angle_mode(),
            memory: self.state.memory(),
            exit_reason,
        })
    }
}
