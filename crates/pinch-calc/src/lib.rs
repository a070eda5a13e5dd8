//! Pinch Calc - a scientific calculator driven by hand gestures
//!
//! A hand tracker reports 21 landmarks per hand each frame. When the thumb
//! and index tips pinch over an on-screen button, the button is pressed.
//! This crate holds everything behind the camera: the expression evaluator,
//! calculator state, button grid, pinch debouncing, frame rendering, and the
//! frame loop, with the camera, tracker and window behind traits.
//!
//! # Example
//!
//! ```rust
//! use pinch_calc::prelude::*;
//!
//! // Evaluate display text directly
//! assert_eq!(evaluate("2+3*4", AngleMode::Radians), "14");
//! assert_eq!(evaluate("sin(90)", AngleMode::Degrees), "1.0");
//! assert_eq!(evaluate("1/0", AngleMode::Radians), "Div by Zero");
//!
//! // Or pinch buttons through the gesture bridge
//! let mut bridge = GestureBridge::default();
//! let mut state = CalculatorState::new();
//! let seven = bridge.grid().find("7").unwrap().rect.center();
//! bridge.process_frame(&[HandLandmarks::pinched_at(seven)], &mut state);
//! assert_eq!(state.expression(), "7");
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod config;
pub mod core;
pub mod driver;
pub mod gesture;
pub mod grid;
pub mod recording;
pub mod render;
pub mod session;
pub mod state;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{AppConfig, ConfigError, ConfigResult};
    pub use crate::core::evaluator::Evaluator;
    pub use crate::core::parser::{AstNode, Parser, Token, Tokenizer};
    pub use crate::core::{evaluate, preprocess, AngleMode, EvalError, EvalResult, Sentinel, Value};
    pub use crate::driver::{CalculatorDriver, DirectDriver, GestureDriver};
    pub use crate::gesture::{
        DebouncePhase, Debouncer, FrameOutcome, GestureBridge, GestureConfig, HandLandmarks,
        LandmarkError, PinchEvent,
    };
    pub use crate::grid::{ButtonGrid, ButtonSpec, GridGeometry, Point, Rect};
    pub use crate::recording::{RecordedFrame, Recording, RecordingError, Replay};
    pub use crate::render::{render_frame, DrawCommand, FrameView, RecordingSurface, Surface};
    pub use crate::session::{
        ExitReason, FrameSource, HandTracker, KeyInput, Session, SessionError, SessionReport,
        SessionResult,
    };
    pub use crate::state::{Action, CalculatorState};
}
