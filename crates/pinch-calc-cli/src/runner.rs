//! Command implementations
//!
//! Each command produces a serializable result; printing is left to
//! [`crate::output`].

use std::path::Path;

use pinch_calc::config::AppConfig;
use pinch_calc::core::{evaluate, AngleMode, Sentinel};
use pinch_calc::recording::{Recording, Replay};
use pinch_calc::render::{DrawCommand, RecordingSurface};
use pinch_calc::session::{Session, SessionReport};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{CliError, CliResult};

/// Loads `path`, or returns the defaults when no file is given
pub fn load_app_config(path: Option<&Path>) -> CliResult<AppConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            Ok(AppConfig::load(path)?)
        }
        None => Ok(AppConfig::default()),
    }
}

/// Result of replaying a recording
#[derive(Debug, Clone, Serialize)]
pub struct ReplayOutput {
    /// Session summary
    #[serde(flatten)]
    pub report: SessionReport,
    /// Draw commands of the final frame, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw: Option<Vec<DrawCommand>>,
}

/// Runs a session over an in-memory recording
pub fn replay(recording: &Recording, config: AppConfig, draw: bool) -> CliResult<ReplayOutput> {
    let Replay {
        mut source,
        mut tracker,
        mut keys,
    } = recording.replay()?;
    let mut surface = RecordingSurface::new();
    let mut session = Session::new(config);
    let report = session.run(&mut source, &mut tracker, &mut keys, &mut surface)?;

    Ok(ReplayOutput {
        report,
        draw: draw.then(|| surface.take()),
    })
}

/// Loads a recording file and replays it
pub fn replay_file(path: &Path, config: AppConfig, draw: bool) -> CliResult<ReplayOutput> {
    let recording = Recording::load(path)?;
    info!(
        path = %path.display(),
        frames = recording.frames.len(),
        normalized = recording.normalized,
        "replaying recording"
    );
    replay(&recording, config, draw)
}

/// Result of a one-off evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvalOutput {
    /// Input text
    pub expression: String,
    /// Mode used for trigonometry
    pub angle_mode: AngleMode,
    /// Display text after "="
    pub result: String,
    /// Whether the result is one of the sentinels, `nan` included
    pub is_error: bool,
}

/// Evaluates `expression` exactly as the "=" button would
pub fn eval(expression: &str, mode: AngleMode) -> CliResult<EvalOutput> {
    if expression.trim().is_empty() {
        return Err(CliError::invalid_argument("expression is empty"));
    }
    let result = evaluate(expression, mode);
    Ok(EvalOutput {
        expression: expression.to_string(),
        angle_mode: mode,
        is_error: Sentinel::is_sentinel(&result),
        result,
    })
}
