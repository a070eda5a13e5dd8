//! pinchcalc CLI library
//!
//! Command-line front end for the pinch calculator: replays recorded hand
//! landmark streams through a headless session, evaluates expressions, and
//! prints the button grid and effective configuration.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
pub mod runner;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, EvalArgs, FormatArg, GridArgs, ReplayArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use logging::{init_logging, LogConfig};
pub use output::{render_config, render_eval, render_grid, render_replay, OutputFormat, Reporter};
pub use runner::{eval, load_app_config, replay, replay_file, EvalOutput, ReplayOutput};
