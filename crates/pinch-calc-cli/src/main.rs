//! pinchcalc: command-line front end for the pinch calculator
//!
//! ## Usage
//!
//! ```bash
//! pinchcalc replay session.yaml            # Replay recorded landmarks
//! pinchcalc replay session.json --draw     # Include final-frame draw commands
//! pinchcalc eval "sin(90)" --degrees       # Evaluate like the "=" button
//! pinchcalc grid --format json             # Button rectangles
//! pinchcalc config --config calc.yaml      # Effective configuration
//! ```

use clap::Parser;
use pinch_calc::core::AngleMode;
use pinch_calc::grid::ButtonGrid;
use pinch_calc_cli::{
    eval, init_logging, load_app_config, render_config, render_eval, render_grid, render_replay,
    replay_file, Cli, CliConfig, CliResult, ColorChoice, Commands, ConfigArgs, EvalArgs, GridArgs,
    LogConfig, ReplayArgs, Reporter, Verbosity,
};
use std::process::ExitCode;
use tracing::debug;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli);
    init_logging(&LogConfig::new(config.verbosity).with_ansi(config.use_color()))?;
    debug!(?config, "starting");

    let reporter = Reporter::new(config.use_color(), config.verbosity.is_quiet());

    match cli.command {
        Commands::Replay(args) => run_replay(&reporter, &args),
        Commands::Eval(args) => run_eval(&reporter, &args),
        Commands::Grid(args) => run_grid(&reporter, &args),
        Commands::Config(args) => run_config(&reporter, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
}

fn run_replay(reporter: &Reporter, args: &ReplayArgs) -> CliResult<()> {
    let app = load_app_config(args.config.as_deref())?;
    let output = replay_file(&args.file, app, args.draw)?;
    if output.report.frames == 0 {
        reporter.warning("recording has no frames");
    }
    reporter.emit(&render_replay(
        &output,
        args.format.into(),
        reporter.use_color,
        reporter.quiet,
    )?)
}

fn run_eval(reporter: &Reporter, args: &EvalArgs) -> CliResult<()> {
    let mode = if args.degrees {
        AngleMode::Degrees
    } else {
        AngleMode::Radians
    };
    let output = eval(&args.expression, mode)?;
    reporter.emit(&render_eval(&output, args.format.into(), reporter.use_color)?)
}

fn run_grid(reporter: &Reporter, args: &GridArgs) -> CliResult<()> {
    let app = load_app_config(args.config.as_deref())?;
    let grid = ButtonGrid::with_geometry(app.geometry);
    reporter.emit(&render_grid(&grid, args.format.into())?)
}

fn run_config(reporter: &Reporter, args: &ConfigArgs) -> CliResult<()> {
    let app = load_app_config(args.config.as_deref())?;
    reporter.emit(&render_config(&app, args.format.into())?)
}
