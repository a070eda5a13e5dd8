//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// pinchcalc: a scientific calculator driven by pinch gestures
#[derive(Parser, Debug)]
#[command(name = "pinchcalc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (results only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a recorded landmark stream through the calculator
    Replay(ReplayArgs),

    /// Evaluate an expression the way the "=" button does
    Eval(EvalArgs),

    /// Print the button grid with each button's rectangle
    Grid(GridArgs),

    /// Print the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the replay command
#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// Recording file (.yaml, .yml or .json)
    pub file: PathBuf,

    /// Configuration file (.yaml, .yml or .json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Also print the draw commands of the final frame
    #[arg(long)]
    pub draw: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the eval command
#[derive(Parser, Debug)]
pub struct EvalArgs {
    /// Expression as it would appear on the display
    #[arg(allow_hyphen_values = true)]
    pub expression: String,

    /// Interpret trigonometric arguments in degrees
    #[arg(short, long)]
    pub degrees: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the grid command
#[derive(Parser, Debug)]
pub struct GridArgs {
    /// Configuration file providing the grid geometry
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Configuration file to load; defaults are shown without one
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format (text prints YAML)
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
    /// YAML
    Yaml,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
            FormatArg::Yaml => Self::Yaml,
        }
    }
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::config::ColorChoice;
    use crate::output::OutputFormat;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_replay_command() {
            let cli = Cli::parse_from(["pinchcalc", "replay", "session.yaml"]);
            if let Commands::Replay(args) = cli.command {
                assert_eq!(args.file, PathBuf::from("session.yaml"));
                assert!(args.config.is_none());
                assert!(!args.draw);
                assert_eq!(args.format, FormatArg::Text);
            } else {
                panic!("expected Replay command");
            }
        }

        #[test]
        fn test_parse_replay_with_options() {
            let cli = Cli::parse_from([
                "pinchcalc",
                "replay",
                "session.json",
                "--config",
                "calc.yaml",
                "--draw",
                "--format",
                "json",
            ]);
            if let Commands::Replay(args) = cli.command {
                assert_eq!(args.config, Some(PathBuf::from("calc.yaml")));
                assert!(args.draw);
                assert_eq!(args.format, FormatArg::Json);
            } else {
                panic!("expected Replay command");
            }
        }

        #[test]
        fn test_parse_eval_command() {
            let cli = Cli::parse_from(["pinchcalc", "eval", "sin(90)", "--degrees"]);
            if let Commands::Eval(args) = cli.command {
                assert_eq!(args.expression, "sin(90)");
                assert!(args.degrees);
            } else {
                panic!("expected Eval command");
            }
        }

        #[test]
        fn test_parse_eval_leading_minus() {
            let cli = Cli::parse_from(["pinchcalc", "eval", "-3*2"]);
            if let Commands::Eval(args) = cli.command {
                assert_eq!(args.expression, "-3*2");
                assert!(!args.degrees);
            } else {
                panic!("expected Eval command");
            }
        }

        #[test]
        fn test_parse_grid_command() {
            let cli = Cli::parse_from(["pinchcalc", "grid", "-f", "yaml"]);
            if let Commands::Grid(args) = cli.command {
                assert_eq!(args.format, FormatArg::Yaml);
            } else {
                panic!("expected Grid command");
            }
        }

        #[test]
        fn test_parse_config_command() {
            let cli = Cli::parse_from(["pinchcalc", "config", "-c", "calc.json"]);
            assert!(
                matches!(cli.command, Commands::Config(ref a) if a.config == Some(PathBuf::from("calc.json")))
            );
        }

        #[test]
        fn test_global_flags() {
            let cli = Cli::parse_from(["pinchcalc", "-vv", "--color", "never", "grid"]);
            assert_eq!(cli.verbose, 2);
            assert!(!cli.quiet);
            assert_eq!(cli.color, ColorArg::Never);

            let cli = Cli::parse_from(["pinchcalc", "grid", "-q"]);
            assert!(cli.quiet);
        }

        #[test]
        fn test_missing_subcommand_is_error() {
            assert!(Cli::try_parse_from(["pinchcalc"]).is_err());
        }

        #[test]
        fn test_unknown_format_is_error() {
            assert!(Cli::try_parse_from(["pinchcalc", "grid", "--format", "xml"]).is_err());
        }
    }

    mod conversion_tests {
        use super::*;

        #[test]
        fn test_color_arg_conversion() {
            assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
            assert_eq!(ColorChoice::from(ColorArg::Always), ColorChoice::Always);
            assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
        }

        #[test]
        fn test_format_arg_conversion() {
            assert_eq!(OutputFormat::from(FormatArg::Text), OutputFormat::Text);
            assert_eq!(OutputFormat::from(FormatArg::Json), OutputFormat::Json);
            assert_eq!(OutputFormat::from(FormatArg::Yaml), OutputFormat::Yaml);
        }
    }
}
