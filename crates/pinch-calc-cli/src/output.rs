//! Output formatting

use console::{style, Term};
use pinch_calc::config::AppConfig;
use pinch_calc::core::{format_float, Sentinel};
use pinch_calc::grid::{ButtonGrid, ButtonSpec};
use pinch_calc::session::SessionReport;
use serde::{Deserialize, Serialize};

use crate::error::CliResult;
use crate::runner::{EvalOutput, ReplayOutput};

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

impl OutputFormat {
    /// Serializes `value` for the structured formats; `None` for text
    pub fn structured<T: Serialize>(self, value: &T) -> CliResult<Option<String>> {
        Ok(match self {
            Self::Text => None,
            Self::Json => Some(serde_json::to_string_pretty(value)?),
            Self::Yaml => Some(serde_yaml_ng::to_string(value)?),
        })
    }
}

/// Writes results to stdout and notices to stderr
#[derive(Debug)]
pub struct Reporter {
    out: Term,
    err: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            use_color,
            quiet,
        }
    }

    /// Print a result; never suppressed
    pub fn emit(&self, text: &str) -> CliResult<()> {
        self.out.write_line(text.trim_end_matches('\n'))?;
        Ok(())
    }

    /// Print a warning to stderr
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("!").yellow().bold().force_styling(true).to_string()
        } else {
            "WARN".to_string()
        };

        let _ = self.err.write_line(&format!("{prefix} {message}"));
    }
}

fn paint_result(text: &str, use_color: bool) -> String {
    if !use_color {
        return text.to_string();
    }
    let styled = style(text).bold().force_styling(true);
    if Sentinel::is_sentinel(text) {
        styled.red().to_string()
    } else {
        styled.green().to_string()
    }
}

fn key(name: &str, use_color: bool) -> String {
    let padded = format!("{name:<12}");
    if use_color {
        style(padded).dim().force_styling(true).to_string()
    } else {
        padded
    }
}

fn dispatched_line(report: &SessionReport) -> String {
    if report.dispatched.is_empty() {
        return "-".to_string();
    }
    let labels = report.dispatched.join(" ");
    if report.dispatch_count > report.dispatched.len() {
        format!(
            "{labels} (last {} of {})",
            report.dispatched.len(),
            report.dispatch_count
        )
    } else {
        labels
    }
}

/// Renders a replay result
pub fn render_replay(
    output: &ReplayOutput,
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
) -> CliResult<String> {
    if let Some(text) = format.structured(output)? {
        return Ok(text);
    }

    let report = &output.report;
    if quiet {
        return Ok(report.expression.clone());
    }

    let mut lines = vec![
        format!(
            "{}{}",
            key("Expression", use_color),
            paint_result(&report.expression, use_color)
        ),
        format!("{}{}", key("Angle mode", use_color), report.angle_mode.label()),
        format!("{}{}", key("Memory", use_color), format_float(report.memory)),
        format!(
            "{}{} ({})",
            key("Frames", use_color),
            report.frames,
            report.exit_reason
        ),
        format!("{}{}", key("Dispatched", use_color), dispatched_line(report)),
    ];

    if let Some(draw) = &output.draw {
        lines.push(format!("Draw commands ({}):", draw.len()));
        for cmd in draw {
            lines.push(format!("  {}", serde_json::to_string(cmd)?));
        }
    }

    Ok(lines.join("\n"))
}

/// Renders an evaluation result
pub fn render_eval(output: &EvalOutput, format: OutputFormat, use_color: bool) -> CliResult<String> {
    Ok(match format.structured(output)? {
        Some(text) => text,
        None => paint_result(&output.result, use_color),
    })
}

/// Renders the button grid
pub fn render_grid(grid: &ButtonGrid, format: OutputFormat) -> CliResult<String> {
    let buttons: Vec<&ButtonSpec> = grid.iter().collect();
    if let Some(text) = format.structured(&buttons)? {
        return Ok(text);
    }

    let mut lines = vec![format!(
        "{:>3} {:>3}  {:<8} {:>6} {:>6} {:>6} {:>6}",
        "ROW", "COL", "LABEL", "X", "Y", "W", "H"
    )];
    for b in buttons {
        let label = if b.is_placeholder() { "-" } else { b.label };
        lines.push(format!(
            "{:>3} {:>3}  {:<8} {:>6} {:>6} {:>6} {:>6}",
            b.row, b.col, label, b.rect.x, b.rect.y, b.rect.width, b.rect.height
        ));
    }
    Ok(lines.join("\n"))
}

/// Renders the effective configuration; text is YAML
pub fn render_config(config: &AppConfig, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Text => Ok(config.to_yaml()?),
        structured => Ok(structured.structured(config)?.unwrap_or_default()),
    }
}
