//! CLI argument definitions for `curriculum-flow`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use curriculum_flow::config::ConfigOverrides;
use curriculum_flow::core::export::LayoutFormat;
use curriculum_flow::core::legend::HighlightAxis;
use curriculum_flow::core::view::ViewMode;
use curriculum_flow::logger::Level;

/// CLI log level argument
///
/// Converts to a lowercase string for config storage and to `Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key (e.g., `level`, `view`, `geometry.node_width`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

/// Flowchart toggles given on the command line; `None` keeps the config value
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LayoutArgs {
    /// View to compute: semester or horizontal
    #[arg(long, value_name = "VIEW", value_parser = parse_view)]
    pub view: Option<ViewMode>,

    /// Order semester columns by prerequisite position (true/false)
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub optimize: Option<bool>,

    /// Wider rows; with --optimize enables strategic placement (true/false)
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub spaced: Option<bool>,

    /// Route edges with orthogonal rounded corners (true/false)
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub orthogonal: Option<bool>,

    /// Highlight axis: component, evaluation, type, department, area
    #[arg(long, value_name = "AXIS", value_parser = parse_axis)]
    pub highlight: Option<HighlightAxis>,

    /// Legend category to hide (repeatable)
    #[arg(long = "hide", value_name = "CATEGORY")]
    pub hide: Vec<String>,
}

fn parse_view(value: &str) -> Result<ViewMode, String> {
    value.parse()
}

fn parse_axis(value: &str) -> Result<HighlightAxis, String> {
    value.parse()
}

fn parse_format(value: &str) -> Result<LayoutFormat, String> {
    value.parse()
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Lay out a course list as a flowchart.
    ///
    /// Computes the selected view and writes it as JSON geometry or an SVG drawing.
    Layout {
        /// Path to a JSON course list
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        #[command(flatten)]
        toggles: LayoutArgs,

        /// Output format: json or svg
        #[arg(short, long, value_name = "FORMAT", default_value = "json", value_parser = parse_format)]
        format: LayoutFormat,

        /// Output file path (optional; defaults to `<out_dir>/<stem>_<view>.<ext>`)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Print every dependency chain of a course list, one per lane.
    Paths {
        /// Path to a JSON course list
        #[arg(value_name = "FILE")]
        input_file: PathBuf,
    },
    /// Print the credit legend of a course list.
    Legend {
        /// Path to a JSON course list
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Classification axis (defaults to config `highlight`)
        #[arg(long, value_name = "AXIS", value_parser = parse_axis)]
        axis: Option<HighlightAxis>,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "curriculum-flow",
    about = "Curriculum prerequisite flowchart layout",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config output directory
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// # Returns
    /// A `ConfigOverrides` struct where `None` means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            out_dir: self
                .out_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_cli(command: Command) -> Cli {
        Cli {
            log_level: None,
            verbose: false,
            debug_flag: false,
            log_file: None,
            config_level: None,
            config_log_file: None,
            config_verbose: None,
            out_dir: None,
            command,
        }
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_logger_level() {
        assert_eq!(Level::from(LogLevelArg::Error), Level::Error);
        assert_eq!(Level::from(LogLevelArg::Debug), Level::Debug);
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let overrides = bare_cli(Command::Config { subcommand: None }).to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.file.is_none());
        assert!(overrides.verbose.is_none());
        assert!(overrides.out_dir.is_none());
    }

    #[test]
    fn test_to_config_overrides_with_values() {
        let mut cli = bare_cli(Command::Config { subcommand: None });
        cli.config_level = Some(LogLevelArg::Debug);
        cli.config_log_file = Some(PathBuf::from("/tmp/test.log"));
        cli.config_verbose = Some(true);
        cli.out_dir = Some(PathBuf::from("/output"));

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.level, Some("debug".to_string()));
        assert_eq!(overrides.file, Some("/tmp/test.log".to_string()));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(overrides.out_dir, Some("/output".to_string()));
    }

    #[test]
    fn test_parse_layout_command() {
        let cli = Cli::try_parse_from([
            "curriculum-flow",
            "layout",
            "plan.json",
            "--view",
            "lanes",
            "--spaced",
            "true",
            "--hide",
            "Basic Sciences",
            "--hide",
            "Humanities",
            "--format",
            "svg",
        ])
        .expect("valid arguments");

        let Command::Layout {
            input_file,
            toggles,
            format,
            output,
        } = cli.command
        else {
            panic!("expected layout command");
        };
        assert_eq!(input_file, PathBuf::from("plan.json"));
        assert_eq!(toggles.view, Some(ViewMode::Horizontal));
        assert_eq!(toggles.spaced, Some(true));
        assert_eq!(toggles.optimize, None);
        assert_eq!(toggles.hide.len(), 2);
        assert_eq!(format, LayoutFormat::Svg);
        assert!(output.is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_axis() {
        let result = Cli::try_parse_from(["curriculum-flow", "legend", "plan.json", "--axis", "color"]);
        assert!(result.is_err());
    }
}
