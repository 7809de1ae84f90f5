//! Command-line interface entry point for `curriculum-flow`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use curriculum_flow::config::Config;
use curriculum_flow::info;
use curriculum_flow::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};
use std::path::{Path, PathBuf};

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config; an unreadable config level falls back to warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| config.logging.level.parse().ok())
        .unwrap_or(Level::Warn);
    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    let config_log_path = (!config.logging.file.is_empty()).then(|| PathBuf::from(&config.logging.file));
    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        start_file_logging(log_path, verbose);
    }

    match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults);
        }
        Command::Layout {
            input_file,
            toggles,
            format,
            output,
        } => {
            commands::layout::run(&input_file, &toggles, format, output.as_deref(), &config);
        }
        Command::Paths { input_file } => commands::paths::run(&input_file),
        Command::Legend { input_file, axis } => {
            commands::legend::run(&input_file, axis, &config);
        }
    }
}

fn start_file_logging(log_path: &Path, verbose: bool) {
    let display_path = log_path.to_string_lossy();
    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        let _ = std::fs::create_dir_all(parent);
    }
    if init_file_logging(log_path) {
        if verbose {
            eprintln!("✓ File logging initialized at: {display_path}");
        } else {
            info!("File logging initialized at: {display_path}");
        }
    } else {
        eprintln!("✗ Failed to initialize file logging at: {display_path}");
    }
}
