//! Layout command handler
//!
//! Computes the semester or horizontal view of a course list and writes it as
//! JSON geometry or an SVG drawing.

use super::load_courses;
use crate::args::LayoutArgs;
use curriculum_flow::config::Config;
use curriculum_flow::core::export::{output_file_name, write_export, LayoutFormat};
use curriculum_flow::core::view::{FlowchartState, ViewSettings};
use curriculum_flow::{error, info, verbose, warn};
use std::path::{Path, PathBuf};

/// Run the layout command.
///
/// # Arguments
/// * `input_file` - Path to a JSON course list
/// * `toggles` - Command-line toggles layered over the config defaults
/// * `format` - Output format
/// * `output` - Optional output path
/// * `config` - Configuration with default toggles, geometry and output directory
pub fn run(
    input_file: &Path,
    toggles: &LayoutArgs,
    format: LayoutFormat,
    output: Option<&Path>,
    config: &Config,
) {
    match generate(input_file, toggles, format, output, config) {
        Ok(path) => println!("✓ Layout written: {}", path.display()),
        Err(err) => {
            error!("Layout failed for {}: {err}", input_file.display());
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

/// Settings from config, overridden by whatever was given on the command line
pub(crate) fn resolve_settings(config: &Config, toggles: &LayoutArgs) -> ViewSettings {
    let mut settings = config.layout.view_settings().unwrap_or_else(|e| {
        warn!("Ignoring invalid [layout] config: {e}");
        ViewSettings::default()
    });
    if let Some(view) = toggles.view {
        settings.view = view;
    }
    if let Some(optimize) = toggles.optimize {
        settings.optimize = optimize;
    }
    if let Some(spaced) = toggles.spaced {
        settings.spaced = spaced;
    }
    if let Some(orthogonal) = toggles.orthogonal {
        settings.orthogonal = orthogonal;
    }
    if let Some(highlight) = toggles.highlight {
        settings.highlight = highlight;
    }
    settings
}

fn default_output(input_file: &Path, settings: &ViewSettings, format: LayoutFormat, config: &Config) -> PathBuf {
    let stem = input_file
        .file_stem()
        .map_or_else(|| "plan".to_string(), |s| s.to_string_lossy().to_string());
    PathBuf::from(&config.paths.out_dir).join(output_file_name(&stem, settings.view, format))
}

fn generate(
    input_file: &Path,
    toggles: &LayoutArgs,
    format: LayoutFormat,
    output: Option<&Path>,
    config: &Config,
) -> Result<PathBuf, String> {
    let courses = load_courses(input_file)?;
    let settings = resolve_settings(config, toggles);

    let mut state = FlowchartState::with_geometry(
        courses,
        settings,
        config.geometry,
        config.lanes,
        config.routing,
    );

    let legend = state.legend();
    for category in &toggles.hide {
        if legend.entry(category).is_none() {
            warn!(
                "Category '{category}' is not in the {} legend",
                settings.highlight
            );
            continue;
        }
        state.toggle_category(category);
    }

    let layout = state.layout();
    verbose!(
        "{} view: {} semesters, {} nodes, {} edges",
        settings.view,
        layout.num_semesters,
        layout.nodes.len(),
        layout.edges.len()
    );
    if let Some(lanes) = state.lane_layout() {
        verbose!("{} lanes", lanes.lane_count());
    }

    let path = output.map_or_else(
        || default_output(input_file, &settings, format, config),
        Path::to_path_buf,
    );
    write_export(&state, format, &path)
        .map_err(|e| format!("✗ Failed to write {}: {e}", path.display()))?;
    info!("Layout exported: {}", path.display());
    Ok(path)
}
