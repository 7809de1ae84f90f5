//! CLI command handlers for `curriculum-flow`.
//!
//! Each subcommand is implemented in its own submodule.

pub mod config;
pub mod layout;
pub mod legend;
pub mod paths;

use curriculum_flow::core::models::Course;
use curriculum_flow::core::planner::parse_courses_json;
use curriculum_flow::{error, info};
use std::path::Path;

/// Load a course list, turning failures into a printable message
pub(crate) fn load_courses(input_file: &Path) -> Result<Vec<Course>, String> {
    let courses = parse_courses_json(input_file).map_err(|e| {
        error!("Failed to load course list {}: {e}", input_file.display());
        format!("✗ Failed to load {}: {e}", input_file.display())
    })?;
    info!(
        "Course list loaded: {} ({} courses)",
        input_file.display(),
        courses.len()
    );
    Ok(courses)
}
