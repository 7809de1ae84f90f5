//! Legend command handler

use super::load_courses;
use curriculum_flow::config::Config;
use curriculum_flow::core::legend::{HighlightAxis, Legend};
use curriculum_flow::warn;
use std::path::Path;

/// Print the legend of a course list along `axis` (config `highlight` when omitted)
pub fn run(input_file: &Path, axis: Option<HighlightAxis>, config: &Config) {
    let axis = axis.unwrap_or_else(|| {
        config.layout.highlight.parse().unwrap_or_else(|e| {
            warn!("Ignoring invalid highlight in config: {e}");
            HighlightAxis::default()
        })
    });

    match load_courses(input_file) {
        Ok(courses) => {
            let legend = Legend::build(&courses, axis);
            println!();
            print!("{legend}");
            let uncategorized = legend.total_credits - legend.categorized_credits();
            if uncategorized > f32::EPSILON {
                println!("  ({uncategorized} cr without a {axis} category)");
            }
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
