//! Paths command handler

use super::load_courses;
use curriculum_flow::core::layout::enumerate_paths;
use curriculum_flow::core::models::CourseGraph;
use curriculum_flow::verbose;
use std::path::Path;

/// Print every dependency chain of a course list in lane order
pub fn run(input_file: &Path) {
    let courses = match load_courses(input_file) {
        Ok(courses) => courses,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let graph = CourseGraph::build(&courses);
    verbose!("{graph}");
    let paths = enumerate_paths(&graph, &courses);

    println!("\n=== Dependency chains ({}) ===\n", paths.len());
    for line in format_paths(&paths) {
        println!("{line}");
    }
}

/// One line per chain: `Lane N: A → B → C`
fn format_paths(paths: &[Vec<String>]) -> Vec<String> {
    let width = paths.len().to_string().len();
    paths
        .iter()
        .enumerate()
        .map(|(lane, path)| format!("Lane {:>width$}: {}", lane + 1, path.join(" → ")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_paths() {
        let paths = vec![
            vec!["A".to_string(), "B".to_string(), "D".to_string()],
            vec!["A".to_string(), "C".to_string(), "D".to_string()],
        ];
        let lines = format_paths(&paths);
        assert_eq!(lines[0], "Lane 1: A → B → D");
        assert_eq!(lines[1], "Lane 2: A → C → D");
    }
}
