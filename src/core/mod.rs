//! Curriculum flowchart domain: models, layout engines, legend and view state

pub mod export;
pub mod layout;
pub mod legend;
pub mod models;
pub mod planner;
pub mod view;

/// Returns the current version of the `curriculum-flow` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
