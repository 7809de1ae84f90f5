//! Curriculum flowchart layout library
//!
//! Lays out a curriculum's courses as a prerequisite flowchart: semester
//! columns with prerequisite-aware ordering, one lane per dependency chain,
//! straight or orthogonal edge routing, drag repositioning and a credit
//! legend per classification axis. Shared by the `curriculum-flow` CLI.

pub mod config;
pub mod core;
pub mod logger;

pub use crate::core::get_version;
