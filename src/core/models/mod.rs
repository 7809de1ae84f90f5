//! Data models for curriculum plans

pub mod course;
pub mod graph;

pub use course::{Course, CourseComponent, CourseType, EvaluationType, HourBreakdown, Modality};
pub use graph::{CourseGraph, GraphNode};
