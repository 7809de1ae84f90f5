//! Course-list import

pub mod json_import;

pub use json_import::{parse_courses_json, parse_courses_json_str, semester_from_id};
