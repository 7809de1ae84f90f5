//! Semester layout engine
//!
//! Places every course in the column of its semester and decides the vertical
//! order inside each column:
//! 1. Columns are processed in ascending semester order
//! 2. With `optimize`, courses after the first semester are sorted by the mean
//!    center-y of their already placed prerequisites (none → last), ties by id
//! 3. With `spaced` + `optimize`, rows after the first semester are pulled
//!    toward the row implied by the prerequisites but never reused
//! 4. Edges connect the right-center of each placed prerequisite to the
//!    left-center of the course requiring it
//!
//! The result is a pure function of `(courses, geometry, options)`.

use super::{Edge, LayoutGeometry, Point};
use crate::core::models::Course;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Toggles that affect the semester layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Order columns by prerequisite position instead of plain id order
    pub optimize: bool,
    /// Use the wider row gap (and strategic placement when optimized)
    pub spaced: bool,
}

impl LayoutOptions {
    /// Create a set of layout toggles
    #[must_use]
    pub const fn new(optimize: bool, spaced: bool) -> Self {
        Self { optimize, spaced }
    }

    /// Strategic placement applies to every column after the first when
    /// both toggles are on
    #[must_use]
    pub const fn is_strategic(self, semester: u32) -> bool {
        self.optimize && self.spaced && semester > 1
    }
}

/// A placed course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    /// Id of the placed course
    pub course_id: String,
    /// Column semester (1-based)
    pub semester: u32,
    /// Row index inside the column (0-based)
    pub row: usize,
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
}

impl LayoutNode {
    /// Top-left corner of the node
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Output of the semester layout engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    /// One node per placed course, in placement order
    pub nodes: Vec<LayoutNode>,
    /// Prerequisite edges between placed nodes
    pub edges: Vec<Edge>,
    /// Overall drawing width
    pub width: f64,
    /// Overall drawing height
    pub height: f64,
    /// Highest semester number present
    pub num_semesters: u32,
    /// Row gap of the grid lattice (compact or spaced)
    pub row_gap: f64,
    /// Toggles the layout was computed with
    pub options: LayoutOptions,
    /// Geometry constants the layout was computed with
    pub geometry: LayoutGeometry,
    /// Summed credits per semester
    pub semester_credits: BTreeMap<u32, f32>,
}

impl LayoutResult {
    /// Degenerate layout for an empty course list
    #[must_use]
    pub fn empty(geometry: LayoutGeometry, options: LayoutOptions) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            width: geometry.padding * 2.0,
            height: geometry.padding * 2.0,
            num_semesters: 0,
            row_gap: geometry.row_gap(options.spaced),
            options,
            geometry,
            semester_credits: BTreeMap::new(),
        }
    }

    /// Find the node of a course
    #[must_use]
    pub fn node(&self, course_id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.course_id == course_id)
    }

    /// Top-left corner of a course's node
    #[must_use]
    pub fn position(&self, course_id: &str) -> Option<Point> {
        self.node(course_id).map(LayoutNode::origin)
    }

    /// Vertical increment of the grid lattice
    #[must_use]
    pub fn row_height(&self) -> f64 {
        self.geometry.node_height + self.row_gap
    }

    /// Horizontal increment of the grid lattice
    #[must_use]
    pub fn column_width(&self) -> f64 {
        self.geometry.column_width()
    }

    /// Whether nothing was placed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Nodes placed so far, indexed by course id
#[derive(Default)]
struct Placement<'a> {
    nodes: Vec<LayoutNode>,
    courses: Vec<&'a Course>,
    index: HashMap<&'a str, usize>,
}

impl<'a> Placement<'a> {
    fn position(&self, course_id: &str) -> Option<Point> {
        self.index.get(course_id).map(|&i| self.nodes[i].origin())
    }

    /// Mean center-y of the placed prerequisites of `course`
    fn mean_prerequisite_center(&self, course: &Course, geometry: &LayoutGeometry) -> Option<f64> {
        let mut seen = HashSet::new();
        let (sum, count) = course
            .prerequisites
            .iter()
            .filter(|p| seen.insert(p.as_str()))
            .filter_map(|p| self.position(p))
            .fold((0.0, 0u32), |(sum, count), origin| {
                (sum + origin.y + geometry.node_height / 2.0, count + 1)
            });
        (count > 0).then(|| sum / f64::from(count))
    }

    fn place(&mut self, course: &'a Course, semester: u32, row: usize, x: f64, y: f64) {
        if self.index.contains_key(course.id.as_str()) {
            crate::warn!("Duplicate course id '{}' skipped by the semester layout", course.id);
            return;
        }
        self.index.insert(course.id.as_str(), self.nodes.len());
        self.courses.push(course);
        self.nodes.push(LayoutNode {
            course_id: course.id.clone(),
            semester,
            row,
            x,
            y,
        });
    }
}

/// Compute the semester-view layout
///
/// # Arguments
/// * `courses` - Course list; ids are expected to be unique
/// * `geometry` - Node and spacing constants
/// * `options` - Ordering and spacing toggles
///
/// # Returns
/// Node positions, prerequisite edges and overall dimensions. An empty course
/// list yields [`LayoutResult::empty`].
#[must_use]
pub fn compute_semester_layout(
    courses: &[Course],
    geometry: &LayoutGeometry,
    options: LayoutOptions,
) -> LayoutResult {
    if courses.is_empty() {
        return LayoutResult::empty(*geometry, options);
    }

    let mut columns: BTreeMap<u32, Vec<&Course>> = BTreeMap::new();
    for course in courses {
        columns.entry(course.column_semester()).or_default().push(course);
    }

    let semester_credits: BTreeMap<u32, f32> = columns
        .iter()
        .map(|(&semester, members)| (semester, members.iter().map(|c| c.credits).sum()))
        .collect();
    let num_semesters = columns.keys().next_back().copied().unwrap_or(0);

    let mut placement = Placement::default();
    for (&semester, members) in &columns {
        let ordered = order_column(semester, members, &placement, geometry, options);
        if options.is_strategic(semester) {
            place_strategic(semester, &ordered, &mut placement, geometry);
        } else {
            place_stacked(semester, &ordered, &mut placement, geometry, options);
        }
    }

    let max_y = placement.nodes.iter().map(|n| n.y).fold(0.0, f64::max);
    let height = max_y + geometry.node_height + geometry.padding * 2.0;
    let width = f64::from(num_semesters) * geometry.column_width() - geometry.column_gap
        + geometry.padding * 2.0;

    let edges = build_edges(
        placement.courses.iter().copied(),
        |id| placement.position(id),
        geometry,
    );

    crate::debug!(
        "Semester layout: {} nodes, {} edges across {num_semesters} semesters (optimize={}, spaced={})",
        placement.nodes.len(),
        edges.len(),
        options.optimize,
        options.spaced
    );

    LayoutResult {
        nodes: placement.nodes,
        edges,
        width,
        height,
        num_semesters,
        row_gap: geometry.row_gap(options.spaced),
        options,
        geometry: *geometry,
        semester_credits,
    }
}

/// Sort one column's courses
fn order_column<'a>(
    semester: u32,
    members: &[&'a Course],
    placement: &Placement,
    geometry: &LayoutGeometry,
    options: LayoutOptions,
) -> Vec<&'a Course> {
    if !(options.optimize && semester > 1) {
        let mut ordered = members.to_vec();
        ordered.sort_by(|a, b| a.id.cmp(&b.id));
        return ordered;
    }

    let mut keyed: Vec<(f64, &'a Course)> = members
        .iter()
        .map(|&c| {
            let key = placement
                .mean_prerequisite_center(c, geometry)
                .unwrap_or(f64::INFINITY);
            (key, c)
        })
        .collect();
    keyed.sort_by(|(ya, a), (yb, b)| ya.total_cmp(yb).then_with(|| a.id.cmp(&b.id)));
    keyed.into_iter().map(|(_, c)| c).collect()
}

/// Stack courses at fixed row increments
#[allow(clippy::cast_precision_loss)]
fn place_stacked<'a>(
    semester: u32,
    ordered: &[&'a Course],
    placement: &mut Placement<'a>,
    geometry: &LayoutGeometry,
    options: LayoutOptions,
) {
    let x = geometry.column_x(semester);
    let row_height = geometry.node_height + geometry.row_gap(options.spaced);
    for (row, &course) in ordered.iter().enumerate() {
        let y = geometry.base_y() + row as f64 * row_height;
        placement.place(course, semester, row, x, y);
    }
}

/// Pull each course toward the row of its prerequisites' mean center
///
/// The assigned row is `max(candidate, next_available)` where the candidate
/// is the rounded row of the ideal top edge, so rows strictly increase down
/// the column and never collide.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn place_strategic<'a>(
    semester: u32,
    ordered: &[&'a Course],
    placement: &mut Placement<'a>,
    geometry: &LayoutGeometry,
) {
    let x = geometry.column_x(semester);
    let base_y = geometry.base_y();
    let row_height = geometry.node_height + geometry.strategic_row_gap;
    let mut next_available = 0usize;

    for &course in ordered {
        let row = match placement.mean_prerequisite_center(course, geometry) {
            Some(center) if row_height > 0.0 => {
                let ideal_top = center - geometry.node_height / 2.0;
                let candidate = ((ideal_top - base_y) / row_height).round();
                let candidate = if candidate.is_finite() && candidate > 0.0 {
                    candidate as usize
                } else {
                    0
                };
                candidate.max(next_available)
            }
            _ => next_available,
        };
        placement.place(course, semester, row, x, base_y + row as f64 * row_height);
        next_available = row.saturating_add(1);
    }
}

/// Emit one edge per (placed prerequisite, placed course) pair
///
/// # Arguments
/// * `courses` - Courses whose prerequisites are turned into edges, in output order
/// * `position_of` - Top-left corner of a course's node, `None` when not placed
/// * `geometry` - Node size used for the anchors
pub fn build_edges<'a, I, F>(courses: I, position_of: F, geometry: &LayoutGeometry) -> Vec<Edge>
where
    I: IntoIterator<Item = &'a Course>,
    F: Fn(&str) -> Option<Point>,
{
    let mut edges = Vec::new();
    for course in courses {
        let Some(target) = position_of(&course.id) else {
            continue;
        };
        let mut seen = HashSet::new();
        for prereq in &course.prerequisites {
            if !seen.insert(prereq.as_str()) {
                continue;
            }
            if let Some(source) = position_of(prereq) {
                edges.push(Edge::between(prereq, &course.id, source, target, geometry));
            }
        }
    }
    edges
}
