//! Horizontal flow view: one lane per dependency chain
//!
//! Every root-to-terminal chain of prerequisites is enumerated and drawn in
//! its own lane. Courses keep their semester column, so the same course can
//! appear in several lanes as separate node instances.

use super::LaneGeometry;
use crate::core::models::{Course, CourseGraph};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One course instance inside a lane
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneNode {
    /// Rendering identity, unique across the layout: `"<lane>-<index>-<course>"`
    pub instance_id: String,
    /// Course this instance stands for
    pub course_id: String,
    /// Lane (0-based)
    pub lane: usize,
    /// Position inside the chain, 0 at the root
    pub index: usize,
    /// Column semester
    pub semester: u32,
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
}

/// Edge between consecutive instances of one lane
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneEdge {
    /// Edge id, `"<lane>:<source>><target>"`
    pub id: String,
    /// Prerequisite course id
    pub source_id: String,
    /// Dependent course id
    pub target_id: String,
    /// Lane the edge belongs to
    pub lane: usize,
    /// Source anchor x
    pub x1: f64,
    /// Source anchor y
    pub y1: f64,
    /// Target anchor x
    pub x2: f64,
    /// Target anchor y
    pub y2: f64,
}

/// Output of the lane layout engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneLayout {
    /// Enumerated chains in lane order, each from root to terminal
    pub paths: Vec<Vec<String>>,
    /// Node instances, lane by lane
    pub nodes: Vec<LaneNode>,
    /// Edges inside lanes
    pub edges: Vec<LaneEdge>,
    /// Overall drawing width
    pub width: f64,
    /// Overall drawing height
    pub height: f64,
    /// Highest semester column drawn
    pub max_semester: u32,
    /// Geometry constants used
    pub geometry: LaneGeometry,
}

impl LaneLayout {
    /// Number of lanes
    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.paths.len()
    }

    /// Lanes in which a course appears
    #[must_use]
    pub fn lanes_of(&self, course_id: &str) -> Vec<usize> {
        self.paths
            .iter()
            .enumerate()
            .filter(|(_, path)| path.iter().any(|id| id == course_id))
            .map(|(lane, _)| lane)
            .collect()
    }
}

/// Ids on the current recursion branch, newest first
///
/// Each frame borrows its caller's, so the branch is immutable and cycle
/// detection stays local to one branch.
struct Trail<'a> {
    id: &'a str,
    prev: Option<&'a Trail<'a>>,
}

impl Trail<'_> {
    fn contains(&self, id: &str) -> bool {
        let mut cursor = Some(self);
        while let Some(frame) = cursor {
            if frame.id == id {
                return true;
            }
            cursor = frame.prev;
        }
        false
    }

    /// The branch read from the newest frame (a root) back to the terminal
    fn to_path(&self) -> Vec<String> {
        let mut path = Vec::new();
        let mut cursor = Some(self);
        while let Some(frame) = cursor {
            path.push(frame.id.to_string());
            cursor = frame.prev;
        }
        path
    }
}

fn walk(graph: &CourseGraph, trail: &Trail<'_>, paths: &mut Vec<Vec<String>>, pruned: &mut usize) {
    let Some(parents) = graph.parents(trail.id) else {
        return;
    };
    if parents.is_empty() {
        paths.push(trail.to_path());
        return;
    }
    for parent in parents {
        if trail.contains(parent) {
            *pruned += 1;
            continue;
        }
        let next = Trail {
            id: parent.as_str(),
            prev: Some(trail),
        };
        walk(graph, &next, paths, pruned);
    }
}

/// Enumerate every root-to-terminal prerequisite chain
///
/// Branches that would revisit a course already on the branch are dropped,
/// so cyclic input terminates; a pure cycle yields no chain at all.
///
/// # Arguments
/// * `graph` - Graph index built from `courses`
/// * `courses` - Course list, used for the terminal semester sort key
///
/// # Returns
/// Distinct chains sorted by length, then terminal semester, then terminal id
#[must_use]
pub fn enumerate_paths(graph: &CourseGraph, courses: &[Course]) -> Vec<Vec<String>> {
    let mut found = Vec::new();
    let mut pruned = 0usize;
    for terminal in graph.terminals() {
        walk(
            graph,
            &Trail {
                id: terminal,
                prev: None,
            },
            &mut found,
            &mut pruned,
        );
    }

    if pruned > 0 {
        crate::warn!("Prerequisite cycle detected: pruned {pruned} branch(es) during path enumeration");
    }

    let mut seen = HashSet::new();
    let mut paths: Vec<Vec<String>> = found
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect();

    let semesters = semester_lookup(courses);
    let terminal_semester = |path: &[String]| {
        path.last()
            .and_then(|id| semesters.get(id.as_str()))
            .copied()
            .unwrap_or(1)
    };
    paths.sort_by(|a, b| {
        a.len()
            .cmp(&b.len())
            .then_with(|| terminal_semester(a).cmp(&terminal_semester(b)))
            .then_with(|| a.last().cmp(&b.last()))
    });
    paths
}

fn semester_lookup(courses: &[Course]) -> HashMap<&str, u32> {
    let mut semesters = HashMap::with_capacity(courses.len());
    for course in courses {
        semesters
            .entry(course.id.as_str())
            .or_insert_with(|| course.column_semester());
    }
    semesters
}

/// Compute the horizontal (lane) layout
///
/// # Arguments
/// * `courses` - Course list
/// * `geometry` - Lane geometry constants
///
/// # Returns
/// One lane per enumerated chain. An empty course list yields no lanes and a
/// `2 * padding` square.
#[must_use]
pub fn compute_lane_layout(courses: &[Course], geometry: &LaneGeometry) -> LaneLayout {
    if courses.is_empty() {
        return LaneLayout {
            paths: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            width: geometry.padding * 2.0,
            height: geometry.padding * 2.0,
            max_semester: 0,
            geometry: *geometry,
        };
    }

    let graph = CourseGraph::build(courses);
    let paths = enumerate_paths(&graph, courses);
    let semesters = semester_lookup(courses);

    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    for (lane, path) in paths.iter().enumerate() {
        let y = geometry.lane_y(lane);
        let lane_start = nodes.len();
        for (index, course_id) in path.iter().enumerate() {
            let semester = semesters.get(course_id.as_str()).copied().unwrap_or(1);
            nodes.push(LaneNode {
                instance_id: format!("{lane}-{index}-{course_id}"),
                course_id: course_id.clone(),
                lane,
                index,
                semester,
                x: geometry.column_x(semester),
                y,
            });
        }
        let mut previous: Option<&LaneNode> = None;
        for node in &nodes[lane_start..] {
            if let Some(prev) = previous {
                edges.push(LaneEdge {
                    id: format!("{lane}:{}>{}", prev.course_id, node.course_id),
                    source_id: prev.course_id.clone(),
                    target_id: node.course_id.clone(),
                    lane,
                    x1: prev.x + geometry.node_width,
                    y1: prev.y + geometry.node_height / 2.0,
                    x2: node.x,
                    y2: node.y + geometry.node_height / 2.0,
                });
            }
            previous = Some(node);
        }
    }

    let max_semester = courses
        .iter()
        .map(Course::column_semester)
        .max()
        .unwrap_or(1)
        .max(1);
    let width = f64::from(max_semester) * geometry.column_width() + geometry.padding * 2.0
        - geometry.column_gap;
    #[allow(clippy::cast_precision_loss)]
    let height =
        paths.len() as f64 * geometry.lane_height() + geometry.padding + geometry.header_height;

    crate::debug!(
        "Lane layout: {} lanes, {} node instances, {} edges",
        paths.len(),
        nodes.len(),
        edges.len()
    );

    LaneLayout {
        paths,
        nodes,
        edges,
        width,
        height,
        max_semester,
        geometry: *geometry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: &str, semester: u32, prereqs: &[&str]) -> Course {
        Course::new(id.to_string(), id.to_string(), semester, 3.0)
            .with_prerequisites(prereqs.iter().copied())
    }

    fn paths_of(courses: &[Course]) -> Vec<Vec<String>> {
        enumerate_paths(&CourseGraph::build(courses), courses)
    }

    fn path(ids: &[&str]) -> Vec<String> {
        ids.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_diamond_yields_two_paths() {
        let courses = vec![
            course("A", 1, &[]),
            course("B", 2, &["A"]),
            course("C", 2, &["A"]),
            course("D", 3, &["B", "C"]),
        ];

        assert_eq!(
            paths_of(&courses),
            vec![path(&["A", "B", "D"]), path(&["A", "C", "D"])]
        );
    }

    #[test]
    fn test_disconnected_course_is_single_node_path() {
        let courses = vec![course("SOLO", 4, &[])];
        assert_eq!(paths_of(&courses), vec![path(&["SOLO"])]);
    }

    #[test]
    fn test_pure_cycle_terminates_empty() {
        let courses = vec![course("A", 1, &["B"]), course("B", 2, &["A"])];
        assert!(paths_of(&courses).is_empty());
    }

    #[test]
    fn test_cycle_branch_pruned_valid_branch_kept() {
        let courses = vec![
            course("A", 1, &[]),
            course("B", 2, &["A", "C"]),
            course("C", 3, &["B"]),
            course("D", 4, &["B"]),
        ];

        assert_eq!(paths_of(&courses), vec![path(&["A", "B", "D"])]);
    }

    #[test]
    fn test_paths_sorted_by_length_semester_then_id() {
        let courses = vec![
            course("A", 1, &[]),
            course("B", 2, &["A"]),
            course("Z", 3, &[]),
            course("Y", 1, &[]),
        ];

        assert_eq!(
            paths_of(&courses),
            vec![path(&["Y"]), path(&["Z"]), path(&["A", "B"])]
        );
    }

    #[test]
    fn test_lane_nodes_follow_semester_columns() {
        let courses = vec![
            course("A", 1, &[]),
            course("B", 2, &["A"]),
            course("C", 2, &["A"]),
            course("D", 3, &["B", "C"]),
        ];
        let geometry = LaneGeometry::default();
        let layout = compute_lane_layout(&courses, &geometry);

        assert_eq!(layout.lane_count(), 2);
        assert_eq!(layout.nodes.len(), 6);
        assert_eq!(layout.edges.len(), 4);
        assert_eq!(layout.lanes_of("A"), vec![0, 1]);

        let instances: HashSet<&str> = layout.nodes.iter().map(|n| n.instance_id.as_str()).collect();
        assert_eq!(instances.len(), 6);

        let d = layout
            .nodes
            .iter()
            .find(|n| n.course_id == "D" && n.lane == 1)
            .unwrap();
        assert!((d.x - geometry.column_x(3)).abs() < f64::EPSILON);
        assert!((d.y - geometry.lane_y(1)).abs() < f64::EPSILON);

        assert_eq!(layout.max_semester, 3);
        assert!((layout.width - (3.0 * 220.0 + 40.0 - 60.0)).abs() < f64::EPSILON);
        assert!((layout.height - (2.0 * 120.0 + 20.0 + 60.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lane_edge_ids() {
        let courses = vec![course("A", 1, &[]), course("B", 2, &["A"])];
        let layout = compute_lane_layout(&courses, &LaneGeometry::default());

        assert_eq!(layout.edges.len(), 1);
        assert_eq!(layout.edges[0].id, "0:A>B");
        assert!((layout.edges[0].x1 - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_lane_layout() {
        let layout = compute_lane_layout(&[], &LaneGeometry::default());
        assert!(layout.nodes.is_empty());
        assert_eq!(layout.lane_count(), 0);
    }
}
