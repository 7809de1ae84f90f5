//! Prerequisite graph index shared by both layout engines

use crate::core::models::Course;
use indexmap::{IndexMap, IndexSet};
use std::fmt;

/// Adjacency of a single course in the prerequisite graph
///
/// Edges run from a prerequisite (parent) to the course that requires it
/// (child). Both sets keep insertion order so traversals are deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// Id of the course this node stands for
    pub course_id: String,

    /// Courses that list this course as a prerequisite
    pub children: IndexSet<String>,

    /// Prerequisites of this course that exist in the course set
    pub parents: IndexSet<String>,
}

impl GraphNode {
    fn new(course_id: String) -> Self {
        Self {
            course_id,
            children: IndexSet::new(),
            parents: IndexSet::new(),
        }
    }

    /// Nothing depends on this course
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }

    /// This course has no (resolvable) prerequisites
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Graph index over a course list
///
/// Built from scratch from a `&[Course]`; there is no incremental mutation.
/// Prerequisite ids that do not match any course are ignored, as are
/// self references.
#[derive(Debug, Clone, Default)]
pub struct CourseGraph {
    nodes: IndexMap<String, GraphNode>,
}

impl CourseGraph {
    /// Build the adjacency index in O(n + e)
    ///
    /// # Arguments
    /// * `courses` - The course list; node order follows it
    #[must_use]
    pub fn build(courses: &[Course]) -> Self {
        let mut nodes: IndexMap<String, GraphNode> = courses
            .iter()
            .map(|c| (c.id.clone(), GraphNode::new(c.id.clone())))
            .collect();

        let mut dangling = 0usize;
        for course in courses {
            for prereq in &course.prerequisites {
                if prereq == &course.id {
                    continue;
                }
                if let Some(parent) = nodes.get_mut(prereq) {
                    parent.children.insert(course.id.clone());
                } else {
                    dangling += 1;
                    continue;
                }
                if let Some(child) = nodes.get_mut(&course.id) {
                    child.parents.insert(prereq.clone());
                }
            }
        }

        if dangling > 0 {
            crate::debug!("Graph index ignored {dangling} dangling prerequisite reference(s)");
        }

        Self { nodes }
    }

    /// Look up a node by course id
    #[must_use]
    pub fn get(&self, course_id: &str) -> Option<&GraphNode> {
        self.nodes.get(course_id)
    }

    /// Courses that depend on `course_id`
    #[must_use]
    pub fn children(&self, course_id: &str) -> Option<&IndexSet<String>> {
        self.nodes.get(course_id).map(|n| &n.children)
    }

    /// Prerequisites of `course_id`
    #[must_use]
    pub fn parents(&self, course_id: &str) -> Option<&IndexSet<String>> {
        self.nodes.get(course_id).map(|n| &n.parents)
    }

    /// Terminal courses (no dependents), in course-list order
    #[must_use]
    pub fn terminals(&self) -> Vec<&str> {
        self.nodes
            .values()
            .filter(|n| n.is_terminal())
            .map(|n| n.course_id.as_str())
            .collect()
    }

    /// Root courses (no prerequisites), in course-list order
    #[must_use]
    pub fn roots(&self) -> Vec<&str> {
        self.nodes
            .values()
            .filter(|n| n.is_root())
            .map(|n| n.course_id.as_str())
            .collect()
    }

    /// Iterate nodes in course-list order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// Number of courses in the graph
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no courses
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check if a course exists in the graph
    #[must_use]
    pub fn contains(&self, course_id: &str) -> bool {
        self.nodes.contains_key(course_id)
    }

    /// Total number of resolved prerequisite edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.parents.len()).sum()
    }
}

impl fmt::Display for CourseGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Prerequisite graph ({} courses):", self.nodes.len())?;
        writeln!(f)?;

        let mut sorted: Vec<&GraphNode> = self.nodes.values().collect();
        sorted.sort_by(|a, b| a.course_id.cmp(&b.course_id));

        for node in sorted {
            if node.parents.is_empty() {
                writeln!(f, "  {} → (no prerequisites)", node.course_id)?;
            } else {
                let parents: Vec<&str> = node.parents.iter().map(String::as_str).collect();
                writeln!(f, "  {} → {}", node.course_id, parents.join(", "))?;
            }
        }

        Ok(())
    }
}
