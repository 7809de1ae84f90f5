//! Curriculum graph layout
//!
//! Two engines turn a course list into renderable geometry:
//! - [`semester`] places courses in semester columns and orders each column
//! - [`lanes`] enumerates every dependency chain and gives each its own lane
//!
//! [`routing`] turns edge anchors into straight or orthogonal paths and
//! [`interaction`] lets a user drag committed positions around.

pub mod interaction;
pub mod lanes;
pub mod routing;
pub mod semester;

pub use interaction::{DragState, InteractionMode, PositionMap, Repositioner, ScreenTransform};
pub use lanes::{compute_lane_layout, enumerate_paths, LaneEdge, LaneLayout, LaneNode};
pub use routing::{route_edge, EdgeRoute, PathCommand, RouteMode, RouteStyle};
pub use semester::{build_edges, compute_semester_layout, LayoutNode, LayoutOptions, LayoutResult};

use serde::{Deserialize, Serialize};

/// A point in layout space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Create a point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Geometry constants of the semester view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutGeometry {
    /// Width of a course node
    pub node_width: f64,
    /// Height of a course node
    pub node_height: f64,
    /// Horizontal gap between semester columns
    pub column_gap: f64,
    /// Height of the semester header band
    pub header_height: f64,
    /// Outer padding
    pub padding: f64,
    /// Row gap of the compact layout
    pub compact_row_gap: f64,
    /// Row gap of the spaced layout
    pub spaced_row_gap: f64,
    /// Row gap of strategic placement (spaced + optimized)
    pub strategic_row_gap: f64,
}

impl Default for LayoutGeometry {
    fn default() -> Self {
        Self {
            node_width: 160.0,
            node_height: 80.0,
            column_gap: 60.0,
            header_height: 80.0,
            padding: 20.0,
            compact_row_gap: 20.0,
            spaced_row_gap: 60.0,
            strategic_row_gap: 20.0,
        }
    }
}

impl LayoutGeometry {
    /// Distance between the left edges of two adjacent columns
    #[must_use]
    pub fn column_width(&self) -> f64 {
        self.node_width + self.column_gap
    }

    /// Row gap used by the compact/simple placement
    #[must_use]
    pub const fn row_gap(&self, spaced: bool) -> f64 {
        if spaced {
            self.spaced_row_gap
        } else {
            self.compact_row_gap
        }
    }

    /// Left edge of the column holding `semester` (1-based)
    #[must_use]
    pub fn column_x(&self, semester: u32) -> f64 {
        self.padding + f64::from(semester.saturating_sub(1)) * self.column_width()
    }

    /// Top edge of the first row
    #[must_use]
    pub fn base_y(&self) -> f64 {
        self.padding + self.header_height
    }

    /// Right-center anchor of a node whose top-left corner is `origin`
    #[must_use]
    pub fn source_anchor(&self, origin: Point) -> Point {
        Point::new(origin.x + self.node_width, origin.y + self.node_height / 2.0)
    }

    /// Left-center anchor of a node whose top-left corner is `origin`
    #[must_use]
    pub fn target_anchor(&self, origin: Point) -> Point {
        Point::new(origin.x, origin.y + self.node_height / 2.0)
    }
}

/// Geometry constants of the horizontal (lane) view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneGeometry {
    /// Width of a course node
    pub node_width: f64,
    /// Height of a course node
    pub node_height: f64,
    /// Horizontal gap between semester columns
    pub column_gap: f64,
    /// Vertical gap between lanes
    pub lane_gap: f64,
    /// Height of the semester header band
    pub header_height: f64,
    /// Outer padding
    pub padding: f64,
}

impl Default for LaneGeometry {
    fn default() -> Self {
        Self {
            node_width: 160.0,
            node_height: 80.0,
            column_gap: 60.0,
            lane_gap: 40.0,
            header_height: 60.0,
            padding: 20.0,
        }
    }
}

impl LaneGeometry {
    /// Distance between the left edges of two adjacent columns
    #[must_use]
    pub fn column_width(&self) -> f64 {
        self.node_width + self.column_gap
    }

    /// Height of one lane band
    #[must_use]
    pub fn lane_height(&self) -> f64 {
        self.node_height + self.lane_gap
    }

    /// Left edge of the column holding `semester` (1-based)
    #[must_use]
    pub fn column_x(&self, semester: u32) -> f64 {
        self.padding + f64::from(semester.saturating_sub(1)) * self.column_width()
    }

    /// Top edge of the node in lane `lane` (0-based)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn lane_y(&self, lane: usize) -> f64 {
        self.padding + self.header_height + lane as f64 * self.lane_height()
    }
}

/// A prerequisite edge with resolved anchor points
///
/// `(x1, y1)` is the right-center of the source node, `(x2, y2)` the
/// left-center of the target node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Edge id, `"<source>-<target>"`
    pub id: String,
    /// Prerequisite course id
    pub source_id: String,
    /// Dependent course id
    pub target_id: String,
    /// Source anchor x
    pub x1: f64,
    /// Source anchor y
    pub y1: f64,
    /// Target anchor x
    pub x2: f64,
    /// Target anchor y
    pub y2: f64,
}

impl Edge {
    /// Build an edge between two node origins
    #[must_use]
    pub fn between(
        source_id: &str,
        target_id: &str,
        source_origin: Point,
        target_origin: Point,
        geometry: &LayoutGeometry,
    ) -> Self {
        let start = geometry.source_anchor(source_origin);
        let end = geometry.target_anchor(target_origin);
        Self {
            id: format!("{source_id}-{target_id}"),
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
        }
    }

    /// Source anchor
    #[must_use]
    pub const fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    /// Target anchor
    #[must_use]
    pub const fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_x_is_padding_plus_column_width() {
        let geometry = LayoutGeometry::default();
        assert!((geometry.column_x(1) - 20.0).abs() < f64::EPSILON);
        assert!((geometry.column_x(3) - (20.0 + 2.0 * 220.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_edge_anchors() {
        let geometry = LayoutGeometry::default();
        let edge = Edge::between(
            "A",
            "B",
            Point::new(20.0, 100.0),
            Point::new(240.0, 200.0),
            &geometry,
        );

        assert_eq!(edge.id, "A-B");
        assert_eq!(edge.start(), Point::new(180.0, 140.0));
        assert_eq!(edge.end(), Point::new(240.0, 240.0));
    }

    #[test]
    fn test_lane_geometry() {
        let lanes = LaneGeometry::default();
        assert!((lanes.lane_height() - 120.0).abs() < f64::EPSILON);
        assert!((lanes.lane_y(2) - (20.0 + 60.0 + 240.0)).abs() < f64::EPSILON);
    }
}
