//! Interactive repositioning on top of the semester layout
//!
//! A [`Repositioner`] owns the committed node positions. In `navigate` mode
//! they always mirror the computed layout; in `grid` or `free` mode the user
//! can drag nodes around, and the overrides survive until the next resync.

use super::semester::{build_edges, LayoutResult};
use super::Point;
use crate::core::models::Course;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Pointer interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Hover and select, no dragging
    #[default]
    Navigate,
    /// Drag with snapping to the layout lattice
    Grid,
    /// Drag to the exact pointer position
    Free,
}

impl InteractionMode {
    /// Whether nodes can be dragged in this mode
    #[must_use]
    pub const fn is_repositioning(self) -> bool {
        matches!(self, Self::Grid | Self::Free)
    }
}

impl FromStr for InteractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "navigate" | "nav" => Ok(Self::Navigate),
            "grid" => Ok(Self::Grid),
            "free" => Ok(Self::Free),
            _ => Err(format!(
                "Unknown interaction mode: '{s}'. Use: navigate, grid, free"
            )),
        }
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigate => write!(f, "navigate"),
            Self::Grid => write!(f, "grid"),
            Self::Free => write!(f, "free"),
        }
    }
}

/// Scale + translation from layout space to screen space
///
/// Same shape as an SVG screen CTM without skew: `screen = (a*x + e, d*y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTransform {
    /// Horizontal scale
    pub a: f64,
    /// Vertical scale
    pub d: f64,
    /// Horizontal translation
    pub e: f64,
    /// Vertical translation
    pub f: f64,
}

impl Default for ScreenTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ScreenTransform {
    /// No scaling, no translation
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            a: 1.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Build a transform from scale and translation
    #[must_use]
    pub const fn new(scale_x: f64, scale_y: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            a: scale_x,
            d: scale_y,
            e: translate_x,
            f: translate_y,
        }
    }

    /// Convert a screen point to layout space
    ///
    /// A zero scale is treated as 1.
    #[must_use]
    pub fn to_layout(&self, screen: Point) -> Point {
        let a = if self.a.abs() < f64::EPSILON { 1.0 } else { self.a };
        let d = if self.d.abs() < f64::EPSILON { 1.0 } else { self.d };
        Point::new((screen.x - self.e) / a, (screen.y - self.f) / d)
    }
}

/// Committed node positions, keyed by course id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionMap {
    positions: HashMap<String, Point>,
}

impl PositionMap {
    /// Positions mirroring a computed layout
    #[must_use]
    pub fn from_layout(layout: &LayoutResult) -> Self {
        let mut map = Self::default();
        map.resync(layout);
        map
    }

    /// Discard every override and copy the computed positions
    pub fn resync(&mut self, layout: &LayoutResult) {
        self.positions.clear();
        for node in &layout.nodes {
            self.positions.insert(node.course_id.clone(), node.origin());
        }
    }

    /// Follow a new course list while keeping manual positions
    ///
    /// Courses that left the layout are dropped and newly placed courses get
    /// their computed position. Surviving overrides are kept.
    pub fn reconcile(&mut self, layout: &LayoutResult) {
        let placed: HashSet<&str> = layout.nodes.iter().map(|n| n.course_id.as_str()).collect();
        self.positions.retain(|id, _| placed.contains(id.as_str()));
        for node in &layout.nodes {
            self.positions
                .entry(node.course_id.clone())
                .or_insert_with(|| node.origin());
        }
    }

    /// Committed position of a course
    #[must_use]
    pub fn get(&self, course_id: &str) -> Option<Point> {
        self.positions.get(course_id).copied()
    }

    /// Commit a position
    pub fn set(&mut self, course_id: &str, position: Point) {
        self.positions.insert(course_id.to_string(), position);
    }

    /// Number of committed positions
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether nothing is committed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// An in-progress drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    /// Course being dragged
    pub course_id: String,
    /// Pointer position minus node origin, in layout space
    pub offset: Point,
}

/// Snap a node origin to the nearest lattice point of a layout
///
/// The lattice has one column per semester and rows at the layout's row
/// increment, starting below the header. Negative indices clamp to 0 and a
/// lattice with a zero increment leaves the origin unsnapped.
#[must_use]
pub fn snap_to_grid(origin: Point, layout: &LayoutResult) -> Point {
    let g = &layout.geometry;
    let column_width = layout.column_width();
    let row_height = layout.row_height();
    if column_width <= 0.0 || row_height <= 0.0 {
        return origin;
    }
    let col = ((origin.x - g.padding) / column_width).round().max(0.0);
    let row = ((origin.y - g.base_y()) / row_height).round().max(0.0);
    Point::new(g.padding + col * column_width, g.base_y() + row * row_height)
}

/// Repositioning state machine
#[derive(Debug, Clone, Default)]
pub struct Repositioner {
    mode: InteractionMode,
    positions: PositionMap,
    drag: Option<DragState>,
    transform: ScreenTransform,
}

impl Repositioner {
    /// Start in navigate mode with positions mirroring `layout`
    #[must_use]
    pub fn new(layout: &LayoutResult) -> Self {
        Self {
            positions: PositionMap::from_layout(layout),
            ..Self::default()
        }
    }

    /// Current mode
    #[must_use]
    pub const fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Committed positions
    #[must_use]
    pub const fn positions(&self) -> &PositionMap {
        &self.positions
    }

    /// Committed position of one course
    #[must_use]
    pub fn position(&self, course_id: &str) -> Option<Point> {
        self.positions.get(course_id)
    }

    /// Switch mode
    ///
    /// Entering a repositioning mode keeps the current positions. Returning
    /// to navigate ends any drag and resyncs to `layout`.
    pub fn set_mode(&mut self, mode: InteractionMode, layout: &LayoutResult) {
        let previous = self.mode;
        self.mode = mode;
        if !mode.is_repositioning() {
            self.drag = None;
            if previous.is_repositioning() {
                crate::debug!("Leaving {previous} mode: positions resynced");
                self.positions.resync(layout);
            }
        }
    }

    /// Notify that a fresh layout was computed
    ///
    /// Positions follow the new layout in navigate mode. While repositioning,
    /// overrides of courses still placed are kept and the rest reconciled.
    pub fn on_layout_changed(&mut self, layout: &LayoutResult) {
        if self.mode.is_repositioning() {
            self.positions.reconcile(layout);
            if self
                .drag
                .as_ref()
                .is_some_and(|drag| self.positions.get(&drag.course_id).is_none())
            {
                self.drag = None;
            }
        } else {
            self.positions.resync(layout);
        }
    }

    /// Discard every override now
    pub fn resync(&mut self, layout: &LayoutResult) {
        self.drag = None;
        self.positions.resync(layout);
    }

    /// Set the screen-to-layout conversion used by drag events
    pub fn set_transform(&mut self, transform: ScreenTransform) {
        self.transform = transform;
    }

    /// Pointer down over a node
    ///
    /// # Returns
    /// `true` when a drag started. Nothing happens in navigate mode or for an
    /// unknown course.
    pub fn begin_drag(&mut self, course_id: &str, pointer: Point) -> bool {
        if !self.mode.is_repositioning() {
            return false;
        }
        let Some(origin) = self.positions.get(course_id) else {
            return false;
        };
        let pointer = self.transform.to_layout(pointer);
        self.drag = Some(DragState {
            course_id: course_id.to_string(),
            offset: Point::new(pointer.x - origin.x, pointer.y - origin.y),
        });
        true
    }

    /// Pointer move while dragging
    ///
    /// # Returns
    /// The new committed origin of the dragged node, or `None` when no drag
    /// is active
    pub fn drag_to(&mut self, pointer: Point, layout: &LayoutResult) -> Option<Point> {
        let drag = self.drag.as_ref()?;
        let pointer = self.transform.to_layout(pointer);
        let raw = Point::new(pointer.x - drag.offset.x, pointer.y - drag.offset.y);
        let origin = match self.mode {
            InteractionMode::Grid => snap_to_grid(raw, layout),
            InteractionMode::Free | InteractionMode::Navigate => raw,
        };
        let course_id = drag.course_id.clone();
        self.positions.set(&course_id, origin);
        Some(origin)
    }

    /// Pointer up; the last committed position stays
    pub fn end_drag(&mut self) -> Option<DragState> {
        self.drag.take()
    }

    /// Pointer left the drawing surface
    pub fn on_pointer_leave(&mut self) {
        self.end_drag();
    }

    /// Current drag, if any
    #[must_use]
    pub const fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    /// Whether a drag is in progress
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Layout with committed positions applied
    ///
    /// Edges are rebuilt from the effective positions, so edges touching a
    /// dragged node follow it live. Courses without a committed position keep
    /// their computed one. The drawing grows to fit nodes dragged past its
    /// edge.
    #[must_use]
    pub fn apply(&self, layout: &LayoutResult, courses: &[Course]) -> LayoutResult {
        let mut effective = layout.clone();
        for node in &mut effective.nodes {
            if let Some(p) = self.positions.get(&node.course_id) {
                node.x = p.x;
                node.y = p.y;
            }
        }

        let mut by_id: HashMap<&str, &Course> = HashMap::with_capacity(courses.len());
        for course in courses {
            by_id.entry(course.id.as_str()).or_insert(course);
        }
        let origins: HashMap<&str, Point> = effective
            .nodes
            .iter()
            .map(|n| (n.course_id.as_str(), n.origin()))
            .collect();
        let ordered = effective
            .nodes
            .iter()
            .filter_map(|n| by_id.get(n.course_id.as_str()).copied());
        let edges = build_edges(ordered, |id| origins.get(id).copied(), &layout.geometry);

        let g = &layout.geometry;
        let right = effective
            .nodes
            .iter()
            .map(|n| n.x + g.node_width + g.padding)
            .fold(layout.width, f64::max);
        let bottom = effective
            .nodes
            .iter()
            .map(|n| n.y + g.node_height + g.padding)
            .fold(layout.height, f64::max);

        effective.edges = edges;
        effective.width = right;
        effective.height = bottom;
        effective
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::{compute_semester_layout, LayoutGeometry, LayoutOptions};

    fn sample() -> (Vec<Course>, LayoutResult) {
        let courses = vec![
            Course::new("C1".to_string(), "Intro".to_string(), 1, 4.0),
            Course::new("C2".to_string(), "Next".to_string(), 2, 3.0).with_prerequisites(["C1"]),
        ];
        let layout = compute_semester_layout(
            &courses,
            &LayoutGeometry::default(),
            LayoutOptions::new(true, false),
        );
        (courses, layout)
    }

    #[test]
    fn test_navigate_rejects_drag() {
        let (_, layout) = sample();
        let mut repositioner = Repositioner::new(&layout);

        assert!(!repositioner.begin_drag("C1", Point::new(30.0, 110.0)));
        assert!(!repositioner.is_dragging());
    }

    #[test]
    fn test_unknown_course_rejects_drag() {
        let (_, layout) = sample();
        let mut repositioner = Repositioner::new(&layout);
        repositioner.set_mode(InteractionMode::Free, &layout);

        assert!(!repositioner.begin_drag("NOPE", Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_free_drag_keeps_pointer_offset() {
        let (_, layout) = sample();
        let mut repositioner = Repositioner::new(&layout);
        repositioner.set_mode(InteractionMode::Free, &layout);

        // Grab C1 (origin 20,100) 10px right and 5px down of its corner
        assert!(repositioner.begin_drag("C1", Point::new(30.0, 105.0)));
        let moved = repositioner.drag_to(Point::new(133.0, 257.0), &layout);

        assert_eq!(moved, Some(Point::new(123.0, 252.0)));
        assert_eq!(repositioner.end_drag().map(|d| d.course_id), Some("C1".to_string()));
        assert_eq!(repositioner.position("C1"), Some(Point::new(123.0, 252.0)));
    }

    #[test]
    fn test_drag_converts_screen_coordinates() {
        let (_, layout) = sample();
        let mut repositioner = Repositioner::new(&layout);
        repositioner.set_mode(InteractionMode::Free, &layout);
        repositioner.set_transform(ScreenTransform::new(2.0, 2.0, 100.0, 50.0));

        // Screen (140, 250) is layout (20, 100): C1's corner
        assert!(repositioner.begin_drag("C1", Point::new(140.0, 250.0)));
        assert_eq!(repositioner.drag().map(|d| d.offset), Some(Point::new(0.0, 0.0)));
        let moved = repositioner.drag_to(Point::new(200.0, 250.0), &layout);
        assert_eq!(moved, Some(Point::new(50.0, 100.0)));
    }

    #[test]
    fn test_grid_drag_snaps() {
        let (_, layout) = sample();
        let mut repositioner = Repositioner::new(&layout);
        repositioner.set_mode(InteractionMode::Grid, &layout);

        assert!(repositioner.begin_drag("C2", Point::new(240.0, 100.0)));
        let moved = repositioner.drag_to(Point::new(251.0, 262.0), &layout);

        // Column 1 (x = 240), row round(162 / 100) = 2 (y = 300)
        assert_eq!(moved, Some(Point::new(240.0, 300.0)));
    }

    #[test]
    fn test_snap_clamps_to_first_cell() {
        let (_, layout) = sample();
        assert_eq!(
            snap_to_grid(Point::new(-500.0, -500.0), &layout),
            Point::new(20.0, 100.0)
        );
    }

    #[test]
    fn test_leaving_repositioning_resyncs() {
        let (_, layout) = sample();
        let mut repositioner = Repositioner::new(&layout);
        repositioner.set_mode(InteractionMode::Free, &layout);
        repositioner.begin_drag("C1", Point::new(20.0, 100.0));
        repositioner.drag_to(Point::new(400.0, 400.0), &layout);
        repositioner.end_drag();

        // Switching between repositioning modes keeps overrides
        repositioner.set_mode(InteractionMode::Grid, &layout);
        assert_eq!(repositioner.position("C1"), Some(Point::new(400.0, 400.0)));

        repositioner.set_mode(InteractionMode::Navigate, &layout);
        assert_eq!(repositioner.position("C1"), Some(Point::new(20.0, 100.0)));
    }

    #[test]
    fn test_layout_change_ignored_while_repositioning() {
        let (courses, layout) = sample();
        let mut repositioner = Repositioner::new(&layout);
        repositioner.set_mode(InteractionMode::Free, &layout);
        repositioner.begin_drag("C1", Point::new(20.0, 100.0));
        repositioner.drag_to(Point::new(60.0, 100.0), &layout);

        let spaced = compute_semester_layout(
            &courses,
            &LayoutGeometry::default(),
            LayoutOptions::new(true, true),
        );
        repositioner.on_layout_changed(&spaced);
        assert_eq!(repositioner.position("C1"), Some(Point::new(60.0, 100.0)));
    }

    #[test]
    fn test_apply_recomputes_edges_live() {
        let (courses, layout) = sample();
        let mut repositioner = Repositioner::new(&layout);
        assert_eq!(repositioner.apply(&layout, &courses), layout);

        repositioner.set_mode(InteractionMode::Free, &layout);
        repositioner.begin_drag("C2", Point::new(240.0, 100.0));
        repositioner.drag_to(Point::new(300.0, 400.0), &layout);

        // Still mid-drag: the edge already follows the node
        let effective = repositioner.apply(&layout, &courses);
        let edge = &effective.edges[0];
        assert_eq!(edge.end(), Point::new(300.0, 440.0));
        assert!((effective.height - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pointer_leave_ends_drag() {
        let (_, layout) = sample();
        let mut repositioner = Repositioner::new(&layout);
        repositioner.set_mode(InteractionMode::Grid, &layout);
        repositioner.begin_drag("C1", Point::new(20.0, 100.0));
        repositioner.on_pointer_leave();

        assert!(!repositioner.is_dragging());
        assert_eq!(repositioner.drag_to(Point::new(0.0, 0.0), &layout), None);
    }
}
