//! Flowchart view coordinator
//!
//! [`FlowchartState`] owns everything a flowchart front end mutates: the
//! course list, view toggles, hover and selection, legend state and the
//! repositioning state machine. Layouts are recomputed in full whenever a
//! layout-affecting input changes.

use crate::core::layout::{
    compute_lane_layout, compute_semester_layout, route_edge, EdgeRoute, InteractionMode,
    LaneGeometry, LaneLayout, LayoutGeometry, LayoutOptions, LayoutResult, Point, Repositioner,
    RouteMode, RouteStyle, ScreenTransform,
};
use crate::core::legend::{HighlightAxis, Legend, LegendState, Palette};
use crate::core::models::{Course, CourseGraph};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which layout engine the flowchart shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Semester columns
    #[default]
    Semester,
    /// One lane per dependency chain
    Horizontal,
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "semester" | "columns" => Ok(Self::Semester),
            "horizontal" | "lanes" => Ok(Self::Horizontal),
            _ => Err(format!("Unknown view: '{s}'. Use: semester, horizontal")),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Semester => write!(f, "semester"),
            Self::Horizontal => write!(f, "horizontal"),
        }
    }
}

/// Flowchart toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Order columns by prerequisite position
    pub optimize: bool,
    /// Wider rows and strategic placement
    pub spaced: bool,
    /// Orthogonal edge routing
    pub orthogonal: bool,
    /// Active view
    pub view: ViewMode,
    /// Highlight axis for colours and legend
    pub highlight: HighlightAxis,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            optimize: true,
            spaced: false,
            orthogonal: false,
            view: ViewMode::Semester,
            highlight: HighlightAxis::Component,
        }
    }
}

impl ViewSettings {
    /// Options handed to the semester engine
    #[must_use]
    pub const fn layout_options(&self) -> LayoutOptions {
        LayoutOptions::new(self.optimize, self.spaced)
    }

    /// Edge routing mode
    #[must_use]
    pub const fn route_mode(&self) -> RouteMode {
        RouteMode::from_orthogonal(self.orthogonal)
    }
}

/// How a node should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeAppearance {
    /// Drawn faded
    pub dimmed: bool,
    /// Reacts to hover and click
    pub interactive: bool,
}

/// Direct prerequisites and dependents of a course
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Relations {
    /// Courses required by the course
    pub prerequisites: Vec<String>,
    /// Courses requiring the course
    pub dependents: Vec<String>,
}

impl Relations {
    /// Whether `course_id` is a direct relation
    #[must_use]
    pub fn contains(&self, course_id: &str) -> bool {
        self.prerequisites.iter().any(|id| id == course_id)
            || self.dependents.iter().any(|id| id == course_id)
    }
}

/// State of one flowchart
#[derive(Debug, Clone)]
pub struct FlowchartState {
    courses: Vec<Course>,
    graph: CourseGraph,
    settings: ViewSettings,
    geometry: LayoutGeometry,
    lane_geometry: LaneGeometry,
    route_style: RouteStyle,
    layout: LayoutResult,
    lanes: Option<LaneLayout>,
    repositioner: Repositioner,
    legend_state: LegendState,
    hovered_course: Option<String>,
    selected_course: Option<String>,
}

impl FlowchartState {
    /// Create a flowchart with default geometry
    #[must_use]
    pub fn new(courses: Vec<Course>, settings: ViewSettings) -> Self {
        Self::with_geometry(
            courses,
            settings,
            LayoutGeometry::default(),
            LaneGeometry::default(),
            RouteStyle::default(),
        )
    }

    /// Create a flowchart with explicit geometry and routing style
    #[must_use]
    pub fn with_geometry(
        courses: Vec<Course>,
        settings: ViewSettings,
        geometry: LayoutGeometry,
        lane_geometry: LaneGeometry,
        route_style: RouteStyle,
    ) -> Self {
        let layout = compute_semester_layout(&courses, &geometry, settings.layout_options());
        let lanes = (settings.view == ViewMode::Horizontal)
            .then(|| compute_lane_layout(&courses, &lane_geometry));
        Self {
            graph: CourseGraph::build(&courses),
            repositioner: Repositioner::new(&layout),
            courses,
            settings,
            geometry,
            lane_geometry,
            route_style,
            layout,
            lanes,
            legend_state: LegendState::default(),
            hovered_course: None,
            selected_course: None,
        }
    }

    fn recompute(&mut self) {
        self.graph = CourseGraph::build(&self.courses);
        self.layout =
            compute_semester_layout(&self.courses, &self.geometry, self.settings.layout_options());
        self.lanes = (self.settings.view == ViewMode::Horizontal)
            .then(|| compute_lane_layout(&self.courses, &self.lane_geometry));
    }

    /// Recompute after a toggle change: back to navigate with fresh positions
    fn recompute_and_reset(&mut self) {
        self.recompute();
        self.repositioner
            .set_mode(InteractionMode::Navigate, &self.layout);
        self.repositioner.resync(&self.layout);
    }

    /// Courses shown
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Replace the course list
    ///
    /// Hover and selection pointing at removed courses are dropped. While a
    /// repositioning mode is active, manual positions of remaining courses
    /// survive and added courses start at their computed position.
    pub fn set_courses(&mut self, courses: Vec<Course>) {
        self.courses = courses;
        self.recompute();
        self.repositioner.on_layout_changed(&self.layout);
        let stale = |id: &Option<String>| id.as_deref().is_some_and(|id| !self.graph.contains(id));
        if stale(&self.hovered_course) {
            self.hovered_course = None;
        }
        if stale(&self.selected_course) {
            self.selected_course = None;
        }
    }

    /// Current toggles
    #[must_use]
    pub const fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    /// Prerequisite graph of the current courses
    #[must_use]
    pub const fn graph(&self) -> &CourseGraph {
        &self.graph
    }

    /// Computed semester layout (without manual positions)
    #[must_use]
    pub const fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    /// Lane layout, present while the horizontal view is active
    #[must_use]
    pub const fn lane_layout(&self) -> Option<&LaneLayout> {
        self.lanes.as_ref()
    }

    /// Semester layout with manual positions and live edges applied
    #[must_use]
    pub fn effective_layout(&self) -> LayoutResult {
        self.repositioner.apply(&self.layout, &self.courses)
    }

    /// Routed edges of the effective semester layout, keyed by edge id
    #[must_use]
    pub fn routes(&self) -> Vec<(String, EdgeRoute)> {
        let mode = self.settings.route_mode();
        self.effective_layout()
            .edges
            .into_iter()
            .map(|edge| {
                let route = route_edge(edge.start(), edge.end(), mode, &self.route_style);
                (edge.id, route)
            })
            .collect()
    }

    /// Edge routing style
    #[must_use]
    pub const fn route_style(&self) -> &RouteStyle {
        &self.route_style
    }

    /// Toggle prerequisite-aware ordering
    pub fn set_optimize(&mut self, optimize: bool) {
        if self.settings.optimize != optimize {
            self.settings.optimize = optimize;
            self.recompute_and_reset();
        }
    }

    /// Toggle the spaced layout
    pub fn set_spaced(&mut self, spaced: bool) {
        if self.settings.spaced != spaced {
            self.settings.spaced = spaced;
            self.recompute_and_reset();
        }
    }

    /// Toggle orthogonal routing (no relayout)
    pub fn set_orthogonal(&mut self, orthogonal: bool) {
        self.settings.orthogonal = orthogonal;
    }

    /// Switch view; the horizontal view forces navigate mode
    pub fn set_view(&mut self, view: ViewMode) {
        self.settings.view = view;
        if view == ViewMode::Horizontal {
            self.repositioner
                .set_mode(InteractionMode::Navigate, &self.layout);
            if self.lanes.is_none() {
                self.lanes = Some(compute_lane_layout(&self.courses, &self.lane_geometry));
            }
        } else {
            self.lanes = None;
        }
    }

    /// Current interaction mode
    #[must_use]
    pub const fn interaction_mode(&self) -> InteractionMode {
        self.repositioner.mode()
    }

    /// Switch interaction mode; grid and free force the semester view
    pub fn set_interaction_mode(&mut self, mode: InteractionMode) {
        if mode.is_repositioning() {
            if self.settings.view == ViewMode::Horizontal {
                self.set_view(ViewMode::Semester);
            }
            self.hovered_course = None;
        }
        self.repositioner.set_mode(mode, &self.layout);
    }

    /// Change the highlight axis; hidden and hovered categories are reset
    pub fn set_highlight_axis(&mut self, axis: HighlightAxis) {
        if self.settings.highlight != axis {
            self.settings.highlight = axis;
            self.legend_state.clear();
        }
    }

    /// Legend for the current axis
    #[must_use]
    pub fn legend(&self) -> Legend {
        Legend::build(&self.courses, self.settings.highlight)
    }

    /// Colour palette for the current axis
    #[must_use]
    pub fn palette(&self) -> Palette {
        Palette::new(&self.courses, self.settings.highlight)
    }

    /// Legend toggles
    #[must_use]
    pub const fn legend_state(&self) -> &LegendState {
        &self.legend_state
    }

    /// Hide or show a category
    pub fn toggle_category(&mut self, category: &str) -> bool {
        self.legend_state.toggle(category)
    }

    /// Hover a legend category
    pub fn hover_category(&mut self, category: Option<&str>) {
        match category {
            Some(c) => self.legend_state.hover(c),
            None => self.legend_state.clear_hover(),
        }
    }

    /// Hovered course
    #[must_use]
    pub fn hovered_course(&self) -> Option<&str> {
        self.hovered_course.as_deref()
    }

    /// Hover a course; ignored while repositioning or for unknown ids
    pub fn hover_course(&mut self, course_id: Option<&str>) {
        match course_id {
            None => self.hovered_course = None,
            Some(id) => {
                if !self.repositioner.mode().is_repositioning() && self.graph.contains(id) {
                    self.hovered_course = Some(id.to_string());
                }
            }
        }
    }

    /// Selected course
    #[must_use]
    pub fn selected_course(&self) -> Option<&Course> {
        let id = self.selected_course.as_deref()?;
        self.courses.iter().find(|c| c.id == id)
    }

    /// Select a course (or clear with `None`)
    ///
    /// # Returns
    /// `false` when selection is blocked (repositioning, unknown id, or the
    /// node is not interactive)
    pub fn select_course(&mut self, course_id: Option<&str>) -> bool {
        let Some(id) = course_id else {
            self.selected_course = None;
            return true;
        };
        let interactive = self
            .courses
            .iter()
            .find(|c| c.id == id)
            .is_some_and(|c| self.node_appearance(c).interactive);
        if interactive {
            self.selected_course = Some(id.to_string());
        }
        interactive
    }

    /// Direct prerequisites and dependents of a course
    #[must_use]
    pub fn relations(&self, course_id: &str) -> Relations {
        let collect = |set: Option<&IndexSet<String>>| -> Vec<String> {
            set.map(|s| s.iter().cloned().collect()).unwrap_or_default()
        };
        Relations {
            prerequisites: collect(self.graph.parents(course_id)),
            dependents: collect(self.graph.children(course_id)),
        }
    }

    /// Relations of the hovered course
    #[must_use]
    pub fn hover_relations(&self) -> Option<Relations> {
        self.hovered_course.as_deref().map(|id| self.relations(id))
    }

    /// Decide how a course's node is drawn
    ///
    /// A hovered course dims everything but itself and its direct relations.
    /// Otherwise a hovered legend category dims non-members, and without
    /// either hover, members of hidden categories are dimmed.
    #[must_use]
    pub fn node_appearance(&self, course: &Course) -> NodeAppearance {
        let axis = self.settings.highlight;
        let hidden = self.legend_state.is_course_hidden(course, axis);

        let dimmed = if let Some(hovered) = self.hovered_course.as_deref() {
            course.id != hovered && !self.relations(hovered).contains(&course.id)
        } else if let Some(matches) = self.legend_state.matches_hover(course, axis) {
            !matches
        } else {
            hidden
        };

        NodeAppearance {
            dimmed,
            interactive: !self.repositioner.mode().is_repositioning()
                && !(hidden && self.hovered_course.is_none()),
        }
    }

    /// Set the screen-to-layout conversion for drag events
    pub fn set_screen_transform(&mut self, transform: ScreenTransform) {
        self.repositioner.set_transform(transform);
    }

    /// Pointer down on a node
    pub fn begin_drag(&mut self, course_id: &str, pointer: Point) -> bool {
        self.repositioner.begin_drag(course_id, pointer)
    }

    /// Pointer move
    pub fn drag_to(&mut self, pointer: Point) -> Option<Point> {
        self.repositioner.drag_to(pointer, &self.layout)
    }

    /// Pointer up
    pub fn end_drag(&mut self) {
        self.repositioner.end_drag();
    }

    /// Pointer left the drawing
    pub fn pointer_leave(&mut self) {
        self.repositioner.on_pointer_leave();
    }

    /// Repositioning state
    #[must_use]
    pub const fn repositioner(&self) -> &Repositioner {
        &self.repositioner
    }
}
