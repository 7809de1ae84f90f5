//! Integration tests for drag repositioning through the flowchart state

use curriculum_flow::core::layout::{InteractionMode, Point, ScreenTransform};
use curriculum_flow::core::models::Course;
use curriculum_flow::core::view::{FlowchartState, ViewMode, ViewSettings};

fn courses() -> Vec<Course> {
    vec![
        Course::new("C1".to_string(), "Intro".to_string(), 1, 4.0),
        Course::new("C2".to_string(), "Next".to_string(), 2, 3.0).with_prerequisites(["C1"]),
        Course::new("C3".to_string(), "Side".to_string(), 2, 3.0),
        Course::new("C4".to_string(), "Last".to_string(), 3, 2.0).with_prerequisites(["C2", "C3"]),
    ]
}

/// Nearest lattice point, computed independently of the engine
fn nearest_lattice(state: &FlowchartState, raw: Point) -> Point {
    let layout = state.layout();
    let g = &layout.geometry;
    let col_w = g.node_width + g.column_gap;
    let row_h = g.node_height + layout.row_gap;
    let base_y = g.padding + g.header_height;
    let col = ((raw.x - g.padding) / col_w).round().max(0.0);
    let row = ((raw.y - base_y) / row_h).round().max(0.0);
    Point::new(g.padding + col * col_w, base_y + row * row_h)
}

#[test]
fn test_grid_drag_lands_on_nearest_lattice_point() {
    for spaced in [false, true] {
        let mut state = FlowchartState::new(
            courses(),
            ViewSettings {
                spaced,
                ..ViewSettings::default()
            },
        );
        state.set_interaction_mode(InteractionMode::Grid);

        for raw in [
            Point::new(13.0, 7.0),
            Point::new(250.0, 133.0),
            Point::new(333.3, 421.7),
            Point::new(701.0, 95.0),
            Point::new(1234.5, 987.6),
        ] {
            let origin = state.layout().position("C4").expect("C4 placed");
            let start = state.repositioner().position("C4").unwrap_or(origin);
            assert!(state.begin_drag("C4", start));
            let snapped = state.drag_to(raw).expect("drag active");
            state.end_drag();

            assert_eq!(snapped, nearest_lattice(&state, raw));
            let effective = state.effective_layout();
            let node = effective.node("C4").expect("C4 placed");
            assert_eq!((node.x, node.y), (snapped.x, snapped.y));
        }
    }
}

#[test]
fn test_free_drag_uses_screen_transform_and_offset() {
    let mut state = FlowchartState::new(courses(), ViewSettings::default());
    state.set_interaction_mode(InteractionMode::Free);
    state.set_screen_transform(ScreenTransform::new(2.0, 2.0, 10.0, 20.0));

    let c1 = state.layout().position("C1").expect("C1 placed");
    // Grab the node 5 layout units right of its corner
    let grab = Point::new((c1.x + 5.0) * 2.0 + 10.0, c1.y * 2.0 + 20.0);
    assert!(state.begin_drag("C1", grab));
    let moved = state
        .drag_to(Point::new(grab.x + 100.0, grab.y + 40.0))
        .expect("drag active");

    assert!((moved.x - (c1.x + 50.0)).abs() < 1e-9);
    assert!((moved.y - (c1.y + 20.0)).abs() < 1e-9);
}

#[test]
fn test_edges_follow_dragged_node_live() {
    let mut state = FlowchartState::new(courses(), ViewSettings::default());
    state.set_interaction_mode(InteractionMode::Free);
    let c2 = state.layout().position("C2").expect("C2 placed");

    assert!(state.begin_drag("C2", c2));
    state.drag_to(Point::new(c2.x, c2.y + 300.0));

    let effective = state.effective_layout();
    let node_h = effective.geometry.node_height;
    let node_w = effective.geometry.node_width;
    let incoming = effective.edges.iter().find(|e| e.target_id == "C2").expect("C1->C2");
    let outgoing = effective.edges.iter().find(|e| e.source_id == "C2").expect("C2->C4");
    assert!((incoming.y2 - (c2.y + 300.0 + node_h / 2.0)).abs() < f64::EPSILON);
    assert!((outgoing.x1 - (c2.x + node_w)).abs() < f64::EPSILON);
    assert!((outgoing.y1 - (c2.y + 300.0 + node_h / 2.0)).abs() < f64::EPSILON);
}

#[test]
fn test_toggle_change_discards_manual_positions() {
    let mut state = FlowchartState::new(courses(), ViewSettings::default());
    state.set_interaction_mode(InteractionMode::Free);
    let c3 = state.layout().position("C3").expect("C3 placed");
    state.begin_drag("C3", c3);
    state.drag_to(Point::new(900.0, 900.0));
    state.end_drag();

    state.set_spaced(true);

    assert_eq!(state.interaction_mode(), InteractionMode::Navigate);
    assert_eq!(
        state.repositioner().position("C3"),
        state.layout().position("C3")
    );
}

#[test]
fn test_navigate_mode_ignores_drags() {
    let mut state = FlowchartState::new(courses(), ViewSettings::default());
    let c1 = state.layout().position("C1").expect("C1 placed");
    assert!(!state.begin_drag("C1", c1));
    assert!(state.drag_to(Point::new(500.0, 500.0)).is_none());
    let effective = state.effective_layout();
    for node in &state.layout().nodes {
        assert_eq!(effective.position(&node.course_id), Some(node.origin()));
    }
}

#[test]
fn test_repositioning_and_horizontal_view_are_exclusive() {
    let mut state = FlowchartState::new(courses(), ViewSettings::default());
    state.set_view(ViewMode::Horizontal);
    state.set_interaction_mode(InteractionMode::Grid);
    assert_eq!(state.settings().view, ViewMode::Semester);
    assert!(state.lane_layout().is_none());

    state.set_view(ViewMode::Horizontal);
    assert_eq!(state.interaction_mode(), InteractionMode::Navigate);
    assert!(state.lane_layout().is_some());
}

#[test]
fn test_course_list_change_while_repositioning() {
    let mut state = FlowchartState::new(courses(), ViewSettings::default());
    state.set_interaction_mode(InteractionMode::Free);
    let c3 = state.layout().position("C3").expect("C3 placed");
    assert!(state.begin_drag("C3", c3));
    state.drag_to(Point::new(900.0, 900.0));
    state.end_drag();

    let mut grown = courses();
    grown.push(
        Course::new("C5".to_string(), "Added".to_string(), 3, 3.0).with_prerequisites(["C4"]),
    );
    state.set_courses(grown.clone());

    assert_eq!(state.interaction_mode(), InteractionMode::Free);
    assert_eq!(state.repositioner().position("C3"), Some(Point::new(900.0, 900.0)));
    let c5 = state.layout().position("C5").expect("C5 placed");
    assert_eq!(state.repositioner().position("C5"), Some(c5));
    assert!(state.begin_drag("C5", c5));
    state.end_drag();

    grown.retain(|c| c.id != "C3");
    state.set_courses(grown);
    assert_eq!(state.repositioner().position("C3"), None);
    assert_eq!(state.repositioner().positions().len(), 4);

    state.set_courses(Vec::new());
    assert!(state.repositioner().positions().is_empty());
}
