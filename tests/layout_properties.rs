//! Integration tests for the semester and lane layout engines

use curriculum_flow::core::layout::{
    compute_lane_layout, compute_semester_layout, enumerate_paths, route_edge, LaneGeometry,
    LayoutGeometry, LayoutOptions, Point, RouteMode, RouteStyle,
};
use curriculum_flow::core::models::{Course, CourseGraph};
use std::collections::{HashMap, HashSet};

fn course(id: &str, semester: u32, credits: f32, prereqs: &[&str]) -> Course {
    Course::new(id.to_string(), format!("Course {id}"), semester, credits)
        .with_prerequisites(prereqs.iter().copied())
}

/// A plan with fan-in, fan-out, a dangling prerequisite and an unordered column
fn plan() -> Vec<Course> {
    vec![
        course("MA101", 1, 5.0, &[]),
        course("CS101", 1, 4.0, &[]),
        course("HU101", 1, 3.0, &[]),
        course("CS102", 2, 4.0, &["CS101"]),
        course("MA102", 2, 5.0, &["MA101"]),
        course("CS201", 3, 4.0, &["CS102", "MA102"]),
        course("CS202", 3, 4.0, &["CS102"]),
        course("CS203", 3, 3.0, &["XX999"]),
        course("CS204", 3, 3.0, &["HU101"]),
        course("CS301", 4, 4.0, &["CS201", "CS202"]),
        course("CS302", 4, 3.0, &["CS204", "MA102"]),
    ]
}

fn all_options() -> [LayoutOptions; 4] {
    [
        LayoutOptions::new(false, false),
        LayoutOptions::new(true, false),
        LayoutOptions::new(false, true),
        LayoutOptions::new(true, true),
    ]
}

#[test]
fn test_semester_layout_is_deterministic() {
    let geometry = LayoutGeometry::default();
    for options in all_options() {
        let first = compute_semester_layout(&plan(), &geometry, options);
        for _ in 0..5 {
            assert_eq!(compute_semester_layout(&plan(), &geometry, options), first);
        }
    }
}

#[test]
fn test_strategic_rows_never_collide() {
    let geometry = LayoutGeometry::default();
    let layout = compute_semester_layout(&plan(), &geometry, LayoutOptions::new(true, true));

    let mut seen = HashSet::new();
    for node in &layout.nodes {
        assert!(
            seen.insert((node.semester, node.row)),
            "row {} of semester {} assigned twice",
            node.row,
            node.semester
        );
    }
    assert_eq!(layout.nodes.len(), plan().len());
}

#[test]
fn test_edges_match_placed_prerequisites() {
    let courses = plan();
    let geometry = LayoutGeometry::default();
    for options in all_options() {
        let layout = compute_semester_layout(&courses, &geometry, options);
        let by_id: HashMap<&str, &Course> = courses.iter().map(|c| (c.id.as_str(), c)).collect();
        let placed: HashSet<&str> = layout.nodes.iter().map(|n| n.course_id.as_str()).collect();

        for edge in &layout.edges {
            let target = by_id.get(edge.target_id.as_str()).expect("target exists");
            assert!(by_id.contains_key(edge.source_id.as_str()));
            assert!(target.prerequisites.contains(&edge.source_id));
        }

        let expected: HashSet<(String, String)> = courses
            .iter()
            .flat_map(|c| {
                c.prerequisites
                    .iter()
                    .filter(|p| placed.contains(p.as_str()))
                    .map(move |p| (p.clone(), c.id.clone()))
            })
            .collect();
        let actual: HashSet<(String, String)> = layout
            .edges
            .iter()
            .map(|e| (e.source_id.clone(), e.target_id.clone()))
            .collect();
        assert_eq!(actual, expected);
        assert_eq!(layout.edges.len(), expected.len());
        assert!(layout.edges.iter().all(|e| e.source_id != "XX999"));
    }
}

#[test]
fn test_edge_anchors_follow_nodes() {
    let geometry = LayoutGeometry::default();
    let layout = compute_semester_layout(&plan(), &geometry, LayoutOptions::new(true, false));
    for edge in &layout.edges {
        let source = layout.node(&edge.source_id).expect("source placed");
        let target = layout.node(&edge.target_id).expect("target placed");
        assert!((edge.x1 - (source.x + geometry.node_width)).abs() < f64::EPSILON);
        assert!((edge.y1 - (source.y + geometry.node_height / 2.0)).abs() < f64::EPSILON);
        assert!((edge.x2 - target.x).abs() < f64::EPSILON);
        assert!((edge.y2 - (target.y + geometry.node_height / 2.0)).abs() < f64::EPSILON);
    }
}

#[test]
fn test_two_course_scenario() {
    let courses = vec![course("C1", 1, 4.0, &[]), course("C2", 2, 3.0, &["C1"])];
    let geometry = LayoutGeometry::default();
    let layout = compute_semester_layout(&courses, &geometry, LayoutOptions::new(true, false));

    assert_eq!(layout.nodes.len(), 2);
    let c1 = layout.node("C1").expect("C1 placed");
    let c2 = layout.node("C2").expect("C2 placed");
    assert_eq!((c1.semester, c1.row), (1, 0));
    assert_eq!((c2.semester, c2.row), (2, 0));
    assert!((c1.x - geometry.padding).abs() < f64::EPSILON);
    assert!((c2.x - (geometry.padding + geometry.column_width())).abs() < f64::EPSILON);
    assert!((c1.y - geometry.base_y()).abs() < f64::EPSILON);

    assert_eq!(layout.edges.len(), 1);
    assert_eq!(layout.edges[0].source_id, "C1");
    assert_eq!(layout.edges[0].target_id, "C2");

    let width = 2.0 * geometry.column_width() - geometry.column_gap + 2.0 * geometry.padding;
    let height = geometry.base_y() + geometry.node_height + 2.0 * geometry.padding;
    assert!((layout.width - width).abs() < f64::EPSILON);
    assert!((layout.height - height).abs() < f64::EPSILON);
}

#[test]
fn test_orthogonal_equal_height_is_straight() {
    let route = route_edge(
        Point::new(180.0, 140.0),
        Point::new(240.0, 140.0),
        RouteMode::Orthogonal,
        &RouteStyle::default(),
    );
    assert!(route.is_straight());
    assert!(!route.is_curved());
    assert_eq!(route.to_svg_path(), "M 180 140 L 240 140");
}

#[test]
fn test_strategic_rows_with_zero_row_height() {
    let geometry = LayoutGeometry {
        node_height: 0.0,
        strategic_row_gap: 0.0,
        ..LayoutGeometry::default()
    };
    let courses = vec![
        course("A", 1, 3.0, &[]),
        course("B", 1, 3.0, &[]),
        course("C", 2, 3.0, &["B"]),
        course("D", 2, 3.0, &["B"]),
    ];

    let layout = compute_semester_layout(&courses, &geometry, LayoutOptions::new(true, true));

    assert_eq!(layout.nodes.len(), 4);
    let mut seen = HashSet::new();
    for node in &layout.nodes {
        assert!(seen.insert((node.semester, node.row)), "row collision for {}", node.course_id);
    }
}

#[test]
fn test_path_enumeration_diamond() {
    let courses = vec![
        course("A", 1, 3.0, &[]),
        course("B", 2, 3.0, &["A"]),
        course("C", 2, 3.0, &["A"]),
        course("D", 3, 3.0, &["B", "C"]),
    ];
    let graph = CourseGraph::build(&courses);
    let paths = enumerate_paths(&graph, &courses);

    assert_eq!(
        paths,
        vec![
            vec!["A".to_string(), "B".to_string(), "D".to_string()],
            vec!["A".to_string(), "C".to_string(), "D".to_string()],
        ]
    );
}

#[test]
fn test_path_enumeration_is_complete_and_unique() {
    let courses = plan();
    let graph = CourseGraph::build(&courses);
    let paths = enumerate_paths(&graph, &courses);

    let unique: HashSet<&Vec<String>> = paths.iter().collect();
    assert_eq!(unique.len(), paths.len());

    // CS301 <- {CS201 <- {CS102 <- CS101, MA102 <- MA101}, CS202 <- CS102 <- CS101}
    for chain in [
        ["CS101", "CS102", "CS201", "CS301"],
        ["MA101", "MA102", "CS201", "CS301"],
        ["CS101", "CS102", "CS202", "CS301"],
    ] {
        let chain: Vec<String> = chain.iter().map(ToString::to_string).collect();
        assert!(paths.contains(&chain), "missing {chain:?}");
    }
    assert!(paths.contains(&vec!["CS203".to_string()]));
    assert_eq!(paths.len(), 6);
}

#[test]
fn test_path_enumeration_terminates_on_cycles() {
    let courses = vec![course("A", 1, 3.0, &["B"]), course("B", 2, 3.0, &["A"])];
    let graph = CourseGraph::build(&courses);
    let paths = enumerate_paths(&graph, &courses);
    assert!(paths.is_empty());

    let layout = compute_lane_layout(&courses, &LaneGeometry::default());
    assert!(layout.nodes.is_empty());
}

#[test]
fn test_lane_nodes_are_per_path_instances() {
    let courses = vec![
        course("A", 1, 3.0, &[]),
        course("B", 2, 3.0, &["A"]),
        course("C", 2, 3.0, &["A"]),
        course("D", 3, 3.0, &["B", "C"]),
    ];
    let geometry = LaneGeometry::default();
    let layout = compute_lane_layout(&courses, &geometry);

    assert_eq!(layout.lane_count(), 2);
    assert_eq!(layout.lanes_of("A"), vec![0, 1]);
    let instances: HashSet<&str> = layout.nodes.iter().map(|n| n.instance_id.as_str()).collect();
    assert_eq!(instances.len(), layout.nodes.len());
    assert_eq!(layout.edges.len(), 4);
    for edge in &layout.edges {
        let path = &layout.paths[edge.lane];
        let consecutive = path
            .windows(2)
            .any(|pair| pair[0] == edge.source_id && pair[1] == edge.target_id);
        assert!(consecutive, "edge {} is not inside its lane", edge.id);
    }
    for node in &layout.nodes {
        assert!((node.x - geometry.column_x(node.semester)).abs() < f64::EPSILON);
    }
}

#[test]
fn test_empty_input_degrades_gracefully() {
    let layout = compute_semester_layout(&[], &LayoutGeometry::default(), LayoutOptions::new(true, true));
    assert!(layout.nodes.is_empty());
    assert!(layout.edges.is_empty());

    let lanes = compute_lane_layout(&[], &LaneGeometry::default());
    assert!(lanes.paths.is_empty());
    assert!(lanes.edges.is_empty());
}
