//! SVG rendering of a flowchart view

use crate::core::layout::{route_edge, EdgeRoute, LaneLayout, Point};
use crate::core::legend::color_hex;
use crate::core::models::Course;
use crate::core::view::{FlowchartState, ViewMode};
use askama::Template;
use std::collections::HashMap;
use std::error::Error;

const DIMMED_OPACITY: &str = "0.25";
const FULL_OPACITY: &str = "1";
const LEGEND_ROW_HEIGHT: f64 = 18.0;
const LEGEND_TOP_GAP: f64 = 30.0;
const NAME_MAX_CHARS: usize = 24;

struct SvgHeader {
    x: String,
    y: String,
    subtitle_y: String,
    numeral: String,
    subtitle: String,
}

struct SvgEdge {
    id: String,
    d: String,
    opacity: &'static str,
}

struct SvgNode {
    key: String,
    course_id: String,
    name: String,
    credits: String,
    x: String,
    y: String,
    width: String,
    height: String,
    text_x: String,
    id_y: String,
    name_y: String,
    credits_y: String,
    fill: &'static str,
    opacity: &'static str,
}

struct SvgLegendRow {
    x: String,
    text_x: String,
    y: String,
    swatch_y: String,
    fill: &'static str,
    label: String,
}

#[derive(Template)]
#[template(path = "flowchart.svg", escape = "html")]
struct FlowchartSvg {
    width: String,
    height: String,
    title: String,
    headers: Vec<SvgHeader>,
    edges: Vec<SvgEdge>,
    nodes: Vec<SvgNode>,
    legend_x: String,
    legend_y: String,
    legend_title: String,
    legend: Vec<SvgLegendRow>,
}

fn num(value: f64) -> String {
    let rounded = format!("{value:.1}");
    rounded
        .strip_suffix(".0")
        .map_or_else(|| rounded.clone(), ToString::to_string)
}

/// Roman numeral of a positive number (`0` renders as an empty string)
#[must_use]
pub fn romanize(mut value: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut roman = String::new();
    for (step, numeral) in TABLE {
        while value >= step {
            roman.push_str(numeral);
            value -= step;
        }
    }
    roman
}

fn short_name(name: &str) -> String {
    if name.chars().count() <= NAME_MAX_CHARS {
        name.to_string()
    } else {
        let cut: String = name.chars().take(NAME_MAX_CHARS - 1).collect();
        format!("{cut}…")
    }
}

/// Routed edges of the lane view, keyed by edge id
pub(crate) fn lane_routes(state: &FlowchartState, lanes: &LaneLayout) -> Vec<(String, EdgeRoute)> {
    let mode = state.settings().route_mode();
    lanes
        .edges
        .iter()
        .map(|e| {
            let route = route_edge(
                Point::new(e.x1, e.y1),
                Point::new(e.x2, e.y2),
                mode,
                state.route_style(),
            );
            (e.id.clone(), route)
        })
        .collect()
}

/// Geometry of one node box, independent of the view it came from
struct Placed<'a> {
    key: String,
    course: &'a Course,
    origin: Point,
}

struct Frame {
    width: f64,
    height: f64,
    node_width: f64,
    node_height: f64,
    padding: f64,
    header_height: f64,
    column_width: f64,
    columns: u32,
}

/// Render the active view of a flowchart as a standalone SVG document
///
/// # Errors
/// Returns an error if template rendering fails
pub fn render_svg(state: &FlowchartState) -> Result<String, Box<dyn Error>> {
    let courses: HashMap<&str, &Course> = state
        .courses()
        .iter()
        .map(|c| (c.id.as_str(), c))
        .collect();
    let effective = state.effective_layout();

    let (frame, placed, routes) = match (state.settings().view, state.lane_layout()) {
        (ViewMode::Horizontal, Some(lanes)) => {
            let g = &lanes.geometry;
            let frame = Frame {
                width: lanes.width,
                height: lanes.height,
                node_width: g.node_width,
                node_height: g.node_height,
                padding: g.padding,
                header_height: g.header_height,
                column_width: g.column_width(),
                columns: lanes.max_semester,
            };
            let placed: Vec<Placed> = lanes
                .nodes
                .iter()
                .filter_map(|n| {
                    courses.get(n.course_id.as_str()).map(|&course| Placed {
                        key: n.instance_id.clone(),
                        course,
                        origin: Point::new(n.x, n.y),
                    })
                })
                .collect();
            let ends: Vec<(String, String)> = lanes
                .edges
                .iter()
                .map(|e| (e.source_id.clone(), e.target_id.clone()))
                .collect();
            let routes = lane_routes(state, lanes)
                .into_iter()
                .zip(ends)
                .collect::<Vec<_>>();
            (frame, placed, routes)
        }
        _ => {
            let g = &effective.geometry;
            let frame = Frame {
                width: effective.width,
                height: effective.height,
                node_width: g.node_width,
                node_height: g.node_height,
                padding: g.padding,
                header_height: g.header_height,
                column_width: g.column_width(),
                columns: effective.num_semesters,
            };
            let placed: Vec<Placed> = effective
                .nodes
                .iter()
                .filter_map(|n| {
                    courses.get(n.course_id.as_str()).map(|&course| Placed {
                        key: n.course_id.clone(),
                        course,
                        origin: n.origin(),
                    })
                })
                .collect();
            let ends: HashMap<&str, (String, String)> = effective
                .edges
                .iter()
                .map(|e| (e.id.as_str(), (e.source_id.clone(), e.target_id.clone())))
                .collect();
            let routes = state
                .routes()
                .into_iter()
                .filter_map(|(id, route)| {
                    let pair = ends.get(id.as_str()).cloned()?;
                    Some(((id, route), pair))
                })
                .collect::<Vec<_>>();
            (frame, placed, routes)
        }
    };

    let palette = state.palette();
    let dimmed: HashMap<&str, bool> = state
        .courses()
        .iter()
        .map(|c| (c.id.as_str(), state.node_appearance(c).dimmed))
        .collect();
    let is_dimmed = |id: &str| dimmed.get(id).copied().unwrap_or(false);

    let credits = &state.layout().semester_credits;
    let headers = (1..=frame.columns)
        .map(|semester| {
            let center = frame.padding
                + f64::from(semester - 1) * frame.column_width
                + frame.node_width / 2.0;
            let subtitle = credits
                .get(&semester)
                .map_or_else(String::new, |cr| format!("{cr} cr"));
            SvgHeader {
                x: num(center),
                y: num(frame.padding + frame.header_height * 0.35),
                subtitle_y: num(frame.padding + frame.header_height * 0.6),
                numeral: romanize(semester),
                subtitle,
            }
        })
        .collect();

    let edges = routes
        .into_iter()
        .map(|((id, route), (source, target))| SvgEdge {
            id,
            d: route.to_svg_path(),
            opacity: if is_dimmed(&source) || is_dimmed(&target) {
                DIMMED_OPACITY
            } else {
                FULL_OPACITY
            },
        })
        .collect();

    let nodes = placed
        .into_iter()
        .map(|p| {
            let center_x = p.origin.x + frame.node_width / 2.0;
            let top = p.origin.y;
            SvgNode {
                key: p.key,
                course_id: p.course.id.clone(),
                name: short_name(&p.course.name),
                credits: format!("{} cr", p.course.credits),
                x: num(p.origin.x),
                y: num(top),
                width: num(frame.node_width),
                height: num(frame.node_height),
                text_x: num(center_x),
                id_y: num(top + frame.node_height * 0.3),
                name_y: num(top + frame.node_height * 0.55),
                credits_y: num(top + frame.node_height * 0.8),
                fill: color_hex(palette.key_for(p.course)),
                opacity: if is_dimmed(&p.course.id) {
                    DIMMED_OPACITY
                } else {
                    FULL_OPACITY
                },
            }
        })
        .collect();

    let legend = state.legend();
    let legend_top = frame.height + LEGEND_TOP_GAP;
    #[allow(clippy::cast_precision_loss)]
    let rows: Vec<SvgLegendRow> = legend
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let baseline = legend_top + (i as f64 + 1.0) * LEGEND_ROW_HEIGHT;
            SvgLegendRow {
                x: num(frame.padding),
                text_x: num(frame.padding + 18.0),
                y: num(baseline),
                swatch_y: num(baseline - 10.0),
                fill: entry.color_hex(),
                label: format!("{} ({} cr)", entry.category, entry.total_credits),
            }
        })
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let total_height = legend_top + (rows.len() as f64 + 1.0) * LEGEND_ROW_HEIGHT;

    let template = FlowchartSvg {
        width: num(frame.width),
        height: num(total_height),
        title: format!("Curriculum flowchart ({} view)", state.settings().view),
        headers,
        edges,
        nodes,
        legend_x: num(frame.padding),
        legend_y: num(legend_top),
        legend_title: format!("{} (total {} cr)", legend.title, legend.total_credits),
        legend: rows,
    };

    Ok(template.render()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::InteractionMode;
    use crate::core::view::ViewSettings;

    fn courses() -> Vec<Course> {
        vec![
            Course::new("C1".to_string(), "Intro & Basics".to_string(), 1, 4.0),
            Course::new("C2".to_string(), "Next".to_string(), 2, 3.0).with_prerequisites(["C1"]),
        ]
    }

    #[test]
    fn test_romanize() {
        assert_eq!(romanize(1), "I");
        assert_eq!(romanize(4), "IV");
        assert_eq!(romanize(9), "IX");
        assert_eq!(romanize(14), "XIV");
        assert_eq!(romanize(0), "");
    }

    #[test]
    fn test_num_trims_trailing_zero() {
        assert_eq!(num(140.0), "140");
        assert_eq!(num(12.34), "12.3");
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("Intro"), "Intro");
        let long = "Introduction to Very Long Course Names";
        assert_eq!(short_name(long).chars().count(), NAME_MAX_CHARS);
    }

    #[test]
    fn test_semester_svg_contents() {
        let state = FlowchartState::new(courses(), ViewSettings::default());
        let svg = render_svg(&state).expect("render");

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Intro &amp; Basics"));
        assert!(svg.contains(">II<"));
        assert!(svg.contains("4 cr"));
        assert!(svg.contains("d=\"M 180 140 L 240 140\""));
    }

    #[test]
    fn test_horizontal_svg_uses_instance_ids() {
        let mut state = FlowchartState::new(courses(), ViewSettings::default());
        state.set_view(ViewMode::Horizontal);
        let svg = render_svg(&state).expect("render");

        assert!(svg.contains("node-0-1-C2"));
    }

    #[test]
    fn test_dragged_node_rendered_at_override() {
        let mut state = FlowchartState::new(courses(), ViewSettings::default());
        state.set_interaction_mode(InteractionMode::Free);
        state.begin_drag("C2", Point::new(240.0, 100.0));
        state.drag_to(Point::new(300.0, 400.0));
        state.end_drag();

        let svg = render_svg(&state).expect("render");
        assert!(svg.contains("x=\"300\" y=\"400\""));
    }
}
