//! Edge routing between two anchors

use super::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How edges are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    /// Direct segment from anchor to anchor
    #[default]
    Straight,
    /// Horizontal, vertical, horizontal with rounded corners
    Orthogonal,
}

impl RouteMode {
    /// Map the `orthogonal` toggle to a mode
    #[must_use]
    pub const fn from_orthogonal(orthogonal: bool) -> Self {
        if orthogonal {
            Self::Orthogonal
        } else {
            Self::Straight
        }
    }
}

impl FromStr for RouteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "straight" => Ok(Self::Straight),
            "orthogonal" | "ortho" => Ok(Self::Orthogonal),
            _ => Err(format!("Unknown route mode: '{s}'. Use: straight, orthogonal")),
        }
    }
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Straight => write!(f, "straight"),
            Self::Orthogonal => write!(f, "orthogonal"),
        }
    }
}

/// Tuning of orthogonal routes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteStyle {
    /// Largest corner radius
    pub corner_radius: f64,
    /// Anchors closer than this vertically are joined by a straight segment
    pub straight_tolerance: f64,
    /// Radii at or below this fall back to sharp corners
    pub min_radius: f64,
}

impl Default for RouteStyle {
    fn default() -> Self {
        Self {
            corner_radius: 15.0,
            straight_tolerance: 1.0,
            min_radius: 1.0,
        }
    }
}

/// One SVG path command in absolute coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// `M x y`
    MoveTo(Point),
    /// `L x y`
    LineTo(Point),
    /// `H x`
    HorizontalTo(f64),
    /// `V y`
    VerticalTo(f64),
    /// `Q cx cy x y`
    QuadTo {
        /// Control point
        control: Point,
        /// End point
        to: Point,
    },
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveTo(p) => write!(f, "M {} {}", p.x, p.y),
            Self::LineTo(p) => write!(f, "L {} {}", p.x, p.y),
            Self::HorizontalTo(x) => write!(f, "H {x}"),
            Self::VerticalTo(y) => write!(f, "V {y}"),
            Self::QuadTo { control, to } => {
                write!(f, "Q {} {} {} {}", control.x, control.y, to.x, to.y)
            }
        }
    }
}

/// A routed edge
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRoute {
    /// Path commands, starting with a `MoveTo`
    pub commands: Vec<PathCommand>,
}

impl EdgeRoute {
    /// Render as an SVG `d` attribute
    #[must_use]
    pub fn to_svg_path(&self) -> String {
        self.commands
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether the route is a single straight segment
    #[must_use]
    pub fn is_straight(&self) -> bool {
        matches!(
            self.commands.as_slice(),
            [PathCommand::MoveTo(_), PathCommand::LineTo(_)]
        )
    }

    /// Whether the route has rounded corners
    #[must_use]
    pub fn is_curved(&self) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, PathCommand::QuadTo { .. }))
    }
}

fn straight(from: Point, to: Point) -> EdgeRoute {
    EdgeRoute {
        commands: vec![PathCommand::MoveTo(from), PathCommand::LineTo(to)],
    }
}

/// Route an edge between two anchors
///
/// # Arguments
/// * `from` - Source anchor (right-center of the prerequisite)
/// * `to` - Target anchor (left-center of the dependent course)
/// * `mode` - Straight or orthogonal
/// * `style` - Corner tuning for orthogonal routes
///
/// # Returns
/// A straight segment in straight mode or when both anchors share a y
/// (within `straight_tolerance`). Otherwise an orthogonal route turning at the
/// horizontal midpoint, with the corner radius capped by half the vertical and
/// half the horizontal span, or sharp corners when that radius is too small.
#[must_use]
pub fn route_edge(from: Point, to: Point, mode: RouteMode, style: &RouteStyle) -> EdgeRoute {
    let dy = to.y - from.y;
    if mode == RouteMode::Straight || dy.abs() < style.straight_tolerance {
        return straight(from, to);
    }

    let half_span = (to.x - from.x) / 2.0;
    let mid_x = from.x + half_span;
    let radius = style
        .corner_radius
        .min(dy.abs() / 2.0)
        .min(half_span)
        .max(0.0);

    if radius <= style.min_radius {
        return EdgeRoute {
            commands: vec![
                PathCommand::MoveTo(from),
                PathCommand::HorizontalTo(mid_x),
                PathCommand::VerticalTo(to.y),
                PathCommand::HorizontalTo(to.x),
            ],
        };
    }

    let dir = dy.signum();
    EdgeRoute {
        commands: vec![
            PathCommand::MoveTo(from),
            PathCommand::LineTo(Point::new(mid_x - radius, from.y)),
            PathCommand::QuadTo {
                control: Point::new(mid_x, from.y),
                to: Point::new(mid_x, from.y + dir * radius),
            },
            PathCommand::LineTo(Point::new(mid_x, to.y - dir * radius)),
            PathCommand::QuadTo {
                control: Point::new(mid_x, to.y),
                to: Point::new(mid_x + radius, to.y),
            },
            PathCommand::LineTo(to),
        ],
    }
}
