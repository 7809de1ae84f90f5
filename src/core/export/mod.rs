//! Flowchart export
//!
//! Serialises the active view of a [`FlowchartState`] as JSON (geometry for a
//! renderer) or as a standalone SVG drawing.

pub mod svg;

pub use svg::{render_svg, romanize};

use crate::core::layout::{LaneLayout, LayoutResult};
use crate::core::legend::Legend;
use crate::core::view::{FlowchartState, ViewMode, ViewSettings};
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutFormat {
    /// Layout geometry, legend and routed edge paths as JSON
    #[default]
    Json,
    /// Standalone SVG drawing
    Svg,
}

impl LayoutFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Svg => "svg",
        }
    }
}

impl FromStr for LayoutFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "svg" => Ok(Self::Svg),
            _ => Err(format!("Unknown layout format: {s}")),
        }
    }
}

impl fmt::Display for LayoutFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Svg => write!(f, "svg"),
        }
    }
}

/// A routed edge as an SVG path string
#[derive(Debug, Clone, Serialize)]
pub struct RouteExport {
    /// Edge id
    pub id: String,
    /// SVG `d` attribute
    pub d: String,
}

/// JSON document describing one view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowchartExport<'a> {
    /// View the document describes
    pub view: ViewMode,
    /// Toggles used
    pub settings: &'a ViewSettings,
    /// Semester layout with manual positions applied (semester view)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutResult>,
    /// Lane layout (horizontal view)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lanes: Option<&'a LaneLayout>,
    /// Legend for the highlight axis
    pub legend: Legend,
    /// Routed edges of the active view
    pub routes: Vec<RouteExport>,
}

impl<'a> FlowchartExport<'a> {
    /// Collect the active view of a flowchart
    #[must_use]
    pub fn from_state(state: &'a FlowchartState) -> Self {
        let settings = state.settings();
        let legend = state.legend();
        match (settings.view, state.lane_layout()) {
            (ViewMode::Horizontal, Some(lanes)) => Self {
                view: ViewMode::Horizontal,
                settings,
                layout: None,
                lanes: Some(lanes),
                legend,
                routes: svg::lane_routes(state, lanes)
                    .into_iter()
                    .map(|(id, route)| RouteExport {
                        id,
                        d: route.to_svg_path(),
                    })
                    .collect(),
            },
            _ => Self {
                view: ViewMode::Semester,
                settings,
                layout: Some(state.effective_layout()),
                lanes: None,
                legend,
                routes: state
                    .routes()
                    .into_iter()
                    .map(|(id, route)| RouteExport {
                        id,
                        d: route.to_svg_path(),
                    })
                    .collect(),
            },
        }
    }
}

/// Render the active view in `format`
///
/// # Errors
/// Returns an error if serialisation or template rendering fails
pub fn render(state: &FlowchartState, format: LayoutFormat) -> Result<String, Box<dyn Error>> {
    match format {
        LayoutFormat::Json => Ok(serde_json::to_string_pretty(&FlowchartExport::from_state(
            state,
        ))?),
        LayoutFormat::Svg => render_svg(state),
    }
}

/// Render the active view and write it to `path`, creating parent directories
///
/// # Errors
/// Returns an error if rendering or writing fails
pub fn write_export(
    state: &FlowchartState,
    format: LayoutFormat,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let content = render(state, format)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    crate::info!("Wrote {} export to {}", format, path.display());
    Ok(())
}

/// Default export file name: `<stem>_<view>.<ext>`
#[must_use]
pub fn output_file_name(stem: &str, view: ViewMode, format: LayoutFormat) -> String {
    format!("{stem}_{view}.{}", format.extension())
}
