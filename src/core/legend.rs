//! Category/legend aggregation
//!
//! Maps each course to a category along the selected highlight axis, sums
//! credits per category and tracks which categories the user hid or hovers.
//! Dimming decisions live in [`crate::core::view`]; this module only answers
//! membership questions.

use crate::core::models::{Course, CourseComponent, CourseType, EvaluationType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Classification dimension used to colour and group nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightAxis {
    /// Curriculum component
    #[default]
    Component,
    /// Evaluation group
    Evaluation,
    /// Mandatory / elective
    Type,
    /// Primary academic department
    Department,
    /// Academic area
    Area,
}

impl HighlightAxis {
    /// Every axis
    pub const ALL: [Self; 5] = [
        Self::Component,
        Self::Evaluation,
        Self::Type,
        Self::Department,
        Self::Area,
    ];

    /// Heading shown above the legend
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Component => "Component",
            Self::Evaluation => "Evaluation Type",
            Self::Type => "Course Type",
            Self::Department => "Department",
            Self::Area => "Academic Area",
        }
    }
}

impl FromStr for HighlightAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "component" | "competencia" => Ok(Self::Component),
            "evaluation" | "evaluation-group" => Ok(Self::Evaluation),
            "type" | "course-type" => Ok(Self::Type),
            "department" | "dept" => Ok(Self::Department),
            "area" => Ok(Self::Area),
            _ => Err(format!(
                "Unknown highlight axis: '{s}'. Use: component, evaluation, type, department, area"
            )),
        }
    }
}

impl fmt::Display for HighlightAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Component => "component",
            Self::Evaluation => "evaluation",
            Self::Type => "type",
            Self::Department => "department",
            Self::Area => "area",
        };
        write!(f, "{name}")
    }
}

/// Category label for courses without a department
pub const NO_DEPARTMENT: &str = "No Department";
/// Category label for courses without an academic area
pub const NO_AREA: &str = "No Area";

/// Category of a course along an axis
///
/// `None` only for the component axis when the course has no component;
/// such courses belong to no legend entry.
#[must_use]
pub fn category_of(course: &Course, axis: HighlightAxis) -> Option<String> {
    match axis {
        HighlightAxis::Component => course.component.map(|c| c.label().to_string()),
        HighlightAxis::Evaluation => Some(course.evaluation.label().to_string()),
        HighlightAxis::Type => Some(course.course_type.label().to_string()),
        HighlightAxis::Department => Some(
            course
                .primary_department()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(NO_DEPARTMENT)
                .to_string(),
        ),
        HighlightAxis::Area => Some(if course.area.trim().is_empty() {
            NO_AREA.to_string()
        } else {
            course.area.clone()
        }),
    }
}

/// Fallback colour key
pub const DEFAULT_COLOR: &str = "gray-600";

const COMPONENT_COLORS: [&str; 7] = [
    "cyan-600",
    "lime-600",
    "orange-600",
    "sky-600",
    "emerald-600",
    "amber-600",
    "rose-600",
];
const EVALUATION_COLORS: [&str; 4] = ["gray-500", "indigo-500", "fuchsia-600", "zinc-600"];
const TYPE_COLORS: [&str; 2] = ["slate-500", "teal-500"];
const CYCLING_COLORS: [&str; 8] = [
    "red-500",
    "blue-500",
    "green-500",
    "yellow-500",
    "purple-500",
    "pink-500",
    "indigo-500",
    "gray-500",
];

/// Hex value of a colour key, for renderers without a utility-class palette
#[must_use]
pub fn color_hex(key: &str) -> &'static str {
    match key {
        "cyan-600" => "#0891b2",
        "lime-600" => "#65a30d",
        "orange-600" => "#ea580c",
        "sky-600" => "#0284c7",
        "emerald-600" => "#059669",
        "amber-600" => "#d97706",
        "rose-600" => "#e11d48",
        "gray-500" => "#6b7280",
        "indigo-500" => "#6366f1",
        "fuchsia-600" => "#c026d3",
        "zinc-600" => "#52525b",
        "slate-500" => "#64748b",
        "teal-500" => "#14b8a6",
        "red-500" => "#ef4444",
        "blue-500" => "#3b82f6",
        "green-500" => "#22c55e",
        "yellow-500" => "#eab308",
        "purple-500" => "#a855f7",
        "pink-500" => "#ec4899",
        _ => "#4b5563",
    }
}

/// Colour assignment for one axis over one course list
///
/// Component, evaluation and type categories have fixed colours. Departments
/// and areas cycle through an 8-colour palette in order of first appearance.
#[derive(Debug, Clone)]
pub struct Palette {
    axis: HighlightAxis,
    dynamic: IndexMap<String, &'static str>,
}

impl Palette {
    /// Build the palette for `axis`
    #[must_use]
    pub fn new(courses: &[Course], axis: HighlightAxis) -> Self {
        let mut dynamic = IndexMap::new();
        if matches!(axis, HighlightAxis::Department | HighlightAxis::Area) {
            for category in courses.iter().filter_map(|c| category_of(c, axis)) {
                let next = CYCLING_COLORS[dynamic.len() % CYCLING_COLORS.len()];
                dynamic.entry(category).or_insert(next);
            }
        }
        Self { axis, dynamic }
    }

    /// Colour key of a category
    #[must_use]
    pub fn key(&self, category: &str) -> &'static str {
        let fixed = match self.axis {
            HighlightAxis::Component => CourseComponent::ALL
                .iter()
                .position(|c| c.label() == category)
                .map(|i| COMPONENT_COLORS[i]),
            HighlightAxis::Evaluation => EvaluationType::ALL
                .iter()
                .position(|e| e.label() == category)
                .map(|i| EVALUATION_COLORS[i]),
            HighlightAxis::Type => CourseType::ALL
                .iter()
                .position(|t| t.label() == category)
                .map(|i| TYPE_COLORS[i]),
            HighlightAxis::Department | HighlightAxis::Area => {
                self.dynamic.get(category).copied()
            }
        };
        fixed.unwrap_or(DEFAULT_COLOR)
    }

    /// Colour key of a course (default colour when it has no category)
    #[must_use]
    pub fn key_for(&self, course: &Course) -> &'static str {
        category_of(course, self.axis).map_or(DEFAULT_COLOR, |c| self.key(&c))
    }
}

/// One legend row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    /// Category label
    pub category: String,
    /// Colour key (utility-class style, e.g. `cyan-600`)
    pub color_key: String,
    /// Summed credits of the category
    pub total_credits: f32,
}

impl LegendEntry {
    /// Hex colour of the entry
    #[must_use]
    pub fn color_hex(&self) -> &'static str {
        color_hex(&self.color_key)
    }
}

/// Aggregated legend for one axis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    /// Axis the legend groups by
    pub axis: HighlightAxis,
    /// Heading
    pub title: String,
    /// Entries, descending by credits
    pub entries: Vec<LegendEntry>,
    /// Credits of every course, categorised or not
    pub total_credits: f32,
}

impl Legend {
    /// Aggregate credits per category
    ///
    /// Categories summing to zero credits are dropped. Ties keep the order in
    /// which categories first appear in `courses`.
    #[must_use]
    pub fn build(courses: &[Course], axis: HighlightAxis) -> Self {
        let palette = Palette::new(courses, axis);
        let mut sums: IndexMap<String, f32> = IndexMap::new();
        for course in courses {
            if let Some(category) = category_of(course, axis) {
                *sums.entry(category).or_insert(0.0) += course.credits;
            }
        }

        let mut entries: Vec<LegendEntry> = sums
            .into_iter()
            .filter(|(_, credits)| *credits > 0.0)
            .map(|(category, total_credits)| LegendEntry {
                color_key: palette.key(&category).to_string(),
                category,
                total_credits,
            })
            .collect();
        entries.sort_by(|a, b| b.total_credits.total_cmp(&a.total_credits));

        Self {
            axis,
            title: axis.title().to_string(),
            entries,
            total_credits: courses.iter().map(|c| c.credits).sum(),
        }
    }

    /// Look up an entry by category label
    #[must_use]
    pub fn entry(&self, category: &str) -> Option<&LegendEntry> {
        self.entries.iter().find(|e| e.category == category)
    }

    /// Sum of the entries' credits
    #[must_use]
    pub fn categorized_credits(&self) -> f32 {
        self.entries.iter().map(|e| e.total_credits).sum()
    }
}

impl fmt::Display for Legend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (total {} credits)", self.title, self.total_credits)?;
        for entry in &self.entries {
            writeln!(
                f,
                "  {:<55} {:>6} cr  {}",
                entry.category, entry.total_credits, entry.color_key
            )?;
        }
        Ok(())
    }
}

/// Hidden and hovered legend categories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegendState {
    hidden: BTreeSet<String>,
    hovered: Option<String>,
}

impl LegendState {
    /// Flip a category's hidden flag; clears the hover
    ///
    /// # Returns
    /// Whether the category is hidden afterwards
    pub fn toggle(&mut self, category: &str) -> bool {
        self.hovered = None;
        if self.hidden.remove(category) {
            false
        } else {
            self.hidden.insert(category.to_string());
            true
        }
    }

    /// Hover a category; ignored for hidden categories
    pub fn hover(&mut self, category: &str) {
        if !self.hidden.contains(category) {
            self.hovered = Some(category.to_string());
        }
    }

    /// Drop the hover
    pub fn clear_hover(&mut self) {
        self.hovered = None;
    }

    /// Forget hidden categories and hover
    pub fn clear(&mut self) {
        self.hidden.clear();
        self.hovered = None;
    }

    /// Currently hovered category
    #[must_use]
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Hidden categories
    #[must_use]
    pub const fn hidden(&self) -> &BTreeSet<String> {
        &self.hidden
    }

    /// Whether a category is hidden
    #[must_use]
    pub fn is_hidden(&self, category: &str) -> bool {
        self.hidden.contains(category)
    }

    /// Whether a course falls in a hidden category
    #[must_use]
    pub fn is_course_hidden(&self, course: &Course, axis: HighlightAxis) -> bool {
        category_of(course, axis).is_some_and(|c| self.hidden.contains(&c))
    }

    /// Whether a course matches the hovered category
    ///
    /// `None` when no category is hovered.
    #[must_use]
    pub fn matches_hover(&self, course: &Course, axis: HighlightAxis) -> Option<bool> {
        let hovered = self.hovered.as_deref()?;
        Some(category_of(course, axis).as_deref() == Some(hovered))
    }
}
