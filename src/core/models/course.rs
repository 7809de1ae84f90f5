//! Course model and its classification fields

use serde::{Deserialize, Serialize};
use std::fmt;

/// Curriculum component a course belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CourseComponent {
    /// Basic formation
    #[serde(rename = "A")]
    A,
    /// Specialized formation
    #[serde(rename = "B")]
    B,
    /// Professional formation and others
    #[serde(rename = "C")]
    C,
    /// General studies: learning capacities
    #[serde(rename = "D")]
    GeneralLearning,
    /// General studies: humanistic formation, identity and citizenship
    #[serde(rename = "E")]
    GeneralHumanistic,
    /// Specific studies
    #[serde(rename = "F")]
    Specific,
    /// Specialty studies
    #[serde(rename = "G")]
    Specialty,
}

impl CourseComponent {
    /// Every component, in legend order
    pub const ALL: [Self; 7] = [
        Self::A,
        Self::B,
        Self::C,
        Self::GeneralLearning,
        Self::GeneralHumanistic,
        Self::Specific,
        Self::Specialty,
    ];

    /// Human-readable component name
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "Basic Formation",
            Self::B => "Specialized Formation",
            Self::C => "Professional Formation and Others",
            Self::GeneralLearning => "General Studies: Learning Capacities",
            Self::GeneralHumanistic => "General Studies: Humanistic Formation and Citizenship",
            Self::Specific => "Specific Studies",
            Self::Specialty => "Specialty Studies",
        }
    }

    /// Academic area implied by the component, if any
    #[must_use]
    pub const fn academic_area(self) -> Option<&'static str> {
        match self {
            Self::A | Self::B | Self::C => None,
            Self::GeneralLearning | Self::GeneralHumanistic => Some("General Studies"),
            Self::Specific => Some("Specific Studies"),
            Self::Specialty => Some("Specialty Studies"),
        }
    }
}

/// Evaluation group of a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationType {
    /// Regular evaluation
    #[default]
    Regular,
    /// Control course
    Control,
    /// Capstone course
    Capstone,
    /// Not evaluated as part of a group
    NotApplicable,
}

impl EvaluationType {
    /// Every evaluation group, in legend order
    pub const ALL: [Self; 4] = [
        Self::Regular,
        Self::Control,
        Self::Capstone,
        Self::NotApplicable,
    ];

    /// Human-readable evaluation group name
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Regular => "Regular",
            Self::Control => "Control",
            Self::Capstone => "Capstone",
            Self::NotApplicable => "Not Applicable",
        }
    }
}

/// Whether a course is mandatory or elective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CourseType {
    /// Required course
    #[default]
    #[serde(rename = "OBLIGATORIO")]
    Mandatory,
    /// Elective course
    #[serde(rename = "ELECTIVO")]
    Elective,
}

impl CourseType {
    /// Both course types, in legend order
    pub const ALL: [Self; 2] = [Self::Mandatory, Self::Elective];

    /// Human-readable course type name
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mandatory => "Mandatory",
            Self::Elective => "Elective",
        }
    }
}

/// Delivery modality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Modality {
    /// On campus
    #[default]
    #[serde(rename = "PRESENCIAL")]
    Presential,
    /// Mixed delivery
    #[serde(rename = "SEMIPRESENCIAL")]
    SemiPresential,
    /// Online
    #[serde(rename = "VIRTUAL")]
    Virtual,
}

/// Weekly hour breakdown (display only, never read by the layout engines)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HourBreakdown {
    /// Theory hours
    pub theory_hours: f32,
    /// Practice hours
    pub practice_hours: f32,
    /// Lab hours
    pub lab_hours: f32,
    /// Seminar hours
    pub seminar_hours: f32,
    /// Combined theory-practice hours
    pub theory_practice_hours: f32,
}

impl HourBreakdown {
    /// Total weekly hours
    #[must_use]
    pub fn total(&self) -> f32 {
        self.theory_hours
            + self.practice_hours
            + self.lab_hours
            + self.seminar_hours
            + self.theory_practice_hours
    }
}

/// Represents a course in a curriculum plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Unique identifier, used as the graph node key (e.g., "IS1101")
    pub id: String,

    /// Display label
    pub name: String,

    /// Semester the course is planned in (1-based)
    pub semester: u32,

    /// Credits (non-negative, can be fractional)
    pub credits: f32,

    /// Prerequisite course ids, in declaration order
    pub prerequisites: Vec<String>,

    /// Curriculum component
    #[serde(rename = "competencia", default)]
    pub component: Option<CourseComponent>,

    /// Evaluation group
    #[serde(rename = "tipoMedicion", default)]
    pub evaluation: EvaluationType,

    /// Mandatory or elective
    #[serde(rename = "tipoAsignatura", default)]
    pub course_type: CourseType,

    /// Academic departments offering the course; the first one is primary
    #[serde(rename = "academicDepartments", default)]
    pub departments: Vec<String>,

    /// Academic area (may be empty)
    #[serde(rename = "areaAcademica", default)]
    pub area: String,

    /// Weekly hours
    #[serde(flatten)]
    pub hours: HourBreakdown,

    /// Delivery modality
    #[serde(default)]
    pub modality: Modality,
}

impl Course {
    /// Create a new course with no prerequisites or classification
    ///
    /// # Arguments
    /// * `id` - Unique course id
    /// * `name` - Display name
    /// * `semester` - Planned semester (1-based)
    /// * `credits` - Credits (can be fractional)
    #[must_use]
    pub const fn new(id: String, name: String, semester: u32, credits: f32) -> Self {
        Self {
            id,
            name,
            semester,
            credits,
            prerequisites: Vec::new(),
            component: None,
            evaluation: EvaluationType::Regular,
            course_type: CourseType::Mandatory,
            departments: Vec::new(),
            area: String::new(),
            hours: HourBreakdown {
                theory_hours: 0.0,
                practice_hours: 0.0,
                lab_hours: 0.0,
                seminar_hours: 0.0,
                theory_practice_hours: 0.0,
            },
            modality: Modality::Presential,
        }
    }

    /// Add a prerequisite by course id
    ///
    /// Duplicates and references to the course itself are ignored.
    pub fn add_prerequisite(&mut self, prereq_id: String) {
        if prereq_id != self.id && !self.prerequisites.contains(&prereq_id) {
            self.prerequisites.push(prereq_id);
        }
    }

    /// Builder-style variant of [`add_prerequisite`](Self::add_prerequisite)
    #[must_use]
    pub fn with_prerequisites<I, S>(mut self, prereqs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for prereq in prereqs {
            self.add_prerequisite(prereq.into());
        }
        self
    }

    /// Semester used for column placement; a zero semester falls into the first column
    #[must_use]
    pub const fn column_semester(&self) -> u32 {
        if self.semester == 0 {
            1
        } else {
            self.semester
        }
    }

    /// Primary academic department, if any
    #[must_use]
    pub fn primary_department(&self) -> Option<&str> {
        self.departments.first().map(String::as_str)
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} (semester {}, {} cr)",
            self.id, self.name, self.semester, self.credits
        )
    }
}
