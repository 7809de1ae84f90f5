//! JSON course-list import with normalisation
//!
//! Accepts a bare array of course records or an object with a `courses`
//! array. Records use the plan field names (`competencia`, `tipoMedicion`,
//! `academicDepartments`, ...); unknown fields are ignored and missing or
//! unreadable fields fall back to defaults.

use crate::core::models::{
    Course, CourseComponent, CourseType, EvaluationType, HourBreakdown, Modality,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fs;
use std::path::Path;

/// A course id written as a string or a number
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => n.to_string(),
        }
    }
}

/// Treat `null`, `""` and values of the wrong shape as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| !v.is_null() && v.as_str() != Some(""))
        .and_then(|v| serde_json::from_value(v).ok()))
}

/// Prerequisite ids, skipping elements that are not a string or a number
fn lenient_ids<'de, D>(deserializer: D) -> Result<Vec<RawId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let elements = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(elements)) => elements,
        Some(single @ (Value::String(_) | Value::Number(_))) => vec![single],
        Some(other) => {
            crate::warn!("Ignoring prerequisites that are not a list: {other}");
            return Ok(Vec::new());
        }
    };

    Ok(elements
        .into_iter()
        .filter_map(|element| match serde_json::from_value::<RawId>(element.clone()) {
            Ok(id) => Some(id),
            Err(_) => {
                crate::warn!("Skipping malformed prerequisite entry: {element}");
                None
            }
        })
        .collect())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCourse {
    id: RawId,
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    semester: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    credits: Option<f32>,
    #[serde(default, deserialize_with = "lenient_ids")]
    prerequisites: Vec<RawId>,
    #[serde(default, deserialize_with = "lenient")]
    competencia: Option<CourseComponent>,
    #[serde(default, deserialize_with = "lenient")]
    tipo_medicion: Option<EvaluationType>,
    #[serde(default, deserialize_with = "lenient")]
    tipo_asignatura: Option<CourseType>,
    #[serde(default, deserialize_with = "lenient")]
    academic_departments: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    area_academica: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    modality: Option<Modality>,
    #[serde(default, deserialize_with = "lenient")]
    theory_hours: Option<f32>,
    #[serde(default, deserialize_with = "lenient")]
    practice_hours: Option<f32>,
    #[serde(default, deserialize_with = "lenient")]
    lab_hours: Option<f32>,
    #[serde(default, deserialize_with = "lenient")]
    seminar_hours: Option<f32>,
    #[serde(default, deserialize_with = "lenient")]
    theory_practice_hours: Option<f32>,
}

/// Semester encoded in a course id
///
/// Characters 4 and 5 (1-based) hold the study year and the term within it,
/// e.g. `IS1201` → year 2, term 1 → semester 3.
#[must_use]
pub fn semester_from_id(id: &str) -> Option<u32> {
    let mut digits = id.chars().skip(3);
    let year = digits.next()?.to_digit(10)?;
    let term = digits.next()?.to_digit(10)?;
    let semester = (year * 2 + term).checked_sub(2)?;
    (semester >= 1).then_some(semester)
}

fn non_negative(value: Option<f32>) -> f32 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0)
}

fn normalize(raw: RawCourse) -> Course {
    let id = raw.id.into_string();
    let name = raw.name.unwrap_or_else(|| id.clone());

    let semester = raw
        .semester
        .and_then(|s| u32::try_from(s).ok())
        .filter(|&s| s >= 1)
        .or_else(|| semester_from_id(&id))
        .unwrap_or(1);

    let course_type = raw.tipo_asignatura.unwrap_or(if name.contains("(E)") {
        CourseType::Elective
    } else {
        CourseType::Mandatory
    });

    let mut course = Course::new(id, name, semester, non_negative(raw.credits));
    course.component = Some(raw.competencia.unwrap_or(CourseComponent::Specific));
    course.evaluation = raw.tipo_medicion.unwrap_or_default();
    course.course_type = course_type;
    course.departments = raw
        .academic_departments
        .unwrap_or_default()
        .into_iter()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect();
    course.area = raw.area_academica.unwrap_or_default();
    course.modality = raw.modality.unwrap_or_default();
    course.hours = HourBreakdown {
        theory_hours: non_negative(raw.theory_hours),
        practice_hours: non_negative(raw.practice_hours),
        lab_hours: non_negative(raw.lab_hours),
        seminar_hours: non_negative(raw.seminar_hours),
        theory_practice_hours: non_negative(raw.theory_practice_hours),
    };

    for prereq in raw.prerequisites {
        let prereq = prereq.into_string();
        if prereq.is_empty() {
            continue;
        }
        if prereq == course.id {
            crate::info!("Dropped self-referencing prerequisite on course {}", course.id);
            continue;
        }
        course.add_prerequisite(prereq);
    }

    course
}

/// Deserialize the `number`-th (1-based) record of a course list
fn raw_course(number: usize, record: Value) -> Result<RawCourse, String> {
    let Value::Object(fields) = &record else {
        return Err(format!("Course record {number} is not an object"));
    };
    if fields.get("id").map_or(true, Value::is_null) {
        return Err(match fields.get("name").and_then(Value::as_str) {
            Some(name) => format!("Course record {number} ('{name}') has no `id`"),
            None => format!("Course record {number} has no `id`"),
        });
    }
    serde_json::from_value(record).map_err(|e| format!("Invalid course record {number}: {e}"))
}

/// Parse and normalise a course list from JSON text
///
/// # Arguments
/// * `json` - A JSON array of course records, or `{ "courses": [...] }`
///
/// # Returns
/// Normalised courses in input order
///
/// # Errors
/// Returns an error if the text is not valid JSON or a record has no `id`
pub fn parse_courses_json_str(json: &str) -> Result<Vec<Course>, Box<dyn Error>> {
    let plan: Value =
        serde_json::from_str(json).map_err(|e| format!("Invalid course list: {e}"))?;
    let records = match plan {
        Value::Array(records) => records,
        Value::Object(mut wrapper) => match wrapper.remove("courses") {
            Some(Value::Array(records)) => records,
            _ => return Err("Invalid course list: expected a `courses` array".into()),
        },
        _ => {
            return Err(
                "Invalid course list: expected an array of courses or an object with `courses`"
                    .into(),
            )
        }
    };

    let mut courses = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        courses.push(normalize(raw_course(index + 1, record)?));
    }

    let mut seen = HashSet::new();
    for course in &courses {
        if !seen.insert(course.id.as_str()) {
            crate::warn!("Duplicate course id '{}' in course list", course.id);
        }
    }

    crate::debug!("Imported {} courses", courses.len());
    Ok(courses)
}

/// Read and normalise a course list from a JSON file
///
/// # Arguments
/// * `path` - Path to the JSON file
///
/// # Returns
/// Normalised courses in file order
///
/// # Errors
/// Returns an error if the file cannot be read or parsed
pub fn parse_courses_json<P: AsRef<Path>>(path: P) -> Result<Vec<Course>, Box<dyn Error>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    parse_courses_json_str(&content)
}
