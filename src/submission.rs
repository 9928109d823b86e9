// src/submission.rs

//! Validation of a score submission's section entries.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::{error::AppError, models::result::Section};

/// Validated counts for one section of a new attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionResult {
    pub section_id: i64,
    pub total_questions: i32,
    pub correct_answers: i32,
}

/// One malformed section entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionError {
    pub section: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The payload named no sections at all.
    Empty,
    /// Section names with no configured section.
    MissingSections(Vec<String>),
    /// Entries whose values could not be accepted.
    Invalid(Vec<SectionError>),
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Empty => {
                AppError::BadRequest("No section results found in payload".to_string())
            }
            SubmissionError::MissingSections(names) => AppError::Rejected {
                message: "Some section names are not configured in database".to_string(),
                details: Map::from_iter([("missing_sections".to_string(), json!(names))]),
            },
            SubmissionError::Invalid(errors) => AppError::Rejected {
                message: "Some section payloads are invalid".to_string(),
                details: Map::from_iter([("errors".to_string(), json!(errors))]),
            },
        }
    }
}

const TOTAL_KEYS: [&str; 3] = ["total_questions", "total", "totalQuestions"];
const CORRECT_KEYS: [&str; 3] = ["correct_answers", "correct", "correctQuestions"];

/// Case-insensitive section name to id table.
pub fn section_index(sections: &[Section]) -> HashMap<String, i64> {
    sections
        .iter()
        .map(|s| (s.name.trim().to_lowercase(), s.id))
        .collect()
}

/// Checks every section entry of a submission.
///
/// Unknown section names take precedence over malformed values: if any name
/// is unknown only `MissingSections` is reported.
pub fn parse_sections(
    entries: &Map<String, Value>,
    index: &HashMap<String, i64>,
) -> Result<Vec<SectionResult>, SubmissionError> {
    if entries.is_empty() {
        return Err(SubmissionError::Empty);
    }

    let mut results = Vec::with_capacity(entries.len());
    let mut missing = Vec::new();
    let mut invalid = Vec::new();

    for (name, value) in entries {
        let Some(&section_id) = index.get(&name.trim().to_lowercase()) else {
            missing.push(name.clone());
            continue;
        };

        match parse_counts(value) {
            Ok((total_questions, correct_answers)) => results.push(SectionResult {
                section_id,
                total_questions,
                correct_answers,
            }),
            Err(error) => invalid.push(SectionError {
                section: name.clone(),
                error: error.to_string(),
            }),
        }
    }

    if !missing.is_empty() {
        return Err(SubmissionError::MissingSections(missing));
    }
    if !invalid.is_empty() {
        return Err(SubmissionError::Invalid(invalid));
    }
    Ok(results)
}

fn parse_counts(value: &Value) -> Result<(i32, i32), &'static str> {
    let empty = Map::new();
    let fields = match value {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => return Err("Section value must be an object"),
    };

    let total = first_present(fields, &TOTAL_KEYS);
    let correct = first_present(fields, &CORRECT_KEYS);

    let (Some(total), Some(correct)) = (total.and_then(as_count), correct.and_then(as_count))
    else {
        return Err("total_questions and correct_answers must be integers");
    };

    if total < 0 || correct < 0 || correct > total {
        return Err("Invalid counts (ensure 0 <= correct <= total)");
    }
    Ok((total, correct))
}

fn first_present<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| fields.get(*k))
        .find(|v| !v.is_null())
}

/// Accepts JSON integers and integer strings that fit in an `i32`.
fn as_count(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}
