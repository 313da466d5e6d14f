//! Reference-vs-submission matching and the drawing score.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::element::{element_matches, grading_name, DrawnElement};
use crate::error::SubmissionError;

const NO_ANSWER: &str = "No submitted answer.";

fn default_tol() -> f64 {
    10.0
}

/// Grading options of one drawing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingOptions {
    /// Position tolerance, px; half the default 20 px grid.
    #[serde(default = "default_tol")]
    pub tol: f64,
    /// Angle tolerance, degrees.
    #[serde(default = "default_tol")]
    pub angle_tol: f64,
    /// Accept several submissions matching one reference instead of counting them
    /// as extras.
    #[serde(default)]
    pub disregard_extra: bool,
}

impl Default for DrawingOptions {
    fn default() -> Self {
        Self {
            tol: default_tol(),
            angle_tol: default_tol(),
            disregard_extra: false,
        }
    }
}

/// The objects of one drawing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Drawing {
    pub elements: Vec<DrawnElement>,
}

impl Drawing {
    pub fn new(elements: Vec<DrawnElement>) -> Self {
        Self { elements }
    }

    /// Parse a reference drawing, `{"objects": [...]}` or a bare array. Every object
    /// must be well formed.
    pub fn from_value(value: &Value) -> Result<Self, SubmissionError> {
        let objects = objects(value)
            .ok_or_else(|| SubmissionError::Json("drawing has no `objects` list".into()))?;
        let elements = objects
            .iter()
            .map(DrawnElement::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { elements })
    }

    /// Parse a student drawing. `None` when there is no object list; malformed
    /// objects are dropped.
    pub fn from_submission(value: &Value) -> Option<Self> {
        let elements = objects(value)?
            .iter()
            .filter_map(|v| match DrawnElement::from_value(v) {
                Ok(e) => Some(e),
                Err(e) => {
                    tracing::warn!(error = %e, "dropping malformed drawing object");
                    None
                }
            })
            .collect();
        Some(Self { elements })
    }

    fn gradeable(&self) -> impl Iterator<Item = (usize, &DrawnElement)> + '_ {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_gradeable())
    }
}

fn objects(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(obj) => obj.get("objects").and_then(Value::as_array),
        _ => None,
    }
}

/// Result of grading one drawing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawingReport {
    pub score: f64,
    pub correct: bool,
    /// Whether each gradeable reference was matched, keyed by its id (or position).
    pub matches: BTreeMap<String, bool>,
    pub feedback: Vec<String>,
}

impl DrawingReport {
    fn no_answer() -> Self {
        Self {
            score: 0.0,
            correct: false,
            matches: BTreeMap::new(),
            feedback: vec![NO_ANSWER.to_string()],
        }
    }
}

/// Match every submitted element against the reference.
///
/// A reference is consumed by the first submitted element of the same kind that
/// matches it. Optional references never count toward the total, and neither do the
/// submissions matching them. When every required reference is matched, unmatched
/// submissions lower the score.
pub fn grade_drawing(
    reference: &Drawing,
    submitted: Option<&Drawing>,
    opts: &DrawingOptions,
) -> DrawingReport {
    let Some(submitted) = submitted else {
        return DrawingReport::no_answer();
    };
    let refs: Vec<(String, &DrawnElement)> = reference
        .gradeable()
        .map(|(i, e)| (e.id.clone().unwrap_or_else(|| i.to_string()), e))
        .collect();
    let total = refs.iter().filter(|(_, e)| !e.is_optional()).count();
    let mut matched = vec![false; refs.len()];
    let (mut correct, mut optional, mut drawn) = (0usize, 0usize, 0usize);

    for (_, el) in submitted.gradeable() {
        drawn += 1;
        let Some(sp) = &el.primitive else { continue };
        for (slot, (_, r)) in refs.iter().enumerate() {
            let Some(rp) = &r.primitive else { continue };
            if grading_name(rp) != grading_name(sp) {
                continue;
            }
            if matched[slot] && !opts.disregard_extra {
                continue;
            }
            if element_matches(rp, sp, opts.tol, opts.angle_tol) {
                if r.is_optional() || matched[slot] {
                    optional += 1;
                } else {
                    correct += 1;
                }
                matched[slot] = true;
                break;
            }
        }
    }

    let extra = drawn.saturating_sub(optional + correct);
    let score = if total == 0 {
        1.0
    } else {
        let share = correct as f64 / total as f64;
        if correct == total {
            (share - extra as f64 / total as f64).max(0.0)
        } else {
            share
        }
    };
    tracing::debug!(score, references = total, drawn, correct, extra, "graded drawing");

    let mut feedback = Vec::new();
    if correct < total {
        feedback.push(format!(
            "{} of {total} expected elements are missing or misplaced.",
            total - correct
        ));
    }
    if correct == total && extra > 0 {
        feedback.push(format!("{extra} extra element(s) drawn."));
    }
    DrawingReport {
        score,
        correct: score >= 1.0,
        matches: refs
            .into_iter()
            .zip(matched)
            .map(|((id, _), m)| (id, m))
            .collect(),
        feedback,
    }
}
