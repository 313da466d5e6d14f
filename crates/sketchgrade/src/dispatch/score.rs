//! Weighted, staged scoring of a submission against a grader set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::grader::{Grader, GraderKind, GraderSet};
use super::modes::{default_feedback, evaluate, Context, Sheet};
use crate::error::GradeError;
use crate::grade::Debugger;
use crate::primitive::Submission;

const NO_ANSWER: &str = "No submitted answer.";
const ALL_CORRECT: &str = "Correct!";

/// Outcome of one grader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraderOutcome {
    /// `"{index}:{kind}"`, unique within the set.
    pub name: String,
    pub kind: GraderKind,
    pub stage: u32,
    /// 1 or 0.
    pub score: f64,
    pub weight: u32,
    /// Passed, but an earlier stage failed so it does not count.
    #[serde(default)]
    pub gated: bool,
    /// Empty on pass; otherwise the message followed by debug lines.
    pub feedback: Vec<String>,
}

/// Per-grader entry of the host's partial-score table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartialScore {
    pub score: f64,
    pub weight: u32,
    pub feedback: Vec<String>,
}

/// Result of grading one submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    /// Weighted mean of grader scores in `[0, 1]`.
    pub score: f64,
    /// First line of every failing grader, or a single success line.
    pub feedback: Vec<String>,
    /// One entry per grader, in declaration order.
    pub graders: Vec<GraderOutcome>,
}

impl GradeReport {
    /// Zero score for a submission that could not be graded at all.
    pub fn rejected(set: &GraderSet, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let graders = set
            .graders
            .iter()
            .enumerate()
            .map(|(i, g)| GraderOutcome {
                name: outcome_name(i, g),
                kind: g.kind,
                stage: g.stage,
                score: 0.0,
                weight: g.weight,
                gated: false,
                feedback: vec![reason.clone()],
            })
            .collect();
        Self {
            score: 0.0,
            feedback: vec![reason],
            graders,
        }
    }

    #[inline]
    pub fn is_correct(&self) -> bool {
        self.score >= 1.0
    }

    /// The report keyed by grader name.
    pub fn partial_scores(&self) -> BTreeMap<String, PartialScore> {
        self.graders
            .iter()
            .map(|o| {
                let entry = PartialScore {
                    score: o.score,
                    weight: o.weight,
                    feedback: o.feedback.clone(),
                };
                (o.name.clone(), entry)
            })
            .collect()
    }
}

fn outcome_name(index: usize, grader: &Grader) -> String {
    format!("{index}:{}", grader.kind)
}

/// Grade a transport-encoded submission; `None` or blank text means nothing was
/// submitted.
///
/// Only an invalid grader set is an error. Undecodable submissions score 0 with an
/// explanation.
pub fn grade_encoded(encoded: Option<&str>, set: &GraderSet) -> Result<GradeReport, GradeError> {
    set.validate()?;
    let Some(text) = encoded.filter(|t| !t.trim().is_empty()) else {
        tracing::info!("no submission to grade");
        return Ok(GradeReport::rejected(set, NO_ANSWER));
    };
    match Submission::decode(text) {
        Ok(submission) => grade_validated(&submission, set),
        Err(e) => {
            tracing::warn!(error = %e, "submission rejected");
            Ok(GradeReport::rejected(set, format!("Invalid submission: {e}")))
        }
    }
}

/// Grade a decoded submission.
pub fn grade(submission: &Submission, set: &GraderSet) -> Result<GradeReport, GradeError> {
    set.validate()?;
    grade_validated(submission, set)
}

fn grade_validated(submission: &Submission, set: &GraderSet) -> Result<GradeReport, GradeError> {
    let sheet = match Sheet::new(submission.clone(), set.tolerances, &set.tools) {
        Ok(sheet) => sheet,
        Err(e) => {
            tracing::warn!(error = %e, "submission rejected");
            return Ok(GradeReport::rejected(set, format!("Invalid submission: {e}")));
        }
    };
    let flipped = if set.graders.iter().any(|g| g.xyflip) {
        match Sheet::new(submission.flipped(), set.tolerances, &set.tools) {
            Ok(sheet) => Some(sheet),
            Err(e) => {
                tracing::warn!(error = %e, "flipped submission rejected");
                return Ok(GradeReport::rejected(set, format!("Invalid submission: {e}")));
            }
        }
    } else {
        None
    };

    for (i, g) in set.graders.iter().enumerate() {
        g.validate_on(i, &sheet.frame)?;
    }

    let mut order: Vec<usize> = (0..set.graders.len()).collect();
    order.sort_by_key(|&i| set.graders[i].stage);

    // Stage of the first failing nonzero-stage grader; later stages no longer count.
    let mut failed_stage: Option<u32> = None;
    let mut outcomes: Vec<Option<GraderOutcome>> = vec![None; set.graders.len()];
    for i in order {
        let g = &set.graders[i];
        let on = match (&flipped, g.xyflip) {
            (Some(f), true) => f,
            _ => &sheet,
        };
        let gated = failed_stage.is_some_and(|s| g.stage > s);
        let feedback = run_grader(i, g, on, set)?;
        let pass = feedback.is_empty();
        if !pass && g.stage != 0 && failed_stage.is_none() {
            failed_stage = Some(g.stage);
        }
        let score = if pass && !gated { 1.0 } else { 0.0 };
        tracing::debug!(index = i, kind = %g.kind, stage = g.stage, score, weight = g.weight, gated, "grader evaluated");
        outcomes[i] = Some(GraderOutcome {
            name: outcome_name(i, g),
            kind: g.kind,
            stage: g.stage,
            score,
            weight: g.weight,
            gated: pass && gated,
            feedback,
        });
    }
    let graders: Vec<GraderOutcome> = outcomes.into_iter().flatten().collect();

    let total: u32 = graders.iter().map(|o| o.weight).sum();
    let score = if total == 0 {
        1.0
    } else {
        graders.iter().map(|o| o.score * f64::from(o.weight)).sum::<f64>() / f64::from(total)
    };
    let mut feedback: Vec<String> = graders
        .iter()
        .filter_map(|o| o.feedback.first().cloned())
        .collect();
    if feedback.is_empty() {
        feedback.push(ALL_CORRECT.to_string());
    }
    tracing::info!(score, graders = graders.len(), "graded submission");
    Ok(GradeReport {
        score,
        feedback,
        graders,
    })
}

/// Evaluate one grader; an empty result means it passed.
fn run_grader(
    index: usize,
    grader: &Grader,
    sheet: &Sheet,
    set: &GraderSet,
) -> Result<Vec<String>, GradeError> {
    let fun = grader.function(index)?;
    let ctx = Context::new(grader, sheet, &set.tools, fun);
    let mut dbg = Debugger::new(grader.debug);
    let finding = evaluate(&ctx, &mut dbg);
    if finding.pass {
        return Ok(Vec::new());
    }
    let head = match (&grader.feedback, finding.note) {
        (Some(custom), _) => custom.clone(),
        (None, Some(note)) => format!("{} {note}", default_feedback(grader)),
        (None, None) => default_feedback(grader),
    };
    let mut lines = vec![head];
    lines.extend(dbg.take());
    Ok(lines)
}
