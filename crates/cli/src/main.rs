use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use sketchgrade::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

use provenance::Payload;

#[derive(Parser)]
#[command(name = "sketchgrade")]
#[command(about = "Grade sketched and drawn answers against a question's graders")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Grade one sketch submission (base64url text or raw JSON)
    Grade {
        #[arg(long)]
        submission: PathBuf,
        #[arg(long)]
        graders: PathBuf,
        /// Write the report here (plus a provenance sidecar) instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Grade a free-body style drawing against its reference
    Drawing {
        #[arg(long)]
        reference: PathBuf,
        #[arg(long)]
        submitted: PathBuf,
        #[arg(long, default_value_t = 10.0)]
        tol: f64,
        #[arg(long, default_value_t = 10.0)]
        angle_tol: f64,
        /// Let several submitted elements match one reference element
        #[arg(long)]
        disregard_extra: bool,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Evaluate a formula at one or more x values
    Eval {
        #[arg(long)]
        fun: String,
        #[arg(long, num_args = 1.., allow_negative_numbers = true)]
        x: Vec<f64>,
    },
    /// Validate a grader set without grading anything
    Check {
        #[arg(long)]
        graders: PathBuf,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Grade {
            submission,
            graders,
            out,
        } => {
            let report = grade_files(&submission, &graders)?;
            let params = json!({
                "submission": submission.to_string_lossy(),
                "graders": graders.to_string_lossy(),
            });
            let payload = Payload::new("grade", params).with_inputs([&submission, &graders]);
            emit(&report, out.as_deref(), payload)
        }
        Action::Drawing {
            reference,
            submitted,
            tol,
            angle_tol,
            disregard_extra,
            out,
        } => {
            let opts = DrawingOptions {
                tol,
                angle_tol,
                disregard_extra,
            };
            let report = grade_drawing_files(&reference, &submitted, &opts)?;
            let params = json!({
                "reference": reference.to_string_lossy(),
                "submitted": submitted.to_string_lossy(),
                "options": opts,
            });
            let payload = Payload::new("drawing", params).with_inputs([&reference, &submitted]);
            emit(&report, out.as_deref(), payload)
        }
        Action::Eval { fun, x } => {
            for line in eval_lines(&fun, &x)? {
                println!("{line}");
            }
            Ok(())
        }
        Action::Check { graders } => {
            let set = check_graders(&graders)?;
            println!(
                "{}: {} tools, {} graders ok",
                graders.display(),
                set.tools.len(),
                set.graders.len()
            );
            Ok(())
        }
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn load_graders(path: &Path) -> Result<GraderSet> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    GraderSet::from_json(&bytes).with_context(|| format!("parsing grader set {}", path.display()))
}

fn check_graders(path: &Path) -> Result<GraderSet> {
    let set = load_graders(path)?;
    set.validate()
        .with_context(|| format!("validating {}", path.display()))?;
    tracing::info!(graders = set.graders.len(), path = %path.display(), "grader set ok");
    Ok(set)
}

fn grade_files(submission: &Path, graders: &Path) -> Result<GradeReport> {
    let set = load_graders(graders)?;
    let text = read_text(submission)?;
    let report = grade_text(&text, &set)?;
    tracing::info!(
        submission = %submission.display(),
        score = report.score,
        graders = report.graders.len(),
        "graded"
    );
    Ok(report)
}

/// Raw JSON documents start with `{`; anything else is transport text.
fn grade_text(text: &str, set: &GraderSet) -> Result<GradeReport> {
    let trimmed = text.trim_start();
    if !trimmed.starts_with('{') {
        return Ok(grade_encoded(Some(text), set)?);
    }
    match Submission::from_json(trimmed.as_bytes()) {
        Ok(submission) => Ok(grade(&submission, set)?),
        Err(e) => {
            set.validate()?;
            tracing::warn!(error = %e, "submission rejected");
            Ok(GradeReport::rejected(set, format!("Invalid submission: {e}")))
        }
    }
}

fn grade_drawing_files(
    reference: &Path,
    submitted: &Path,
    opts: &DrawingOptions,
) -> Result<DrawingReport> {
    let reference_doc: Value = serde_json::from_str(&read_text(reference)?)
        .with_context(|| format!("parsing {}", reference.display()))?;
    let reference_drawing = Drawing::from_value(&reference_doc)
        .with_context(|| format!("reading reference drawing {}", reference.display()))?;
    // An unreadable student file is a missing answer, not a tool failure.
    let submitted_drawing = fs::read_to_string(submitted)
        .ok()
        .and_then(|text| serde_json::from_str::<Value>(&text).ok())
        .and_then(|doc| Drawing::from_submission(&doc));
    if submitted_drawing.is_none() {
        tracing::warn!(path = %submitted.display(), "no usable submitted drawing");
    }
    let report = grade_drawing(&reference_drawing, submitted_drawing.as_ref(), opts);
    let matched = report.matches.values().filter(|m| **m).count();
    tracing::info!(score = report.score, matched, "graded drawing");
    Ok(report)
}

fn eval_lines(fun: &str, xs: &[f64]) -> Result<Vec<String>> {
    let f = Function::parse(fun).with_context(|| format!("compiling `{fun}`"))?;
    Ok(xs
        .iter()
        .map(|&x| match f.try_eval(x) {
            Ok(y) => format!("f({x}) = {y}"),
            Err(e) => format!("f({x}) undefined: {e}"),
        })
        .collect())
}

fn emit<T: Serialize>(report: &T, out: Option<&Path>, payload: Payload) -> Result<()> {
    let body = serde_json::to_string_pretty(report)?;
    let Some(out) = out else {
        println!("{body}");
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(out, body).with_context(|| format!("writing {}", out.display()))?;
    let sidecar = provenance::write_sidecar(out, payload)?;
    tracing::info!(out = %out.display(), provenance = %sidecar.display(), "report written");
    Ok(())
}
