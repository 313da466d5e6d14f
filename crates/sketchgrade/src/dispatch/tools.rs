//! Palette tools of a question and the registry grader tool ids resolve against.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::cfg::POINT_DIAMETER_PX;
use crate::error::SubmissionError;
use crate::primitive::{Primitive, Submission, ToolKind};

fn default_diameter() -> f64 {
    POINT_DIAMETER_PX
}

/// One palette entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub id: String,
    #[serde(alias = "type")]
    pub name: ToolKind,
    /// Helper tools draw construction marks that are never graded.
    #[serde(default)]
    pub helper: bool,
    /// A polyline tool whose strokes are closed regions.
    #[serde(default)]
    pub closed: bool,
    /// Marker diameter (px) of a point tool.
    #[serde(default = "default_diameter")]
    pub diameter: f64,
}

impl ToolInfo {
    pub fn new(id: impl Into<String>, name: ToolKind) -> Self {
        Self {
            id: id.into(),
            name,
            helper: false,
            closed: false,
            diameter: POINT_DIAMETER_PX,
        }
    }

    /// Kind used for grading: a closed polyline is a polygon.
    #[inline]
    pub fn kind(&self) -> ToolKind {
        match self.name {
            ToolKind::Polyline if self.closed => ToolKind::Polygon,
            k => k,
        }
    }

    /// Positional tolerance (px) for point tools when the grader states none.
    pub fn point_tolerance(&self) -> f64 {
        (self.diameter / 2.0).floor() + 3.0
    }
}

/// Primitives of every tool of one submission, keyed by tool id.
pub type ToolMarks = BTreeMap<String, Vec<Primitive>>;

/// Ordered set of the question's tools.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolRegistry {
    tools: Vec<ToolInfo>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<ToolInfo>) -> Self {
        Self { tools }
    }

    pub fn get(&self, id: &str) -> Option<&ToolInfo> {
        self.tools.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolInfo> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Interpret every mark of `submission` with the kind of the tool that drew it.
    ///
    /// Fails on marks filed under an unknown tool or carrying malformed geometry.
    pub fn primitives(&self, submission: &Submission) -> Result<ToolMarks, SubmissionError> {
        let mut out = ToolMarks::new();
        for (id, marks) in &submission.gradeable {
            let tool = self
                .get(id)
                .ok_or_else(|| SubmissionError::UnknownTool(id.clone()))?;
            let prims = marks
                .iter()
                .map(|m| {
                    m.parse()
                        .map(|mark| Primitive::from_mark(tool.name, tool.closed, mark))
                })
                .collect::<Result<Vec<_>, _>>()?;
            out.insert(id.clone(), prims);
        }
        Ok(out)
    }
}
