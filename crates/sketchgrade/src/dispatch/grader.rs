//! Grader records as authored in a question, and their validation.

use serde::{Deserialize, Deserializer, Serialize};

use super::cfg::{MIN_TOLERANCE, NARROW_RANGE_TOLERANCE_PX};
use super::modes::grading_range;
use super::tools::{ToolInfo, ToolRegistry};
use crate::coords::{Axis, Frame, Tolerances};
use crate::error::GradeError;
use crate::expr::Function;
use crate::grade::Endpoint;
use crate::primitive::ToolKind;
use crate::primitive::ToolKind as T;

/// Every grader type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GraderKind {
    Match,
    Count,
    MatchFun,
    MonotIncreasing,
    MonotDecreasing,
    ConcaveUp,
    ConcaveDown,
    DefinedIn,
    UndefinedIn,
    GreaterThan,
    LessThan,
    MatchLength,
    MatchAngle,
}

impl GraderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraderKind::Match => "match",
            GraderKind::Count => "count",
            GraderKind::MatchFun => "match-fun",
            GraderKind::MonotIncreasing => "monot-increasing",
            GraderKind::MonotDecreasing => "monot-decreasing",
            GraderKind::ConcaveUp => "concave-up",
            GraderKind::ConcaveDown => "concave-down",
            GraderKind::DefinedIn => "defined-in",
            GraderKind::UndefinedIn => "undefined-in",
            GraderKind::GreaterThan => "greater-than",
            GraderKind::LessThan => "less-than",
            GraderKind::MatchLength => "match-length",
            GraderKind::MatchAngle => "match-angle",
        }
    }

    /// Tolerance (px, or degrees for `match-angle`) when the record states none.
    pub fn default_tolerance(&self) -> f64 {
        match self {
            GraderKind::Count => 0.0,
            GraderKind::Match | GraderKind::GreaterThan | GraderKind::LessThan => 15.0,
            GraderKind::MatchFun | GraderKind::DefinedIn => 20.0,
            GraderKind::UndefinedIn => 10.0,
            GraderKind::MonotIncreasing | GraderKind::MonotDecreasing => 5.0,
            GraderKind::ConcaveUp | GraderKind::ConcaveDown => 10.0,
            GraderKind::MatchLength => 15.0,
            GraderKind::MatchAngle => 10.0,
        }
    }

    /// Tool kinds this grader never looks at.
    pub fn disallowed_tools(&self) -> &'static [ToolKind] {
        match self {
            GraderKind::Count | GraderKind::Match | GraderKind::UndefinedIn => &[],
            GraderKind::MatchFun => &[T::Polygon, T::VerticalLine],
            GraderKind::MonotIncreasing
            | GraderKind::MonotDecreasing
            | GraderKind::ConcaveUp
            | GraderKind::ConcaveDown => {
                &[T::Point, T::Polygon, T::VerticalLine, T::HorizontalLine]
            }
            GraderKind::DefinedIn => &[T::Point, T::VerticalLine],
            GraderKind::GreaterThan | GraderKind::LessThan => &[T::VerticalLine],
            GraderKind::MatchLength | GraderKind::MatchAngle => &[
                T::Point,
                T::Spline,
                T::Freeform,
                T::Polygon,
                T::HorizontalLine,
                T::VerticalLine,
            ],
        }
    }

    #[inline]
    pub fn allows(&self, kind: ToolKind) -> bool {
        !self.disallowed_tools().contains(&kind)
    }

    /// Graders whose range may be read along y with `xyflip`.
    fn flippable(&self) -> bool {
        matches!(
            self,
            GraderKind::MatchFun | GraderKind::GreaterThan | GraderKind::LessThan
        )
    }
}

impl std::fmt::Display for GraderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How `count` compares the number found with the number required.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CountMode {
    #[default]
    Exact,
    AtLeast,
    AtMost,
}

/// Tool ids named by a grader: a list of ids, a list of tool records, or one
/// comma-separated string.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ToolIdsWire", into = "Vec<String>")]
pub struct ToolIds(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum ToolIdsWire {
    Csv(String),
    List(Vec<ToolRef>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ToolRef {
    Id(String),
    Info { id: String },
}

impl From<ToolIdsWire> for ToolIds {
    fn from(w: ToolIdsWire) -> Self {
        let ids = match w {
            ToolIdsWire::Csv(s) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            ToolIdsWire::List(refs) => refs
                .into_iter()
                .map(|r| match r {
                    ToolRef::Id(id) | ToolRef::Info { id } => id.trim().to_string(),
                })
                .collect(),
        };
        ToolIds(ids)
    }
}

impl From<ToolIds> for Vec<String> {
    fn from(t: ToolIds) -> Self {
        t.0
    }
}

impl ToolIds {
    pub fn new<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        ToolIds(ids.into_iter().map(Into::into).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|t| t == id)
    }
}

fn one() -> u32 {
    1
}

/// Read `null` as the field's default.
fn nullable<'de, D, V>(d: D) -> Result<V, D::Error>
where
    D: Deserializer<'de>,
    V: Default + Deserialize<'de>,
{
    Ok(Option::<V>::deserialize(d)?.unwrap_or_default())
}

/// Interval with optional open ends, `[low, high]`.
pub type OpenRange = [Option<f64>; 2];

/// One grading criterion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grader {
    #[serde(rename = "type")]
    pub kind: GraderKind,
    #[serde(default, deserialize_with = "nullable")]
    pub toolid: ToolIds,
    #[serde(default, deserialize_with = "nullable", rename = "allowedToolNames")]
    pub allowed_tool_names: Vec<ToolKind>,
    #[serde(default, deserialize_with = "nullable", rename = "notAllowedToolNames")]
    pub not_allowed_tool_names: Vec<ToolKind>,
    #[serde(default = "one")]
    pub weight: u32,
    #[serde(default)]
    pub tolerance: Option<f64>,
    #[serde(default, rename = "angleTol")]
    pub angle_tol: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub debug: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub stage: u32,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub xrange: Option<OpenRange>,
    #[serde(default)]
    pub yrange: Option<OpenRange>,
    #[serde(default)]
    pub fun: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    pub mode: CountMode,
    #[serde(default)]
    pub endpoint: Option<Endpoint>,
    #[serde(default, deserialize_with = "nullable", alias = "funxyswap")]
    pub xyflip: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub allowundefined: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub allowflip: bool,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub angle: Option<f64>,
}

impl Grader {
    /// A grader of `kind` with every optional field unset.
    pub fn new(kind: GraderKind) -> Self {
        Self {
            kind,
            toolid: ToolIds::default(),
            allowed_tool_names: Vec::new(),
            not_allowed_tool_names: Vec::new(),
            weight: 1,
            tolerance: None,
            angle_tol: None,
            feedback: None,
            debug: false,
            stage: 0,
            x: None,
            y: None,
            xrange: None,
            yrange: None,
            fun: None,
            count: None,
            mode: CountMode::Exact,
            endpoint: None,
            xyflip: false,
            allowundefined: false,
            allowflip: false,
            length: None,
            angle: None,
        }
    }

    /// Effective tolerance: the stated one, else `angleTol` for `match-angle`, else
    /// the per-kind default.
    pub fn tolerance(&self) -> f64 {
        let stated = match self.kind {
            GraderKind::MatchAngle => self.tolerance.or(self.angle_tol),
            _ => self.tolerance,
        };
        stated.unwrap_or_else(|| self.kind.default_tolerance())
    }

    /// Tolerance on a canvas axis. An unstated `undefined-in` tolerance drops to 2 px
    /// when twice the default is wider than the stated range.
    pub fn tolerance_on(&self, axis: &Axis) -> f64 {
        let tol = self.tolerance();
        if self.kind != GraderKind::UndefinedIn || self.tolerance.is_some() {
            return tol;
        }
        match self.range() {
            Some([Some(a), Some(b)]) if a != b && 2.0 * tol > axis.units_to_px((b - a).abs()) => {
                NARROW_RANGE_TOLERANCE_PX
            }
            _ => tol,
        }
    }

    /// Tolerance against a point tool: the stated one, else derived from the marker.
    pub fn point_tolerance(&self, tool: &ToolInfo) -> f64 {
        self.tolerance.unwrap_or_else(|| tool.point_tolerance())
    }

    /// The range the grading x-interval is read from.
    pub fn range(&self) -> Option<OpenRange> {
        if self.xyflip {
            self.yrange
        } else {
            self.xrange
        }
    }

    /// Compile `fun`, if set.
    pub fn function(&self, index: usize) -> Result<Option<Function>, GradeError> {
        self.fun
            .as_deref()
            .map(|src| {
                Function::parse(src).map_err(|source| GradeError::Expression { index, source })
            })
            .transpose()
    }

    /// Whether `tool` is graded by this grader: named (or none named), not a helper,
    /// of an allowed kind, and passing the allowed / not-allowed name lists.
    pub fn selects(&self, tool: &ToolInfo) -> bool {
        let kind = tool.kind();
        (self.toolid.is_empty() || self.toolid.contains(&tool.id))
            && !tool.helper
            && self.kind.allows(kind)
            && (self.allowed_tool_names.is_empty() || self.allowed_tool_names.contains(&kind))
            && !self.not_allowed_tool_names.contains(&kind)
    }

    /// Reject authoring mistakes before any submission is graded.
    pub fn validate(&self, index: usize, registry: &ToolRegistry) -> Result<(), GradeError> {
        let invalid = |reason: String| GradeError::InvalidGrader {
            index,
            kind: self.kind.to_string(),
            reason,
        };
        let kind = self.kind;
        match kind {
            GraderKind::Count if self.count.is_none() => {
                return Err(invalid("count graders require `count`".into()));
            }
            GraderKind::MatchFun if self.fun.is_none() => {
                return Err(invalid("match-fun graders require `fun`".into()));
            }
            GraderKind::GreaterThan | GraderKind::LessThan
                if self.y.is_some() == self.fun.is_some() =>
            {
                return Err(invalid("exactly one of `y` and `fun` must be set".into()));
            }
            GraderKind::Match if self.x.is_none() && self.y.is_none() => {
                return Err(invalid("match graders require `x` or `y`".into()));
            }
            GraderKind::MatchLength if self.length.is_none() => {
                return Err(invalid("match-length graders require `length`".into()));
            }
            GraderKind::MatchAngle if self.angle.is_none() => {
                return Err(invalid("match-angle graders require `angle`".into()));
            }
            _ => {}
        }
        for (name, range) in [("xrange", self.xrange), ("yrange", self.yrange)] {
            if let Some([Some(lo), Some(hi)]) = range {
                if lo > hi {
                    return Err(invalid(format!("{name} [{lo}, {hi}] is reversed")));
                }
            }
        }
        if let Some(t) = self.tolerance {
            if t.is_nan() || t < MIN_TOLERANCE {
                return Err(invalid(format!("tolerance {t} is below {MIN_TOLERANCE}")));
            }
        }
        if self.endpoint.is_some() {
            if kind != GraderKind::Match {
                return Err(invalid("`endpoint` is only valid on match graders".into()));
            }
            if self.x.is_none() || self.y.is_none() {
                return Err(invalid("`endpoint` requires both `x` and `y`".into()));
            }
        }
        if self.xyflip && (!kind.flippable() || self.fun.is_none()) {
            return Err(invalid("`xyflip` requires `fun`".into()));
        }
        self.function(index)?;
        for id in self.toolid.as_slice() {
            let tool = registry
                .get(id)
                .ok_or_else(|| invalid(format!("unknown tool id `{id}`")))?;
            let tk = tool.kind();
            if !kind.allows(tk) {
                return Err(invalid(format!("{kind} does not grade {} tools", tk.as_str())));
            }
            if self.endpoint.is_some() && tk != ToolKind::LineSegment {
                return Err(invalid("`endpoint` only applies to line-segment tools".into()));
            }
            if kind == GraderKind::Match {
                if tk == ToolKind::HorizontalLine && self.y.is_none() {
                    return Err(invalid("horizontal-line tools need `y`".into()));
                }
                if tk == ToolKind::VerticalLine && self.x.is_none() {
                    return Err(invalid("vertical-line tools need `x`".into()));
                }
            }
        }
        Ok(())
    }

    /// Checks that need the canvas: a stated `defined-in` / `undefined-in` tolerance
    /// must not span the whole grading range.
    pub fn validate_on(&self, index: usize, frame: &Frame) -> Result<(), GradeError> {
        let Some(t) = self.tolerance else {
            return Ok(());
        };
        if !matches!(self.kind, GraderKind::DefinedIn | GraderKind::UndefinedIn) {
            return Ok(());
        }
        if let Some([Some(a), Some(b)]) = self.range() {
            if a == b {
                return Ok(());
            }
        }
        let (x1, x2) = grading_range(self, frame);
        if frame.x.px_to_units(t) > x2 - x1 {
            return Err(GradeError::InvalidGrader {
                index,
                kind: self.kind.to_string(),
                reason: format!(
                    "tolerance {t} covers the whole range [{x1}, {x2}] and accepts every answer"
                ),
            });
        }
        Ok(())
    }
}

/// A question's grading configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraderSet {
    #[serde(default)]
    pub tools: ToolRegistry,
    #[serde(default)]
    pub graders: Vec<Grader>,
    #[serde(default)]
    pub tolerances: Tolerances,
}

impl GraderSet {
    pub fn new(tools: Vec<ToolInfo>, graders: Vec<Grader>) -> Self {
        Self {
            tools: ToolRegistry::new(tools),
            graders,
            tolerances: Tolerances::default(),
        }
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Validate every grader, stopping at the first invalid one.
    pub fn validate(&self) -> Result<(), GradeError> {
        self.graders
            .iter()
            .enumerate()
            .try_for_each(|(i, g)| g.validate(i, &self.tools))
    }
}
