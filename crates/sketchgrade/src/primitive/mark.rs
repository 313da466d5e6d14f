//! Sketch marks as they arrive on the wire, and their typed interpretation.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::element::{
    ArcVectorElement, ControlledCurvedLineElement, ControlledLineElement, LoadElement,
    PointElement, VectorElement,
};
use crate::error::SubmissionError;

/// Coefficient of determination above which four control points are a straight line.
const LINE_R2: f64 = 0.99;

/// Palette entry kinds of the sketch canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    Point,
    Spline,
    Freeform,
    Polyline,
    Polygon,
    LineSegment,
    HorizontalLine,
    VerticalLine,
}

impl ToolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::Point => "point",
            ToolKind::Spline => "spline",
            ToolKind::Freeform => "freeform",
            ToolKind::Polyline => "polyline",
            ToolKind::Polygon => "polygon",
            ToolKind::LineSegment => "line-segment",
            ToolKind::HorizontalLine => "horizontal-line",
            ToolKind::VerticalLine => "vertical-line",
        }
    }
}

/// One mark exactly as serialized by the canvas front end.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMark {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spline: Option<Vec<[f64; 2]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polyline: Option<Vec<[f64; 2]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Vec<[f64; 2]>>,
}

impl RawMark {
    pub fn spline(points: &[[f64; 2]]) -> Self {
        Self {
            spline: Some(points.to_vec()),
            ..Self::default()
        }
    }

    pub fn point(x: f64, y: f64) -> Self {
        Self {
            point: Some([x, y]),
            ..Self::default()
        }
    }

    /// Apply `f` to every coordinate pair.
    pub fn map_points(&self, f: impl Fn([f64; 2]) -> [f64; 2]) -> Self {
        let map_all = |v: &Vec<[f64; 2]>| v.iter().copied().map(&f).collect::<Vec<_>>();
        Self {
            spline: self.spline.as_ref().map(map_all),
            point: self.point.map(&f),
            polyline: self.polyline.as_ref().map(map_all),
            polygon: self.polygon.as_ref().map(map_all),
        }
    }

    pub fn parse(&self) -> Result<Mark, SubmissionError> {
        if let Some(p) = self.point {
            return Ok(Mark::Point(finite(p)?));
        }
        if let Some(cps) = &self.spline {
            let cps = finite_all(cps)?;
            if cps.len() == 1 {
                return Ok(Mark::Point(cps[0]));
            }
            check_chain(cps.len())?;
            return Ok(Mark::Spline(cps));
        }
        if let Some(cps) = &self.polyline {
            let cps = finite_all(cps)?;
            check_chain(cps.len())?;
            return Ok(Mark::Polyline(cps));
        }
        if let Some(vs) = &self.polygon {
            let vs = finite_all(vs)?;
            if vs.len() < 3 {
                return Err(SubmissionError::DegeneratePolygon(vs.len()));
            }
            return Ok(Mark::Polygon(vs));
        }
        Err(SubmissionError::EmptyMark)
    }
}

fn finite(p: [f64; 2]) -> Result<Vector2<f64>, SubmissionError> {
    if p[0].is_finite() && p[1].is_finite() {
        Ok(Vector2::new(p[0], p[1]))
    } else {
        Err(SubmissionError::NonFinite)
    }
}

fn finite_all(ps: &[[f64; 2]]) -> Result<Vec<Vector2<f64>>, SubmissionError> {
    ps.iter().map(|&p| finite(p)).collect()
}

fn check_chain(n: usize) -> Result<(), SubmissionError> {
    if n >= 4 && (n - 1) % 3 == 0 {
        Ok(())
    } else {
        Err(SubmissionError::BadControlPointCount(n))
    }
}

/// A validated mark, pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Mark {
    /// Bézier control points, `3n + 1` of them.
    Spline(Vec<Vector2<f64>>),
    Point(Vector2<f64>),
    /// Straight pieces encoded as Bézier control points.
    Polyline(Vec<Vector2<f64>>),
    /// Vertex list, closed implicitly.
    Polygon(Vec<Vector2<f64>>),
}

/// R² of the least-squares line through `points`; 1 for axis-aligned or degenerate sets.
pub fn linear_fit_r2(points: &[Vector2<f64>]) -> f64 {
    let n = points.len() as f64;
    if points.len() < 2 {
        return 1.0;
    }
    let mean = points.iter().fold(Vector2::zeros(), |acc, p| acc + p) / n;
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for p in points {
        let d = p - mean;
        sxx += d.x * d.x;
        syy += d.y * d.y;
        sxy += d.x * d.y;
    }
    let scale = sxx.max(syy);
    if scale <= f64::EPSILON || sxx <= 1e-12 * scale || syy <= 1e-12 * scale {
        return 1.0;
    }
    sxy * sxy / (sxx * syy)
}

/// Every kind of drawing atom, pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Point(PointElement),
    Vector(VectorElement),
    /// Graded with either sense accepted.
    DoubleHeadedVector(VectorElement),
    ArcVector(ArcVectorElement),
    DistributedLoad(LoadElement),
    ControlledLine(ControlledLineElement),
    ControlledCurvedLine(ControlledCurvedLineElement),
    Spline(Vec<Vector2<f64>>),
    LineSegment(Vector2<f64>, Vector2<f64>),
    /// Control points of consecutive straight pieces, four per piece with shared ends.
    Polyline(Vec<Vector2<f64>>),
    Polygon(Vec<Vector2<f64>>),
    VerticalAsymptote(f64),
    HorizontalAsymptote(f64),
}

impl Primitive {
    /// Interpret a mark produced by a tool of `kind`. `closed` marks a polyline tool
    /// whose strokes are closed shapes.
    pub fn from_mark(kind: ToolKind, closed: bool, mark: Mark) -> Primitive {
        match (kind, mark) {
            (ToolKind::HorizontalLine, Mark::Point(p)) => Primitive::HorizontalAsymptote(p.y),
            (ToolKind::VerticalLine, Mark::Point(p)) => Primitive::VerticalAsymptote(p.x),
            (ToolKind::HorizontalLine, Mark::Spline(cps) | Mark::Polyline(cps)) => {
                Primitive::HorizontalAsymptote(cps[0].y)
            }
            (ToolKind::VerticalLine, Mark::Spline(cps) | Mark::Polyline(cps)) => {
                Primitive::VerticalAsymptote(cps[0].x)
            }
            (_, Mark::Point(p)) => Primitive::Point(PointElement::at(p)),
            (_, Mark::Polygon(vs)) => Primitive::Polygon(vs),
            (ToolKind::Polygon, Mark::Spline(cps) | Mark::Polyline(cps)) => {
                Primitive::Polygon(polygon_vertices(&cps))
            }
            (ToolKind::Polyline, Mark::Spline(cps) | Mark::Polyline(cps)) if closed => {
                Primitive::Polygon(polygon_vertices(&cps))
            }
            (ToolKind::LineSegment, Mark::Spline(cps)) if cps.len() == 4 => {
                if linear_fit_r2(&cps) > LINE_R2 {
                    Primitive::LineSegment(cps[0], cps[3])
                } else {
                    Primitive::Spline(cps)
                }
            }
            (ToolKind::LineSegment | ToolKind::Polyline, Mark::Spline(cps)) => {
                Primitive::Polyline(cps)
            }
            (_, Mark::Polyline(cps)) => Primitive::Polyline(cps),
            (_, Mark::Spline(cps)) => Primitive::Spline(cps),
        }
    }

    /// Straight pieces of a line segment or polyline as `(start, end)` pairs.
    pub fn segments(&self) -> Vec<(Vector2<f64>, Vector2<f64>)> {
        match self {
            Primitive::LineSegment(a, b) => vec![(*a, *b)],
            Primitive::Polyline(cps) => cps
                .chunks(3)
                .zip(cps.iter().skip(3).step_by(3))
                .map(|(head, end)| (head[0], *end))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// True for the element kinds graded by position against a reference.
    pub fn is_element(&self) -> bool {
        matches!(
            self,
            Primitive::Point(_)
                | Primitive::Vector(_)
                | Primitive::DoubleHeadedVector(_)
                | Primitive::ArcVector(_)
                | Primitive::DistributedLoad(_)
                | Primitive::ControlledLine(_)
                | Primitive::ControlledCurvedLine(_)
        )
    }
}

/// Corner points of a closed polyline: every third control point, without the repeated
/// closing vertex.
fn polygon_vertices(cps: &[Vector2<f64>]) -> Vec<Vector2<f64>> {
    let mut vs: Vec<Vector2<f64>> = cps.iter().step_by(3).copied().collect();
    let repeats_first = vs.len() > 1 && (vs[0] - vs[vs.len() - 1]).norm() < 1e-9;
    if repeats_first {
        vs.pop();
    }
    vs
}
