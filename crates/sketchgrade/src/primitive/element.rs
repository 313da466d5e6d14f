//! Drawing elements graded by position, direction and sense.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Closed-boundary slack for points computed through a rotation.
const BOUNDARY_EPS: f64 = 1e-9;

/// Default arrow length of a vector or load, pixels.
fn default_force_width() -> f64 {
    60.0
}

fn yes() -> bool {
    true
}

/// Absolute angular difference in degrees, folded into `[0, 180]`.
#[inline]
pub fn angle_error(reference: f64, x: f64) -> f64 {
    (((reference - x).abs() + 180.0).rem_euclid(360.0) - 180.0).abs()
}

/// Rectangle of acceptable anchor positions around a reference primitive.
///
/// Local frame: `along` runs in the direction `theta`, `perp` is perpendicular to it.
/// The anchor is inside iff `-max_backward <= along <= max_forward` and
/// `|perp| <= max_perp`; the boundary belongs to the box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ErrorBox {
    pub anchor: Vector2<f64>,
    /// Direction of the box axis, radians.
    pub theta: f64,
    pub max_forward: f64,
    pub max_backward: f64,
    pub max_perp: f64,
}

impl ErrorBox {
    pub fn new(
        anchor: Vector2<f64>,
        theta: f64,
        tol: f64,
        offset_forward: f64,
        offset_backward: f64,
    ) -> Self {
        Self {
            anchor,
            theta,
            max_forward: offset_forward + tol,
            max_backward: offset_backward + tol,
            max_perp: tol,
        }
    }

    /// Coordinates of `p` in the box frame as `(along, perp)`.
    #[inline]
    pub fn local(&self, p: Vector2<f64>) -> (f64, f64) {
        let d = p - self.anchor;
        let (s, c) = self.theta.sin_cos();
        (c * d.x + s * d.y, -s * d.x + c * d.y)
    }

    pub fn contains(&self, p: Vector2<f64>) -> bool {
        let (along, perp) = self.local(p);
        perp.abs() <= self.max_perp + BOUNDARY_EPS
            && along <= self.max_forward + BOUNDARY_EPS
            && along >= -self.max_backward - BOUNDARY_EPS
    }

    /// Geometric centre of the rectangle.
    pub fn center(&self) -> Vector2<f64> {
        let len = self.max_forward + self.max_backward;
        let dir = Vector2::new(self.theta.cos(), self.theta.sin());
        self.anchor - (len / 2.0 - self.max_forward) * dir
    }

    /// `(length along theta, height across)`.
    pub fn size(&self) -> (f64, f64) {
        (self.max_forward + self.max_backward, 2.0 * self.max_perp)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointElement {
    #[serde(alias = "left", alias = "x1")]
    pub x: f64,
    #[serde(alias = "top", alias = "y1")]
    pub y: f64,
    #[serde(default)]
    pub radius: f64,
    #[serde(default, alias = "optional_grading")]
    pub optional_grading: bool,
}

impl PointElement {
    pub fn at(p: Vector2<f64>) -> Self {
        Self {
            x: p.x,
            y: p.y,
            radius: 0.0,
            optional_grading: false,
        }
    }

    #[inline]
    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    pub fn matches(&self, submitted: &PointElement, tol: f64) -> bool {
        (submitted.x - self.x).abs() <= tol && (submitted.y - self.y).abs() <= tol
    }
}

/// A force-like arrow. `x1,y1` is the grading anchor, the tail unless
/// `anchor_is_tail` is false.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorElement {
    #[serde(alias = "left")]
    pub x1: f64,
    #[serde(alias = "top")]
    pub y1: f64,
    #[serde(default = "default_force_width")]
    pub width: f64,
    /// Degrees, screen orientation.
    #[serde(default)]
    pub angle: f64,
    #[serde(default, alias = "disregard_sense")]
    pub disregard_sense: bool,
    #[serde(default, alias = "offset_forward")]
    pub offset_forward: Option<f64>,
    #[serde(default, alias = "offset_backward")]
    pub offset_backward: Option<f64>,
    #[serde(default = "yes", alias = "anchor_is_tail")]
    pub anchor_is_tail: bool,
    #[serde(default, alias = "optional_grading")]
    pub optional_grading: bool,
}

impl VectorElement {
    pub fn new(x1: f64, y1: f64, width: f64, angle: f64) -> Self {
        Self {
            x1,
            y1,
            width,
            angle,
            disregard_sense: false,
            offset_forward: None,
            offset_backward: None,
            anchor_is_tail: true,
            optional_grading: false,
        }
    }

    #[inline]
    pub fn theta(&self) -> f64 {
        self.angle.to_radians()
    }

    pub fn offset_forward(&self) -> f64 {
        self.offset_forward
            .unwrap_or(if self.disregard_sense { self.width } else { 0.0 })
    }

    pub fn offset_backward(&self) -> f64 {
        self.offset_backward.unwrap_or(self.width)
    }

    /// Position of the arrow tail.
    pub fn tail(&self) -> Vector2<f64> {
        let anchor = Vector2::new(self.x1, self.y1);
        if self.anchor_is_tail {
            anchor
        } else {
            let (s, c) = self.theta().sin_cos();
            anchor - self.width * Vector2::new(c, s)
        }
    }

    pub fn error_box(&self, tol: f64) -> ErrorBox {
        ErrorBox::new(
            Vector2::new(self.x1, self.y1),
            self.theta(),
            tol,
            self.offset_forward(),
            self.offset_backward(),
        )
    }

    /// Grade `submitted` against `self` as reference. `either_sense` forces the
    /// sense-agnostic check used by double-headed vectors.
    pub fn matches(
        &self,
        submitted: &VectorElement,
        tol: f64,
        angle_tol: f64,
        either_sense: bool,
    ) -> bool {
        let fwd = angle_error(self.angle, submitted.angle);
        let bwd = angle_error(self.angle + 180.0, submitted.angle);
        let angle_ok = if self.disregard_sense || either_sense {
            fwd <= angle_tol || bwd <= angle_tol
        } else {
            fwd <= angle_tol
        };
        angle_ok && self.error_box(tol).contains(submitted.tail())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcVectorElement {
    #[serde(alias = "left")]
    pub x1: f64,
    #[serde(alias = "top")]
    pub y1: f64,
    #[serde(default = "default_arc_radius")]
    pub radius: f64,
    #[serde(default)]
    pub start_angle: f64,
    #[serde(default = "default_arc_end")]
    pub end_angle: f64,
    #[serde(default = "yes", alias = "clockwiseDirection")]
    pub clockwise: bool,
    #[serde(default, alias = "disregard_sense")]
    pub disregard_sense: bool,
    #[serde(default, alias = "optional_grading")]
    pub optional_grading: bool,
}

fn default_arc_radius() -> f64 {
    30.0
}

fn default_arc_end() -> f64 {
    210.0
}

impl ArcVectorElement {
    pub fn matches(&self, submitted: &ArcVectorElement, tol: f64) -> bool {
        let dx = submitted.x1 - self.x1;
        let dy = submitted.y1 - self.y1;
        if dx.abs() > tol || dy.abs() > tol {
            return false;
        }
        self.disregard_sense || self.clockwise == submitted.clockwise
    }
}

/// A distributed load drawn as a row of arrows over `range` pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadElement {
    #[serde(alias = "left")]
    pub x1: f64,
    #[serde(alias = "top")]
    pub y1: f64,
    #[serde(default = "default_force_width")]
    pub range: f64,
    #[serde(default)]
    pub angle: f64,
    #[serde(default = "default_force_width")]
    pub w1: f64,
    #[serde(default = "default_force_width")]
    pub w2: f64,
    #[serde(default, alias = "disregard_sense")]
    pub disregard_sense: bool,
    #[serde(default, alias = "offset_forward")]
    pub offset_forward: Option<f64>,
    #[serde(default, alias = "offset_backward")]
    pub offset_backward: Option<f64>,
    /// The student drew the profile reversed; w1 and w2 swap meaning.
    #[serde(default)]
    pub flipped: bool,
    #[serde(default, alias = "optional_grading")]
    pub optional_grading: bool,
}

impl LoadElement {
    fn wmax(&self) -> f64 {
        self.w1.max(self.w2)
    }

    pub fn offset_forward(&self) -> f64 {
        self.offset_forward.unwrap_or(if self.disregard_sense {
            1.1 * self.wmax()
        } else {
            0.0
        })
    }

    pub fn offset_backward(&self) -> f64 {
        self.offset_backward.unwrap_or(1.1 * self.wmax())
    }

    /// The error box runs across the load, perpendicular to the arrows.
    pub fn error_box(&self, tol: f64) -> ErrorBox {
        ErrorBox::new(
            Vector2::new(self.x1, self.y1),
            self.angle.to_radians() + std::f64::consts::FRAC_PI_2,
            tol,
            self.offset_forward(),
            self.offset_backward(),
        )
    }

    pub fn matches(&self, submitted: &LoadElement, tol: f64, angle_tol: f64) -> bool {
        let fwd = angle_error(self.angle, submitted.angle);
        let bwd = angle_error(self.angle + 180.0, submitted.angle);
        if self.disregard_sense {
            if fwd > angle_tol && bwd > angle_tol {
                return false;
            }
        } else if fwd > angle_tol {
            return false;
        }
        if (submitted.range - self.range).abs() > tol {
            return false;
        }
        if !self
            .error_box(tol)
            .contains(Vector2::new(submitted.x1, submitted.y1))
        {
            return false;
        }
        let (mut e1, mut e2) = (submitted.w1, submitted.w2);
        if self.w1 == self.w2 {
            return e1 == e2;
        }
        if submitted.flipped {
            std::mem::swap(&mut e1, &mut e2);
        }
        !((self.w1 < self.w2 && e1 > e2) || (self.w1 > self.w2 && e1 < e2))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlledLineElement {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(default, alias = "offset_x")]
    pub offset_x: f64,
    #[serde(default, alias = "offset_y")]
    pub offset_y: f64,
}

/// True iff `a` and `b` agree within the per-axis slacks.
#[inline]
fn close(a: (f64, f64), b: (f64, f64), sx: f64, sy: f64) -> bool {
    (a.0 - b.0).abs() <= sx && (a.1 - b.1).abs() <= sy
}

impl ControlledLineElement {
    /// Endpoints must match, in either order.
    pub fn matches(&self, submitted: &ControlledLineElement, tol: f64) -> bool {
        let (sx, sy) = (self.offset_x + tol, self.offset_y + tol);
        let (r1, r2) = ((self.x1, self.y1), (self.x2, self.y2));
        let (e1, e2) = ((submitted.x1, submitted.y1), (submitted.x2, submitted.y2));
        (close(e1, r1, sx, sy) && close(e2, r2, sx, sy))
            || (close(e1, r2, sx, sy) && close(e2, r1, sx, sy))
    }
}

/// A quadratic line whose middle point `(x2, y2)` is the control handle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlledCurvedLineElement {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub x3: f64,
    pub y3: f64,
    #[serde(default, alias = "offset_x")]
    pub offset_x: f64,
    #[serde(default, alias = "offset_y")]
    pub offset_y: f64,
    #[serde(default, alias = "offset_control_x")]
    pub offset_control_x: f64,
    #[serde(default, alias = "offset_control_y")]
    pub offset_control_y: f64,
}

impl ControlledCurvedLineElement {
    pub fn matches(&self, submitted: &ControlledCurvedLineElement, tol: f64) -> bool {
        let (sx, sy) = (self.offset_x + tol, self.offset_y + tol);
        let (r1, r3) = ((self.x1, self.y1), (self.x3, self.y3));
        let (e1, e3) = ((submitted.x1, submitted.y1), (submitted.x3, submitted.y3));
        let control = close(
            (submitted.x2, submitted.y2),
            (self.x2, self.y2),
            self.offset_control_x + tol,
            self.offset_control_y + tol,
        );
        control
            && ((close(e1, r1, sx, sy) && close(e3, r3, sx, sy))
                || (close(e1, r3, sx, sy) && close(e3, r1, sx, sy)))
    }
}
