//! Straight segments in graph coordinates.

use nalgebra::Vector2;

/// Segment from `start` to `end`; direction matters for monotonicity checks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vector2<f64>,
    pub end: Vector2<f64>,
}

/// Restrict the parameter window `[t0, t1]` of `p0 + t·d` to `lo <= coord <= hi`.
fn clip_param(p0: f64, d: f64, lo: f64, hi: f64, t0: f64, t1: f64) -> Option<(f64, f64)> {
    if d == 0.0 {
        return (lo <= p0 && p0 <= hi).then_some((t0, t1));
    }
    let (a, b) = ((lo - p0) / d, (hi - p0) / d);
    let (a, b) = (a.min(b), a.max(b));
    let (n0, n1) = (t0.max(a), t1.min(b));
    (n0 <= n1).then_some((n0, n1))
}

impl Segment {
    #[inline]
    pub fn new(start: Vector2<f64>, end: Vector2<f64>) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn point_at(&self, t: f64) -> Vector2<f64> {
        self.start + t * (self.end - self.start)
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.start.x.min(self.end.x)
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.start.x.max(self.end.x)
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.start.y.min(self.end.y)
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.start.y.max(self.end.y)
    }

    /// Left endpoint first.
    pub fn ordered_by_x(&self) -> Segment {
        if self.start.x <= self.end.x {
            *self
        } else {
            Segment::new(self.end, self.start)
        }
    }

    pub fn slope(&self) -> Option<f64> {
        let dx = self.end.x - self.start.x;
        (dx != 0.0).then(|| (self.end.y - self.start.y) / dx)
    }

    /// Crossing with the vertical line at `x`; a vertical segment on the line yields its
    /// lower end.
    pub fn y_at(&self, x: f64) -> Option<f64> {
        if x < self.min_x() || x > self.max_x() {
            return None;
        }
        let dx = self.end.x - self.start.x;
        if dx == 0.0 {
            return Some(self.min_y());
        }
        Some(self.start.y + (x - self.start.x) / dx * (self.end.y - self.start.y))
    }

    /// Crossing with the horizontal line at `y`.
    pub fn x_at(&self, y: f64) -> Option<f64> {
        if y < self.min_y() || y > self.max_y() {
            return None;
        }
        let dy = self.end.y - self.start.y;
        if dy == 0.0 {
            return Some(self.min_x());
        }
        Some(self.start.x + (y - self.start.y) / dy * (self.end.x - self.start.x))
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    pub fn length_px(&self, xscale: f64, yscale: f64) -> f64 {
        let d = self.end - self.start;
        (d.x * xscale).hypot(d.y * yscale)
    }

    /// Direction in degrees, `(-180, 180]`, graph orientation.
    pub fn angle_deg(&self) -> f64 {
        let d = self.end - self.start;
        d.y.atan2(d.x).to_degrees()
    }

    /// Length of the x-span shared with `[xmin, xmax]`.
    pub fn overlap_length(&self, xmin: f64, xmax: f64) -> f64 {
        (self.max_x().min(xmax) - self.min_x().max(xmin)).max(0.0)
    }

    /// Shared x-span as a fraction of the query width.
    pub fn percent_overlap(&self, xmin: f64, xmax: f64) -> f64 {
        let width = xmax - xmin;
        if width <= 0.0 {
            return if self.min_x() <= xmin && xmin <= self.max_x() {
                1.0
            } else {
                0.0
            };
        }
        self.overlap_length(xmin, xmax) / width
    }

    /// Perpendicular distance from `p` in pixels; the foot is clamped onto the segment.
    pub fn distance_px(&self, p: Vector2<f64>, xscale: f64, yscale: f64) -> f64 {
        let s = Vector2::new(self.start.x * xscale, self.start.y * yscale);
        let e = Vector2::new(self.end.x * xscale, self.end.y * yscale);
        let q = Vector2::new(p.x * xscale, p.y * yscale);
        let d = e - s;
        let len2 = d.norm_squared();
        let t = if len2 == 0.0 {
            0.0
        } else {
            ((q - s).dot(&d) / len2).clamp(0.0, 1.0)
        };
        (q - (s + t * d)).norm()
    }

    /// The part with `x ∈ [xmin, xmax]`, orientation kept.
    pub fn cut_to_x(&self, xmin: f64, xmax: f64) -> Option<Segment> {
        let d = self.end - self.start;
        let (t0, t1) = clip_param(self.start.x, d.x, xmin, xmax, 0.0, 1.0)?;
        Some(Segment::new(self.point_at(t0), self.point_at(t1)))
    }

    /// The part with `y ∈ [ylo, yhi]`, orientation kept.
    pub fn cut_to_y(&self, ylo: f64, yhi: f64) -> Option<Segment> {
        let d = self.end - self.start;
        let (t0, t1) = clip_param(self.start.y, d.y, ylo, yhi, 0.0, 1.0)?;
        Some(Segment::new(self.point_at(t0), self.point_at(t1)))
    }
}
