//! Simple polygons given by their vertex ring.

use std::cmp::Ordering;

use nalgebra::Vector2;

use super::ranges::{collapse_ranges, Range};
use super::segment::Segment;

/// Vertex ring in graph coordinates, closed implicitly.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vector2<f64>>,
}

impl Polygon {
    /// `None` for fewer than three vertices.
    pub fn new(vertices: Vec<Vector2<f64>>) -> Option<Self> {
        (vertices.len() >= 3).then_some(Self { vertices })
    }

    #[inline]
    pub fn vertices(&self) -> &[Vector2<f64>] {
        &self.vertices
    }

    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Segment::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    pub fn x_span(&self) -> Range {
        span(self.vertices.iter().map(|v| v.x))
    }

    pub fn y_span(&self) -> Range {
        span(self.vertices.iter().map(|v| v.y))
    }

    /// Even-odd interior test; points on the boundary count as inside.
    pub fn contains(&self, p: Vector2<f64>) -> bool {
        let mut inside = false;
        for e in self.edges() {
            let (a, b) = (e.start, e.end);
            let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
            let on_line = cross.abs() <= 1e-12 * (1.0 + (b - a).norm() * (p - a).norm());
            if on_line
                && p.x >= a.x.min(b.x)
                && p.x <= a.x.max(b.x)
                && p.y >= a.y.min(b.y)
                && p.y <= a.y.max(b.y)
            {
                return true;
            }
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Smallest pixel distance from `p` to the boundary.
    pub fn boundary_distance_px(&self, p: Vector2<f64>, xscale: f64, yscale: f64) -> f64 {
        self.edges()
            .map(|e| e.distance_px(p, xscale, yscale))
            .fold(f64::INFINITY, f64::min)
    }

    /// Inside, or within `tol_px` pixels of an edge.
    pub fn contains_within(&self, p: Vector2<f64>, tol_px: f64, xscale: f64, yscale: f64) -> bool {
        self.contains(p) || self.boundary_distance_px(p, xscale, yscale) <= tol_px
    }

    #[inline]
    pub fn intersects_vertical(&self, x: f64) -> bool {
        self.x_span().contains(x)
    }

    #[inline]
    pub fn intersects_horizontal(&self, y: f64) -> bool {
        self.y_span().contains(y)
    }

    /// Interior intervals along the horizontal line at `y`, paired by crossing parity.
    pub fn chords_at_y(&self, y: f64) -> Vec<Range> {
        let mut xs: Vec<f64> = self
            .edges()
            .filter(|e| (e.start.y > y) != (e.end.y > y))
            .map(|e| {
                let (a, b) = (e.start, e.end);
                a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y)
            })
            .collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        xs.chunks_exact(2).map(|c| Range::new(c[0], c[1])).collect()
    }

    /// x-intervals over which the polygon meets the band `ylo <= y <= yhi`.
    ///
    /// The region `polygon ∩ band` projects onto x exactly as its boundary does. That
    /// boundary is made of edge pieces cut to the band plus the chords of the two band
    /// lines, so the projection is the union of both families.
    pub fn ranges_in_band(&self, ylo: f64, yhi: f64) -> Vec<Range> {
        let mut pieces: Vec<Range> = self
            .edges()
            .filter_map(|e| e.cut_to_y(ylo, yhi))
            .map(|s| Range::new(s.start.x, s.end.x))
            .collect();
        pieces.extend(self.chords_at_y(ylo));
        pieces.extend(self.chords_at_y(yhi));
        collapse_ranges(&pieces)
    }
}

fn span(values: impl Iterator<Item = f64>) -> Range {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    Range { lo, hi }
}
