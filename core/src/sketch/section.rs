//! Sweep cross-sections.
//!
//! Both types live in sweep coordinates `(u, v)`: `u` is the outward offset
//! from the sweep path (negative is inside the footprint) and `v` is the
//! height above the path plane.

use crate::geometry::{Point2, Vector2, EPSILON};
use geo::orient::Direction;
use geo::{
    Area, BooleanOps, BoundingRect, Contains, Coord, LineString, MultiPolygon, Orient, Point,
    Polygon, Rect, Translate,
};
use std::f64::consts::PI;

/// Closed cross-section region built with 2D booleans.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    region: MultiPolygon<f64>,
}

fn rect_polygon(u0: f64, v0: f64, u1: f64, v1: f64) -> Polygon<f64> {
    Rect::new(Coord { x: u0, y: v0 }, Coord { x: u1, y: v1 }).to_polygon()
}

impl Section {
    /// Simple polygon; the ring is closed automatically.
    pub fn polygon(points: &[(f64, f64)]) -> Self {
        let ring = LineString::from(points.to_vec());
        Self { region: MultiPolygon::new(vec![Polygon::new(ring, vec![])]) }
    }

    pub fn rect(u0: f64, v0: f64, u1: f64, v1: f64) -> Self {
        Self { region: MultiPolygon::new(vec![rect_polygon(u0, v0, u1, v1)]) }
    }

    pub fn translated(&self, du: f64, dv: f64) -> Self {
        Self { region: self.region.translate(du, dv) }
    }

    /// Keep only the part inside the rectangle `[u0, u1] × [v0, v1]`.
    pub fn intersect_rect(&self, u0: f64, v0: f64, u1: f64, v1: f64) -> Self {
        Self { region: self.region.intersection(&rect_polygon(u0, v0, u1, v1)) }
    }

    /// Remove the rectangle `[u0, u1] × [v0, v1]`.
    pub fn cut_rect(&self, u0: f64, v0: f64, u1: f64, v1: f64) -> Self {
        Self { region: self.region.difference(&rect_polygon(u0, v0, u1, v1)) }
    }

    /// Remove a simple polygon.
    pub fn cut_polygon(&self, points: &[(f64, f64)]) -> Self {
        let ring = LineString::from(points.to_vec());
        Self { region: self.region.difference(&Polygon::new(ring, vec![])) }
    }

    /// Interior test; boundary points report `false`.
    pub fn contains(&self, u: f64, v: f64) -> bool {
        self.region.contains(&Point::new(u, v))
    }

    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        self.region
            .bounding_rect()
            .map(|r| (Point2::new(r.min().x, r.min().y), Point2::new(r.max().x, r.max().y)))
    }

    pub fn area(&self) -> f64 {
        self.region.unsigned_area()
    }

    pub fn is_empty(&self) -> bool {
        self.area() < EPSILON
    }

    /// Every boundary ring without its closing point. Outer rings run
    /// counter-clockwise and holes clockwise, so material is always on the
    /// left of travel.
    pub fn rings(&self) -> Vec<Vec<Point2>> {
        self.region
            .orient(Direction::Default)
            .0
            .iter()
            .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors()))
            .map(ring_points)
            .filter(|ring| ring.len() >= 3)
            .collect()
    }

    /// Round the listed vertices with arcs of `radius`, flattened to within
    /// `tolerance`. `None` when a vertex is not a corner or the arcs do not
    /// fit on the neighbouring edges.
    pub fn rounded(&self, corners: &[Point2], radius: f64, tolerance: f64) -> Option<Section> {
        let polygons = self
            .region
            .orient(Direction::Default)
            .0
            .iter()
            .map(|p| {
                let exterior = round_ring(&ring_points(p.exterior()), corners, radius, tolerance)?;
                let interiors = p
                    .interiors()
                    .iter()
                    .map(|r| round_ring(&ring_points(r), corners, radius, tolerance))
                    .collect::<Option<Vec<_>>>()?;
                Some(Polygon::new(exterior, interiors))
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self { region: MultiPolygon::new(polygons) })
    }

    pub fn piece_count(&self) -> usize {
        self.region.0.len()
    }

    pub fn as_multi_polygon(&self) -> &MultiPolygon<f64> {
        &self.region
    }
}

fn ring_points(ring: &LineString<f64>) -> Vec<Point2> {
    let mut pts: Vec<Point2> = Vec::new();
    for c in ring.coords() {
        let p = Point2::new(c.x, c.y);
        if pts.last().map_or(true, |q| (q - p).norm() > EPSILON) {
            pts.push(p);
        }
    }
    if pts.len() > 1 && (pts[0] - pts[pts.len() - 1]).norm() <= EPSILON {
        pts.pop();
    }
    pts
}

fn rotated(v: &Vector2, angle: f64) -> Vector2 {
    let (sin, cos) = angle.sin_cos();
    Vector2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

fn round_ring(pts: &[Point2], corners: &[Point2], radius: f64, tolerance: f64) -> Option<LineString<f64>> {
    let n = pts.len();
    let is_corner = |p: &Point2| corners.iter().any(|c| (c - p).norm() < EPSILON);

    // unit directions to both neighbours and the opening angle, per rounded vertex
    let mut fillets = vec![None; n];
    for i in 0..n {
        if !is_corner(&pts[i]) {
            continue;
        }
        let a = (pts[(i + n - 1) % n] - pts[i]).try_normalize(EPSILON)?;
        let b = (pts[(i + 1) % n] - pts[i]).try_normalize(EPSILON)?;
        let theta = a.dot(&b).clamp(-1.0, 1.0).acos();
        if theta < EPSILON || theta > PI - EPSILON {
            return None;
        }
        fillets[i] = Some((a, b, theta));
    }
    let setback = |f: &Option<(Vector2, Vector2, f64)>| f.map_or(0.0, |(_, _, theta)| radius / (theta / 2.0).tan());
    for i in 0..n {
        let j = (i + 1) % n;
        if setback(&fillets[i]) + setback(&fillets[j]) > (pts[j] - pts[i]).norm() + EPSILON {
            return None;
        }
    }

    let max_step = 2.0 * (1.0 - tolerance.min(radius) / radius).acos();
    let mut out: Vec<Coord<f64>> = Vec::new();
    let mut push = |p: Point2| {
        if out.last().map_or(true, |q| (q.x - p.x).hypot(q.y - p.y) > EPSILON) {
            out.push(Coord { x: p.x, y: p.y });
        }
    };
    for (i, fillet) in fillets.iter().enumerate() {
        let Some((a, b, theta)) = *fillet else {
            push(pts[i]);
            continue;
        };
        let t = setback(fillet);
        let center = pts[i] + (a + b).normalize() * (radius / (theta / 2.0).sin());
        let start = pts[i] + a * t - center;
        let end = pts[i] + b * t - center;
        let sweep = start.perp(&end).atan2(start.dot(&end));
        let steps = ((sweep.abs() / max_step).ceil() as usize).max(2);
        for k in 0..=steps {
            push(center + rotated(&start, sweep * k as f64 / steps as f64));
        }
    }
    Some(LineString::new(out))
}

/// Open polyline strictly monotone in `v`, swept with planar caps at both
/// ends of its `v` range.
#[derive(Debug, Clone, PartialEq)]
pub struct Taper {
    points: Vec<Point2>,
}

impl Taper {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn translated(&self, du: f64, dv: f64) -> Self {
        Self::new(self.points.iter().map(|p| Point2::new(p.x + du, p.y + dv)).collect())
    }

    /// At least two points and every step changes `v` in the same direction.
    pub fn is_monotone(&self) -> bool {
        if self.points.len() < 2 {
            return false;
        }
        let rising = self.points[1].y > self.points[0].y;
        self.points.windows(2).all(|w| {
            let dv = w[1].y - w[0].y;
            dv.abs() > EPSILON && (dv > 0.0) == rising
        })
    }

    /// `(v_min, v_max)`
    pub fn v_range(&self) -> Option<(f64, f64)> {
        let first = self.points.first()?.y;
        let last = self.points.last()?.y;
        Some((first.min(last), first.max(last)))
    }

    /// Offset of the taper at height `v`, interpolated linearly.
    pub fn u_at(&self, v: f64) -> Option<f64> {
        let (lo, hi) = self.v_range()?;
        if v < lo - EPSILON || v > hi + EPSILON {
            return None;
        }
        self.points.windows(2).find_map(|w| {
            let (a, b) = (w[0], w[1]);
            let (vmin, vmax) = (a.y.min(b.y), a.y.max(b.y));
            if v >= vmin - EPSILON && v <= vmax + EPSILON {
                let t = ((v - a.y) / (b.y - a.y)).clamp(0.0, 1.0);
                Some(a.x + (b.x - a.x) * t)
            } else {
                None
            }
        })
    }

    /// Largest outward offset along the taper.
    pub fn max_u(&self) -> Option<f64> {
        self.points.iter().map(|p| p.x).reduce(f64::max)
    }
}
