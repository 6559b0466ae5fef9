//! Planar profiles and sweep cross-sections.
//!
//! A [`Profile`] is a closed loop of lines and circular arcs that kernels
//! extrude. A [`Section`] is a polygonal region used as a sweep cross-section,
//! and a [`Taper`] is an open polyline swept with planar caps.

mod segment;
mod pen;
pub mod section;

#[cfg(test)]
mod tests_profile;

pub use pen::Pen;
pub use section::{Section, Taper};
pub use segment::Segment;

use crate::geometry::{ApproxEq, Point2, Vector2, EPSILON};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// A closed planar loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub segments: Vec<Segment>,
}

impl Profile {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Full circle as a single counter-clockwise arc starting on +X.
    pub fn circle(center: Point2, radius: f64) -> Self {
        Self::new(vec![Segment::arc(center, radius, 0.0, TAU)])
    }

    /// Axis-aligned rectangle centred on `center`.
    pub fn rectangle(center: Point2, width: f64, height: f64) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self::polygon(&[
            Point2::new(center.x - hw, center.y - hh),
            Point2::new(center.x + hw, center.y - hh),
            Point2::new(center.x + hw, center.y + hh),
            Point2::new(center.x - hw, center.y + hh),
        ])
    }

    /// Rectangle centred on `center` with quarter-circle corners.
    ///
    /// The radius is clamped to half the shorter side; straight runs that
    /// collapse to zero length are left out.
    pub fn rounded_rectangle(center: Point2, width: f64, height: f64, radius: f64) -> Self {
        let r = radius.min(width / 2.0).min(height / 2.0);
        if r <= EPSILON {
            return Self::rectangle(center, width, height);
        }
        let (x0, x1) = (center.x - width / 2.0, center.x + width / 2.0);
        let (y0, y1) = (center.y - height / 2.0, center.y + height / 2.0);

        let corners = [
            (Point2::new(x1 - r, y0 + r), -FRAC_PI_2),
            (Point2::new(x1 - r, y1 - r), 0.0),
            (Point2::new(x0 + r, y1 - r), FRAC_PI_2),
            (Point2::new(x0 + r, y0 + r), PI),
        ];

        let mut segments = Vec::with_capacity(8);
        let mut cursor = Point2::new(x0 + r, y0);
        for (c, start_angle) in corners {
            let arc = Segment::arc(c, r, start_angle, FRAC_PI_2);
            if !cursor.approx_eq(&arc.start()) {
                segments.push(Segment::line(cursor, arc.start()));
            }
            cursor = arc.end();
            segments.push(arc);
        }
        Self::new(segments)
    }

    /// Closed polygon through `points`; the closing edge is implied.
    pub fn polygon(points: &[Point2]) -> Self {
        let n = points.len();
        let segments = (0..n)
            .map(|i| Segment::line(points[i], points[(i + 1) % n]))
            .filter(|s| s.length() > EPSILON)
            .collect();
        Self::new(segments)
    }

    pub fn start(&self) -> Option<Point2> {
        self.segments.first().map(Segment::start)
    }

    /// Every segment ends where the next begins, and the last closes on the first.
    pub fn is_closed(&self) -> bool {
        let n = self.segments.len();
        if n == 0 {
            return false;
        }
        (0..n).all(|i| {
            let a = self.segments[i].end();
            let b = self.segments[(i + 1) % n].start();
            (a - b).norm() < 1e-7
        })
    }

    pub fn is_circle(&self) -> bool {
        self.segments.len() == 1 && self.segments[0].is_full_circle()
    }

    /// Signed enclosed area, positive for counter-clockwise loops.
    pub fn signed_area(&self) -> f64 {
        self.segments.iter().map(Segment::area_term).sum()
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.segments.iter().rev().map(Segment::reversed).collect())
    }

    /// Same loop, wound counter-clockwise.
    pub fn ensure_ccw(self) -> Self {
        if self.is_ccw() { self } else { self.reversed() }
    }

    pub fn translated(&self, offset: Vector2) -> Self {
        Self::new(self.segments.iter().map(|s| s.translated(&offset)).collect())
    }

    /// Bounding rectangle as `(min, max)`.
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        self.segments.iter().map(Segment::bounds).reduce(|(amin, amax), (bmin, bmax)| {
            (
                Point2::new(amin.x.min(bmin.x), amin.y.min(bmin.y)),
                Point2::new(amax.x.max(bmax.x), amax.y.max(bmax.y)),
            )
        })
    }

    /// Even-odd containment; points on the boundary may fall either way.
    pub fn contains(&self, p: &Point2) -> bool {
        let crossings: usize = self.segments.iter().map(|s| s.ray_crossings(p)).sum();
        crossings % 2 == 1
    }

    pub fn distance_to_boundary(&self, p: &Point2) -> f64 {
        self.segments
            .iter()
            .map(|s| s.distance_to(p))
            .fold(f64::INFINITY, f64::min)
    }

    /// Distance to the boundary, negative inside.
    pub fn signed_distance(&self, p: &Point2) -> f64 {
        let d = self.distance_to_boundary(p);
        if self.contains(p) { -d } else { d }
    }

    /// Parallel loop at distance `d`, positive outwards on a counter-clockwise
    /// loop. Corners between two lines are mitred. `None` when an arc
    /// collapses, a line flips over, or two offset pieces no longer meet.
    pub fn offset(&self, d: f64) -> Option<Profile> {
        let mut pieces = self.segments.iter().map(|s| s.offset(d)).collect::<Option<Vec<_>>>()?;
        let n = pieces.len();
        for i in 0..n {
            let j = (i + 1) % n;
            if (pieces[i].end() - pieces[j].start()).norm() < 1e-7 {
                continue;
            }
            match (pieces[i], pieces[j]) {
                (Segment::Line { start: a0, end: a1 }, Segment::Line { start: b0, end: b1 }) => {
                    let corner = line_intersection(&a0, &a1, &b0, &b1)?;
                    pieces[i] = Segment::line(a0, corner);
                    pieces[j] = Segment::line(corner, b1);
                }
                _ => return None,
            }
        }
        let flipped = pieces.iter().zip(&self.segments).any(|(new, old)| match (new, old) {
            (Segment::Line { start: a, end: b }, Segment::Line { start: c, end: d }) => (b - a).dot(&(d - c)) <= 0.0,
            _ => false,
        });
        (!flipped).then(|| Profile::new(pieces))
    }

    /// Same loop with every arc cut into pieces sweeping at most `max_sweep`.
    pub fn split_arcs(&self, max_sweep: f64) -> Profile {
        Self::new(
            self.segments
                .iter()
                .flat_map(|s| match *s {
                    Segment::Arc { sweep, .. } => s.split((sweep.abs() / max_sweep - EPSILON).ceil().max(1.0) as usize),
                    Segment::Line { .. } => vec![*s],
                })
                .collect(),
        )
    }

    /// Polyline approximation, closing point not repeated.
    pub fn flatten(&self, tolerance: f64) -> Vec<Point2> {
        self.segments.iter().flat_map(|s| s.flatten(tolerance)).collect()
    }

    pub fn perimeter(&self) -> f64 {
        self.segments.iter().map(Segment::length).sum()
    }
}

/// Crossing of the infinite lines through `a0 a1` and `b0 b1`.
fn line_intersection(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> Option<Point2> {
    let (da, db) = (a1 - a0, b1 - b0);
    let denom = da.perp(&db);
    if denom.abs() < EPSILON {
        return None;
    }
    let t = (b0 - a0).perp(&db) / denom;
    Some(a0 + da * t)
}
