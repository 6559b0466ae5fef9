use super::segment::angle_of;
use super::{Profile, Segment};
use crate::geometry::{Point2, Vector2, EPSILON};
use std::f64::consts::TAU;

/// Turtle-style profile drawing.
///
/// ```ignore
/// let profile = Pen::start_at(Point2::new(0.0, 0.0))
///     .line_to(Point2::new(10.0, 0.0))
///     .tangent_arc_to(Point2::new(15.0, 5.0))
///     .close();
/// ```
#[derive(Debug, Clone)]
pub struct Pen {
    origin: Point2,
    cursor: Point2,
    segments: Vec<Segment>,
}

/// Sweep from `a0` to `a1` travelling in the given direction, in `(0, TAU)`.
fn directed_sweep(a0: f64, a1: f64, ccw: bool) -> f64 {
    if ccw {
        (a1 - a0).rem_euclid(TAU)
    } else {
        -(a0 - a1).rem_euclid(TAU)
    }
}

impl Pen {
    pub fn start_at(origin: Point2) -> Self {
        Self { origin, cursor: origin, segments: Vec::new() }
    }

    pub fn cursor(&self) -> Point2 {
        self.cursor
    }

    fn push(mut self, segment: Segment) -> Self {
        self.cursor = segment.end();
        self.segments.push(segment);
        self
    }

    pub fn line_to(self, end: Point2) -> Self {
        if (end - self.cursor).norm() < EPSILON {
            return self;
        }
        let start = self.cursor;
        self.push(Segment::line(start, end))
    }

    pub fn line(self, dx: f64, dy: f64) -> Self {
        let end = self.cursor + Vector2::new(dx, dy);
        self.line_to(end)
    }

    pub fn h_line(self, dx: f64) -> Self {
        self.line(dx, 0.0)
    }

    pub fn v_line(self, dy: f64) -> Self {
        self.line(0.0, dy)
    }

    /// Arc to `end` that leaves the cursor along the current direction of
    /// travel. Degenerates to a line when `end` is straight ahead.
    pub fn tangent_arc_to(self, end: Point2) -> Self {
        let tangent = self
            .segments
            .last()
            .map(Segment::end_tangent)
            .unwrap_or_else(Vector2::x);
        let start = self.cursor;
        let chord = end - start;
        let normal = Vector2::new(-tangent.y, tangent.x);
        let along = chord.dot(&normal);
        if along.abs() < EPSILON {
            return self.line_to(end);
        }

        // Signed radius: positive turns left (counter-clockwise).
        let rho = chord.norm_squared() / (2.0 * along);
        let center = start + normal * rho;
        let a0 = angle_of(&center, &start);
        let a1 = angle_of(&center, &end);
        let sweep = directed_sweep(a0, a1, rho > 0.0);
        self.push(Segment::arc(center, rho.abs(), a0, sweep))
    }

    /// Arc from the cursor through `via` to `end`. Falls back to a line when
    /// the three points are collinear.
    pub fn three_point_arc_to(self, via: Point2, end: Point2) -> Self {
        let start = self.cursor;
        let (b, c) = (via - start, end - start);
        let cross = b.x * c.y - b.y * c.x;
        if cross.abs() < EPSILON {
            return self.line_to(end);
        }

        // Circumcentre relative to `start`.
        let d = 2.0 * cross;
        let ux = (c.y * b.norm_squared() - b.y * c.norm_squared()) / d;
        let uy = (b.x * c.norm_squared() - c.x * b.norm_squared()) / d;
        let center = start + Vector2::new(ux, uy);
        let radius = Vector2::new(ux, uy).norm();

        let a0 = angle_of(&center, &start);
        let a1 = angle_of(&center, &end);
        let sweep = directed_sweep(a0, a1, cross > 0.0);
        self.push(Segment::arc(center, radius, a0, sweep))
    }

    /// Close back to the starting point and finish the profile.
    pub fn close(self) -> Profile {
        let origin = self.origin;
        let pen = self.line_to(origin);
        Profile::new(pen.segments)
    }
}
