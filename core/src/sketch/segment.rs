use crate::geometry::{Point2, Vector2, EPSILON};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// One piece of a profile boundary.
///
/// Arcs are stored by centre, radius, start angle and signed sweep
/// (positive is counter-clockwise). A full circle has `|sweep| == TAU`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Segment {
    Line { start: Point2, end: Point2 },
    Arc { center: Point2, radius: f64, start_angle: f64, sweep: f64 },
}

fn on_circle(center: &Point2, radius: f64, angle: f64) -> Point2 {
    Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

impl Segment {
    pub fn line(start: Point2, end: Point2) -> Self {
        Segment::Line { start, end }
    }

    pub fn arc(center: Point2, radius: f64, start_angle: f64, sweep: f64) -> Self {
        Segment::Arc { center, radius, start_angle, sweep }
    }

    pub fn start(&self) -> Point2 {
        match *self {
            Segment::Line { start, .. } => start,
            Segment::Arc { center, radius, start_angle, .. } => on_circle(&center, radius, start_angle),
        }
    }

    pub fn end(&self) -> Point2 {
        match *self {
            Segment::Line { end, .. } => end,
            Segment::Arc { center, radius, start_angle, sweep } => {
                on_circle(&center, radius, start_angle + sweep)
            }
        }
    }

    /// Point at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Point2 {
        match *self {
            Segment::Line { start, end } => start + (end - start) * t,
            Segment::Arc { center, radius, start_angle, sweep } => {
                on_circle(&center, radius, start_angle + sweep * t)
            }
        }
    }

    /// Unit direction of travel at the end of the segment.
    pub fn end_tangent(&self) -> Vector2 {
        match *self {
            Segment::Line { start, end } => (end - start).try_normalize(EPSILON).unwrap_or_else(Vector2::x),
            Segment::Arc { start_angle, sweep, .. } => {
                let a = start_angle + sweep;
                let t = Vector2::new(-a.sin(), a.cos());
                if sweep < 0.0 { -t } else { t }
            }
        }
    }

    pub fn is_full_circle(&self) -> bool {
        matches!(*self, Segment::Arc { sweep, .. } if sweep.abs() >= TAU - EPSILON)
    }

    pub fn length(&self) -> f64 {
        match *self {
            Segment::Line { start, end } => (end - start).norm(),
            Segment::Arc { radius, sweep, .. } => radius * sweep.abs(),
        }
    }

    /// Whether `angle` lies on the angular span of an arc.
    fn spans(start_angle: f64, sweep: f64, angle: f64) -> bool {
        if sweep.abs() >= TAU - EPSILON {
            return true;
        }
        let rel = if sweep >= 0.0 {
            (angle - start_angle).rem_euclid(TAU)
        } else {
            (start_angle - angle).rem_euclid(TAU)
        };
        rel <= sweep.abs() + EPSILON
    }

    /// Axis-aligned extent as `(min, max)`, arc extrema included.
    pub fn bounds(&self) -> (Point2, Point2) {
        let (a, b) = (self.start(), self.end());
        let mut min = Point2::new(a.x.min(b.x), a.y.min(b.y));
        let mut max = Point2::new(a.x.max(b.x), a.y.max(b.y));
        if let Segment::Arc { center, radius, start_angle, sweep } = *self {
            for k in 0..4 {
                let angle = k as f64 * FRAC_PI_2;
                if Self::spans(start_angle, sweep, angle) {
                    let p = on_circle(&center, radius, angle);
                    min = Point2::new(min.x.min(p.x), min.y.min(p.y));
                    max = Point2::new(max.x.max(p.x), max.y.max(p.y));
                }
            }
        }
        (min, max)
    }

    /// Euclidean distance from `p` to the segment.
    pub fn distance_to(&self, p: &Point2) -> f64 {
        match *self {
            Segment::Line { start, end } => {
                let d = end - start;
                let len2 = d.norm_squared();
                if len2 < EPSILON * EPSILON {
                    return (p - start).norm();
                }
                let t = ((p - start).dot(&d) / len2).clamp(0.0, 1.0);
                (p - (start + d * t)).norm()
            }
            Segment::Arc { center, radius, start_angle, sweep } => {
                let rel = p - center;
                let angle = rel.y.atan2(rel.x);
                if rel.norm() > EPSILON && Self::spans(start_angle, sweep, angle) {
                    (rel.norm() - radius).abs()
                } else {
                    (p - self.start()).norm().min((p - self.end()).norm())
                }
            }
        }
    }

    /// Crossings of the ray from `p` towards +X, using the half-open rule so
    /// shared endpoints are counted once.
    pub fn ray_crossings(&self, p: &Point2) -> usize {
        match *self {
            Segment::Line { start, end } => line_crossing(&start, &end, p) as usize,
            Segment::Arc { center, radius, start_angle, sweep } => {
                // Split at the top and bottom of the circle so every piece is
                // monotone in y, then treat each piece like a line.
                let mut cuts = vec![0.0];
                for extreme in [FRAC_PI_2, 3.0 * FRAC_PI_2] {
                    let mut rel = if sweep >= 0.0 {
                        (extreme - start_angle).rem_euclid(TAU)
                    } else {
                        (start_angle - extreme).rem_euclid(TAU)
                    };
                    while rel < sweep.abs() - EPSILON {
                        if rel > EPSILON {
                            cuts.push(rel / sweep.abs());
                        }
                        rel += TAU;
                    }
                }
                cuts.push(1.0);
                cuts.sort_by(|a, b| a.total_cmp(b));

                let mut count = 0;
                for w in cuts.windows(2) {
                    let a = self.point_at(w[0]);
                    let b = self.point_at(w[1]);
                    if (a.y > p.y) == (b.y > p.y) {
                        continue;
                    }
                    let mid = start_angle + sweep * (w[0] + w[1]) * 0.5;
                    let dy = p.y - center.y;
                    let dx = (radius * radius - dy * dy).max(0.0).sqrt();
                    let x = if mid.cos() >= 0.0 { center.x + dx } else { center.x - dx };
                    if x > p.x {
                        count += 1;
                    }
                }
                count
            }
        }
    }

    /// Contribution to the signed area of a closed loop, `∮ (x dy − y dx) / 2`.
    pub fn area_term(&self) -> f64 {
        match *self {
            Segment::Line { start, end } => 0.5 * (start.x * end.y - end.x * start.y),
            Segment::Arc { center, radius, start_angle, sweep } => {
                let a1 = start_angle + sweep;
                0.5 * (radius * radius * sweep
                    + radius * (center.x * (a1.sin() - start_angle.sin())
                        - center.y * (a1.cos() - start_angle.cos())))
            }
        }
    }

    /// Points approximating the segment within `tolerance`, end point excluded.
    pub fn flatten(&self, tolerance: f64) -> Vec<Point2> {
        match *self {
            Segment::Line { start, .. } => vec![start],
            Segment::Arc { radius, .. } if radius <= EPSILON => vec![self.start()],
            Segment::Arc { radius, sweep, .. } => {
                let tol = tolerance.max(EPSILON).min(radius);
                let max_step = 2.0 * (1.0 - tol / radius).acos();
                let min_steps = if self.is_full_circle() { 8 } else { 1 };
                let steps = ((sweep.abs() / max_step.max(EPSILON)).ceil() as usize).max(min_steps);
                (0..steps).map(|i| self.point_at(i as f64 / steps as f64)).collect()
            }
        }
    }

    /// Parallel copy `u` to the right of the direction of travel, which is
    /// outwards on a counter-clockwise loop. `None` when an arc collapses.
    pub fn offset(&self, u: f64) -> Option<Segment> {
        match *self {
            Segment::Line { start, end } => {
                let d = (end - start).try_normalize(EPSILON)?;
                let n = Vector2::new(d.y, -d.x) * u;
                Some(Segment::line(start + n, end + n))
            }
            Segment::Arc { center, radius, start_angle, sweep } => {
                let r = if sweep > 0.0 { radius + u } else { radius - u };
                (r > EPSILON).then(|| Segment::arc(center, r, start_angle, sweep))
            }
        }
    }

    /// The arc cut into `pieces` equal arcs; a line comes back unchanged.
    pub fn split(&self, pieces: usize) -> Vec<Segment> {
        match *self {
            Segment::Arc { center, radius, start_angle, sweep } if pieces > 1 => {
                let step = sweep / pieces as f64;
                (0..pieces)
                    .map(|i| Segment::arc(center, radius, start_angle + step * i as f64, step))
                    .collect()
            }
            _ => vec![*self],
        }
    }

    pub fn translated(&self, offset: &Vector2) -> Self {
        match *self {
            Segment::Line { start, end } => Segment::Line { start: start + *offset, end: end + *offset },
            Segment::Arc { center, radius, start_angle, sweep } => {
                Segment::Arc { center: center + *offset, radius, start_angle, sweep }
            }
        }
    }

    pub fn reversed(&self) -> Self {
        match *self {
            Segment::Line { start, end } => Segment::Line { start: end, end: start },
            Segment::Arc { center, radius, start_angle, sweep } => Segment::Arc {
                center,
                radius,
                start_angle: (start_angle + sweep).rem_euclid(TAU),
                sweep: -sweep,
            },
        }
    }
}

fn line_crossing(a: &Point2, b: &Point2, p: &Point2) -> bool {
    if (a.y > p.y) == (b.y > p.y) {
        return false;
    }
    let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
    x > p.x
}

/// Angle of `p` around `center`, in `(-PI, PI]`.
pub(crate) fn angle_of(center: &Point2, p: &Point2) -> f64 {
    let d = p - center;
    let a = d.y.atan2(d.x);
    if a <= -PI { a + TAU } else { a }
}
