//! Axis-aligned bounding boxes.

use super::{Point3, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point3,
    pub max: Point3,
}

impl Aabb {
    /// Build a box from two corners in any order.
    pub fn new(a: Point3, b: Point3) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Point3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bb = Self { min: first, max: first };
        for p in iter {
            bb.include(&p);
        }
        Some(bb)
    }

    pub fn include(&mut self, p: &Point3) {
        self.min = Point3::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z));
        self.max = Point3::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z));
    }

    pub fn union(&self, other: &Self) -> Self {
        Self::new(
            Point3::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y), self.min.z.min(other.min.z)),
            Point3::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y), self.max.z.max(other.max.z)),
        )
    }

    /// Overlap of two boxes; `None` when they are disjoint.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let min = Point3::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y), self.min.z.max(other.min.z));
        let max = Point3::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y), self.max.z.min(other.max.z));
        if min.x > max.x || min.y > max.y || min.z > max.z {
            None
        } else {
            Some(Self { min, max })
        }
    }

    pub fn translated(&self, offset: &Vector3) -> Self {
        Self { min: self.min + *offset, max: self.max + *offset }
    }

    pub fn expanded(&self, margin: f64) -> Self {
        let m = Vector3::new(margin, margin, margin);
        Self { min: self.min - m, max: self.max + m }
    }

    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: &Point3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x
            && p.y >= self.min.y && p.y <= self.max.y
            && p.z >= self.min.z && p.z <= self.max.z
    }

    pub fn contains_aabb(&self, other: &Self) -> bool {
        self.contains(&other.min) && self.contains(&other.max)
    }

    /// True when every corner coordinate differs by at most `tolerance`.
    pub fn approx_eq_within(&self, other: &Self, tolerance: f64) -> bool {
        (self.min - other.min).amax() <= tolerance && (self.max - other.max).amax() <= tolerance
    }
}
