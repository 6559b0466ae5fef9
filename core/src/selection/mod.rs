//! Declarative edge and face filters.
//!
//! Filters are plain data (plane, box, curve kind) evaluated against the
//! topology a kernel reports, so a selection can be checked against a known
//! solid in tests without driving the kernel.

use crate::geometry::{Aabb, Point3};
use crate::kernel::{CurveKind, EdgeId, EdgeInfo, FaceId, FaceInfo, SurfaceKind};
use serde::{Deserialize, Serialize};


/// Default distance within which an entity counts as lying on a plane or
/// inside a box.
pub const SELECTION_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn of(&self, p: &Point3) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
            Axis::Z => p.z,
        }
    }
}

/// The plane `axis = offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisPlane {
    pub axis: Axis,
    pub offset: f64,
}

impl AxisPlane {
    pub fn xy(z: f64) -> Self {
        Self { axis: Axis::Z, offset: z }
    }

    pub fn xz(y: f64) -> Self {
        Self { axis: Axis::Y, offset: y }
    }

    pub fn yz(x: f64) -> Self {
        Self { axis: Axis::X, offset: x }
    }

    /// Whole box lies on the plane.
    fn holds(&self, bounds: &Aabb, tolerance: f64) -> bool {
        (self.axis.of(&bounds.min) - self.offset).abs() <= tolerance
            && (self.axis.of(&bounds.max) - self.offset).abs() <= tolerance
    }
}

fn within(outer: &Aabb, inner: &Aabb, tolerance: f64) -> bool {
    outer.expanded(tolerance).contains_aabb(inner)
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeFilter {
    pub plane: Option<AxisPlane>,
    pub inside: Option<Aabb>,
    pub kind: Option<CurveKind>,
    pub tolerance: Option<f64>,
}

impl EdgeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_plane(mut self, plane: AxisPlane) -> Self {
        self.plane = Some(plane);
        self
    }

    /// Edges entirely inside the box spanned by two corners.
    pub fn in_box(mut self, a: Point3, b: Point3) -> Self {
        self.inside = Some(Aabb::new(a, b));
        self
    }

    pub fn of_kind(mut self, kind: CurveKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn matches(&self, edge: &EdgeInfo) -> bool {
        let tol = self.tolerance.unwrap_or(SELECTION_TOLERANCE);
        self.plane.map_or(true, |p| p.holds(&edge.bounds, tol))
            && self.inside.map_or(true, |b| within(&b, &edge.bounds, tol))
            && self.kind.map_or(true, |k| k == edge.kind)
    }

    /// Ids of matching edges in kernel order.
    pub fn select(&self, edges: &[EdgeInfo]) -> Vec<EdgeId> {
        edges.iter().filter(|e| self.matches(e)).map(|e| e.id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceFilter {
    pub plane: Option<AxisPlane>,
    pub inside: Option<Aabb>,
    pub planar_only: bool,
    pub tolerance: Option<f64>,
}

impl FaceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Planar faces lying in the plane.
    pub fn in_plane(mut self, plane: AxisPlane) -> Self {
        self.plane = Some(plane);
        self.planar_only = true;
        self
    }

    pub fn in_box(mut self, a: Point3, b: Point3) -> Self {
        self.inside = Some(Aabb::new(a, b));
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn matches(&self, face: &FaceInfo) -> bool {
        let tol = self.tolerance.unwrap_or(SELECTION_TOLERANCE);
        (!self.planar_only || matches!(face.kind, SurfaceKind::Plane { .. }))
            && self.plane.map_or(true, |p| p.holds(&face.bounds, tol))
            && self.inside.map_or(true, |b| within(&b, &face.bounds, tol))
    }

    pub fn select(&self, faces: &[FaceInfo]) -> Vec<FaceId> {
        faces.iter().filter(|f| self.matches(f)).map(|f| f.id).collect()
    }
}
