//! Common types for the kernel abstraction layer.
//!
//! These types are kernel-agnostic and used to communicate between
//! recipes and the kernel implementation.

use crate::geometry::{Aabb, Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A sketch plane in world space.
///
/// `x_dir`, `y_dir` and `normal` form a right-handed orthonormal frame;
/// extrusions travel along `normal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3,
    pub x_dir: Vector3,
    pub y_dir: Vector3,
    pub normal: Vector3,
}

impl Plane {
    /// Plane through `origin`, normal +Z.
    pub fn xy() -> Self {
        Self {
            origin: Point3::origin(),
            x_dir: Vector3::x(),
            y_dir: Vector3::y(),
            normal: Vector3::z(),
        }
    }

    /// Front plane: local x is world X, local y is world Z, normal −Y.
    pub fn xz() -> Self {
        Self {
            origin: Point3::origin(),
            x_dir: Vector3::x(),
            y_dir: Vector3::z(),
            normal: -Vector3::y(),
        }
    }

    /// Side plane: local x is world Y, local y is world Z, normal +X.
    pub fn yz() -> Self {
        Self {
            origin: Point3::origin(),
            x_dir: Vector3::y(),
            y_dir: Vector3::z(),
            normal: Vector3::x(),
        }
    }

    pub fn with_origin(mut self, origin: Point3) -> Self {
        self.origin = origin;
        self
    }

    /// Shift the plane along its own normal.
    pub fn offset(mut self, distance: f64) -> Self {
        self.origin += self.normal * distance;
        self
    }

    pub fn to_world(&self, p: &Point2) -> Point3 {
        self.origin + self.x_dir * p.x + self.y_dir * p.y
    }

    /// Local sketch coordinates and the height above the plane.
    pub fn to_local(&self, p: &Point3) -> (Point2, f64) {
        let d = p - self.origin;
        (Point2::new(d.dot(&self.x_dir), d.dot(&self.y_dir)), d.dot(&self.normal))
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self::xy()
    }
}

/// Hints for boolean union.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuseOptions {
    /// Operands are known to touch on coincident faces. Kernels may use this
    /// to merge faces instead of intersecting them; the result is the same.
    pub common_face: bool,
}

impl FuseOptions {
    pub fn common_face() -> Self {
        Self { common_face: true }
    }
}

/// Tessellation tolerances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshOptions {
    /// Maximum linear deviation from the surface, in mm.
    pub tolerance: f64,
    /// Maximum angle between adjacent facet normals, in degrees.
    pub angular_tolerance: f64,
}

impl MeshOptions {
    /// Coarse settings for interactive viewing.
    pub const VIEW: MeshOptions = MeshOptions { tolerance: 0.1, angular_tolerance: 30.0 };
    /// Fine settings for print export.
    pub const EXPORT: MeshOptions = MeshOptions { tolerance: 0.01, angular_tolerance: 10.0 };

    pub fn new(tolerance: f64, angular_tolerance: f64) -> Self {
        Self { tolerance, angular_tolerance }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_angular_tolerance(mut self, degrees: f64) -> Self {
        self.angular_tolerance = degrees;
        self
    }
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self::VIEW
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FaceId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveKind {
    Line,
    Circle,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SurfaceKind {
    Plane { normal: Vector3 },
    Cylinder,
    Other,
}

/// An edge as reported by a kernel's topology query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeInfo {
    pub id: EdgeId,
    pub kind: CurveKind,
    pub bounds: Aabb,
}

/// A face as reported by a kernel's topology query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceInfo {
    pub id: FaceId,
    pub kind: SurfaceKind,
    pub bounds: Aabb,
}
