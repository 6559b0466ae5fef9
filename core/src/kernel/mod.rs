//! Kernel abstraction layer for CAD geometry operations.
//!
//! Recipes only ever talk to the [`Kernel`] trait, so concrete kernels can be
//! swapped (Truck for meshing, the probe kernel for analysis) without touching
//! the recipe code. Every operation takes solids by reference and returns a new
//! solid; nothing is mutated in place.

pub mod types;
mod truck;
mod probe;
mod shape;

#[cfg(test)]
mod tests_truck;
#[cfg(test)]
mod tests_probe;

pub use probe::{ProbeKernel, ProbeSolid};
pub use shape::Shape;
pub use truck::{TruckKernel, TruckSolid};
pub use types::*;

use crate::geometry::{Aabb, MeshBuffer, Vector3};
use crate::sketch::{Profile, Section, Taper};
use thiserror::Error;

/// Errors that can occur during kernel operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KernelOpError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Tessellation failed: {0}")]
    TessellationFailed(String),

    #[error("{kernel} kernel does not support {operation}")]
    Unsupported { kernel: &'static str, operation: &'static str },

    #[error("Selection matched no {0}")]
    EmptySelection(&'static str),
}

/// Result type for kernel operations.
pub type KernelResult<T> = Result<T, KernelOpError>;

/// Abstract interface for the solid-modelling operations recipes need.
///
/// A kernel value carries its own numeric settings and must not be shared
/// between concurrent builds; create one per build instead.
pub trait Kernel: Send + Sync {
    /// The kernel's solid handle.
    type Solid: Clone + Send;

    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Extrude a closed profile drawn on `plane` along the plane normal.
    fn extrude(&self, profile: &Profile, plane: &Plane, distance: f64) -> KernelResult<Self::Solid>;

    /// Sweep a closed section around a closed path lying in the XY plane.
    ///
    /// Section `u` is the outward offset from the path, `v` is world Z.
    fn sweep(&self, path: &Profile, section: &Section) -> KernelResult<Self::Solid>;

    /// Sweep an open taper around a closed XY path and close the result with
    /// planar caps at the lowest and highest `v` of the taper.
    fn sweep_capped(&self, path: &Profile, taper: &Taper) -> KernelResult<Self::Solid>;

    fn translate(&self, solid: &Self::Solid, offset: Vector3) -> KernelResult<Self::Solid>;

    // === Boolean Operations ===

    /// Union (A ∪ B).
    fn fuse(&self, a: &Self::Solid, b: &Self::Solid, options: FuseOptions) -> KernelResult<Self::Solid>;

    /// Difference (A − B).
    fn cut(&self, a: &Self::Solid, b: &Self::Solid) -> KernelResult<Self::Solid>;

    /// Intersection (A ∩ B).
    fn intersect(&self, a: &Self::Solid, b: &Self::Solid) -> KernelResult<Self::Solid>;

    // === Topology ===

    fn edges(&self, solid: &Self::Solid) -> KernelResult<Vec<EdgeInfo>>;

    fn faces(&self, solid: &Self::Solid) -> KernelResult<Vec<FaceInfo>>;

    /// Round the given edges. An empty edge list is an error.
    fn fillet(&self, solid: &Self::Solid, edges: &[EdgeId], radius: f64) -> KernelResult<Self::Solid>;

    /// Hollow the solid inward to `thickness`, removing `open_faces`.
    fn shell(&self, solid: &Self::Solid, thickness: f64, open_faces: &[FaceId]) -> KernelResult<Self::Solid>;

    // === Measurement and output ===

    fn bounding_box(&self, solid: &Self::Solid) -> KernelResult<Aabb>;

    fn mesh(&self, solid: &Self::Solid, options: &MeshOptions) -> KernelResult<MeshBuffer>;
}

/// Kernel used for meshing and export.
pub fn default_kernel() -> TruckKernel {
    TruckKernel::new()
}
