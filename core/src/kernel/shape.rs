use super::{FuseOptions, Kernel, KernelOpError, KernelResult, Plane};
use crate::geometry::{Aabb, Vector3};
use crate::selection::{EdgeFilter, FaceFilter};
use crate::sketch::Profile;

/// A solid threaded through a chain of kernel operations.
///
/// Each step consumes the shape and returns the next one, so intermediate
/// solids are dropped as soon as they are replaced.
pub struct Shape<'k, K: Kernel> {
    kernel: &'k K,
    solid: K::Solid,
}

impl<'k, K: Kernel> Shape<'k, K> {
    pub fn new(kernel: &'k K, solid: K::Solid) -> Self {
        Self { kernel, solid }
    }

    pub fn extrude(kernel: &'k K, profile: &Profile, plane: &Plane, distance: f64) -> KernelResult<Self> {
        Ok(Self::new(kernel, kernel.extrude(profile, plane, distance)?))
    }

    pub fn solid(&self) -> &K::Solid {
        &self.solid
    }

    pub fn into_solid(self) -> K::Solid {
        self.solid
    }

    pub fn cut(self, tool: &K::Solid) -> KernelResult<Self> {
        let solid = self.kernel.cut(&self.solid, tool)?;
        Ok(Self { solid, ..self })
    }

    pub fn fuse(self, other: &K::Solid, options: FuseOptions) -> KernelResult<Self> {
        let solid = self.kernel.fuse(&self.solid, other, options)?;
        Ok(Self { solid, ..self })
    }

    pub fn intersect(self, other: &K::Solid) -> KernelResult<Self> {
        let solid = self.kernel.intersect(&self.solid, other)?;
        Ok(Self { solid, ..self })
    }

    pub fn translate(self, offset: Vector3) -> KernelResult<Self> {
        let solid = self.kernel.translate(&self.solid, offset)?;
        Ok(Self { solid, ..self })
    }

    /// Fillet every edge the filter selects.
    pub fn fillet(self, filter: &EdgeFilter, radius: f64) -> KernelResult<Self> {
        let edges = filter.select(&self.kernel.edges(&self.solid)?);
        if edges.is_empty() {
            return Err(KernelOpError::EmptySelection("edges"));
        }
        let solid = self.kernel.fillet(&self.solid, &edges, radius)?;
        Ok(Self { solid, ..self })
    }

    /// Shell inward, opening every face the filter selects.
    pub fn shell(self, thickness: f64, open: &FaceFilter) -> KernelResult<Self> {
        let faces = open.select(&self.kernel.faces(&self.solid)?);
        if faces.is_empty() {
            return Err(KernelOpError::EmptySelection("faces"));
        }
        let solid = self.kernel.shell(&self.solid, thickness, &faces)?;
        Ok(Self { solid, ..self })
    }

    pub fn bounding_box(&self) -> KernelResult<Aabb> {
        self.kernel.bounding_box(&self.solid)
    }
}
