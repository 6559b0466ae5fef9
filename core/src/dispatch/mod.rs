//! Build dispatcher: resolve a model id, run its recipe against a kernel and
//! hand back a solid, a mesh or STL bytes.

#[cfg(test)]
mod tests_dispatch;

use crate::error::BuildError;
use crate::geometry::stl::{to_stl_ascii, to_stl_binary};
use crate::geometry::MeshBuffer;
use crate::kernel::{Kernel, KernelOpError, MeshOptions};
use crate::recipes::Recipe;
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StlOptions {
    pub mesh: MeshOptions,
    pub binary: bool,
}

impl Default for StlOptions {
    fn default() -> Self {
        Self { mesh: MeshOptions::EXPORT, binary: true }
    }
}

impl StlOptions {
    pub fn ascii(mut self) -> Self {
        self.binary = false;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshOptions) -> Self {
        self.mesh = mesh;
        self
    }
}

/// Runs builds against one kernel. Create one dispatcher per concurrent
/// build; the registry itself is shared.
pub struct Dispatcher<K: Kernel> {
    registry: Arc<Registry>,
    kernel: K,
}

impl<K: Kernel> Dispatcher<K> {
    pub fn new(registry: Arc<Registry>, kernel: K) -> Self {
        Self { registry, kernel }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn build(&self, id: &str) -> Result<K::Solid, BuildError> {
        let model = self.registry.recipe(id)?;
        let started = Instant::now();
        let result = model.build(&self.kernel);
        match &result {
            Ok(_) => info!(model = id, kernel = self.kernel.name(), elapsed_ms = started.elapsed().as_millis() as u64, "built model"),
            Err(e) => warn!(model = id, kernel = self.kernel.name(), code = e.code(), "build failed: {}", e),
        }
        result
    }

    /// Build and tessellate.
    pub fn mesh(&self, id: &str, options: &MeshOptions) -> Result<MeshBuffer, BuildError> {
        let solid = self.build(id)?;
        let adapter_failure = |source| BuildError::AdapterFailure { tolerance: options.tolerance, source };
        let mesh = self.kernel.mesh(&solid, options).map_err(adapter_failure)?;
        if mesh.is_empty() {
            return Err(adapter_failure(KernelOpError::TessellationFailed("mesh has no triangles".into())));
        }
        info!(model = id, triangles = mesh.triangle_count(), tolerance = options.tolerance, "meshed model");
        Ok(mesh)
    }

    /// Build, tessellate and encode as STL.
    pub fn export_stl(&self, id: &str, options: &StlOptions) -> Result<Vec<u8>, BuildError> {
        let mesh = self.mesh(id, &options.mesh)?;
        if !options.binary {
            return Ok(to_stl_ascii(&mesh, id).into_bytes());
        }
        to_stl_binary(&mesh).map_err(|e| BuildError::AdapterFailure {
            tolerance: options.mesh.tolerance,
            source: KernelOpError::OperationFailed(format!("STL encoding failed: {}", e)),
        })
    }
}
