use crate::error::{BuildError, Stage, StageExt};
use crate::geometry::Vector3;
use crate::kernel::{FuseOptions, Kernel, Shape};

/// Centred offsets of `steps` cells of pitch `size` along one axis.
pub fn grid_offsets(steps: u32, size: f64) -> Vec<f64> {
    let correction = (steps.saturating_sub(1)) as f64 * size / 2.0;
    (0..steps).map(|i| i as f64 * size - correction).collect()
}

/// Translations for every cell, x outer and y inner.
pub fn grid_translations(x_steps: u32, y_steps: u32, size: f64) -> Vec<Vector3> {
    let ys = grid_offsets(y_steps, size);
    grid_offsets(x_steps, size)
        .into_iter()
        .flat_map(|x| ys.iter().map(move |&y| Vector3::new(x, y, 0.0)))
        .collect()
}

/// Clone `unit` over the grid and fuse the copies in order. The first copy
/// seeds the result.
pub fn tile<K: Kernel>(
    kernel: &K,
    unit: &K::Solid,
    x_steps: u32,
    y_steps: u32,
    size: f64,
) -> Result<K::Solid, BuildError> {
    let mut tiled: Option<Shape<'_, K>> = None;
    for offset in grid_translations(x_steps, y_steps, size) {
        let moved = kernel.translate(unit, offset).stage(Stage::GridTiling)?;
        tiled = Some(match tiled {
            None => Shape::new(kernel, moved),
            Some(acc) => acc.fuse(&moved, FuseOptions::common_face()).stage(Stage::GridTiling)?,
        });
    }
    tiled
        .map(Shape::into_solid)
        .ok_or_else(|| BuildError::invalid("x_units", "grid has no cells"))
}
