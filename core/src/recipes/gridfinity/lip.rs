//! Stacking lip swept around the top rim of the bin.

use super::{BinParams, GridfinityStandard};
use crate::error::{BuildError, Stage, StageExt};
use crate::geometry::{Point3, Vector3};
use crate::kernel::{Kernel, Shape};
use crate::selection::EdgeFilter;
use crate::sketch::Section;

/// Lip cross-section for a wall of the given thickness, in sweep
/// coordinates with `u = 0` on the bin footprint and `v = 0` at the rim.
///
/// Below the rim the section is notched over the outer half of the wall,
/// and the notch is chamfered up to `seam` above the rim. The lip then
/// overlaps the wall instead of resting on its top and outer faces.
pub fn lip_section(std: &GridfinityStandard, wall_thickness: f64) -> Section {
    let tw = std.taper_width();
    let small = std.small_taper;
    let vertical = std.vertical_part();
    let top = small + vertical + std.big_taper;

    let outline = Section::polygon(&[
        (-tw, 0.0),
        (-tw + small, small),
        (-tw + small, small + vertical),
        (0.0, top),
        (0.0, -(tw + wall_thickness)),
        (-tw, -wall_thickness),
    ]);

    let w = std.lip_window;
    let ac = std.axis_clearance();
    let (half, seam) = (wall_thickness / 2.0, std.seam);
    outline
        .translated(ac, -ac)
        .intersect_rect(-w, -w / 2.0, 0.0, w / 2.0)
        .translated(std.clearance / 2.0, 0.0)
        .intersect_rect(-w, -w / 2.0, 0.0, w / 2.0)
        .cut_polygon(&[(-half, -w), (-half, seam - half), (0.0, seam), (w, seam), (w, -w)])
}

/// Edges the top fillet rounds: everything in the slab just under the
/// socket height, which on the lip is the inner ridge.
pub fn fillet_filter(std: &GridfinityStandard, params: &BinParams) -> EdgeFilter {
    let x = params.x_units as f64 * std.cell_size;
    let y = params.y_units as f64 * std.cell_size;
    EdgeFilter::new().in_box(
        Point3::new(-x, -y, std.socket_height - 1.0),
        Point3::new(x, y, std.socket_height),
    )
}

/// Swept, filleted lip placed on top of the walls.
pub fn build_lip<K: Kernel>(
    kernel: &K,
    std: &GridfinityStandard,
    params: &BinParams,
) -> Result<K::Solid, BuildError> {
    let section = lip_section(std, params.wall_thickness);
    let swept = kernel.sweep(&params.footprint(std), &section).stage(Stage::LipSweep)?;
    Ok(Shape::new(kernel, swept)
        .fillet(&fillet_filter(std, params), std.top_fillet)
        .stage(Stage::LipFillet)?
        .translate(Vector3::new(0.0, 0.0, params.height_mm()))
        .stage(Stage::LipSweep)?
        .into_solid())
}
