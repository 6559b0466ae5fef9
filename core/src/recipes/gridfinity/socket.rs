//! One base socket: the tapered foot that locks a bin into a baseplate cell.

use super::{BinParams, GridfinityStandard};
use crate::error::{BuildError, Stage, StageExt};
use crate::geometry::{Point2, Vector3};
use crate::kernel::{FuseOptions, Kernel, Plane, Shape};
use crate::recipes::{cylinder, CUTTER_OVERSHOOT};
use crate::sketch::{Profile, Taper};

/// Socket side profile in sweep coordinates, top to bottom
/// (`v = -socket_height`), already shifted out by half the clearance.
///
/// The top rises `embed` into the bin floor behind a 45° chamfer that
/// meets the cell outline `seam` below the floor, so the socket never
/// shares a face with the body.
pub fn socket_taper(std: &GridfinityStandard, embed: f64) -> Taper {
    let c = std.clearance / 2.0;
    let big = std.big_taper;
    let points = vec![
        Point2::new(-c - std.seam - embed, embed),
        Point2::new(-c, -std.seam),
        Point2::new(-c, -c),
        Point2::new(-big, -big),
        Point2::new(-big, -big - std.vertical_part()),
        Point2::new(-big - std.small_taper, -std.socket_height),
    ];
    Taper::new(points).translated(c, 0.0)
}

/// How far a socket reaches up into the bin floor.
pub fn socket_embed(params: &BinParams) -> f64 {
    params.wall_thickness / 2.0
}

/// Footprint of a single cell.
pub fn cell_outline(std: &GridfinityStandard) -> Profile {
    let side = std.cell_size - std.clearance;
    Profile::rounded_rectangle(Point2::origin(), side, side, std.corner_radius)
}

/// Hole centres, in cut order.
pub fn hole_offsets(std: &GridfinityStandard) -> [Point2; 4] {
    let d = std.hole_offset;
    [Point2::new(-d, -d), Point2::new(-d, d), Point2::new(d, d), Point2::new(d, -d)]
}

/// Magnet and/or screw pocket reaching below the socket floor. `None` when
/// neither is asked for.
///
/// The screw starts one overshoot lower than the magnet and stops inside
/// the socket top, so neither end lies on another face.
fn pocket_tool<K: Kernel>(
    kernel: &K,
    std: &GridfinityStandard,
    params: &BinParams,
) -> Result<Option<K::Solid>, BuildError> {
    let plane = Plane::xy().offset(-std.socket_height - CUTTER_OVERSHOOT);
    let magnet = params
        .with_magnet
        .then(|| cylinder(kernel, &plane, Point2::origin(), params.magnet_radius, params.magnet_height + CUTTER_OVERSHOOT))
        .transpose()
        .stage(Stage::SocketCutouts)?;
    let screw_plane = plane.offset(-CUTTER_OVERSHOOT);
    let screw_height = std.socket_height + 2.0 * CUTTER_OVERSHOOT + socket_embed(params) / 2.0;
    let screw = params
        .with_screw
        .then(|| cylinder(kernel, &screw_plane, Point2::origin(), params.screw_radius, screw_height))
        .transpose()
        .stage(Stage::SocketCutouts)?;

    match (magnet, screw) {
        (Some(m), Some(s)) => Ok(Some(kernel.fuse(&m, &s, FuseOptions::default()).stage(Stage::SocketCutouts)?)),
        (m, s) => Ok(m.or(s)),
    }
}

/// Swept socket with its pockets cut at the four hole offsets.
pub fn build_socket<K: Kernel>(
    kernel: &K,
    std: &GridfinityStandard,
    params: &BinParams,
) -> Result<K::Solid, BuildError> {
    let taper = socket_taper(std, socket_embed(params));
    let swept = kernel.sweep_capped(&cell_outline(std), &taper).stage(Stage::SocketSweep)?;
    let Some(tool) = pocket_tool(kernel, std, params)? else {
        return Ok(swept);
    };

    let mut socket = Shape::new(kernel, swept);
    for at in hole_offsets(std) {
        let placed = kernel.translate(&tool, Vector3::new(at.x, at.y, 0.0)).stage(Stage::SocketCutouts)?;
        socket = socket.cut(&placed).stage(Stage::SocketCutouts)?;
    }
    Ok(socket.into_solid())
}
