//! Gridfinity storage bins.
//!
//! Every preset runs the same template: a grid of tapered sockets, a shelled
//! body, a stacking lip and optional accessories. Presets only differ in
//! their [`BinParams`].

pub mod accessories;
pub mod grid;
pub mod lip;
pub mod socket;


pub use accessories::{Accessory, CradleBar, CradleLayout, WallCutout};

use super::Recipe;
use crate::error::{BuildError, Stage, StageExt};
use crate::geometry::Point2;
use crate::kernel::{FuseOptions, Kernel, Plane, Shape};
use crate::params::{at_least, less_than, positive, Parameters};
use crate::selection::{AxisPlane, FaceFilter};
use crate::sketch::Profile;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Dimensions fixed by the gridfinity system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridfinityStandard {
    /// Cell pitch in X and Y.
    pub cell_size: f64,
    pub clearance: f64,
    pub corner_radius: f64,
    pub top_fillet: f64,
    pub socket_height: f64,
    pub small_taper: f64,
    pub big_taper: f64,
    /// Magnet and screw holes sit this far from the cell centre on each axis.
    pub hole_offset: f64,
    /// Side of the square the lip section is clipped to.
    pub lip_window: f64,
    /// Chamfer left where two bodies meet, so their faces cross instead of
    /// lying on one another.
    pub seam: f64,
}

impl GridfinityStandard {
    pub const STANDARD: GridfinityStandard = GridfinityStandard {
        cell_size: 42.0,
        clearance: 0.5,
        corner_radius: 4.0,
        top_fillet: 0.6,
        socket_height: 5.0,
        small_taper: 0.8,
        big_taper: 2.4,
        hole_offset: 13.0,
        lip_window: 10.0,
        seam: 0.1,
    };

    pub fn vertical_part(&self) -> f64 {
        self.socket_height - self.small_taper - self.big_taper
    }

    pub fn taper_width(&self) -> f64 {
        self.small_taper + self.big_taper
    }

    /// Clearance split over the diagonal of a 45° taper.
    pub fn axis_clearance(&self) -> f64 {
        self.clearance * std::f64::consts::SQRT_2 / 4.0
    }
}

impl Default for GridfinityStandard {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinParams {
    pub x_units: u32,
    pub y_units: u32,
    pub height_units: f64,
    /// Millimetres per height unit.
    pub height_unit: f64,
    pub wall_thickness: f64,
    pub with_magnet: bool,
    pub with_screw: bool,
    pub magnet_radius: f64,
    pub magnet_height: f64,
    pub screw_radius: f64,
    pub accessories: Vec<Accessory>,
}

impl BinParams {
    /// Plain bin with the usual wall and hole sizes and no pockets.
    pub fn new(x_units: u32, y_units: u32, height_units: f64) -> Self {
        Self {
            x_units,
            y_units,
            height_units,
            height_unit: 7.0,
            wall_thickness: 1.2,
            with_magnet: false,
            with_screw: false,
            magnet_radius: 3.25,
            magnet_height: 2.0,
            screw_radius: 1.5,
            accessories: Vec::new(),
        }
    }

    pub fn with_height_unit(mut self, height_unit: f64) -> Self {
        self.height_unit = height_unit;
        self
    }

    pub fn with_accessory(mut self, accessory: Accessory) -> Self {
        self.accessories.push(accessory);
        self
    }

    pub fn with_magnets(mut self) -> Self {
        self.with_magnet = true;
        self
    }

    pub fn with_screws(mut self) -> Self {
        self.with_screw = true;
        self
    }

    /// Wall height above the sockets.
    pub fn height_mm(&self) -> f64 {
        self.height_units * self.height_unit
    }

    /// Outline of the whole bin, shared by the body and the lip.
    pub fn footprint(&self, std: &GridfinityStandard) -> Profile {
        Profile::rounded_rectangle(
            Point2::origin(),
            self.x_units as f64 * std.cell_size - std.clearance,
            self.y_units as f64 * std.cell_size - std.clearance,
            std.corner_radius,
        )
    }

    pub fn interior_width(&self, std: &GridfinityStandard) -> f64 {
        self.x_units as f64 * std.cell_size - std.clearance - 2.0 * self.wall_thickness
    }

    pub fn interior_depth(&self, std: &GridfinityStandard) -> f64 {
        self.y_units as f64 * std.cell_size - std.clearance - 2.0 * self.wall_thickness
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridfinityPreset {
    /// Short 3 × 2 test bin.
    Test,
    Screwdriver,
    /// Two mirrored bars with alternating handle and shaft cradles.
    ScrewdriverDual,
    ShaverBox,
}

impl GridfinityPreset {
    pub fn params(&self) -> BinParams {
        match self {
            GridfinityPreset::Test => BinParams::new(3, 2, 0.5).with_height_unit(42.0),
            GridfinityPreset::Screwdriver => BinParams::new(2, 4, 6.0).with_accessory(Accessory::CradleBar(CradleBar {
                wall_offset: 35.0,
                from_back: false,
                width: 5.0,
                height: 10.0,
                cradles: vec![14.0; 4],
                layout: CradleLayout::Packed { gap: 2.0 },
            })),
            GridfinityPreset::ScrewdriverDual => {
                let bar = |from_back: bool, first: f64, second: f64| CradleBar {
                    wall_offset: 28.0,
                    from_back,
                    width: 15.0,
                    height: 9.0,
                    cradles: (0..5).map(|i| if i % 2 == 0 { first } else { second }).collect(),
                    layout: CradleLayout::Pitched { pitch: 15.0 },
                };
                BinParams::new(2, 4, 3.0)
                    .with_accessory(Accessory::CradleBar(bar(false, 15.0, 7.0)))
                    .with_accessory(Accessory::CradleBar(bar(true, 7.0, 15.0)))
            }
            GridfinityPreset::ShaverBox => BinParams::new(2, 3, 6.0).with_accessory(Accessory::WallCutout(WallCutout {
                width: 45.0,
                depth: 30.0,
                from_front: 5.0,
                corner_radius: 3.0,
            })),
        }
    }

    pub fn bin(&self) -> GridfinityBin {
        GridfinityBin::new(self.params())
    }
}

/// The bin template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridfinityBin {
    pub standard: GridfinityStandard,
    pub params: BinParams,
}

impl GridfinityBin {
    pub fn new(params: BinParams) -> Self {
        Self { standard: GridfinityStandard::STANDARD, params }
    }

    /// Body extruded to the rim and hollowed, open at the top.
    fn build_shell<K: Kernel>(&self, kernel: &K) -> Result<K::Solid, BuildError> {
        let height = self.params.height_mm();
        let body = Shape::extrude(kernel, &self.params.footprint(&self.standard), &Plane::xy(), height)
            .stage(Stage::ShellExtrude)?;
        let open = FaceFilter::new().in_plane(AxisPlane::xy(height));
        Ok(body.shell(self.params.wall_thickness, &open).stage(Stage::Shell)?.into_solid())
    }
}

impl Recipe for GridfinityBin {
    fn validate(&self) -> Result<(), BuildError> {
        let std = &self.standard;
        let p = &self.params;
        at_least("x_units", p.x_units, 1)?;
        at_least("y_units", p.y_units, 1)?;
        positive("height_units", p.height_units)?;
        positive("height_unit", p.height_unit)?;
        positive("wall_thickness", p.wall_thickness)?;
        less_than("wall_thickness", p.wall_thickness, std.corner_radius, "corner_radius")?;
        less_than("wall_thickness", p.wall_thickness, p.height_mm(), "wall height")?;
        if p.with_magnet {
            positive("magnet_radius", p.magnet_radius)?;
            positive("magnet_height", p.magnet_height)?;
            less_than("magnet_height", p.magnet_height, std.socket_height, "socket_height")?;
        }
        if p.with_screw {
            positive("screw_radius", p.screw_radius)?;
        }
        let hole_room = std.cell_size / 2.0 - std.hole_offset - std.taper_width();
        if p.with_magnet {
            less_than("magnet_radius", p.magnet_radius, hole_room, "room beside the hole")?;
        }
        if p.with_screw {
            less_than("screw_radius", p.screw_radius, hole_room, "room beside the hole")?;
        }
        for accessory in &p.accessories {
            accessory.validate(std, p)?;
        }
        Ok(())
    }

    fn construct<K: Kernel>(&self, kernel: &K) -> Result<K::Solid, BuildError> {
        let std = &self.standard;
        let p = &self.params;
        debug!(x = p.x_units, y = p.y_units, height = p.height_mm(), kernel = kernel.name(), "building gridfinity bin");

        let socket = socket::build_socket(kernel, std, p)?;
        let base = grid::tile(kernel, &socket, p.x_units, p.y_units, std.cell_size)?;
        let walls = accessories::fuse_bars(kernel, std, p, self.build_shell(kernel)?)?;
        let top = lip::build_lip(kernel, std, p)?;

        let bin = Shape::new(kernel, base)
            .fuse(&walls, FuseOptions::common_face())
            .stage(Stage::Assembly)?
            .fuse(&top, FuseOptions::common_face())
            .stage(Stage::Assembly)?
            .into_solid();
        accessories::cut_windows(kernel, std, p, bin)
    }

    fn parameters(&self) -> Parameters {
        let p = &self.params;
        let count = |pick: fn(&Accessory) -> bool| p.accessories.iter().filter(|a| pick(a)).count();
        Parameters::new()
            .with("x_units", p.x_units)
            .with("y_units", p.y_units)
            .with("height_units", p.height_units)
            .with("height_unit", p.height_unit)
            .with("wall_thickness", p.wall_thickness)
            .with("with_magnet", p.with_magnet)
            .with("with_screw", p.with_screw)
            .with("magnet_radius", p.magnet_radius)
            .with("magnet_height", p.magnet_height)
            .with("screw_radius", p.screw_radius)
            .with("cradle_bars", count(|a| matches!(a, Accessory::CradleBar(_))))
            .with("wall_cutouts", count(|a| matches!(a, Accessory::WallCutout(_))))
    }
}
