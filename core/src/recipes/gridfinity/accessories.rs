//! Optional bin furniture.
//!
//! Cradle bars stand in the bin floor and are fused onto the shelled walls
//! before assembly. Wall cutouts are cut from the assembled bin so they also
//! pass through the lip.

use super::{BinParams, GridfinityStandard};
use crate::error::{BuildError, Stage, StageExt};
use crate::geometry::{Point2, Point3};
use crate::kernel::{FuseOptions, Kernel, Plane, Shape};
use crate::params::{non_negative, positive};
use crate::recipes::{cylinder, CUTTER_OVERSHOOT};
use crate::sketch::Profile;
use serde::{Deserialize, Serialize};

/// Corner radius of cradle bars.
const BAR_CORNER_RADIUS: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Accessory {
    CradleBar(CradleBar),
    WallCutout(WallCutout),
}

/// How cradle centres are spread along the bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CradleLayout {
    /// Cradles packed edge to edge with `gap` between them, centred as a
    /// group.
    Packed { gap: f64 },
    /// Cradle centres a fixed `pitch` apart, centred on the bar.
    Pitched { pitch: f64 },
}

/// Bar spanning the interior width with round cradles cut into its top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CradleBar {
    /// Interior wall to the near face of the bar.
    pub wall_offset: f64,
    /// Measure `wall_offset` from the back (+Y) wall instead of the front.
    pub from_back: bool,
    pub width: f64,
    pub height: f64,
    /// Cradle diameters, left to right.
    pub cradles: Vec<f64>,
    pub layout: CradleLayout,
}

/// Rounded window through both side walls, hanging from the rim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallCutout {
    pub width: f64,
    /// Rim down to the bottom of the window.
    pub depth: f64,
    /// Front (−Y) outer face to the window.
    pub from_front: f64,
    pub corner_radius: f64,
}

impl Accessory {
    pub fn validate(&self, std: &GridfinityStandard, params: &BinParams) -> Result<(), BuildError> {
        match self {
            Accessory::CradleBar(bar) => bar.validate(std, params),
            Accessory::WallCutout(cutout) => cutout.validate(std, params),
        }
    }
}

impl CradleBar {
    /// Bar centre along Y.
    pub fn center_y(&self, std: &GridfinityStandard, params: &BinParams) -> f64 {
        let half_depth = params.interior_depth(std) / 2.0;
        let near = half_depth - self.wall_offset - self.width / 2.0;
        if self.from_back { near } else { -near }
    }

    /// Cradle centres along X, in the order of `cradles`.
    pub fn cradle_centers(&self) -> Vec<f64> {
        match self.layout {
            CradleLayout::Packed { gap } => {
                let total: f64 = self.cradles.iter().sum::<f64>() + gap * self.cradles.len().saturating_sub(1) as f64;
                let mut left = -total / 2.0;
                self.cradles
                    .iter()
                    .map(|d| {
                        let center = left + d / 2.0;
                        left += d + gap;
                        center
                    })
                    .collect()
            }
            CradleLayout::Pitched { pitch } => {
                let span = self.cradles.len().saturating_sub(1) as f64 * pitch;
                (0..self.cradles.len()).map(|i| -span / 2.0 + i as f64 * pitch).collect()
            }
        }
    }

    fn validate(&self, std: &GridfinityStandard, params: &BinParams) -> Result<(), BuildError> {
        non_negative("bar.wall_offset", self.wall_offset)?;
        positive("bar.width", self.width)?;
        positive("bar.height", self.height)?;
        for d in &self.cradles {
            positive("bar.cradles", *d)?;
        }
        match self.layout {
            CradleLayout::Packed { gap } => {
                non_negative("bar.gap", gap)?;
            }
            CradleLayout::Pitched { pitch } => {
                positive("bar.pitch", pitch)?;
            }
        }

        let depth = params.interior_depth(std);
        if self.wall_offset + self.width > depth {
            return Err(BuildError::invalid(
                "bar.wall_offset",
                format!("bar ends {} mm from the wall, interior depth is {}", self.wall_offset + self.width, depth),
            ));
        }
        let half_width = params.interior_width(std) / 2.0;
        let overhang = self
            .cradle_centers()
            .iter()
            .zip(&self.cradles)
            .any(|(x, d)| x.abs() + d / 2.0 > half_width);
        if overhang {
            return Err(BuildError::invalid("bar.cradles", format!("cradles do not fit in {} mm", 2.0 * half_width)));
        }
        if self.height >= params.height_mm() {
            return Err(BuildError::invalid("bar.height", "bar would stand above the rim"));
        }
        if self.height <= params.wall_thickness {
            return Err(BuildError::invalid("bar.height", "bar would not rise above the floor"));
        }
        Ok(())
    }

    pub fn build<K: Kernel>(
        &self,
        kernel: &K,
        std: &GridfinityStandard,
        params: &BinParams,
    ) -> Result<K::Solid, BuildError> {
        let y = self.center_y(std, params);
        // ends and foot reach half a wall into the body they are fused to
        let sink = params.wall_thickness / 2.0;
        let outline = Profile::rounded_rectangle(
            Point2::new(0.0, y),
            params.interior_width(std) + 2.0 * sink,
            self.width,
            BAR_CORNER_RADIUS,
        );
        let foot = Plane::xy().offset(sink);
        let mut bar = Shape::extrude(kernel, &outline, &foot, self.height - sink).stage(Stage::Accessories)?;

        // Cradle axes run along Y through the top edge of the bar.
        let length = 2.0 * self.width;
        let plane = Plane::xz().with_origin(Point3::new(0.0, y + length / 2.0, 0.0));
        for (x, d) in self.cradle_centers().into_iter().zip(&self.cradles) {
            let tool = cylinder(kernel, &plane, Point2::new(x, self.height), d / 2.0, length)
                .stage(Stage::Accessories)?;
            bar = bar.cut(&tool).stage(Stage::Accessories)?;
        }
        Ok(bar.into_solid())
    }
}

impl WallCutout {
    /// Height of the cutting window; it reaches one millimetre above the rim.
    pub fn window_height(&self) -> f64 {
        self.depth + 1.0
    }

    /// Window centre as (Y, Z).
    pub fn center(&self, std: &GridfinityStandard, params: &BinParams) -> Point2 {
        let bin_depth = params.y_units as f64 * std.cell_size - std.clearance;
        Point2::new(
            -bin_depth / 2.0 + self.from_front + self.width / 2.0,
            params.height_mm() - self.window_height() / 2.0 + 0.5,
        )
    }

    fn validate(&self, std: &GridfinityStandard, params: &BinParams) -> Result<(), BuildError> {
        positive("cutout.width", self.width)?;
        positive("cutout.depth", self.depth)?;
        non_negative("cutout.from_front", self.from_front)?;
        non_negative("cutout.corner_radius", self.corner_radius)?;

        let bin_depth = params.y_units as f64 * std.cell_size - std.clearance;
        if self.from_front + self.width > bin_depth {
            return Err(BuildError::invalid(
                "cutout.width",
                format!("window runs past the back wall ({} mm deep)", bin_depth),
            ));
        }
        if self.depth >= params.height_mm() - params.wall_thickness {
            return Err(BuildError::invalid("cutout.depth", "window would reach the bin floor"));
        }
        Ok(())
    }

    pub fn build<K: Kernel>(
        &self,
        kernel: &K,
        std: &GridfinityStandard,
        params: &BinParams,
    ) -> Result<K::Solid, BuildError> {
        let span = params.x_units as f64 * std.cell_size + 2.0 * CUTTER_OVERSHOOT;
        let outline = Profile::rounded_rectangle(
            self.center(std, params),
            self.width,
            self.window_height(),
            self.corner_radius,
        );
        let plane = Plane::yz().offset(-span / 2.0);
        kernel.extrude(&outline, &plane, span).stage(Stage::Accessories)
    }
}

/// Fuse every cradle bar onto the shelled walls.
pub fn fuse_bars<K: Kernel>(
    kernel: &K,
    std: &GridfinityStandard,
    params: &BinParams,
    walls: K::Solid,
) -> Result<K::Solid, BuildError> {
    let mut walls = Shape::new(kernel, walls);
    for accessory in &params.accessories {
        if let Accessory::CradleBar(bar) = accessory {
            let solid = bar.build(kernel, std, params)?;
            walls = walls.fuse(&solid, FuseOptions::default()).stage(Stage::Accessories)?;
        }
    }
    Ok(walls.into_solid())
}

/// Cut every wall cutout from the assembled bin.
pub fn cut_windows<K: Kernel>(
    kernel: &K,
    std: &GridfinityStandard,
    params: &BinParams,
    bin: K::Solid,
) -> Result<K::Solid, BuildError> {
    let mut bin = Shape::new(kernel, bin);
    for accessory in &params.accessories {
        if let Accessory::WallCutout(cutout) = accessory {
            let tool = cutout.build(kernel, std, params)?;
            bin = bin.cut(&tool).stage(Stage::Accessories)?;
        }
    }
    Ok(bin.into_solid())
}
