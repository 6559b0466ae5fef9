//! Flat six-sided plates.

use super::Recipe;
use crate::error::{BuildError, Stage, StageExt};
use crate::geometry::Point2;
use crate::kernel::{Kernel, Plane};
use crate::params::{positive, Parameters};
use crate::sketch::Profile;
use serde::{Deserialize, Serialize};
use tracing::debug;

const SIN_60: f64 = 0.866_025_403_784_438_6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum HexagonOutline {
    /// Rectangle `width × height` with a point pushed out `peak` from the
    /// middle of each short side.
    Kite { width: f64, height: f64, peak: f64 },
    /// Every interior angle 120°; two long sides top and bottom, four short
    /// sides.
    Equiangular { long_side: f64, short_side: f64 },
}

impl HexagonOutline {
    /// Corners counter-clockwise from the bottom left.
    pub fn corners(&self) -> [Point2; 6] {
        match *self {
            HexagonOutline::Kite { width, height, peak } => {
                let hw = width / 2.0;
                [
                    Point2::new(-hw, 0.0),
                    Point2::new(hw, 0.0),
                    Point2::new(hw + peak, height / 2.0),
                    Point2::new(hw, height),
                    Point2::new(-hw, height),
                    Point2::new(-hw - peak, height / 2.0),
                ]
            }
            HexagonOutline::Equiangular { long_side, short_side } => {
                let hl = long_side / 2.0;
                let rise = short_side * SIN_60;
                let reach = hl + short_side / 2.0;
                [
                    Point2::new(-hl, 0.0),
                    Point2::new(hl, 0.0),
                    Point2::new(reach, rise),
                    Point2::new(hl, 2.0 * rise),
                    Point2::new(-hl, 2.0 * rise),
                    Point2::new(-reach, rise),
                ]
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HexagonParams {
    pub outline: HexagonOutline,
    pub thickness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HexagonPreset {
    Hexagon,
    HexagonEquiangular,
}

impl HexagonPreset {
    pub fn params(&self) -> HexagonParams {
        match self {
            HexagonPreset::Hexagon => HexagonParams {
                outline: HexagonOutline::Kite { width: 120.0, height: 60.0, peak: 30.0 },
                thickness: 1.0,
            },
            HexagonPreset::HexagonEquiangular => HexagonParams {
                outline: HexagonOutline::Equiangular { long_side: 120.0, short_side: 42.43 },
                thickness: 2.0,
            },
        }
    }
}

impl Recipe for HexagonParams {
    fn validate(&self) -> Result<(), BuildError> {
        match self.outline {
            HexagonOutline::Kite { width, height, peak } => {
                positive("width", width)?;
                positive("height", height)?;
                positive("peak", peak)?;
            }
            HexagonOutline::Equiangular { long_side, short_side } => {
                positive("long_side", long_side)?;
                positive("short_side", short_side)?;
            }
        }
        positive("thickness", self.thickness)?;
        Ok(())
    }

    fn construct<K: Kernel>(&self, kernel: &K) -> Result<K::Solid, BuildError> {
        debug!(outline = ?self.outline, "building hexagon plate");
        let profile = Profile::polygon(&self.outline.corners());
        kernel.extrude(&profile, &Plane::xy(), self.thickness).stage(Stage::Extrude)
    }

    fn parameters(&self) -> Parameters {
        let params = Parameters::new().with("thickness", self.thickness);
        match self.outline {
            HexagonOutline::Kite { width, height, peak } => {
                params.with("width", width).with("height", height).with("peak", peak)
            }
            HexagonOutline::Equiangular { long_side, short_side } => {
                params.with("long_side", long_side).with("short_side", short_side)
            }
        }
    }
}
