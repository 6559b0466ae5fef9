//! DuPont strap: a thin sleeve holding a row of single-pin DuPont housings.
//!
//! Slots run along Y at a pitch of `pin_size + tolerance`. A plugged slot is
//! left solid; each run of neighbouring open slots is cut as one cavity.

use super::{Recipe, CUTTER_OVERSHOOT};
use crate::error::{BuildError, Stage, StageExt};
use crate::geometry::Point2;
use crate::kernel::{Kernel, Plane, Shape};
use crate::params::{at_least, non_negative, positive, Parameters};
use crate::sketch::Profile;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrapParams {
    pub pin_count: u32,
    pub pin_size: f64,
    pub tolerance: f64,
    pub thickness: f64,
    pub height: f64,
    /// One flag per slot.
    pub plugged: Vec<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrapPreset {
    DupontStrap,
}

impl StrapPreset {
    pub fn params(&self) -> StrapParams {
        match self {
            StrapPreset::DupontStrap => StrapParams::open(7, 2.6, 0.1, 0.8, 9.0),
        }
    }
}

impl StrapParams {
    /// Strap with every slot open.
    pub fn open(pin_count: u32, pin_size: f64, tolerance: f64, thickness: f64, height: f64) -> Self {
        Self {
            pin_count,
            pin_size,
            tolerance,
            thickness,
            height,
            plugged: vec![false; pin_count as usize],
        }
    }

    pub fn with_plugged(mut self, slot: usize) -> Self {
        if let Some(flag) = self.plugged.get_mut(slot) {
            *flag = true;
        }
        self
    }

    pub fn pitch(&self) -> f64 {
        self.pin_size + self.tolerance
    }

    /// Outside extent along X.
    pub fn width(&self) -> f64 {
        self.pitch() + 2.0 * self.thickness
    }

    /// Outside extent along Y.
    pub fn length(&self) -> f64 {
        self.pin_count as f64 * self.pitch() + 2.0 * self.thickness
    }

    /// Centre of slot `i` along Y.
    pub fn slot_center(&self, i: usize) -> f64 {
        let n = self.pin_count as f64;
        -n * self.pitch() / 2.0 + (i as f64 + 0.5) * self.pitch()
    }

    /// Maximal runs of consecutive open slots.
    pub fn open_runs(&self) -> Vec<Range<usize>> {
        let mut runs = Vec::new();
        let mut start = None;
        for (i, plugged) in self.plugged.iter().enumerate() {
            match (plugged, start) {
                (false, None) => start = Some(i),
                (true, Some(s)) => {
                    runs.push(s..i);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push(s..self.plugged.len());
        }
        runs
    }
}

impl Recipe for StrapParams {
    fn validate(&self) -> Result<(), BuildError> {
        at_least("pin_count", self.pin_count, 1)?;
        positive("pin_size", self.pin_size)?;
        non_negative("tolerance", self.tolerance)?;
        positive("thickness", self.thickness)?;
        positive("height", self.height)?;
        if self.plugged.len() != self.pin_count as usize {
            return Err(BuildError::invalid(
                "plugged",
                format!("expected {} flags, got {}", self.pin_count, self.plugged.len()),
            ));
        }
        Ok(())
    }

    fn construct<K: Kernel>(&self, kernel: &K) -> Result<K::Solid, BuildError> {
        let outer = Profile::rectangle(Point2::origin(), self.width(), self.length());
        let mut strap = Shape::extrude(kernel, &outer, &Plane::xy(), self.height).stage(Stage::Extrude)?;

        let runs = self.open_runs();
        debug!(slots = self.pin_count, cavities = runs.len(), "building strap");

        let cutter_plane = Plane::xy().offset(-CUTTER_OVERSHOOT);
        let cutter_height = self.height + 2.0 * CUTTER_OVERSHOOT;
        for run in runs {
            let y0 = self.slot_center(run.start) - self.pitch() / 2.0;
            let y1 = self.slot_center(run.end - 1) + self.pitch() / 2.0;
            let cavity = Profile::rectangle(Point2::new(0.0, (y0 + y1) / 2.0), self.pitch(), y1 - y0);
            let tool = kernel.extrude(&cavity, &cutter_plane, cutter_height).stage(Stage::Extrude)?;
            strap = strap.cut(&tool).stage(Stage::Cut)?;
        }
        Ok(strap.into_solid())
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .with("pin_count", self.pin_count)
            .with("pin_size", self.pin_size)
            .with("tolerance", self.tolerance)
            .with("thickness", self.thickness)
            .with("height", self.height)
            .with("plugged", self.plugged.clone())
    }
}
