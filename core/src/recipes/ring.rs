//! Vent ring: a thin annulus that press-fits into a round vent opening.

use super::{cylinder, Recipe, CUTTER_OVERSHOOT};
use crate::error::{BuildError, Stage, StageExt};
use crate::geometry::Point2;
use crate::kernel::{Kernel, Plane, Shape};
use crate::params::{less_than, positive, Parameters};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingParams {
    pub outer_diameter: f64,
    pub inner_diameter: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RingPreset {
    VentRing,
    /// Slightly smaller outside for a tighter fit.
    VentRingSnug,
}

impl RingPreset {
    pub fn params(&self) -> RingParams {
        match self {
            RingPreset::VentRing => RingParams { outer_diameter: 48.2, inner_diameter: 46.4, height: 5.0 },
            RingPreset::VentRingSnug => RingParams { outer_diameter: 47.9, inner_diameter: 46.1, height: 5.0 },
        }
    }
}

impl RingParams {
    pub fn wall(&self) -> f64 {
        (self.outer_diameter - self.inner_diameter) / 2.0
    }
}

impl Recipe for RingParams {
    fn validate(&self) -> Result<(), BuildError> {
        positive("outer_diameter", self.outer_diameter)?;
        positive("inner_diameter", self.inner_diameter)?;
        positive("height", self.height)?;
        less_than("inner_diameter", self.inner_diameter, self.outer_diameter, "outer_diameter")?;
        Ok(())
    }

    fn construct<K: Kernel>(&self, kernel: &K) -> Result<K::Solid, BuildError> {
        debug!(outer = self.outer_diameter, inner = self.inner_diameter, "building ring");
        let outer = cylinder(kernel, &Plane::xy(), Point2::origin(), self.outer_diameter / 2.0, self.height)
            .stage(Stage::Extrude)?;
        let bore = cylinder(
            kernel,
            &Plane::xy().offset(-CUTTER_OVERSHOOT),
            Point2::origin(),
            self.inner_diameter / 2.0,
            self.height + 2.0 * CUTTER_OVERSHOOT,
        )
        .stage(Stage::Extrude)?;

        Ok(Shape::new(kernel, outer).cut(&bore).stage(Stage::Cut)?.into_solid())
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .with("outer_diameter", self.outer_diameter)
            .with("inner_diameter", self.inner_diameter)
            .with("height", self.height)
    }
}
