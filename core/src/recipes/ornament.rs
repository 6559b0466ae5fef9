//! Flat Christmas ornament: a disc with a rounded hanging knob and a ribbon
//! hole through the knob.

use super::{cylinder, Recipe, CUTTER_OVERSHOOT};
use crate::error::{BuildError, Stage, StageExt};
use crate::geometry::Point2;
use crate::kernel::{Kernel, Plane, Shape};
use crate::params::{less_than, non_negative, positive, Parameters};
use crate::sketch::{Pen, Profile};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrnamentParams {
    pub circle_diameter: f64,
    pub thickness: f64,
    pub knob_width: f64,
    /// Knob height above the point where its sides meet the circle.
    pub knob_height: f64,
    pub roundover_radius: f64,
    pub hole_diameter: f64,
    /// Knob top to hole centre.
    pub hole_from_top: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrnamentPreset {
    ChristmasOrnament,
}

impl OrnamentPreset {
    pub fn params(&self) -> OrnamentParams {
        match self {
            OrnamentPreset::ChristmasOrnament => OrnamentParams {
                circle_diameter: 60.0,
                thickness: 3.0,
                knob_width: 12.0,
                knob_height: 10.0,
                roundover_radius: 3.0,
                hole_diameter: 4.0,
                hole_from_top: 5.0,
            },
        }
    }
}

impl OrnamentParams {
    /// Height at which the knob sides meet the circle.
    pub fn tangent_y(&self) -> f64 {
        let r = self.circle_diameter / 2.0;
        let hw = self.knob_width / 2.0;
        (r * r - hw * hw).sqrt()
    }

    pub fn knob_top(&self) -> f64 {
        self.tangent_y() + self.knob_height
    }

    pub fn hole_center(&self) -> Point2 {
        Point2::new(0.0, self.knob_top() - self.hole_from_top)
    }

    /// Outline traced clockwise from the right knob foot.
    pub fn outline(&self) -> Profile {
        let hw = self.knob_width / 2.0;
        let r = self.roundover_radius;
        let foot = self.tangent_y();
        let top = self.knob_top();

        Pen::start_at(Point2::new(hw, foot))
            .line_to(Point2::new(hw, top - r))
            .tangent_arc_to(Point2::new(hw - r, top))
            .line_to(Point2::new(-hw + r, top))
            .tangent_arc_to(Point2::new(-hw, top - r))
            .line_to(Point2::new(-hw, foot))
            .three_point_arc_to(Point2::new(0.0, -self.circle_diameter / 2.0), Point2::new(hw, foot))
            .close()
    }
}

impl Recipe for OrnamentParams {
    fn validate(&self) -> Result<(), BuildError> {
        positive("circle_diameter", self.circle_diameter)?;
        positive("thickness", self.thickness)?;
        positive("knob_width", self.knob_width)?;
        positive("knob_height", self.knob_height)?;
        positive("hole_diameter", self.hole_diameter)?;
        non_negative("roundover_radius", self.roundover_radius)?;
        less_than("knob_width", self.knob_width, self.circle_diameter, "circle_diameter")?;
        less_than("roundover_radius", self.roundover_radius, self.knob_height, "knob_height")?;
        if self.roundover_radius > self.knob_width / 2.0 {
            return Err(BuildError::invalid(
                "roundover_radius",
                format!("must not exceed half the knob width ({})", self.knob_width / 2.0),
            ));
        }
        less_than("hole_diameter", self.hole_diameter, self.knob_width, "knob_width")?;
        let hole_radius = self.hole_diameter / 2.0;
        if !(self.hole_from_top > hole_radius) {
            return Err(BuildError::invalid(
                "hole_from_top",
                format!("hole would break through the knob top, got {}", self.hole_from_top),
            ));
        }
        Ok(())
    }

    fn construct<K: Kernel>(&self, kernel: &K) -> Result<K::Solid, BuildError> {
        debug!(diameter = self.circle_diameter, "building ornament");
        let body = Shape::extrude(kernel, &self.outline(), &Plane::xy(), self.thickness).stage(Stage::Profile)?;
        let hole = cylinder(
            kernel,
            &Plane::xy().offset(-CUTTER_OVERSHOOT),
            self.hole_center(),
            self.hole_diameter / 2.0,
            self.thickness + 2.0 * CUTTER_OVERSHOOT,
        )
        .stage(Stage::Extrude)?;
        Ok(body.cut(&hole).stage(Stage::Cut)?.into_solid())
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .with("circle_diameter", self.circle_diameter)
            .with("thickness", self.thickness)
            .with("knob_width", self.knob_width)
            .with("knob_height", self.knob_height)
            .with("roundover_radius", self.roundover_radius)
            .with("hole_diameter", self.hole_diameter)
            .with("hole_from_top", self.hole_from_top)
    }
}
