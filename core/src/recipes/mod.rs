//! Parametric part recipes.
//!
//! A recipe is a typed parameter record plus a pure composition of kernel
//! operations. `validate` checks every numeric precondition up front so that
//! `construct` only ever sees layouts the kernel can build.

pub mod gridfinity;
pub mod hexagon;
pub mod ornament;
pub mod ring;
pub mod strap;


pub use gridfinity::{Accessory, BinParams, CradleBar, GridfinityBin, GridfinityPreset, GridfinityStandard, WallCutout};
pub use hexagon::{HexagonOutline, HexagonParams, HexagonPreset};
pub use ornament::{OrnamentParams, OrnamentPreset};
pub use ring::{RingParams, RingPreset};
pub use strap::{StrapParams, StrapPreset};

use crate::error::BuildError;
use crate::geometry::Point2;
use crate::kernel::{Kernel, KernelResult, Plane};
use crate::params::Parameters;
use crate::sketch::Profile;

/// How far cutting tools reach past the faces they cut through, so no
/// boolean ever meets a coplanar face.
pub const CUTTER_OVERSHOOT: f64 = 1.0;

pub trait Recipe {
    /// Reject impossible layouts before any kernel call.
    fn validate(&self) -> Result<(), BuildError>;

    /// Compose the solid. Assumes `validate` passed.
    fn construct<K: Kernel>(&self, kernel: &K) -> Result<K::Solid, BuildError>;

    /// Flat listing of the record, for model summaries.
    fn parameters(&self) -> Parameters;

    fn build<K: Kernel>(&self, kernel: &K) -> Result<K::Solid, BuildError> {
        self.validate()?;
        self.construct(kernel)
    }
}

/// Cylinder of `height` standing on `plane` at `center`.
pub(crate) fn cylinder<K: Kernel>(
    kernel: &K,
    plane: &Plane,
    center: Point2,
    radius: f64,
    height: f64,
) -> KernelResult<K::Solid> {
    kernel.extrude(&Profile::circle(center, radius), plane, height)
}
