pub mod geometry;
pub mod sketch;
pub mod kernel;
pub mod selection;
pub mod params;
pub mod error;
pub mod recipes;
pub mod registry;
pub mod dispatch;

pub use dispatch::{Dispatcher, StlOptions};
pub use error::{BuildError, Stage};
pub use registry::{ModelDescriptor, ModelSummary, Registry};
