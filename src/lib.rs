mod boundary;
mod config;
mod error;
mod fluid_sim;
mod grid;
mod heat;
mod level_set;
pub mod present;
mod relax;
pub mod stages;
mod vec2;

pub use boundary::enforce_boundary;
pub use config::SimConfig;
pub use error::{Result, SimError};
pub use fluid_sim::FluidSim;
pub use grid::{BoundaryKind, Grid2};
pub use heat::{GrowthLaw, HeatConfig, HeatZone};
pub use level_set::{polygon_area, LevelSet};
pub use relax::{relax, relax_variable};
pub use vec2::Vec2;
