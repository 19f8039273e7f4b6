//! Horde Cull - population control for live mob worlds

pub mod core;
pub mod cull;
pub mod entity;
pub mod pass;
pub mod world;

pub use crate::core::{CullConfig, CullError, Result};
pub use crate::pass::{Culler, PassOutcome, PassType, RunStatistics};
pub use crate::world::{MobWorld, SimulatedWorld};
