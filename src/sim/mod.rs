//! Deterministic simulation module
//!
//! All plume logic lives here. This module must be pure and deterministic:
//! - Externally supplied timestep only
//! - Seeded RNG only, threaded through the `UniformRange` seam
//! - No rendering or platform dependencies
//!
//! The step function is total over valid state: no I/O, no allocation after
//! pool construction, no panics.

pub mod rng;
pub mod state;
pub mod tick;

pub use rng::UniformRange;
pub use state::{Bomb, CloudParticle, CloudPhase, GroundParticle, Shockwave, SimState};
pub use tick::{reset_all, step};
