//! Mushroom Cloud - an explosion-plume particle simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, pools, activation, stepping)
//! - `settings`: Tunable physics parameters with JSON persistence
//!
//! Rendering, input, and GUI are external collaborators: a driver feeds
//! `step` a time delta and a settings snapshot and reads entity state back
//! through the query views on [`sim::SimState`].

pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec3;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Height of the ground plane (world Y)
    pub const GROUND_LEVEL: f32 = -0.6;

    /// Bomb drop height and constant descent speed
    pub const BOMB_START_HEIGHT: f32 = 1.2;
    pub const BOMB_FALL_SPEED: f32 = 1.0;

    /// Pool capacities, fixed at construction and never resized
    pub const NUM_CLOUD_PARTICLES: usize = 300;
    pub const NUM_GROUND_PARTICLES: usize = 200;

    /// Cloud particles retire this far below ground level
    pub const CLOUD_GROUND_TOLERANCE: f32 = 0.2;
    /// Ground debris recycles this far below ground level
    pub const DEBRIS_GROUND_TOLERANCE: f32 = 0.1;

    /// Upward deceleration of the stem jet (units/s², scaled by explosion scale)
    pub const STEM_DECELERATION: f32 = 0.8;
    /// Vertical speed at which a stem particle blooms into the cloud phase
    pub const STEM_BLOOM_THRESHOLD: f32 = 0.01;

    /// Shockwave ring growth rate (units/s per unit of scale)
    pub const SHOCKWAVE_GROWTH_RATE: f32 = 1.5;
    /// Ring expires past this radius times the explosion scale
    pub const SHOCKWAVE_MAX_RADIUS: f32 = 6.0;

    /// Baseline gravity for ground debris (before multiplier and scale)
    pub const DEBRIS_BASE_GRAVITY: f32 = 9.8;
}

/// Horizontal (x, z) velocity components for a planar heading
#[inline]
pub fn planar_velocity(speed: f32, heading: f32) -> (f32, f32) {
    (speed * heading.cos(), speed * heading.sin())
}

/// Launch velocity for a ballistic particle: `heading` is the horizontal
/// direction, `elevation` the angle from the vertical axis.
#[inline]
pub fn launch_velocity(speed: f32, heading: f32, elevation: f32) -> Vec3 {
    Vec3::new(
        speed * heading.cos() * elevation.sin(),
        speed * elevation.cos(),
        speed * heading.sin() * elevation.sin(),
    )
}
