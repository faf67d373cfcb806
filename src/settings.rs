//! Tunable simulation parameters
//!
//! Persisted as a flat JSON file so a driver can tweak values between runs.
//! Every key is optional in the file; missing keys fall back field-wise to
//! the documented defaults via `#[serde(default)]`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// One immutable-per-step snapshot of every tunable constant, plus the
/// global explosion scale that multiplies most of them.
///
/// Invariant (caller responsibility): every `*_min` should not exceed its
/// `*_max`. Inverted ranges are not rejected; sampling resolves them to the
/// lower bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Global multiplier applied to speeds, lifetimes, and the shockwave
    pub explosion_scale: f32,

    // === Cloud phase ===
    /// Horizontal spread speed range once a particle blooms (units/s)
    pub cloud_spread_speed_min: f32,
    pub cloud_spread_speed_max: f32,
    /// Residual upward lift range at bloom (units/s)
    pub cloud_initial_lift_min: f32,
    pub cloud_initial_lift_max: f32,
    /// Horizontal damping factor (`v *= 1 - resistance * dt`)
    pub cloud_air_resistance: f32,
    /// Downward acceleration on bloomed particles (units/s²)
    pub cloud_gravity: f32,
    /// Extra particle life per unit of explosion scale above 1.0
    pub particle_life_multiplier: f32,

    // === Ground debris ===
    /// Launch speed range for debris (units/s)
    pub sand_speed_min: f32,
    pub sand_speed_max: f32,
    /// Fraction of standard gravity applied to debris
    pub sand_gravity_multiplier: f32,
    /// Lifespan range for a single debris trajectory (seconds)
    pub sand_life_min: f32,
    pub sand_life_max: f32,

    // === Rendering hint (consumed by the driver, not the physics) ===
    pub bomb_visual_scale: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            explosion_scale: 1.0,

            cloud_spread_speed_min: 0.5,
            cloud_spread_speed_max: 1.5,
            cloud_initial_lift_min: 0.1,
            cloud_initial_lift_max: 0.3,
            cloud_air_resistance: 0.02,
            cloud_gravity: 0.35,
            particle_life_multiplier: 2.0,

            sand_speed_min: 1.5,
            sand_speed_max: 3.0,
            sand_gravity_multiplier: 0.5,
            sand_life_min: 0.5,
            sand_life_max: 1.5,

            bomb_visual_scale: 0.5,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults on any
    /// failure. Unknown keys are ignored; missing keys keep their defaults.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {e}. Using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No settings file at {}. Using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save settings as pretty-printed JSON. Best-effort: failures are
    /// logged, never propagated.
    pub fn save(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("Failed to write {}: {e}", path.display());
                } else {
                    log::info!("Settings saved to {}", path.display());
                }
            }
            Err(e) => log::warn!("Failed to serialize settings: {e}"),
        }
    }
}
