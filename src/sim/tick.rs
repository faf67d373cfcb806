//! Simulation stepping and the explosion trigger
//!
//! Core loop that advances the whole scene deterministically. The driver
//! owns the clock: it calls [`step`] once per frame with an elapsed-time
//! delta and the current settings snapshot, then reads entity state back
//! through the views on [`SimState`].

use super::state::SimState;
use crate::settings::Settings;

/// Advance the whole simulation by one timestep.
///
/// Order within a step: bomb descent, explosion-edge detection and one-shot
/// pool activation, then ring and pool updates. Newly activated members are
/// integrated in the same step that activated them.
///
/// `dt` is expected to be non-negative and finite; negative values are
/// clamped to zero. A pathologically large `dt` can overshoot ground level
/// before clamping and is not defended against.
pub fn step(state: &mut SimState, settings: &Settings, dt: f32) {
    let dt = dt.max(0.0);

    // Re-arm the one-shot latches whenever the bomb is airborne, so a reset
    // or a fresh drop triggers a new activation sweep on impact.
    if !state.bomb.exploded {
        state.cloud_activated = false;
        state.debris_activated = false;
    }

    state.bomb.update(dt);

    if state.bomb.exploded {
        if !state.cloud_activated {
            state.shockwave.start(settings.explosion_scale);
            for p in &mut state.cloud {
                p.activate(settings, &mut state.rng);
            }
            state.cloud_activated = true;
        }
        if !state.debris_activated {
            for p in &mut state.debris {
                p.activate(settings, &mut state.rng);
            }
            state.debris_activated = true;
        }
    }

    state.shockwave.update(dt);
    for p in &mut state.cloud {
        p.update(dt, settings, &mut state.rng);
    }
    for p in &mut state.debris {
        p.update(dt, settings, &mut state.rng);
    }
}

/// Return every entity to its dormant state and re-arm the activation
/// latches. Used for an explicit reset action and for settings changes that
/// should restart the scenario. Idempotent apart from fresh random resting
/// poses.
pub fn reset_all(state: &mut SimState, settings: &Settings) {
    state.bomb.reset();
    state.shockwave.reset();
    for p in &mut state.cloud {
        p.reset(settings, &mut state.rng);
    }
    for p in &mut state.debris {
        p.active = false;
        p.reset(settings, &mut state.rng);
    }
    state.cloud_activated = false;
    state.debris_activated = false;
}
