//! Mushroom Cloud entry point
//!
//! Headless demo driver: loads settings, drops the bomb, and steps the
//! simulation at a fixed 60 Hz, logging the milestones a renderer would
//! otherwise visualize. Rendering/GUI frontends drive the same `step` and
//! `reset_all` calls with their own clock.

use std::path::Path;

use mushroom_cloud::Settings;
use mushroom_cloud::consts::SIM_DT;
use mushroom_cloud::sim::{SimState, reset_all, step};

const SETTINGS_PATH: &str = "settings.json";

fn main() {
    env_logger::init();
    log::info!("Mushroom Cloud starting...");

    let settings = Settings::load(Path::new(SETTINGS_PATH));
    log::info!(
        "explosion_scale = {:.2}, cloud spread = {:.2}..{:.2}, sand speed = {:.2}..{:.2}",
        settings.explosion_scale,
        settings.cloud_spread_speed_min,
        settings.cloud_spread_speed_max,
        settings.sand_speed_min,
        settings.sand_speed_max,
    );

    let seed = std::time::UNIX_EPOCH
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut state = SimState::new(seed, &settings);
    log::info!("Seed {seed}: bomb dropped from y = {:.2}", state.bomb.pos.y);

    // Play one explosion through: drop, impact, bloom, dissipation
    let mut exploded_logged = false;
    let total_steps = (12.0 / SIM_DT) as usize;
    for tick in 0..total_steps {
        step(&mut state, &settings, SIM_DT);

        if state.bomb.exploded && !exploded_logged {
            exploded_logged = true;
            log::info!(
                "Impact at t = {:.2}s: shockwave started, {} cloud + {} debris particles live",
                tick as f32 * SIM_DT,
                state.active_cloud().count(),
                state.active_debris().count(),
            );
        }

        // Once-a-second status line
        if tick % (1.0 / SIM_DT) as usize == 0 {
            log::debug!(
                "t = {:4.1}s  bomb y = {:+.2}  ring r = {:.2} ({})  cloud {}  debris {}",
                tick as f32 * SIM_DT,
                state.bomb.pos.y,
                state.shockwave.radius,
                if state.shockwave.active { "live" } else { "done" },
                state.active_cloud().count(),
                state.active_debris().count(),
            );
        }
    }

    log::info!(
        "After 12s: ring {}, {} cloud particles settled out, {} debris still spraying",
        if state.shockwave.active { "still live" } else { "expired" },
        state.cloud.len() - state.active_cloud().count(),
        state.active_debris().count(),
    );

    // Demonstrate the reset protocol and persist the settings back out
    reset_all(&mut state, &settings);
    log::info!(
        "Reset: bomb re-armed at y = {:.2}, everything dormant",
        state.bomb.pos.y
    );
    settings.save(Path::new(SETTINGS_PATH));
}
