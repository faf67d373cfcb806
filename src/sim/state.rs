//! Simulation entities and the pool-owning controller state
//!
//! Each entity is a small state machine over plain `f32` kinematics. Nothing
//! here references another entity; cross-entity coordination (the explosion
//! trigger) lives in [`super::tick`].

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rng::UniformRange;
use crate::consts::*;
use crate::settings::Settings;
use crate::{launch_velocity, planar_velocity};

/// The dropped bomb: falls at constant speed, explodes on ground contact.
///
/// `exploded` is monotonic (false -> true only) until an explicit `reset`.
/// Once set, `pos.y` stays clamped to ground level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub pos: Vec3,
    pub speed: f32,
    pub exploded: bool,
}

impl Default for Bomb {
    fn default() -> Self {
        Self {
            pos: Vec3::new(0.0, BOMB_START_HEIGHT, 0.0),
            speed: BOMB_FALL_SPEED,
            exploded: false,
        }
    }
}

impl Bomb {
    pub fn update(&mut self, dt: f32) {
        if self.exploded {
            return;
        }
        self.pos.y -= self.speed * dt;
        if self.pos.y <= GROUND_LEVEL {
            self.pos.y = GROUND_LEVEL;
            self.exploded = true;
        }
    }

    pub fn reset(&mut self) {
        self.pos = Vec3::new(0.0, BOMB_START_HEIGHT, 0.0);
        self.exploded = false;
    }
}

/// Flight phase of a cloud particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloudPhase {
    /// Fast narrow jet rising from the blast point
    Stem,
    /// Slow-spreading billow after the jet stalls
    Cloud,
}

/// One member of the mushroom-cloud pool.
///
/// Activation-gated: once `update` retires it (life expiry or ground
/// contact), only the next pool-wide activation revives it. The two-phase
/// Stem -> Cloud model approximates a thermal plume without fluid dynamics;
/// the phase never transitions backward within one activation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudParticle {
    pub pos: Vec3,
    pub vel: Vec3,
    pub phase: CloudPhase,
    pub active: bool,
    pub size: f32,
    pub life: f32,
    pub age: f32,
    pub explosion_scale: f32,
}

impl CloudParticle {
    pub fn new(settings: &Settings, rng: &mut impl UniformRange) -> Self {
        let mut p = Self {
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            phase: CloudPhase::Stem,
            active: false,
            size: 0.0,
            life: 0.0,
            age: 0.0,
            explosion_scale: settings.explosion_scale,
        };
        p.reset(settings, rng);
        p
    }

    /// Dormant resting pose: a loose stem draw with `active = false`.
    pub fn reset(&mut self, settings: &Settings, rng: &mut impl UniformRange) {
        let scale = settings.explosion_scale;
        self.explosion_scale = scale;
        self.phase = CloudPhase::Stem;
        self.pos = Vec3::new(0.0, GROUND_LEVEL, 0.0);

        let heading = rng.uniform(0.0, std::f32::consts::TAU);
        let jitter = rng.uniform(0.0, 0.2) * scale;
        let (vx, vz) = planar_velocity(jitter, heading);
        let vy = rng.uniform(1.0, 1.3) * scale;
        self.vel = Vec3::new(vx, vy, vz);

        self.size = rng.uniform(12.0, 20.0);
        self.life = 1.5 + (scale - 1.0) * (settings.particle_life_multiplier / 2.0);
        self.age = 0.0;
        self.active = false;
    }

    /// Live launch: tighter jet, faster rise, longer life, `active = true`.
    pub fn activate(&mut self, settings: &Settings, rng: &mut impl UniformRange) {
        let scale = settings.explosion_scale;
        self.explosion_scale = scale;
        self.phase = CloudPhase::Stem;
        self.pos = Vec3::new(0.0, GROUND_LEVEL, 0.0);

        let heading = rng.uniform(0.0, std::f32::consts::TAU);
        let jitter = rng.uniform(0.005, 0.02) * scale;
        let (vx, vz) = planar_velocity(jitter, heading);
        let vy = rng.uniform(1.5, 2.0) * scale;
        self.vel = Vec3::new(vx, vy, vz);

        self.size = rng.uniform(12.0, 20.0);
        self.life = 4.0 + (scale - 1.0) * settings.particle_life_multiplier;
        self.age = 0.0;
        self.active = true;
    }

    pub fn update(&mut self, dt: f32, settings: &Settings, rng: &mut impl UniformRange) {
        if !self.active {
            return;
        }
        self.age += dt;

        match self.phase {
            CloudPhase::Stem => {
                self.pos += self.vel * dt;
                self.vel.y -= STEM_DECELERATION * dt * self.explosion_scale;
                if self.vel.y <= STEM_BLOOM_THRESHOLD * self.explosion_scale {
                    self.bloom(settings, rng);
                }
            }
            CloudPhase::Cloud => {
                self.pos += self.vel * dt;
                self.vel.y -= settings.cloud_gravity * dt * self.explosion_scale;
                let damping = 1.0 - settings.cloud_air_resistance * dt;
                self.vel.x *= damping;
                self.vel.z *= damping;
            }
        }

        self.life -= dt;
        if self.life <= 0.0 || self.pos.y < GROUND_LEVEL - CLOUD_GROUND_TOLERANCE {
            self.active = false;
        }
    }

    /// The one Stem -> Cloud transition: the stalled jet redraws its
    /// velocity as a slow radial spread with residual lift.
    fn bloom(&mut self, settings: &Settings, rng: &mut impl UniformRange) {
        self.phase = CloudPhase::Cloud;
        let scale = self.explosion_scale;
        let heading = rng.uniform(0.0, std::f32::consts::TAU);
        let spread =
            rng.uniform(settings.cloud_spread_speed_min, settings.cloud_spread_speed_max) * scale;
        let (vx, vz) = planar_velocity(spread, heading);
        let vy =
            rng.uniform(settings.cloud_initial_lift_min, settings.cloud_initial_lift_max) * scale;
        self.vel = Vec3::new(vx, vy, vz);
    }
}

/// One member of the ground-debris pool.
///
/// Auto-recycling: once activated it keeps drawing fresh ballistic
/// trajectories whenever one expires, staying active for the rest of the
/// explosion so the debris reads as a continuous spray. Gravity is cached at
/// spawn so a settings change mid-flight does not bend the current arc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundParticle {
    pub pos: Vec3,
    pub vel: Vec3,
    pub active: bool,
    pub size: f32,
    pub color: [f32; 3],
    pub life: f32,
    pub age: f32,
    pub gravity: f32,
    pub explosion_scale: f32,
}

impl GroundParticle {
    pub fn new(settings: &Settings, rng: &mut impl UniformRange) -> Self {
        let mut p = Self {
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            active: false,
            size: 0.0,
            color: [0.0; 3],
            life: 0.0,
            age: 0.0,
            gravity: 0.0,
            explosion_scale: settings.explosion_scale,
        };
        p.reset(settings, rng);
        p
    }

    /// Draw a fresh trajectory without touching `active`: used for pool
    /// construction, full resets, and in-flight recycling alike.
    pub fn reset(&mut self, settings: &Settings, rng: &mut impl UniformRange) {
        use std::f32::consts::{FRAC_PI_3, FRAC_PI_6, TAU};

        let scale = settings.explosion_scale;
        self.explosion_scale = scale;
        self.pos = Vec3::new(0.0, GROUND_LEVEL + rng.uniform(0.05, 0.15) * scale, 0.0);

        let heading = rng.uniform(0.0, TAU);
        let elevation = rng.uniform(FRAC_PI_6, FRAC_PI_3);
        let speed = rng.uniform(settings.sand_speed_min, settings.sand_speed_max) * scale;
        self.vel = launch_velocity(speed, heading, elevation);

        self.size = rng.uniform(2.0, 5.0);
        self.life = rng.uniform(settings.sand_life_min, settings.sand_life_max);
        self.age = 0.0;
        self.color = [
            rng.uniform(0.6, 0.8),
            rng.uniform(0.5, 0.7),
            rng.uniform(0.3, 0.5),
        ];
        self.gravity = DEBRIS_BASE_GRAVITY * settings.sand_gravity_multiplier * scale;
    }

    pub fn activate(&mut self, settings: &Settings, rng: &mut impl UniformRange) {
        self.reset(settings, rng);
        self.active = true;
    }

    pub fn update(&mut self, dt: f32, settings: &Settings, rng: &mut impl UniformRange) {
        if !self.active {
            return;
        }
        self.age += dt;
        self.vel.y -= self.gravity * dt;
        self.pos += self.vel * dt;
        self.life -= dt;
        if self.life <= 0.0 || self.pos.y < GROUND_LEVEL - DEBRIS_GROUND_TOLERANCE {
            // Recycle in place; `active` stays true so the spray never thins
            self.reset(settings, rng);
        }
    }
}

/// The expanding blast ring at ground level.
///
/// Radius is non-decreasing while active; expires past
/// `SHOCKWAVE_MAX_RADIUS * scale` and stays down until the next `start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shockwave {
    pub radius: f32,
    pub active: bool,
    pub scale: f32,
}

impl Default for Shockwave {
    fn default() -> Self {
        Self {
            radius: 0.0,
            active: false,
            scale: 1.0,
        }
    }
}

impl Shockwave {
    pub fn start(&mut self, scale: f32) {
        self.active = true;
        self.radius = 0.0;
        self.scale = scale;
    }

    pub fn update(&mut self, dt: f32) {
        if self.active {
            self.radius += dt * SHOCKWAVE_GROWTH_RATE * self.scale;
            if self.radius > SHOCKWAVE_MAX_RADIUS * self.scale {
                self.active = false;
            }
        }
    }

    pub fn reset(&mut self) {
        self.active = false;
        self.radius = 0.0;
        self.scale = 1.0;
    }
}

/// Complete simulation state: the bomb, the ring, both fixed-size pools,
/// the one-shot activation latches, and the seeded draw source.
///
/// Pools are allocated once at construction and never resized. The latches
/// guarantee each explosion activates every pool member exactly once; they
/// re-arm whenever the bomb is not exploded (fresh drop or reset).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Draw source for every randomized spawn parameter
    pub rng: Pcg32,
    pub bomb: Bomb,
    pub shockwave: Shockwave,
    /// Mushroom-cloud pool (sorted construction order, stable forever)
    pub cloud: Vec<CloudParticle>,
    /// Ground-debris pool
    pub debris: Vec<GroundParticle>,
    /// One-shot latch: cloud pool + ring activated for the current explosion
    pub cloud_activated: bool,
    /// One-shot latch: debris pool activated for the current explosion
    pub debris_activated: bool,
}

impl SimState {
    /// Build the full dormant state with the given seed and pool capacities
    /// from [`crate::consts`].
    pub fn new(seed: u64, settings: &Settings) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let cloud = (0..NUM_CLOUD_PARTICLES)
            .map(|_| CloudParticle::new(settings, &mut rng))
            .collect();
        let debris = (0..NUM_GROUND_PARTICLES)
            .map(|_| GroundParticle::new(settings, &mut rng))
            .collect();
        Self {
            seed,
            rng,
            bomb: Bomb::default(),
            shockwave: Shockwave::default(),
            cloud,
            debris,
            cloud_activated: false,
            debris_activated: false,
        }
    }

    /// Render view: currently-active cloud members only
    pub fn active_cloud(&self) -> impl Iterator<Item = &CloudParticle> {
        self.cloud.iter().filter(|p| p.active)
    }

    /// Render view: currently-active debris members only
    pub fn active_debris(&self) -> impl Iterator<Item = &GroundParticle> {
        self.debris.iter().filter(|p| p.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{GROUND_LEVEL, SIM_DT};

    /// Deterministic draw source: always returns the middle of the range.
    struct Midpoint;

    impl UniformRange for Midpoint {
        fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
            if hi <= lo { lo } else { (lo + hi) / 2.0 }
        }
    }

    #[test]
    fn test_bomb_falls_and_explodes_once() {
        let mut bomb = Bomb::default();
        let mut prev_y = bomb.pos.y;
        while !bomb.exploded {
            bomb.update(SIM_DT);
            assert!(bomb.pos.y <= prev_y);
            prev_y = bomb.pos.y;
        }
        assert_eq!(bomb.pos.y, GROUND_LEVEL);

        // Further updates leave it clamped and exploded
        for _ in 0..100 {
            bomb.update(SIM_DT);
            assert!(bomb.exploded);
            assert_eq!(bomb.pos.y, GROUND_LEVEL);
        }

        bomb.reset();
        assert!(!bomb.exploded);
        assert_eq!(bomb.pos.y, crate::consts::BOMB_START_HEIGHT);
    }

    #[test]
    fn test_cloud_particle_inactive_until_activated() {
        let settings = Settings::default();
        let mut p = CloudParticle::new(&settings, &mut Midpoint);
        assert!(!p.active);
        let before = p.clone();
        for _ in 0..1000 {
            p.update(SIM_DT, &settings, &mut Midpoint);
        }
        assert!(!p.active);
        assert_eq!(p.pos, before.pos);
        assert_eq!(p.life, before.life);
    }

    #[test]
    fn test_cloud_particle_blooms_exactly_once_and_rose_first() {
        let mut settings = Settings::default();
        settings.explosion_scale = 1.0;
        settings.cloud_gravity = 9.0;

        let mut p = CloudParticle::new(&settings, &mut Midpoint);
        p.activate(&settings, &mut Midpoint);
        assert_eq!(p.phase, CloudPhase::Stem);
        let spawn_y = p.pos.y;

        // Midpoint stem launch: vy = 1.75, decel 0.8/s -> blooms well within
        // 300 steps at 60 Hz.
        let mut bloom_step = None;
        for step in 0..300 {
            p.update(SIM_DT, &settings, &mut Midpoint);
            if p.phase == CloudPhase::Cloud {
                bloom_step = Some(step);
                break;
            }
        }
        let bloomed_at = bloom_step.expect("stem never bloomed");
        assert!(p.pos.y > spawn_y, "particle must rise before blooming");

        // Never reverts to Stem
        for _ in bloomed_at..300 {
            p.update(SIM_DT, &settings, &mut Midpoint);
            assert_eq!(p.phase, CloudPhase::Cloud);
        }
    }

    #[test]
    fn test_cloud_particle_retires_permanently_on_expiry() {
        let settings = Settings::default();
        let mut p = CloudParticle::new(&settings, &mut Midpoint);
        p.activate(&settings, &mut Midpoint);

        // Burn through the whole lifespan
        let steps = (p.life / SIM_DT).ceil() as usize + 10;
        for _ in 0..steps {
            p.update(SIM_DT, &settings, &mut Midpoint);
        }
        assert!(!p.active);

        // Stays retired under further updates
        for _ in 0..100 {
            p.update(SIM_DT, &settings, &mut Midpoint);
            assert!(!p.active);
        }
    }

    #[test]
    fn test_ground_particle_recycles_forever() {
        let mut settings = Settings::default();
        settings.sand_gravity_multiplier = 0.5;

        let mut p = GroundParticle::new(&settings, &mut Midpoint);
        assert!(!p.active);
        p.activate(&settings, &mut Midpoint);
        assert!(p.active);

        // Not yet past its life: still on the first trajectory
        p.update(SIM_DT, &settings, &mut Midpoint);
        assert!(p.active);

        // Drive life below zero; the expiring update redraws in place
        let life = p.life;
        p.update(life + 0.001, &settings, &mut Midpoint);
        assert!(p.active);
        assert!(p.life >= 0.0, "recycled trajectory must have fresh life");

        // Many lifetimes later it is still active
        for _ in 0..10_000 {
            p.update(SIM_DT, &settings, &mut Midpoint);
            assert!(p.active);
        }
    }

    #[test]
    fn test_ground_particle_reset_preserves_active_flag() {
        let settings = Settings::default();
        let mut p = GroundParticle::new(&settings, &mut Midpoint);
        p.reset(&settings, &mut Midpoint);
        assert!(!p.active);
        p.activate(&settings, &mut Midpoint);
        p.reset(&settings, &mut Midpoint);
        assert!(p.active);
    }

    #[test]
    fn test_ground_particle_gravity_cached_from_settings() {
        let mut settings = Settings::default();
        settings.sand_gravity_multiplier = 0.5;
        settings.explosion_scale = 2.0;
        let mut p = GroundParticle::new(&settings, &mut Midpoint);
        p.activate(&settings, &mut Midpoint);
        assert!((p.gravity - 9.8 * 0.5 * 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_shockwave_grows_then_expires() {
        let mut wave = Shockwave::default();
        wave.start(2.0);
        assert!(wave.active);
        assert_eq!(wave.radius, 0.0);

        let mut prev = 0.0;
        while wave.active {
            wave.update(SIM_DT);
            assert!(wave.radius >= prev);
            prev = wave.radius;
        }
        // Deactivated exactly when the radius first exceeded the limit
        assert!(wave.radius > crate::consts::SHOCKWAVE_MAX_RADIUS * 2.0);
        assert!(wave.radius - SIM_DT * crate::consts::SHOCKWAVE_GROWTH_RATE * 2.0
            <= crate::consts::SHOCKWAVE_MAX_RADIUS * 2.0);

        // Stays down without a new start
        let frozen = wave.radius;
        for _ in 0..100 {
            wave.update(SIM_DT);
            assert!(!wave.active);
            assert_eq!(wave.radius, frozen);
        }
    }

    proptest::proptest! {
        #[test]
        fn prop_bomb_height_monotone(dt in 0.0f32..0.1) {
            let mut bomb = Bomb::default();
            let mut prev_y = bomb.pos.y;
            for _ in 0..500 {
                bomb.update(dt);
                proptest::prop_assert!(bomb.pos.y <= prev_y);
                proptest::prop_assert!(bomb.pos.y >= GROUND_LEVEL);
                prev_y = bomb.pos.y;
            }
        }

        #[test]
        fn prop_shockwave_radius_monotone(dt in 0.0f32..0.1, scale in 0.1f32..5.0) {
            let mut wave = Shockwave::default();
            wave.start(scale);
            let mut prev = wave.radius;
            for _ in 0..500 {
                wave.update(dt);
                proptest::prop_assert!(wave.radius >= prev);
                prev = wave.radius;
            }
        }
    }
}
