//! Round configuration, fixed at round start.
//!
//! Every field has a default taken from `constants`, so a JSON file only
//! needs to name the values it overrides.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::TargetShape;
use crate::error::ConfigError;

/// Axis-aligned bounds for randomized target spawns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnVolume {
    pub position_min: Vec3,
    pub position_max: Vec3,
    pub velocity_min: Vec3,
    pub velocity_max: Vec3,
    /// Angular velocity is drawn per axis from [-angular_speed, angular_speed).
    pub angular_speed: f32,
}

impl Default for SpawnVolume {
    fn default() -> Self {
        Self {
            position_min: Vec3::new(
                -SPAWN_HALF_WIDTH,
                SPAWN_MIN_HEIGHT,
                SPAWN_NEAR_Z - SPAWN_DEPTH_RANGE,
            ),
            position_max: Vec3::new(
                SPAWN_HALF_WIDTH,
                SPAWN_MIN_HEIGHT + SPAWN_HEIGHT_RANGE,
                SPAWN_NEAR_Z,
            ),
            velocity_min: Vec3::new(
                -SPAWN_LATERAL_SPEED,
                -SPAWN_VERTICAL_SPEED,
                SPAWN_MIN_APPROACH_SPEED,
            ),
            velocity_max: Vec3::new(
                SPAWN_LATERAL_SPEED,
                SPAWN_VERTICAL_SPEED,
                SPAWN_MIN_APPROACH_SPEED + SPAWN_APPROACH_SPEED_RANGE,
            ),
            angular_speed: SPAWN_ANGULAR_SPEED,
        }
    }
}

impl SpawnVolume {
    fn validate(&self) -> Result<(), ConfigError> {
        let vectors = [
            ("position", self.position_min, self.position_max),
            ("velocity", self.velocity_min, self.velocity_max),
        ];
        for (name, min, max) in vectors {
            if !min.is_finite() || !max.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
            if min.cmpgt(max).any() {
                return Err(ConfigError::InvalidSpawnVolume(name));
            }
        }
        if !self.angular_speed.is_finite() || self.angular_speed < 0.0 {
            return Err(ConfigError::InvalidSpawnVolume("angular_speed"));
        }
        Ok(())
    }
}

/// Complete configuration for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Points per target shape. Spawned shapes are drawn from this table's keys.
    pub shape_scores: BTreeMap<TargetShape, u32>,
    pub spawn_interval_secs: f32,
    /// Ceiling on live targets; `None` spawns unconditionally.
    pub max_live_targets: Option<usize>,
    pub round_duration_secs: f32,
    /// Simulated seconds between clock decrements.
    pub clock_period_secs: f32,
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    /// Where projectiles leave the player.
    pub muzzle_position: Vec3,
    pub particles_per_burst: u32,
    pub particle_ttl_secs: f32,
    pub particle_speed: f32,
    /// Projectiles and targets below this height are released.
    pub floor_y: f32,
    pub gravity: Vec3,
    pub tick_rate: u32,
    pub spawn_volume: SpawnVolume,
    /// RNG seed. Same seed and inputs give the same round.
    pub seed: u64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            shape_scores: default_shape_scores(),
            spawn_interval_secs: SPAWN_INTERVAL_SECS,
            max_live_targets: None,
            round_duration_secs: ROUND_DURATION_SECS,
            clock_period_secs: CLOCK_PERIOD_SECS,
            projectile_speed: PROJECTILE_SPEED,
            projectile_radius: PROJECTILE_RADIUS,
            muzzle_position: Vec3::ZERO,
            particles_per_burst: PARTICLES_PER_BURST,
            particle_ttl_secs: PARTICLE_TTL_SECS,
            particle_speed: PARTICLE_SPEED,
            floor_y: FLOOR_Y,
            gravity: Vec3::new(0.0, -GRAVITY, 0.0),
            tick_rate: TICK_RATE,
            spawn_volume: SpawnVolume::default(),
            seed: 42,
        }
    }
}

fn default_shape_scores() -> BTreeMap<TargetShape, u32> {
    BTreeMap::from([
        (TargetShape::Box, 10),
        (TargetShape::Sphere, 20),
        (TargetShape::Cone, 30),
        (TargetShape::Torus, 50),
    ])
}

impl GalleryConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GalleryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every invariant the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shape_scores.is_empty() {
            return Err(ConfigError::EmptyShapeTable);
        }
        if let Some((&shape, _)) = self.shape_scores.iter().find(|(_, score)| **score == 0) {
            return Err(ConfigError::ZeroScore(shape));
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }

        let positive = [
            ("spawn_interval_secs", self.spawn_interval_secs),
            ("round_duration_secs", self.round_duration_secs),
            ("clock_period_secs", self.clock_period_secs),
            ("projectile_speed", self.projectile_speed),
            ("projectile_radius", self.projectile_radius),
            ("particle_ttl_secs", self.particle_ttl_secs),
        ];
        for (field, value) in positive {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(field));
            }
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        // Periodic timers count whole ticks.
        for (field, value) in [
            ("spawn_interval_secs", self.spawn_interval_secs),
            ("clock_period_secs", self.clock_period_secs),
        ] {
            let ticks = value * self.tick_rate as f32;
            if ticks.round() < 1.0 || (ticks - ticks.round()).abs() > TICK_TOLERANCE {
                return Err(ConfigError::NotWholeTicks {
                    field,
                    value,
                    tick_rate: self.tick_rate,
                });
            }
        }

        if !self.particle_speed.is_finite() {
            return Err(ConfigError::NonFinite("particle_speed"));
        }
        if !self.floor_y.is_finite() {
            return Err(ConfigError::NonFinite("floor_y"));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::NonFinite("gravity"));
        }
        if !self.muzzle_position.is_finite() {
            return Err(ConfigError::NonFinite("muzzle_position"));
        }
        self.spawn_volume.validate()
    }

    /// Seconds per tick.
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Convert a duration to whole ticks, never less than one.
    pub fn ticks_for(&self, secs: f32) -> u64 {
        ((secs * self.tick_rate as f32).round() as u64).max(1)
    }

    pub fn particle_ttl_ticks(&self) -> u32 {
        self.ticks_for(self.particle_ttl_secs).min(u32::MAX as u64) as u32
    }

    /// Score for a shape, if the table contains it.
    pub fn score_for(&self, shape: TargetShape) -> Option<u32> {
        self.shape_scores.get(&shape).copied()
    }

    /// Shapes the spawner may choose from, in table order.
    pub fn shapes(&self) -> Vec<TargetShape> {
        self.shape_scores.keys().copied().collect()
    }
}
