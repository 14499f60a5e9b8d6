//! Blueprint factories for targets, projectiles and particles.
//!
//! Randomized values come from the session's seeded `ChaCha8Rng`, so the
//! same seed reproduces the same round.

use glam::{Quat, Vec3};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use gallery_core::components::{Lifetime, Target};
use gallery_core::config::{GalleryConfig, SpawnVolume};
use gallery_core::constants::*;
use gallery_core::enums::TargetShape;
use gallery_core::ports::ShapeDescriptor;
use gallery_core::types::Color;

use crate::physics::BodyDesc;
use crate::registry::{Blueprint, Role};

/// Sample `[lo, hi)`, or `lo` when the range is empty.
fn sample(rng: &mut ChaCha8Rng, lo: f32, hi: f32) -> f32 {
    if lo < hi {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

fn sample_vec(rng: &mut ChaCha8Rng, min: Vec3, max: Vec3) -> Vec3 {
    Vec3::new(
        sample(rng, min.x, max.x),
        sample(rng, min.y, max.y),
        sample(rng, min.z, max.z),
    )
}

pub fn random_color(rng: &mut ChaCha8Rng) -> Color {
    Color::new(rng.gen(), rng.gen(), rng.gen())
}

/// A target with explicit kinematics.
pub fn target(
    shape: TargetShape,
    score_value: u32,
    position: Vec3,
    velocity: Vec3,
    angular_velocity: Vec3,
    color: Color,
) -> Blueprint {
    Blueprint {
        role: Role::Target(Target { shape, score_value }),
        body: BodyDesc::at(position)
            .with_velocity(velocity)
            .with_angular_velocity(angular_velocity)
            .with_mass(TARGET_MASS),
        collider_radius: shape.collision_radius(),
        color,
        shape: ShapeDescriptor::Target(shape),
    }
}

/// A target with shape, pose and motion drawn from the config.
///
/// Returns `None` only if the shape table is empty, which validation rules out.
pub fn random_target(rng: &mut ChaCha8Rng, config: &GalleryConfig) -> Option<Blueprint> {
    let shapes = config.shapes();
    if shapes.is_empty() {
        return None;
    }
    let shape = shapes[rng.gen_range(0..shapes.len())];
    let score_value = config.score_for(shape)?;

    let SpawnVolume {
        position_min,
        position_max,
        velocity_min,
        velocity_max,
        angular_speed,
    } = config.spawn_volume;

    let position = sample_vec(rng, position_min, position_max);
    let velocity = sample_vec(rng, velocity_min, velocity_max);
    let angular = sample_vec(rng, Vec3::splat(-angular_speed), Vec3::splat(angular_speed));
    let orientation = Quat::from_euler(
        glam::EulerRot::XYZ,
        sample(rng, 0.0, std::f32::consts::TAU),
        sample(rng, 0.0, std::f32::consts::TAU),
        sample(rng, 0.0, std::f32::consts::TAU),
    );
    let color = random_color(rng);

    let mut blueprint = target(shape, score_value, position, velocity, angular, color);
    blueprint.body.orientation = orientation;
    Some(blueprint)
}

/// A projectile leaving `origin` along `direction` (unit length).
pub fn projectile(origin: Vec3, direction: Vec3, speed: f32, radius: f32) -> Blueprint {
    Blueprint {
        role: Role::Projectile,
        body: BodyDesc::at(origin)
            .with_velocity(direction * speed)
            .with_mass(PROJECTILE_MASS),
        collider_radius: radius,
        color: Color::YELLOW,
        shape: ShapeDescriptor::Sphere { radius },
    }
}

/// One debris particle.
pub fn particle(position: Vec3, velocity: Vec3, color: Color, ttl_ticks: u32) -> Blueprint {
    Blueprint {
        role: Role::Particle(Lifetime {
            remaining_ticks: ttl_ticks,
        }),
        body: BodyDesc::at(position)
            .with_velocity(velocity)
            .with_mass(PARTICLE_MASS),
        collider_radius: PARTICLE_HALF_EXTENT,
        color,
        shape: ShapeDescriptor::Cube {
            half_extent: PARTICLE_HALF_EXTENT,
        },
    }
}

/// `count` particles at `origin`, each with velocity drawn per axis from
/// `[-speed, speed)`.
pub fn burst(
    rng: &mut ChaCha8Rng,
    origin: Vec3,
    color: Color,
    count: u32,
    speed: f32,
    ttl_ticks: u32,
) -> Vec<Blueprint> {
    let speed = speed.abs();
    (0..count)
        .map(|_| {
            let velocity = sample_vec(rng, Vec3::splat(-speed), Vec3::splat(speed));
            particle(origin, velocity, color, ttl_ticks)
        })
        .collect()
}
