//! Explosion bursts and particle expiry.

use glam::Vec3;
use rand_chacha::ChaCha8Rng;

use gallery_core::components::{Lifetime, Particle};
use gallery_core::ports::RenderSink;
use gallery_core::types::{Color, EntityId};

use crate::archetypes;
use crate::physics::PhysicsWorld;
use crate::registry::EntityRegistry;

/// Burst parameters, fixed per round.
#[derive(Debug, Clone, Copy)]
pub struct BurstSpec {
    pub count: u32,
    pub speed: f32,
    pub ttl_ticks: u32,
}

/// Spawn a burst of particles at `origin`.
pub fn emit(
    registry: &mut EntityRegistry,
    physics: &mut PhysicsWorld,
    render: &mut impl RenderSink,
    rng: &mut ChaCha8Rng,
    origin: Vec3,
    color: Color,
    spec: BurstSpec,
) -> Vec<EntityId> {
    archetypes::burst(rng, origin, color, spec.count, spec.speed, spec.ttl_ticks)
        .iter()
        .map(|blueprint| registry.spawn(physics, render, blueprint))
        .collect()
}

/// Count down every particle's lifetime and destroy the expired ones.
/// Returns how many were removed.
pub fn prune(
    registry: &mut EntityRegistry,
    physics: &mut PhysicsWorld,
    render: &mut impl RenderSink,
    expired: &mut Vec<EntityId>,
) -> usize {
    expired.clear();
    for (_entity, (id, lifetime, _particle)) in registry
        .world_mut()
        .query_mut::<(&EntityId, &mut Lifetime, &Particle)>()
    {
        lifetime.remaining_ticks = lifetime.remaining_ticks.saturating_sub(1);
        if lifetime.remaining_ticks == 0 {
            expired.push(*id);
        }
    }
    expired.sort_unstable();

    expired
        .iter()
        .filter(|id| registry.destroy(physics, render, **id))
        .count()
}
