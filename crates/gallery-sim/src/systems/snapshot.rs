//! Snapshot system: builds the `SessionSnapshot` handed out after each tick.

use glam::Vec3;

use gallery_core::enums::EntityKind;
use gallery_core::events::SessionEvent;
use gallery_core::state::{ProjectileView, RoundView, SessionSnapshot, TargetView};
use gallery_core::types::SimTime;

use crate::physics::PhysicsWorld;
use crate::registry::EntityRegistry;

/// Collect the visible state. Targets and projectiles are listed in id order.
pub fn build_snapshot(
    registry: &EntityRegistry,
    physics: &PhysicsWorld,
    time: &SimTime,
    round: RoundView,
    events: Vec<SessionEvent>,
) -> SessionSnapshot {
    let targets = registry
        .records(EntityKind::Target)
        .into_iter()
        .filter_map(|record| {
            let target = registry.target(record.id)?;
            let velocity = physics
                .body(record.body)
                .map_or(Vec3::ZERO, |b| b.linear_velocity);
            Some(TargetView {
                entity_id: record.id,
                shape: target.shape,
                score_value: target.score_value,
                position: record.transform.position,
                velocity,
                color: record.color,
            })
        })
        .collect();

    let projectiles = registry
        .records(EntityKind::Projectile)
        .into_iter()
        .map(|record| ProjectileView {
            entity_id: record.id,
            position: record.transform.position,
        })
        .collect();

    SessionSnapshot {
        time: *time,
        round,
        targets,
        projectiles,
        particle_count: registry.count(EntityKind::Particle) as u32,
        events,
    }
}
