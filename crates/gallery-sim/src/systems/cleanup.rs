//! Out-of-bounds cleanup: releases projectiles and targets that fell below the floor.

use tracing::debug;

use gallery_core::enums::EntityKind;
use gallery_core::events::SessionEvent;
use gallery_core::ports::RenderSink;
use gallery_core::types::EntityId;

use crate::physics::PhysicsWorld;
use crate::registry::EntityRegistry;

/// Destroy every projectile and target whose position is below `floor_y`.
/// Lost projectiles are reported; targets leave without scoring.
pub fn run(
    registry: &mut EntityRegistry,
    physics: &mut PhysicsWorld,
    render: &mut impl RenderSink,
    floor_y: f32,
    despawn_buffer: &mut Vec<(EntityId, EntityKind)>,
    events: &mut Vec<SessionEvent>,
) -> usize {
    despawn_buffer.clear();
    for kind in [EntityKind::Projectile, EntityKind::Target] {
        for record in registry.records(kind) {
            if record.transform.position.y < floor_y {
                despawn_buffer.push((record.id, kind));
            }
        }
    }

    let mut removed = 0;
    for (id, kind) in despawn_buffer.drain(..) {
        if !registry.destroy(physics, render, id) {
            continue;
        }
        removed += 1;
        match kind {
            EntityKind::Projectile => {
                debug!(entity_id = %id, "projectile lost below floor");
                events.push(SessionEvent::ProjectileLost { entity_id: id });
            }
            EntityKind::Target => debug!(entity_id = %id, "target fell below floor"),
            EntityKind::Particle => {}
        }
    }
    removed
}
