//! Player fire: turns a fire request in the tick's input into a projectile.

use tracing::{debug, warn};

use gallery_core::commands::InputSnapshot;
use gallery_core::config::GalleryConfig;
use gallery_core::events::SessionEvent;
use gallery_core::ports::RenderSink;
use gallery_core::types::EntityId;

use crate::archetypes;
use crate::physics::PhysicsWorld;
use crate::registry::EntityRegistry;

/// Spawn a projectile if `input` asks for one.
///
/// A zero or non-finite aim vector is rejected with a warning and no shot.
pub fn run(
    input: &InputSnapshot,
    registry: &mut EntityRegistry,
    physics: &mut PhysicsWorld,
    render: &mut impl RenderSink,
    config: &GalleryConfig,
    events: &mut Vec<SessionEvent>,
) -> Option<EntityId> {
    if !input.fire {
        return None;
    }
    let Some(direction) = input.aim.try_normalize() else {
        warn!(aim = ?input.aim, "rejected shot with invalid aim");
        return None;
    };

    let blueprint = archetypes::projectile(
        config.muzzle_position,
        direction,
        config.projectile_speed,
        config.projectile_radius,
    );
    let id = registry.spawn(physics, render, &blueprint);
    debug!(entity_id = %id, ?direction, "projectile fired");
    events.push(SessionEvent::ProjectileFired {
        entity_id: id,
        direction,
    });
    Some(id)
}
