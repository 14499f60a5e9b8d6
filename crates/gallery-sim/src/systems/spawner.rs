//! Target spawner: one random target per spawn interval.

use rand_chacha::ChaCha8Rng;
use tracing::debug;

use gallery_core::config::GalleryConfig;
use gallery_core::enums::EntityKind;
use gallery_core::events::SessionEvent;
use gallery_core::ports::RenderSink;
use gallery_core::types::EntityId;

use crate::archetypes;
use crate::physics::PhysicsWorld;
use crate::registry::{Blueprint, EntityRegistry, Role};

/// Tick countdown to the next spawn. Fires on the first tick after a reset.
#[derive(Debug, Clone)]
pub struct SpawnTimer {
    period_ticks: u64,
    countdown: u64,
}

impl SpawnTimer {
    pub fn new(period_ticks: u64) -> Self {
        Self {
            period_ticks: period_ticks.max(1),
            countdown: 0,
        }
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(config.ticks_for(config.spawn_interval_secs))
    }

    pub fn reset(&mut self) {
        self.countdown = 0;
    }

    /// Count one tick. True when a spawn slot opens.
    pub fn due(&mut self) -> bool {
        if self.countdown == 0 {
            self.countdown = self.period_ticks - 1;
            true
        } else {
            self.countdown -= 1;
            false
        }
    }
}

/// Whether the live-target ceiling leaves room for another target.
pub fn has_room(config: &GalleryConfig, registry: &EntityRegistry) -> bool {
    config
        .max_live_targets
        .map_or(true, |cap| registry.count(EntityKind::Target) < cap)
}

/// Spawn a target from `blueprint` and report it.
pub fn spawn_target(
    registry: &mut EntityRegistry,
    physics: &mut PhysicsWorld,
    render: &mut impl RenderSink,
    blueprint: &Blueprint,
    events: &mut Vec<SessionEvent>,
) -> Option<EntityId> {
    let Role::Target(target) = blueprint.role else {
        return None;
    };
    let id = registry.spawn(physics, render, blueprint);
    debug!(entity_id = %id, shape = %target.shape, score_value = target.score_value, "target spawned");
    events.push(SessionEvent::TargetSpawned {
        entity_id: id,
        shape: target.shape,
        position: blueprint.body.position,
    });
    Some(id)
}

/// Count one tick and spawn if the interval has elapsed and there is room.
pub fn run(
    timer: &mut SpawnTimer,
    registry: &mut EntityRegistry,
    physics: &mut PhysicsWorld,
    render: &mut impl RenderSink,
    rng: &mut ChaCha8Rng,
    config: &GalleryConfig,
    events: &mut Vec<SessionEvent>,
) -> Option<EntityId> {
    if !timer.due() || !has_room(config, registry) {
        return None;
    }
    let blueprint = archetypes::random_target(rng, config)?;
    spawn_target(registry, physics, render, &blueprint, events)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rand::SeedableRng;

    use gallery_core::ports::RecordingRenderSink;

    use super::*;

    #[test]
    fn test_timer_fires_first_tick_then_every_period() {
        let mut timer = SpawnTimer::new(30);
        let fired: Vec<u64> = (1..=91).filter(|_| timer.due()).collect();
        assert_eq!(fired, vec![1, 31, 61, 91]);
    }

    #[test]
    fn test_timer_with_single_tick_period_fires_every_tick() {
        let mut timer = SpawnTimer::new(1);
        assert!((0..10).all(|_| timer.due()));
    }

    #[test]
    fn test_ceiling_blocks_spawns() {
        let config = GalleryConfig {
            max_live_targets: Some(2),
            ..Default::default()
        };
        let mut timer = SpawnTimer::new(1);
        let mut registry = EntityRegistry::new();
        let mut physics = PhysicsWorld::new(Vec3::ZERO);
        let mut render = RecordingRenderSink::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut events = Vec::new();

        for _ in 0..10 {
            run(
                &mut timer,
                &mut registry,
                &mut physics,
                &mut render,
                &mut rng,
                &config,
                &mut events,
            );
        }
        assert_eq!(registry.count(EntityKind::Target), 2);
        assert_eq!(events.len(), 2);
        assert_eq!(render.live_of_kind(EntityKind::Target), 2);
    }

    #[test]
    fn test_zero_ceiling_disables_automatic_spawns() {
        let config = GalleryConfig {
            max_live_targets: Some(0),
            ..Default::default()
        };
        let registry = EntityRegistry::new();
        assert!(!has_room(&config, &registry));
    }
}
