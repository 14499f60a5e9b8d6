//! Projectile/target hit detection and resolution.
//!
//! Detection is a pure pass over live projectiles and targets: a pair hits
//! when the distance between centers is below the sum of their collider
//! radii. Resolution consumes the hit list once, in (projectile, target)
//! order. Each target scores at most once; every projectile involved is
//! destroyed.

use std::collections::HashSet;

use rand_chacha::ChaCha8Rng;
use tracing::info;

use gallery_core::enums::EntityKind;
use gallery_core::events::SessionEvent;
use gallery_core::ports::RenderSink;
use gallery_core::types::EntityId;

use crate::physics::PhysicsWorld;
use crate::registry::EntityRegistry;
use crate::round::RoundClock;
use crate::systems::effects::{self, BurstSpec};

/// One overlapping (projectile, target) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEvent {
    pub projectile: EntityId,
    pub target: EntityId,
    pub distance: f32,
}

/// Every overlapping pair, sorted by (projectile id, target id).
pub fn detect_collisions(registry: &EntityRegistry) -> Vec<HitEvent> {
    let projectiles = registry.records(EntityKind::Projectile);
    let targets = registry.records(EntityKind::Target);

    let mut hits = Vec::new();
    for projectile in &projectiles {
        for target in &targets {
            let distance = projectile.transform.distance_to(&target.transform);
            if distance < projectile.collider_radius + target.collider_radius {
                hits.push(HitEvent {
                    projectile: projectile.id,
                    target: target.id,
                    distance,
                });
            }
        }
    }
    // Records come out id-ordered, so the nested loop already yields sorted pairs.
    hits
}

/// What a resolution pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    pub targets_destroyed: u32,
    pub projectiles_destroyed: u32,
    pub points: u32,
}

/// Apply a hit list: score and burst each target once, destroy everything hit.
#[allow(clippy::too_many_arguments)]
pub fn resolve(
    hits: &[HitEvent],
    registry: &mut EntityRegistry,
    physics: &mut PhysicsWorld,
    render: &mut impl RenderSink,
    rng: &mut ChaCha8Rng,
    round: &mut RoundClock,
    burst: BurstSpec,
    events: &mut Vec<SessionEvent>,
) -> Resolution {
    let mut resolution = Resolution::default();
    let mut scored: HashSet<EntityId> = HashSet::new();

    for hit in hits {
        if !scored.contains(&hit.target) {
            if let (Some(record), Some(target)) =
                (registry.get(hit.target), registry.target(hit.target))
            {
                scored.insert(hit.target);
                let position = record.transform.position;

                if let Some(score) = round.award(target.score_value) {
                    info!(
                        entity_id = %hit.target,
                        projectile_id = %hit.projectile,
                        shape = %target.shape,
                        points = target.score_value,
                        score,
                        "target destroyed"
                    );
                    events.push(SessionEvent::TargetDestroyed {
                        entity_id: hit.target,
                        projectile_id: hit.projectile,
                        shape: target.shape,
                        score_value: target.score_value,
                        position,
                    });
                    events.push(SessionEvent::ScoreChanged { score });
                    resolution.points += target.score_value;
                }

                effects::emit(registry, physics, render, rng, position, record.color, burst);
                if registry.destroy(physics, render, hit.target) {
                    resolution.targets_destroyed += 1;
                }
            }
        }

        if registry.destroy(physics, render, hit.projectile) {
            resolution.projectiles_destroyed += 1;
        }
    }
    resolution
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rand::SeedableRng;

    use gallery_core::enums::TargetShape;
    use gallery_core::ports::RecordingRenderSink;
    use gallery_core::types::Color;

    use super::*;
    use crate::archetypes;

    struct Fixture {
        registry: EntityRegistry,
        physics: PhysicsWorld,
        render: RecordingRenderSink,
        rng: ChaCha8Rng,
        round: RoundClock,
        events: Vec<SessionEvent>,
    }

    const BURST: BurstSpec = BurstSpec {
        count: 20,
        speed: 7.5,
        ttl_ticks: 60,
    };

    impl Fixture {
        fn new() -> Self {
            let mut round = RoundClock::new(30.0, 1.0, 60);
            round.start();
            Self {
                registry: EntityRegistry::new(),
                physics: PhysicsWorld::new(Vec3::ZERO),
                render: RecordingRenderSink::new(),
                rng: ChaCha8Rng::seed_from_u64(1),
                round,
                events: Vec::new(),
            }
        }

        fn target(&mut self, shape: TargetShape, score: u32, at: Vec3) -> EntityId {
            let bp = archetypes::target(shape, score, at, Vec3::ZERO, Vec3::ZERO, Color::ORANGE);
            self.registry.spawn(&mut self.physics, &mut self.render, &bp)
        }

        fn projectile(&mut self, at: Vec3) -> EntityId {
            let bp = archetypes::projectile(at, Vec3::NEG_Z, 35.0, 0.1);
            self.registry.spawn(&mut self.physics, &mut self.render, &bp)
        }

        fn step(&mut self) -> Resolution {
            let hits = detect_collisions(&self.registry);
            resolve(
                &hits,
                &mut self.registry,
                &mut self.physics,
                &mut self.render,
                &mut self.rng,
                &mut self.round,
                BURST,
                &mut self.events,
            )
        }
    }

    #[test]
    fn test_overlap_uses_sum_of_radii() {
        let mut f = Fixture::new();
        let t = f.target(TargetShape::Box, 10, Vec3::ZERO);
        let near = f.projectile(Vec3::new(0.59, 0.0, 0.0));
        f.projectile(Vec3::new(0.61, 0.0, 0.0));

        let hits = detect_collisions(&f.registry);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].projectile, near);
        assert_eq!(hits[0].target, t);
    }

    #[test]
    fn test_hit_scores_bursts_and_destroys_both() {
        let mut f = Fixture::new();
        let t = f.target(TargetShape::Box, 10, Vec3::new(0.0, 5.0, -20.0));
        let p = f.projectile(Vec3::new(0.0, 5.0, -20.2));

        let res = f.step();
        assert_eq!(res.points, 10);
        assert_eq!(f.round.score(), 10);
        assert!(!f.registry.contains(t));
        assert!(!f.registry.contains(p));
        assert_eq!(f.registry.count(EntityKind::Particle), 20);
        assert_eq!(f.physics.body_count(), 20);
        assert!(f.events.contains(&SessionEvent::ScoreChanged { score: 10 }));
    }

    #[test]
    fn test_target_hit_by_two_projectiles_scores_once() {
        let mut f = Fixture::new();
        let t = f.target(TargetShape::Sphere, 15, Vec3::ZERO);
        f.projectile(Vec3::new(0.1, 0.0, 0.0));
        f.projectile(Vec3::new(-0.1, 0.0, 0.0));

        let res = f.step();
        assert_eq!(res.points, 15);
        assert_eq!(res.targets_destroyed, 1);
        assert_eq!(res.projectiles_destroyed, 2);
        assert!(!f.registry.contains(t));
        assert_eq!(f.registry.count(EntityKind::Projectile), 0);
        assert_eq!(f.registry.count(EntityKind::Particle), 20);
    }

    #[test]
    fn test_projectile_overlapping_two_targets_destroys_both() {
        let mut f = Fixture::new();
        f.target(TargetShape::Box, 10, Vec3::new(0.3, 0.0, 0.0));
        f.target(TargetShape::Torus, 50, Vec3::new(-0.3, 0.0, 0.0));
        f.projectile(Vec3::ZERO);

        let res = f.step();
        assert_eq!(res.points, 60);
        assert_eq!(res.targets_destroyed, 2);
        assert_eq!(res.projectiles_destroyed, 1);
        assert_eq!(f.registry.count(EntityKind::Target), 0);
    }

    #[test]
    fn test_particles_never_collide() {
        let mut f = Fixture::new();
        f.target(TargetShape::Box, 10, Vec3::ZERO);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        effects::emit(
            &mut f.registry,
            &mut f.physics,
            &mut f.render,
            &mut rng,
            Vec3::ZERO,
            Color::YELLOW,
            BURST,
        );
        assert!(detect_collisions(&f.registry).is_empty());
        assert_eq!(f.step(), Resolution::default());
    }

    #[test]
    fn test_replaying_a_hit_list_does_not_double_score() {
        let mut f = Fixture::new();
        f.target(TargetShape::Box, 10, Vec3::ZERO);
        f.projectile(Vec3::ZERO);
        let hits = detect_collisions(&f.registry);

        for _ in 0..2 {
            resolve(
                &hits,
                &mut f.registry,
                &mut f.physics,
                &mut f.render,
                &mut f.rng,
                &mut f.round,
                BURST,
                &mut f.events,
            );
        }
        assert_eq!(f.round.score(), 10);
        assert_eq!(f.render.orphan_calls, 0);
    }
}
