//! Entity registry: the authoritative set of live entities.
//!
//! Every entity is a hecs entity carrying its `EntityId`, `EntityKind`,
//! the `Body` handle of its rigid body, and kind-specific components.
//! The registry is the only place that creates or destroys the
//! (body, visual) pair, so the two never drift apart.

use std::collections::HashMap;

use hecs::{Entity, EntityBuilder, World};
use tracing::{debug, warn};

use gallery_core::components::*;
use gallery_core::enums::EntityKind;
use gallery_core::ports::{RenderSink, ShapeDescriptor, VisualDescriptor};
use gallery_core::types::{BodyHandle, Color, EntityId, EntityIdAllocator, Transform};

use crate::physics::{BodyDesc, PhysicsWorld};

/// Kind-specific payload of a new entity.
#[derive(Debug, Clone, Copy)]
pub enum Role {
    Target(Target),
    Projectile,
    Particle(Lifetime),
}

impl Role {
    pub fn kind(&self) -> EntityKind {
        match self {
            Role::Target(_) => EntityKind::Target,
            Role::Projectile => EntityKind::Projectile,
            Role::Particle(_) => EntityKind::Particle,
        }
    }
}

/// Everything needed to create one entity.
#[derive(Debug, Clone, Copy)]
pub struct Blueprint {
    pub role: Role,
    pub body: BodyDesc,
    pub collider_radius: f32,
    pub color: Color,
    pub shape: ShapeDescriptor,
}

impl Blueprint {
    pub fn kind(&self) -> EntityKind {
        self.role.kind()
    }

    fn visual(&self) -> VisualDescriptor {
        VisualDescriptor {
            kind: self.kind(),
            shape: self.shape,
            color: self.color,
        }
    }
}

/// Read-only view of a live entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityRecord {
    pub id: EntityId,
    pub kind: EntityKind,
    pub body: BodyHandle,
    pub transform: Transform,
    pub collider_radius: f32,
    pub color: Color,
}

pub struct EntityRegistry {
    world: World,
    index: HashMap<EntityId, Entity>,
    ids: EntityIdAllocator,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            index: HashMap::new(),
            ids: EntityIdAllocator::new(),
        }
    }

    /// Create the entity, its rigid body and its visual as one operation.
    pub fn spawn(
        &mut self,
        physics: &mut PhysicsWorld,
        render: &mut impl RenderSink,
        blueprint: &Blueprint,
    ) -> EntityId {
        let id = self.ids.allocate();
        let handle = physics.add_body(&blueprint.body);

        let mut builder = EntityBuilder::new();
        builder
            .add(id)
            .add(blueprint.kind())
            .add(Body(handle))
            .add(Collider {
                radius: blueprint.collider_radius,
            })
            .add(Appearance {
                color: blueprint.color,
            })
            .add(Transform {
                position: blueprint.body.position,
                orientation: blueprint.body.orientation,
            });
        match blueprint.role {
            Role::Target(target) => {
                builder.add(target);
            }
            Role::Projectile => {
                builder.add(Projectile);
            }
            Role::Particle(lifetime) => {
                builder.add(Particle).add(lifetime);
            }
        }
        let entity = self.world.spawn(builder.build());
        self.index.insert(id, entity);

        render.add_visual(id, &blueprint.visual());
        debug!(entity_id = %id, kind = ?blueprint.kind(), body = %handle, "spawned");
        id
    }

    /// Remove the entity, its body and its visual.
    ///
    /// Unknown or already-destroyed ids are a no-op and return false.
    pub fn destroy(
        &mut self,
        physics: &mut PhysicsWorld,
        render: &mut impl RenderSink,
        id: EntityId,
    ) -> bool {
        let Some(entity) = self.index.remove(&id) else {
            debug!(entity_id = %id, "destroy of unknown entity ignored");
            return false;
        };

        let handle = self.world.get::<&Body>(entity).ok().map(|b| b.0);
        if let Some(handle) = handle {
            physics.remove_body(handle);
        }
        render.remove_visual(id);
        if let Err(err) = self.world.despawn(entity) {
            warn!(entity_id = %id, %err, "indexed entity missing from world");
        }
        true
    }

    /// Destroy every live entity. Returns how many were removed.
    pub fn clear_all(&mut self, physics: &mut PhysicsWorld, render: &mut impl RenderSink) -> usize {
        let mut ids: Vec<EntityId> = self.index.keys().copied().collect();
        ids.sort_unstable();
        let removed = ids
            .into_iter()
            .filter(|id| self.destroy(physics, render, *id))
            .count();
        self.world.clear();
        removed
    }

    pub fn get(&self, id: EntityId) -> Option<EntityRecord> {
        let entity = *self.index.get(&id)?;
        let mut query = self
            .world
            .query_one::<(&EntityKind, &Body, &Transform, &Collider, &Appearance)>(entity)
            .ok()?;
        let (kind, body, transform, collider, appearance) = query.get()?;
        Some(EntityRecord {
            id,
            kind: *kind,
            body: body.0,
            transform: *transform,
            collider_radius: collider.radius,
            color: appearance.color,
        })
    }

    /// Scoring data of a live target.
    pub fn target(&self, id: EntityId) -> Option<Target> {
        let entity = *self.index.get(&id)?;
        self.world.get::<&Target>(entity).ok().map(|t| *t)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    /// Live ids of one kind, ascending.
    pub fn ids(&self, kind: EntityKind) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .world
            .query::<(&EntityId, &EntityKind)>()
            .iter()
            .filter(|(_, (_, k))| **k == kind)
            .map(|(_, (id, _))| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Live records of one kind, ascending by id.
    pub fn records(&self, kind: EntityKind) -> Vec<EntityRecord> {
        self.ids(kind)
            .into_iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.world
            .query::<&EntityKind>()
            .iter()
            .filter(|(_, k)| **k == kind)
            .count()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Copy body transforms into the registry and forward them to the renderer.
    pub fn sync_transforms(&mut self, physics: &PhysicsWorld, render: &mut impl RenderSink) {
        for (_entity, (id, body, transform)) in
            self.world.query_mut::<(&EntityId, &Body, &mut Transform)>()
        {
            if let Some(latest) = physics.transform(body.0) {
                *transform = latest;
            }
            render.sync_transform(*id, transform);
        }
    }

    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use gallery_core::enums::TargetShape;
    use gallery_core::ports::RecordingRenderSink;

    use super::*;

    fn projectile_at(position: Vec3) -> Blueprint {
        Blueprint {
            role: Role::Projectile,
            body: BodyDesc::at(position),
            collider_radius: 0.1,
            color: Color::YELLOW,
            shape: ShapeDescriptor::Sphere { radius: 0.1 },
        }
    }

    fn box_target() -> Blueprint {
        Blueprint {
            role: Role::Target(Target {
                shape: TargetShape::Box,
                score_value: 10,
            }),
            body: BodyDesc::at(Vec3::new(0.0, 5.0, -20.0)).with_mass(5.0),
            collider_radius: 0.5,
            color: Color::ORANGE,
            shape: ShapeDescriptor::Target(TargetShape::Box),
        }
    }

    #[test]
    fn test_spawn_creates_body_and_visual() {
        let mut physics = PhysicsWorld::new(Vec3::ZERO);
        let mut render = RecordingRenderSink::new();
        let mut registry = EntityRegistry::new();

        let id = registry.spawn(&mut physics, &mut render, &box_target());
        assert!(registry.contains(id));
        assert_eq!(physics.body_count(), 1);
        assert!(render.has_visual(id));

        let record = registry.get(id).unwrap();
        assert_eq!(record.kind, EntityKind::Target);
        assert!(physics.contains(record.body));
        assert_eq!(registry.target(id).unwrap().score_value, 10);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut physics = PhysicsWorld::new(Vec3::ZERO);
        let mut render = RecordingRenderSink::new();
        let mut registry = EntityRegistry::new();

        let id = registry.spawn(&mut physics, &mut render, &box_target());
        let body = registry.get(id).unwrap().body;

        assert!(registry.destroy(&mut physics, &mut render, id));
        assert!(!registry.destroy(&mut physics, &mut render, id));
        assert!(!registry.contains(id));
        assert!(!physics.contains(body));
        assert_eq!(render.live_count(), 0);
        assert_eq!(render.orphan_calls, 0);
        assert_eq!(render.removed, 1);
    }

    #[test]
    fn test_ids_are_sorted_and_filtered_by_kind() {
        let mut physics = PhysicsWorld::new(Vec3::ZERO);
        let mut render = RecordingRenderSink::new();
        let mut registry = EntityRegistry::new();

        let p0 = registry.spawn(&mut physics, &mut render, &projectile_at(Vec3::ZERO));
        let t0 = registry.spawn(&mut physics, &mut render, &box_target());
        let p1 = registry.spawn(&mut physics, &mut render, &projectile_at(Vec3::ONE));

        assert_eq!(registry.ids(EntityKind::Projectile), vec![p0, p1]);
        assert_eq!(registry.ids(EntityKind::Target), vec![t0]);
        assert_eq!(registry.count(EntityKind::Particle), 0);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut physics = PhysicsWorld::new(Vec3::ZERO);
        let mut render = RecordingRenderSink::new();
        let mut registry = EntityRegistry::new();

        let first = registry.spawn(&mut physics, &mut render, &box_target());
        registry.destroy(&mut physics, &mut render, first);
        let second = registry.spawn(&mut physics, &mut render, &box_target());
        assert!(second > first);
    }

    #[test]
    fn test_sync_transforms_follows_physics() {
        let mut physics = PhysicsWorld::new(Vec3::ZERO);
        let mut render = RecordingRenderSink::new();
        let mut registry = EntityRegistry::new();

        let mut blueprint = projectile_at(Vec3::ZERO);
        blueprint.body = blueprint.body.with_velocity(Vec3::new(0.0, 0.0, -10.0));
        let id = registry.spawn(&mut physics, &mut render, &blueprint);

        physics.step(0.5);
        registry.sync_transforms(&physics, &mut render);

        let z = registry.get(id).unwrap().transform.position.z;
        assert!((z + 5.0).abs() < 1e-5);
        assert_eq!(render.last_transform[&id].position.z, z);
        assert_eq!(render.syncs, 1);
    }

    #[test]
    fn test_clear_all_releases_everything() {
        let mut physics = PhysicsWorld::new(Vec3::ZERO);
        let mut render = RecordingRenderSink::new();
        let mut registry = EntityRegistry::new();

        for i in 0..4 {
            registry.spawn(&mut physics, &mut render, &projectile_at(Vec3::splat(i as f32)));
        }
        registry.spawn(&mut physics, &mut render, &box_target());

        assert_eq!(registry.clear_all(&mut physics, &mut render), 5);
        assert!(registry.is_empty());
        assert_eq!(physics.body_count(), 0);
        assert_eq!(render.live_count(), 0);
        assert_eq!(render.orphan_calls, 0);
    }

    #[test]
    fn test_destroy_with_entity_missing_from_world_still_releases_visual() {
        let mut physics = PhysicsWorld::new(Vec3::ZERO);
        let mut render = RecordingRenderSink::new();
        let mut registry = EntityRegistry::new();

        let id = registry.spawn(&mut physics, &mut render, &box_target());
        let entity = registry.index[&id];
        registry.world_mut().despawn(entity).unwrap();

        assert!(registry.destroy(&mut physics, &mut render, id));
        assert!(!registry.contains(id));
        assert!(!render.has_visual(id));
        assert!(!registry.destroy(&mut physics, &mut render, id));
    }
}
