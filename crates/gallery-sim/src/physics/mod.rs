//! Minimal rigid-body world.
//!
//! Bodies live in a slot arena addressed by generational `BodyHandle`s.
//! `step` integrates every dynamic body under uniform gravity with
//! semi-implicit Euler: velocity first, then position from the new velocity.
//! Orientation is advanced by the angular velocity and renormalized.
//! No contact response between bodies; hit testing is done on top of the
//! positions this world produces.

mod handle;

pub use handle::HandleAllocator;

use glam::{Quat, Vec3};
use tracing::warn;

use gallery_core::types::{BodyHandle, Transform};

/// Initial state for a new body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub position: Vec3,
    pub orientation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Zero makes the body static: gravity does not act on it.
    pub mass: f32,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: 1.0,
        }
    }
}

impl BodyDesc {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }
}

/// A body as stored in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    pub transform: Transform,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f32,
}

impl RigidBody {
    fn from_desc(desc: &BodyDesc) -> Self {
        Self {
            transform: Transform {
                position: desc.position,
                orientation: desc.orientation,
            },
            linear_velocity: desc.linear_velocity,
            angular_velocity: desc.angular_velocity,
            mass: desc.mass,
        }
    }

    pub fn is_static(&self) -> bool {
        self.mass == 0.0
    }

    fn is_valid(&self) -> bool {
        self.mass.is_finite()
            && self.mass >= 0.0
            && self.transform.position.is_finite()
            && self.transform.orientation.is_finite()
            && self.linear_velocity.is_finite()
            && self.angular_velocity.is_finite()
    }
}

/// What happened during one `step`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub integrated: usize,
    /// Bodies left untouched because their state was not finite.
    pub skipped: usize,
}

/// Owns every rigid body in the session.
pub struct PhysicsWorld {
    gravity: Vec3,
    handles: HandleAllocator,
    slots: Vec<Option<RigidBody>>,
    live: usize,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity,
            handles: HandleAllocator::new(),
            slots: Vec::new(),
            live: 0,
        }
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    /// Insert a body and return its handle.
    pub fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let handle = self.handles.allocate();
        let index = handle.index as usize;
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(RigidBody::from_desc(desc));
        self.live += 1;
        handle
    }

    /// Remove a body. Stale or unknown handles are ignored and return `None`.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<RigidBody> {
        if !self.handles.deallocate(handle) {
            return None;
        }
        let body = self.slots[handle.index as usize].take();
        if body.is_some() {
            self.live -= 1;
        }
        body
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        if !self.handles.is_alive(handle) {
            return None;
        }
        self.slots.get(handle.index as usize)?.as_ref()
    }

    pub fn transform(&self, handle: BodyHandle) -> Option<Transform> {
        self.body(handle).map(|b| b.transform)
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.body(handle).is_some()
    }

    pub fn body_count(&self) -> usize {
        self.live
    }

    /// Remove every body. All outstanding handles go stale.
    pub fn clear(&mut self) {
        self.handles.reset();
        for slot in &mut self.slots {
            *slot = None;
        }
        self.live = 0;
    }

    /// Advance every dynamic body by `dt` seconds.
    ///
    /// A body whose state is non-finite or whose mass is negative is skipped
    /// and reported; the rest of the step still runs.
    pub fn step(&mut self, dt: f32) -> StepStats {
        let mut stats = StepStats::default();
        if !(dt.is_finite() && dt > 0.0) {
            warn!(dt, "ignoring physics step with invalid dt");
            return stats;
        }

        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(body) = slot else { continue };
            if !body.is_valid() {
                warn!(index, mass = body.mass, "skipping body with invalid state");
                stats.skipped += 1;
                continue;
            }
            if body.is_static() {
                continue;
            }

            body.linear_velocity += self.gravity * dt;
            body.transform.position += body.linear_velocity * dt;

            if body.angular_velocity != Vec3::ZERO {
                let delta = Quat::from_scaled_axis(body.angular_velocity * dt);
                body.transform.orientation = (delta * body.transform.orientation).normalize();
            }
            stats.integrated += 1;
        }
        stats
    }
}
