//! Fundamental geometric and simulation types.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Stable identifier of a simulation entity.
///
/// Ids are assigned from a monotonically increasing counter and are never
/// reused for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// Monotonic id source. Owned by the entity registry.
#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next id. Never returns the same value twice.
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids issued so far.
    pub fn issued(&self) -> u64 {
        self.next
    }
}

/// World-space pose of an entity (meters, y = up).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Distance between the two positions (orientation ignored).
    pub fn distance_to(&self, other: &Transform) -> f32 {
        self.position.distance(other.position)
    }
}

/// RGB color in 0..1, used as the visual hint for targets and bursts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const ORANGE: Color = Color::new(1.0, 0.647, 0.0);
    pub const YELLOW: Color = Color::new(1.0, 0.937, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::ORANGE
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each running tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += dt as f64;
    }
}

/// Opaque reference to a rigid body in the physics world.
///
/// Generational: once the body is removed the handle goes stale and every
/// lookup through it returns `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle {
    pub index: u32,
    pub generation: u32,
}

impl BodyHandle {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl std::fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "B{}g{}", self.index, self.generation)
    }
}
