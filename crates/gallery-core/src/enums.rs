//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Kind of a simulation entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Destructible, scoring rigid body.
    Target,
    /// Fired by the player, destroys targets on contact.
    Projectile,
    /// Decorative debris from an explosion burst.
    Particle,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Target,
        EntityKind::Projectile,
        EntityKind::Particle,
    ];
}

/// Target shape. Closed set; the score for each lives in the config table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetShape {
    Box,
    Sphere,
    Cone,
    Torus,
}

impl TargetShape {
    pub const ALL: [TargetShape; 4] = [
        TargetShape::Box,
        TargetShape::Sphere,
        TargetShape::Cone,
        TargetShape::Torus,
    ];

    /// Radius of the sphere used for hit testing.
    /// The torus is approximated by a sphere enclosing the ring.
    pub fn collision_radius(self) -> f32 {
        match self {
            TargetShape::Box => BOX_HALF_EXTENT,
            TargetShape::Sphere => SPHERE_RADIUS,
            TargetShape::Cone => CONE_RADIUS,
            TargetShape::Torus => TORUS_COLLIDER_RADIUS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TargetShape::Box => "box",
            TargetShape::Sphere => "sphere",
            TargetShape::Cone => "cone",
            TargetShape::Torus => "torus",
        }
    }
}

impl std::fmt::Display for TargetShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for a start; no entities, score 0, timer full.
    #[default]
    Idle,
    /// Timer counting down, spawner and collisions active.
    Running,
    /// Timer reached zero; everything inert until restart.
    Ended,
}
