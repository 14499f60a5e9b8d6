//! ECS components for hecs entities.
//!
//! Components are plain data structs with no behavior.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::TargetShape;
use crate::types::{BodyHandle, Color};

/// Scoring data carried only by targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Target {
    pub shape: TargetShape,
    /// Points awarded when destroyed. Always positive.
    pub score_value: u32,
}

/// Marks an entity as a player projectile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile;

/// Marks an entity as a decorative particle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle;

/// Remaining lifetime in ticks. Entity is released when it reaches zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Lifetime {
    pub remaining_ticks: u32,
}

/// Sphere used for projectile/target hit testing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collider {
    pub radius: f32,
}

/// Visual hint passed to the render sink and reused by explosion bursts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Appearance {
    pub color: Color,
}

/// The one rigid body owned by this entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Body(pub BodyHandle);
