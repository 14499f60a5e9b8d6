//! Events emitted by the simulation for UI, audio and logging consumers.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::TargetShape;
use crate::types::EntityId;

/// Something notable that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// Round entered Running.
    RoundStarted { duration_secs: f32 },
    /// Clock decremented.
    TimeChanged { remaining_secs: f32 },
    /// Clock reached zero. Emitted exactly once per round.
    RoundEnded { final_score: u32 },
    /// Spawner created a target.
    TargetSpawned {
        entity_id: EntityId,
        shape: TargetShape,
        position: Vec3,
    },
    /// Player fired.
    ProjectileFired { entity_id: EntityId, direction: Vec3 },
    /// A projectile hit and destroyed a target.
    TargetDestroyed {
        entity_id: EntityId,
        projectile_id: EntityId,
        shape: TargetShape,
        score_value: u32,
        position: Vec3,
    },
    /// Score changed.
    ScoreChanged { score: u32 },
    /// Projectile fell past the floor without hitting anything.
    ProjectileLost { entity_id: EntityId },
}
