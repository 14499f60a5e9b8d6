//! Session snapshot: the complete visible state produced after each tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SessionEvent;
use crate::types::{Color, EntityId, SimTime};

/// Complete session state handed to the frontend after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub time: SimTime,
    pub round: RoundView,
    pub targets: Vec<TargetView>,
    pub projectiles: Vec<ProjectileView>,
    pub particle_count: u32,
    pub events: Vec<SessionEvent>,
}

/// Round clock and score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundView {
    pub phase: RoundPhase,
    pub score: u32,
    pub time_remaining_secs: f32,
    pub duration_secs: f32,
    pub targets_destroyed: u32,
    pub shots_fired: u32,
}

/// A live target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetView {
    pub entity_id: EntityId,
    pub shape: TargetShape,
    pub score_value: u32,
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Color,
}

/// A projectile in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub entity_id: EntityId,
    pub position: Vec3,
}
