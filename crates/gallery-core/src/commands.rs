//! Player commands and per-tick input.
//!
//! Round-control commands are queued and processed at the next tick boundary.
//! Aim and fire arrive as an `InputSnapshot` sampled once at the start of a tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Round-control actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Start a round from Idle.
    StartRound,
    /// Clear everything and start a fresh round. Valid from any phase.
    Restart,
    /// Clear everything and return to Idle without starting.
    ResetToIdle,
}

/// Immutable view of the player's input for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Aim direction. Expected to be unit length; normalized again on use.
    pub aim: Vec3,
    /// A shot was requested this tick (already de-bounced by the caller).
    pub fire: bool,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            aim: Vec3::NEG_Z,
            fire: false,
        }
    }
}

impl InputSnapshot {
    /// Input that fires once along `aim`.
    pub fn fire_at(aim: Vec3) -> Self {
        Self { aim, fire: true }
    }

    /// Input that only aims.
    pub fn idle(aim: Vec3) -> Self {
        Self { aim, fire: false }
    }
}
