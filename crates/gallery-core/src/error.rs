//! Error types for configuration and session control.

use thiserror::Error;

use crate::enums::{RoundPhase, TargetShape};

/// Invalid configuration. Fatal at round start: the session stays out of Running.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("shape score table is empty")]
    EmptyShapeTable,
    #[error("score for shape `{0}` must be positive")]
    ZeroScore(TargetShape),
    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("`{0}` must be finite")]
    NonFinite(&'static str),
    #[error("`{field}` = {value}s is not a whole number of ticks at {tick_rate} Hz")]
    NotWholeTicks {
        field: &'static str,
        value: f32,
        tick_rate: u32,
    },
    #[error("tick rate must be at least 1 Hz")]
    ZeroTickRate,
    #[error("spawn volume `{0}` has min greater than max")]
    InvalidSpawnVolume(&'static str),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure of a session-level operation.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot {action} while round is {phase:?}")]
    InvalidPhase {
        action: &'static str,
        phase: RoundPhase,
    },
}
