use std::path::PathBuf;

use thiserror::Error;

use gallery_core::error::ConfigError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("usage: {0}")]
    Usage(String),
    #[error("failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("game loop has already exited")]
    LoopGone,
    #[error("game loop thread panicked")]
    LoopPanicked,
}
