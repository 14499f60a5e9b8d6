//! State shared between the runner and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use serde::Serialize;

use gallery_core::commands::PlayerCommand;
use gallery_core::state::{RoundView, SessionSnapshot};

use crate::error::AppError;

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// Forward to the session's command queue.
    PlayerCommand(PlayerCommand),
    /// Stop the loop after the current tick.
    Shutdown,
}

/// Latest snapshot, written by the loop after every tick.
pub type SharedSnapshot = Arc<Mutex<Option<SessionSnapshot>>>;

/// What a finished loop reports back.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub rounds_completed: u32,
    pub round: RoundView,
    pub shots_hit_ratio: f32,
}

/// Handle to a running game loop.
pub struct GameLoopHandle {
    pub command_tx: mpsc::Sender<GameLoopCommand>,
    pub latest_snapshot: SharedSnapshot,
    pub(crate) join: JoinHandle<RunSummary>,
}

impl GameLoopHandle {
    /// Queue a player command. Fails once the loop has exited.
    pub fn send(&self, command: PlayerCommand) -> Result<(), AppError> {
        self.command_tx
            .send(GameLoopCommand::PlayerCommand(command))
            .map_err(|_| AppError::LoopGone)
    }

    /// Copy of the most recent snapshot, if any tick has run.
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        self.latest_snapshot.lock().ok()?.clone()
    }

    /// Ask the loop to stop and wait for it.
    pub fn shutdown(self) -> Result<RunSummary, AppError> {
        let _ = self.command_tx.send(GameLoopCommand::Shutdown);
        self.wait()
    }

    /// Wait for the loop to exit on its own.
    pub fn wait(self) -> Result<RunSummary, AppError> {
        self.join.join().map_err(|_| AppError::LoopPanicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::StartRound))
            .unwrap();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Restart))
            .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let commands: Vec<GameLoopCommand> = rx.try_iter().collect();
        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::PlayerCommand(PlayerCommand::StartRound)
        ));
        assert!(matches!(
            commands[1],
            GameLoopCommand::PlayerCommand(PlayerCommand::Restart)
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_summary_serializes() {
        let summary = RunSummary {
            ticks: 1800,
            rounds_completed: 1,
            round: RoundView::default(),
            shots_hit_ratio: 0.25,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["ticks"], 1800);
        assert_eq!(json["round"]["phase"], "Idle");
    }
}
