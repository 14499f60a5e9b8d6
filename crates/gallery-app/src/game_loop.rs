//! Game loop thread: runs the session at its tick rate and publishes snapshots.
//!
//! The session is created inside this thread so it never has to cross a
//! thread boundary. Commands arrive via an `mpsc` channel and are drained at
//! the start of every tick. The latest snapshot is stored in shared state for
//! polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use gallery_core::commands::{InputSnapshot, PlayerCommand};
use gallery_core::config::GalleryConfig;
use gallery_core::events::SessionEvent;
use gallery_core::state::SessionSnapshot;
use gallery_sim::GameSession;

use crate::error::AppError;
use crate::input::AutoFire;
use crate::sinks::{TracingRenderSink, TracingUiSink};
use crate::state::{GameLoopCommand, GameLoopHandle, RunSummary, SharedSnapshot};

/// How the loop should run.
#[derive(Debug, Clone)]
pub struct LoopOptions {
    /// Sleep to hold the configured tick rate. Off runs as fast as possible.
    pub realtime: bool,
    /// Queue `StartRound` before the first tick.
    pub autostart: bool,
    /// Auto-fire period in ticks. `None` never fires.
    pub fire_every: Option<u32>,
    /// Stop after this many rounds have ended, restarting in between.
    /// Zero runs until shutdown.
    pub rounds: u32,
    /// Hard stop after this many ticks.
    pub max_ticks: Option<u64>,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            realtime: true,
            autostart: true,
            fire_every: Some(10),
            rounds: 1,
            max_ticks: None,
        }
    }
}

/// Nominal duration of one tick.
pub fn tick_duration(tick_rate: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(tick_rate.max(1)))
}

/// Spawns the game loop in a new thread.
pub fn spawn_game_loop(
    config: GalleryConfig,
    options: LoopOptions,
) -> Result<GameLoopHandle, AppError> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();
    let latest_snapshot: SharedSnapshot = Arc::new(Mutex::new(None));
    let shared = Arc::clone(&latest_snapshot);

    let join = std::thread::Builder::new()
        .name("gallery-game-loop".into())
        .spawn(move || run_game_loop(config, options, cmd_rx, &shared))
        .map_err(AppError::Spawn)?;

    Ok(GameLoopHandle {
        command_tx: cmd_tx,
        latest_snapshot,
        join,
    })
}

/// The game loop. Runs until Shutdown, channel disconnect, or the configured
/// round/tick limit.
fn run_game_loop(
    config: GalleryConfig,
    options: LoopOptions,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<SessionSnapshot>>,
) -> RunSummary {
    let tick = tick_duration(config.tick_rate);
    let mut autofire = options
        .fire_every
        .map(|period| AutoFire::new(period, config.muzzle_position, config.projectile_speed));
    let mut session = GameSession::new(config, TracingRenderSink::new(), TracingUiSink::new());
    if options.autostart {
        session.queue_command(PlayerCommand::StartRound);
    }

    let mut ticks = 0u64;
    let mut rounds_completed = 0u32;
    let mut next_tick_time = Instant::now();

    'run: loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => session.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) => break 'run,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => break 'run,
            }
        }

        // 2. Advance one tick
        let snapshot = match autofire.as_mut() {
            Some(source) => session.tick_with(source),
            None => session.tick(InputSnapshot::default()),
        };
        ticks += 1;
        if let Some(source) = autofire.as_mut() {
            source.observe(&snapshot);
        }

        let ended = snapshot
            .events
            .iter()
            .any(|e| matches!(e, SessionEvent::RoundEnded { .. }));

        // 3. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        if ended {
            rounds_completed += 1;
            if options.rounds > 0 && rounds_completed >= options.rounds {
                break;
            }
            if options.rounds > 0 {
                debug!(rounds_completed, "restarting for next round");
                session.queue_command(PlayerCommand::Restart);
            }
        }
        if options.max_ticks.is_some_and(|max| ticks >= max) {
            break;
        }

        // 4. Sleep until next tick
        if options.realtime {
            next_tick_time += tick;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > tick * 2 {
                // Too far behind; reset to avoid a catch-up spiral
                next_tick_time = now;
            }
        }
    }

    let round = session.round();
    let shots_hit_ratio = if round.shots_fired > 0 {
        round.targets_destroyed as f32 / round.shots_fired as f32
    } else {
        0.0
    };
    info!(
        ticks,
        rounds_completed,
        score = round.score,
        peak_visuals = session.render().peak(),
        "game loop stopped"
    );
    session.shutdown();

    RunSummary {
        ticks,
        rounds_completed,
        round,
        shots_hit_ratio,
    }
}

#[cfg(test)]
mod tests {
    use gallery_core::enums::RoundPhase;

    use super::*;

    fn short_round() -> GalleryConfig {
        GalleryConfig {
            round_duration_secs: 2.0,
            ..Default::default()
        }
    }

    fn fast(rounds: u32) -> LoopOptions {
        LoopOptions {
            realtime: false,
            rounds,
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_duration() {
        assert_eq!(tick_duration(60).as_nanos(), 1_000_000_000u128 / 60);
        assert_eq!(tick_duration(0), Duration::from_secs(1));
    }

    #[test]
    fn test_single_round_runs_to_end() {
        let handle = spawn_game_loop(short_round(), fast(1)).unwrap();
        let summary = handle.wait().unwrap();
        assert_eq!(summary.rounds_completed, 1);
        assert_eq!(summary.ticks, 120);
        assert_eq!(summary.round.phase, RoundPhase::Ended);
        assert!(summary.round.shots_fired > 0);
    }

    #[test]
    fn test_multiple_rounds_restart_between() {
        let handle = spawn_game_loop(short_round(), fast(3)).unwrap();
        let summary = handle.wait().unwrap();
        assert_eq!(summary.rounds_completed, 3);
        assert_eq!(summary.ticks, 360);
    }

    #[test]
    fn test_shutdown_stops_unbounded_loop() {
        let handle = spawn_game_loop(short_round(), fast(0)).unwrap();
        let start = Instant::now();
        while handle.snapshot().is_none() && start.elapsed() < Duration::from_secs(5) {
            std::thread::yield_now();
        }
        assert!(handle.snapshot().is_some());
        let summary = handle.shutdown().unwrap();
        assert!(summary.ticks > 0);
    }

    #[test]
    fn test_max_ticks_caps_the_run() {
        let options = LoopOptions {
            realtime: false,
            rounds: 0,
            max_ticks: Some(50),
            ..Default::default()
        };
        let summary = spawn_game_loop(GalleryConfig::default(), options)
            .unwrap()
            .wait()
            .unwrap();
        assert_eq!(summary.ticks, 50);
        assert_eq!(summary.round.phase, RoundPhase::Running);
    }

    #[test]
    fn test_snapshot_serialization_is_fast() {
        let mut session = GameSession::headless(GalleryConfig::default());
        session.queue_command(PlayerCommand::StartRound);
        for _ in 0..300 {
            session.tick(InputSnapshot::fire_at(glam::Vec3::NEG_Z));
        }
        let snapshot = session.tick(InputSnapshot::default());
        let start = Instant::now();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(start.elapsed() < Duration::from_millis(50));
        assert!(!json.is_empty());
    }
}
