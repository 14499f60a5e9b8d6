//! Game session: owns the whole simulation for one player.
//!
//! `GameSession` owns the physics world, the entity registry, the round
//! clock, the seeded RNG and the injected render/UI collaborators. Player
//! commands are queued and applied at the next tick boundary; each tick runs
//! the systems in a fixed order and returns a snapshot. Completely headless,
//! so it can be driven from tests or a runner thread alike.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info, warn};

use glam::Vec3;

use gallery_core::commands::{InputSnapshot, PlayerCommand};
use gallery_core::config::GalleryConfig;
use gallery_core::constants::MAX_SUBSTEPS;
use gallery_core::enums::{EntityKind, RoundPhase, TargetShape};
use gallery_core::error::SessionError;
use gallery_core::events::SessionEvent;
use gallery_core::ports::{InputSource, NullRenderSink, NullUiSink, RenderSink, UiSink};
use gallery_core::state::{RoundView, SessionSnapshot};
use gallery_core::types::{EntityId, SimTime};

use crate::archetypes;
use crate::physics::PhysicsWorld;
use crate::registry::EntityRegistry;
use crate::round::{ClockUpdate, RoundClock};
use crate::systems;
use crate::systems::collision;
use crate::systems::effects::BurstSpec;
use crate::systems::spawner::SpawnTimer;

pub struct GameSession<R: RenderSink = NullRenderSink, U: UiSink = NullUiSink> {
    config: GalleryConfig,
    physics: PhysicsWorld,
    registry: EntityRegistry,
    clock: RoundClock,
    spawn_timer: SpawnTimer,
    rng: ChaCha8Rng,
    time: SimTime,
    render: R,
    ui: U,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<SessionEvent>,
    /// Index of the first event the UI has not been told about.
    notified: usize,
    accumulator: f32,
    expired_buffer: Vec<EntityId>,
    despawn_buffer: Vec<(EntityId, EntityKind)>,
}

impl GameSession {
    /// A session with no renderer and no UI attached.
    pub fn headless(config: GalleryConfig) -> Self {
        Self::new(config, NullRenderSink, NullUiSink)
    }
}

impl<R: RenderSink, U: UiSink> GameSession<R, U> {
    /// Create an idle session. The config is validated when a round starts.
    pub fn new(config: GalleryConfig, render: R, ui: U) -> Self {
        Self {
            physics: PhysicsWorld::new(config.gravity),
            registry: EntityRegistry::new(),
            clock: RoundClock::from_config(&config),
            spawn_timer: SpawnTimer::from_config(&config),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            time: SimTime::default(),
            render,
            ui,
            command_queue: VecDeque::new(),
            events: Vec::new(),
            notified: 0,
            accumulator: 0.0,
            expired_buffer: Vec::new(),
            despawn_buffer: Vec::new(),
            config,
        }
    }

    /// Queue a command for the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Advance by one fixed tick and return the resulting snapshot.
    pub fn tick(&mut self, input: InputSnapshot) -> SessionSnapshot {
        self.process_commands();

        if self.clock.is_running() {
            self.run_systems(&input);
            self.time.advance(self.config.dt());
        }

        self.notify_ui();
        self.notified = 0;
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.registry,
            &self.physics,
            &self.time,
            self.clock.view(),
            events,
        )
    }

    /// Sample `input` once and tick.
    pub fn tick_with(&mut self, input: &mut impl InputSource) -> SessionSnapshot {
        let sampled = input.sample();
        self.tick(sampled)
    }

    /// Run as many fixed ticks as `frame_dt` covers, at most `MAX_SUBSTEPS`.
    ///
    /// A fire request is consumed by the first tick only. Returns `None` when
    /// the frame was too short for a tick; otherwise the last snapshot, with
    /// the events of every tick of the frame.
    pub fn advance(&mut self, frame_dt: f32, input: InputSnapshot) -> Option<SessionSnapshot> {
        if !(frame_dt.is_finite() && frame_dt >= 0.0) {
            warn!(frame_dt, "ignoring frame with invalid dt");
            return None;
        }
        let dt = self.config.dt();
        self.accumulator += frame_dt;

        let mut input = input;
        let mut last: Option<SessionSnapshot> = None;
        let mut steps = 0;
        while self.accumulator >= dt && steps < MAX_SUBSTEPS {
            self.accumulator -= dt;
            steps += 1;
            let mut snapshot = self.tick(input);
            input.fire = false;
            if let Some(prev) = last.take() {
                let mut events = prev.events;
                events.append(&mut snapshot.events);
                snapshot.events = events;
            }
            last = Some(snapshot);
        }
        if self.accumulator >= dt {
            // Too far behind; drop the backlog instead of spiralling.
            self.accumulator = 0.0;
        }
        last
    }

    /// Idle → Running. Validates the config first; an invalid config keeps
    /// the session Idle.
    pub fn start_round(&mut self) -> Result<(), SessionError> {
        let phase = self.clock.phase();
        if phase != RoundPhase::Idle {
            return Err(SessionError::InvalidPhase {
                action: "start a round",
                phase,
            });
        }
        self.config.validate()?;

        self.physics.set_gravity(self.config.gravity);
        self.clock = RoundClock::from_config(&self.config);
        self.spawn_timer = SpawnTimer::from_config(&self.config);
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.time = SimTime::default();
        self.accumulator = 0.0;
        self.clock.start();

        let duration_secs = self.clock.duration();
        self.events.push(SessionEvent::RoundStarted { duration_secs });
        self.events.push(SessionEvent::ScoreChanged { score: 0 });
        self.events.push(SessionEvent::TimeChanged {
            remaining_secs: duration_secs,
        });
        self.notify_ui();
        Ok(())
    }

    /// Clear everything and return to Idle with score 0 and a full timer.
    pub fn reset_to_idle(&mut self) {
        let removed = self.registry.clear_all(&mut self.physics, &mut self.render);
        self.physics.clear();
        let stale_score = self.clock.score() > 0;
        let stale_time = self.clock.time_remaining() != self.clock.duration();
        self.clock.reset();
        if stale_score {
            self.events.push(SessionEvent::ScoreChanged { score: 0 });
        }
        if stale_time {
            self.events.push(SessionEvent::TimeChanged {
                remaining_secs: self.clock.duration(),
            });
        }
        self.notify_ui();
        self.spawn_timer.reset();
        self.time = SimTime::default();
        self.accumulator = 0.0;
        info!(removed, "session reset to idle");
    }

    /// Abort or finish the current round and start a fresh one.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.reset_to_idle();
        self.start_round()
    }

    /// Release every entity. Also runs on drop.
    pub fn shutdown(&mut self) {
        let removed = self.registry.clear_all(&mut self.physics, &mut self.render);
        self.physics.clear();
        self.command_queue.clear();
        if removed > 0 {
            info!(removed, "session shut down");
        }
    }

    /// Spawn a specific target now. Only while Running, and only for shapes
    /// in the score table.
    pub fn spawn_target(
        &mut self,
        shape: TargetShape,
        position: Vec3,
        velocity: Vec3,
    ) -> Option<EntityId> {
        if !self.clock.is_running() {
            return None;
        }
        let score_value = self.config.score_for(shape)?;
        let color = archetypes::random_color(&mut self.rng);
        let blueprint =
            archetypes::target(shape, score_value, position, velocity, Vec3::ZERO, color);
        let id = systems::spawner::spawn_target(
            &mut self.registry,
            &mut self.physics,
            &mut self.render,
            &blueprint,
            &mut self.events,
        );
        self.notify_ui();
        id
    }

    /// Replace the config. Refused while a round is Running.
    pub fn set_config(&mut self, config: GalleryConfig) -> Result<(), SessionError> {
        let phase = self.clock.phase();
        if phase == RoundPhase::Running {
            return Err(SessionError::InvalidPhase {
                action: "change the config",
                phase,
            });
        }
        config.validate()?;
        if phase == RoundPhase::Ended {
            self.reset_to_idle();
        }
        self.clock = RoundClock::from_config(&config);
        self.config = config;
        Ok(())
    }

    pub fn phase(&self) -> RoundPhase {
        self.clock.phase()
    }

    pub fn score(&self) -> u32 {
        self.clock.score()
    }

    pub fn time_remaining(&self) -> f32 {
        self.clock.time_remaining()
    }

    pub fn round(&self) -> RoundView {
        self.clock.view()
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn render(&self) -> &R {
        &self.render
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        let result = match command {
            PlayerCommand::StartRound => self.start_round(),
            PlayerCommand::Restart => self.restart(),
            PlayerCommand::ResetToIdle => {
                self.reset_to_idle();
                Ok(())
            }
        };
        match result {
            Ok(()) => {}
            Err(SessionError::Config(err)) => error!(?command, %err, "invalid config, round not started"),
            Err(err) => warn!(?command, %err, "command rejected"),
        }
    }

    /// Run all systems in order for one running tick.
    fn run_systems(&mut self, input: &InputSnapshot) {
        // 1. Round clock
        match self.clock.tick() {
            ClockUpdate::Unchanged => {}
            ClockUpdate::Decremented { remaining_secs } => {
                self.events.push(SessionEvent::TimeChanged { remaining_secs });
            }
            ClockUpdate::Ended { final_score } => {
                self.events.push(SessionEvent::TimeChanged {
                    remaining_secs: 0.0,
                });
                self.events.push(SessionEvent::RoundEnded { final_score });
                let removed = self.registry.clear_all(&mut self.physics, &mut self.render);
                self.physics.clear();
                info!(final_score, removed, "round over, entities released");
                return;
            }
        }

        // 2. Spawner
        systems::spawner::run(
            &mut self.spawn_timer,
            &mut self.registry,
            &mut self.physics,
            &mut self.render,
            &mut self.rng,
            &self.config,
            &mut self.events,
        );

        // 3. Player fire
        if systems::firing::run(
            input,
            &mut self.registry,
            &mut self.physics,
            &mut self.render,
            &self.config,
            &mut self.events,
        )
        .is_some()
        {
            self.clock.record_shot();
        }

        // 4. Physics
        self.physics.step(self.config.dt());
        self.registry
            .sync_transforms(&self.physics, &mut self.render);

        // 5. Collisions
        let hits = collision::detect_collisions(&self.registry);
        if !hits.is_empty() {
            let burst = BurstSpec {
                count: self.config.particles_per_burst,
                speed: self.config.particle_speed,
                ttl_ticks: self.config.particle_ttl_ticks(),
            };
            collision::resolve(
                &hits,
                &mut self.registry,
                &mut self.physics,
                &mut self.render,
                &mut self.rng,
                &mut self.clock,
                burst,
                &mut self.events,
            );
        }

        // 6. Floor cleanup
        systems::cleanup::run(
            &mut self.registry,
            &mut self.physics,
            &mut self.render,
            self.config.floor_y,
            &mut self.despawn_buffer,
            &mut self.events,
        );

        // 7. Particle expiry
        systems::effects::prune(
            &mut self.registry,
            &mut self.physics,
            &mut self.render,
            &mut self.expired_buffer,
        );
    }

    /// Forward not-yet-delivered events to the UI, in order.
    fn notify_ui(&mut self) {
        for event in &self.events[self.notified..] {
            match *event {
                SessionEvent::ScoreChanged { score } => self.ui.on_score_changed(score),
                SessionEvent::TimeChanged { remaining_secs } => {
                    self.ui.on_time_changed(remaining_secs)
                }
                SessionEvent::RoundEnded { final_score } => self.ui.on_round_ended(final_score),
                _ => {}
            }
        }
        self.notified = self.events.len();
    }
}

impl<R: RenderSink, U: UiSink> Drop for GameSession<R, U> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
