use glam::Vec3;

use gallery_sim::core::commands::{InputSnapshot, PlayerCommand};
use gallery_sim::core::config::GalleryConfig;
use gallery_sim::core::enums::{EntityKind, RoundPhase};
use gallery_sim::core::events::SessionEvent;
use gallery_sim::core::ports::{RecordingRenderSink, RecordingUiSink};
use gallery_sim::core::state::SessionSnapshot;
use gallery_sim::GameSession;

type Session = GameSession<RecordingRenderSink, RecordingUiSink>;

/// Aim at the nearest target of the previous snapshot, firing every `period` ticks.
fn aim_input(prev: Option<&SessionSnapshot>, tick: u64, period: u64) -> InputSnapshot {
    let aim = prev
        .and_then(|snap| {
            snap.targets
                .iter()
                .min_by(|a, b| a.position.length().total_cmp(&b.position.length()))
        })
        .map_or(Vec3::NEG_Z, |t| t.position.normalize_or_zero());
    InputSnapshot {
        aim,
        fire: tick % period == 0,
    }
}

fn assert_bookkeeping(session: &Session) {
    let registry = session.registry();
    let render = session.render();
    assert_eq!(registry.len(), session.physics().body_count());
    assert_eq!(registry.len(), render.live_count());
    for kind in EntityKind::ALL {
        assert_eq!(registry.count(kind), render.live_of_kind(kind));
    }
    assert_eq!(render.orphan_calls, 0);
    assert_eq!(render.duplicate_adds, 0);
}

fn soak(config: GalleryConfig, ticks: u64, fire_period: u64) -> Session {
    let mut session = GameSession::new(config, RecordingRenderSink::new(), RecordingUiSink::new());
    session.queue_command(PlayerCommand::StartRound);

    let mut prev: Option<SessionSnapshot> = None;
    let mut last_score = 0;
    let mut last_time = f32::INFINITY;
    let mut scored_events = 0u32;

    for tick in 0..ticks {
        let snap = session.tick(aim_input(prev.as_ref(), tick, fire_period));
        assert_bookkeeping(&session);

        let destroyed: u32 = snap
            .events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::TargetDestroyed { score_value, .. } => Some(*score_value),
                _ => None,
            })
            .sum();
        scored_events += destroyed;

        if snap.round.phase == RoundPhase::Running {
            assert!(snap.round.score >= last_score, "score went down");
            assert_eq!(snap.round.score, last_score + destroyed);
            assert!(snap.round.time_remaining_secs <= last_time, "timer went up");
        }
        last_score = snap.round.score;
        last_time = snap.round.time_remaining_secs;
        prev = Some(snap);
    }
    assert_eq!(session.score(), scored_events);
    session
}

#[test]
fn test_full_default_round_keeps_bodies_and_visuals_paired() {
    let session = soak(GalleryConfig::default(), 30 * 60 + 120, 6);
    assert_eq!(session.phase(), RoundPhase::Ended);
    assert_eq!(session.ui().round_ends.len(), 1);
    assert_eq!(session.ui().round_ends[0], session.score());
    assert!(session.registry().is_empty());
}

#[test]
fn test_weightless_rapid_fire_round_stays_consistent() {
    let config = GalleryConfig {
        gravity: Vec3::ZERO,
        max_live_targets: Some(10),
        seed: 7,
        ..Default::default()
    };
    let session = soak(config, 20 * 60, 2);
    assert_eq!(session.phase(), RoundPhase::Running);
    assert!(session.round().shots_fired > 0);
}

#[test]
fn test_ui_time_sequence_is_non_increasing_within_a_round() {
    let session = soak(GalleryConfig::default(), 30 * 60, 1000);
    let times = &session.ui().times;
    assert_eq!(times.first(), Some(&30.0));
    for pair in times.windows(2) {
        assert!(pair[1] <= pair[0]);
    }
    assert_eq!(times.last(), Some(&0.0));
}

#[test]
fn test_restart_loop_never_leaks() {
    let mut session = soak(GalleryConfig::default(), 400, 3);
    for _ in 0..5 {
        session.queue_command(PlayerCommand::Restart);
        for i in 0..200u64 {
            session.tick(InputSnapshot {
                aim: Vec3::new(0.1, 0.3, -1.0),
                fire: i % 4 == 0,
            });
            assert_bookkeeping(&session);
        }
    }
    session.shutdown();
    assert_eq!(session.render().live_count(), 0);
    assert_eq!(session.render().added, session.render().removed);
}
