//! Round state machine and clock.
//!
//! The clock is driven by session ticks. Every `period_ticks` running ticks
//! the remaining time drops by one clock period; when it reaches zero the
//! round moves to Ended, once.

use tracing::info;

use gallery_core::config::GalleryConfig;
use gallery_core::enums::RoundPhase;
use gallery_core::state::RoundView;

/// Result of one clock tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockUpdate {
    /// Not running, or between decrements.
    Unchanged,
    /// Remaining time dropped to the given value, still above zero.
    Decremented { remaining_secs: f32 },
    /// Remaining time hit zero on this tick. Reported once per round.
    Ended { final_score: u32 },
}

#[derive(Debug, Clone)]
pub struct RoundClock {
    phase: RoundPhase,
    score: u32,
    duration_secs: f32,
    period_secs: f32,
    period_ticks: u64,
    ticks_until_decrement: u64,
    decrements: u32,
    time_remaining_secs: f32,
    targets_destroyed: u32,
    shots_fired: u32,
}

impl RoundClock {
    pub fn new(duration_secs: f32, period_secs: f32, period_ticks: u64) -> Self {
        let period_ticks = period_ticks.max(1);
        Self {
            phase: RoundPhase::Idle,
            score: 0,
            duration_secs,
            period_secs,
            period_ticks,
            ticks_until_decrement: period_ticks,
            decrements: 0,
            time_remaining_secs: duration_secs,
            targets_destroyed: 0,
            shots_fired: 0,
        }
    }

    /// Each decrement takes off the simulated time it actually waited.
    pub fn from_config(config: &GalleryConfig) -> Self {
        let period_ticks = config.ticks_for(config.clock_period_secs);
        Self::new(
            config.round_duration_secs,
            period_ticks as f32 * config.dt(),
            period_ticks,
        )
    }

    /// Back to Idle with a full timer and zero score.
    pub fn reset(&mut self) {
        *self = Self::new(self.duration_secs, self.period_secs, self.period_ticks);
    }

    /// Idle → Running. Returns false from any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != RoundPhase::Idle {
            return false;
        }
        self.phase = RoundPhase::Running;
        info!(duration_secs = self.duration_secs, "round started");
        true
    }

    /// Advance the clock by one tick.
    pub fn tick(&mut self) -> ClockUpdate {
        if self.phase != RoundPhase::Running {
            return ClockUpdate::Unchanged;
        }
        self.ticks_until_decrement -= 1;
        if self.ticks_until_decrement > 0 {
            return ClockUpdate::Unchanged;
        }
        self.ticks_until_decrement = self.period_ticks;
        self.decrements += 1;

        // Recomputed from the decrement count so repeated subtraction cannot drift.
        let remaining = self.duration_secs - self.decrements as f32 * self.period_secs;
        if remaining <= self.period_secs * 1e-4 {
            self.time_remaining_secs = 0.0;
            self.phase = RoundPhase::Ended;
            info!(final_score = self.score, "round ended");
            ClockUpdate::Ended {
                final_score: self.score,
            }
        } else {
            self.time_remaining_secs = remaining;
            ClockUpdate::Decremented {
                remaining_secs: remaining,
            }
        }
    }

    /// Add points for a destroyed target. Ignored unless Running.
    pub fn award(&mut self, points: u32) -> Option<u32> {
        if self.phase != RoundPhase::Running {
            return None;
        }
        self.score = self.score.saturating_add(points);
        self.targets_destroyed += 1;
        Some(self.score)
    }

    pub fn record_shot(&mut self) {
        self.shots_fired += 1;
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> f32 {
        self.time_remaining_secs
    }

    pub fn duration(&self) -> f32 {
        self.duration_secs
    }

    pub fn view(&self) -> RoundView {
        RoundView {
            phase: self.phase,
            score: self.score,
            time_remaining_secs: self.time_remaining_secs,
            duration_secs: self.duration_secs,
            targets_destroyed: self.targets_destroyed,
            shots_fired: self.shots_fired,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(clock: &mut RoundClock) -> (Vec<f32>, Vec<u32>) {
        let mut times = Vec::new();
        let mut ends = Vec::new();
        for _ in 0..10_000 {
            match clock.tick() {
                ClockUpdate::Unchanged => {}
                ClockUpdate::Decremented { remaining_secs } => times.push(remaining_secs),
                ClockUpdate::Ended { final_score } => {
                    times.push(clock.time_remaining());
                    ends.push(final_score);
                }
            }
        }
        (times, ends)
    }

    #[test]
    fn test_idle_clock_does_not_tick() {
        let mut clock = RoundClock::new(30.0, 1.0, 60);
        for _ in 0..120 {
            assert_eq!(clock.tick(), ClockUpdate::Unchanged);
        }
        assert_eq!(clock.time_remaining(), 30.0);
    }

    #[test]
    fn test_ends_exactly_once_at_zero() {
        let mut clock = RoundClock::new(30.0, 1.0, 60);
        assert!(clock.start());
        let (times, ends) = run_to_end(&mut clock);

        assert_eq!(ends.len(), 1);
        assert_eq!(times.len(), 30);
        assert_eq!(*times.last().unwrap(), 0.0);
        for pair in times.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
        assert_eq!(clock.phase(), RoundPhase::Ended);
        assert_eq!(clock.time_remaining(), 0.0);
    }

    #[test]
    fn test_fractional_period_does_not_drift() {
        let mut clock = RoundClock::new(1.0, 0.1, 6);
        clock.start();
        let (times, ends) = run_to_end(&mut clock);
        assert_eq!(ends.len(), 1);
        assert_eq!(times.len(), 10);
    }

    #[test]
    fn test_clock_from_config_tracks_simulated_time() {
        // 0.025 s rounds to 2 ticks; the clock must still end after one
        // simulated second, not after 40 decrements of 2 ticks each.
        for period in [1.0, 0.025, 0.001] {
            let config = GalleryConfig {
                round_duration_secs: 1.0,
                clock_period_secs: period,
                ..Default::default()
            };
            let mut clock = RoundClock::from_config(&config);
            clock.start();
            let mut ticks = 0;
            while clock.is_running() && ticks < 10_000 {
                clock.tick();
                ticks += 1;
            }
            assert_eq!(ticks, 60, "period {period}");
        }
    }

    #[test]
    fn test_ended_after_the_last_period_tick() {
        let mut clock = RoundClock::new(2.0, 1.0, 60);
        clock.start();
        for _ in 0..119 {
            clock.tick();
        }
        assert!(clock.is_running());
        assert!(matches!(clock.tick(), ClockUpdate::Ended { .. }));
    }

    #[test]
    fn test_award_only_while_running() {
        let mut clock = RoundClock::new(30.0, 1.0, 60);
        assert_eq!(clock.award(10), None);
        clock.start();
        assert_eq!(clock.award(10), Some(10));
        assert_eq!(clock.award(15), Some(25));
        assert_eq!(clock.view().targets_destroyed, 2);
    }

    #[test]
    fn test_reset_restores_idle() {
        let mut clock = RoundClock::new(3.0, 1.0, 1);
        clock.start();
        clock.award(10);
        run_to_end(&mut clock);
        assert!(!clock.start());

        clock.reset();
        assert_eq!(clock.phase(), RoundPhase::Idle);
        assert_eq!(clock.score(), 0);
        assert_eq!(clock.time_remaining(), 3.0);
        assert!(clock.start());
    }
}
