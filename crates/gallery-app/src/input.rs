//! Scripted input for unattended rounds.

use glam::Vec3;

use gallery_core::commands::InputSnapshot;
use gallery_core::ports::InputSource;
use gallery_core::state::SessionSnapshot;

/// Fires every `period` ticks at the nearest live target, leading it by the
/// projectile's flight time. Aim is updated from the previous tick's snapshot.
#[derive(Debug, Clone)]
pub struct AutoFire {
    period: u32,
    counter: u32,
    muzzle: Vec3,
    projectile_speed: f32,
    aim: Option<Vec3>,
}

impl AutoFire {
    pub fn new(period: u32, muzzle: Vec3, projectile_speed: f32) -> Self {
        Self {
            period: period.max(1),
            counter: 0,
            muzzle,
            projectile_speed,
            aim: None,
        }
    }

    /// Re-aim from the latest visible state.
    pub fn observe(&mut self, snapshot: &SessionSnapshot) {
        self.aim = snapshot
            .targets
            .iter()
            .min_by(|a, b| {
                let da = a.position.distance_squared(self.muzzle);
                let db = b.position.distance_squared(self.muzzle);
                da.total_cmp(&db)
            })
            .and_then(|target| {
                let flight = target.position.distance(self.muzzle) / self.projectile_speed;
                let lead = target.position + target.velocity * flight;
                (lead - self.muzzle).try_normalize()
            });
    }
}

impl InputSource for AutoFire {
    fn sample(&mut self) -> InputSnapshot {
        self.counter = (self.counter + 1) % self.period;
        match self.aim {
            Some(aim) => InputSnapshot {
                aim,
                fire: self.counter == 0,
            },
            None => InputSnapshot::default(),
        }
    }
}
