//! Stall detection
//!
//! Tracks displacement against a reference point. The reference is re-based
//! whenever the agent moves at least `radius` from it; otherwise elapsed time
//! accumulates until the limit is exceeded.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Result of one stall check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StuckStatus {
    /// Moved far enough; timer reset
    Moving,
    /// Still inside the stall radius, accumulating time
    Stalled,
    /// Stall exceeded the limit; the agent should turn around
    Reverse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StuckDetector {
    /// Seconds spent inside the stall radius since the last re-base
    pub timer: f32,
    /// Reference point displacement is measured from
    pub last_position: Vec3,
}

impl StuckDetector {
    pub fn new(position: Vec3) -> Self {
        Self {
            timer: 0.0,
            last_position: position,
        }
    }

    /// Advance the detector by one tick
    pub fn update(&mut self, position: Vec3, dt: f32, radius: f32, time_limit: f32) -> StuckStatus {
        if position.distance(self.last_position) >= radius {
            self.rebase(position);
            return StuckStatus::Moving;
        }

        self.timer += dt;
        if self.timer > time_limit {
            self.rebase(position);
            StuckStatus::Reverse
        } else {
            StuckStatus::Stalled
        }
    }

    fn rebase(&mut self, position: Vec3) {
        self.timer = 0.0;
        self.last_position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_stationary_reverses_once_then_restarts() {
        let mut det = StuckDetector::new(Vec3::ZERO);
        let limit = 3.0;
        let ticks = (limit / SIM_DT) as usize + 2;

        let mut reversals = Vec::new();
        for i in 0..ticks {
            if det.update(Vec3::ZERO, SIM_DT, 2.0, limit) == StuckStatus::Reverse {
                reversals.push(i);
            }
        }

        assert_eq!(reversals.len(), 1);
        // Timer restarted from zero at the reversal
        let after = ticks - 1 - reversals[0];
        assert!((det.timer - after as f32 * SIM_DT).abs() < 1e-4);
    }

    #[test]
    fn test_moving_agent_never_accumulates() {
        let mut det = StuckDetector::new(Vec3::ZERO);
        for i in 1..1000 {
            let pos = Vec3::new(i as f32 * 2.5, 0.0, 0.0);
            assert_eq!(det.update(pos, SIM_DT, 2.0, 3.0), StuckStatus::Moving);
            assert_eq!(det.timer, 0.0);
            assert_eq!(det.last_position, pos);
        }
    }

    #[test]
    fn test_escape_resets_accumulated_time() {
        let mut det = StuckDetector::new(Vec3::ZERO);
        for _ in 0..100 {
            det.update(Vec3::X, SIM_DT, 2.0, 3.0);
        }
        assert!(det.timer > 1.9);

        // Exactly on the radius counts as moved
        assert_eq!(det.update(Vec3::new(2.0, 0.0, 0.0), SIM_DT, 2.0, 3.0), StuckStatus::Moving);
        assert_eq!(det.timer, 0.0);
    }

    #[test]
    fn test_slow_drift_rebases_reference() {
        let mut det = StuckDetector::new(Vec3::ZERO);
        let mut pos = Vec3::ZERO;
        let mut moved = 0;
        // 0.05 units per tick: re-bases every 40 ticks, well before 3s
        for _ in 0..400 {
            pos.x += 0.05;
            match det.update(pos, SIM_DT, 2.0, 3.0) {
                StuckStatus::Moving => moved += 1,
                StuckStatus::Reverse => panic!("slow drift should not reverse"),
                StuckStatus::Stalled => {}
            }
        }
        assert!(moved >= 9);
    }
}
