//! Fixed-step scheduling
//!
//! Converts variable frame times into a whole number of fixed simulation
//! steps, capped so a slow frame cannot snowball.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Copy)]
pub struct FixedStepClock {
    /// Fixed step length (seconds)
    pub step: f32,
    accumulator: f32,
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::new(SIM_DT)
    }
}

impl FixedStepClock {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
        }
    }

    /// Add a frame's elapsed time; returns how many fixed steps to run now
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < MAX_SUBSTEPS {
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }

    /// Unconsumed time carried to the next frame
    pub fn remainder(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
