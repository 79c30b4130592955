//! Fixed-timestep accumulator
//!
//! Decouples the host's variable frame rate from the 60 Hz simulation.

use crate::consts::{MAX_FRAME_DT, SIM_DT};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedTimestep {
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame's elapsed seconds; returns how many ticks to run now.
    ///
    /// The frame delta is capped at [`MAX_FRAME_DT`] so a stalled tab cannot
    /// queue up a burst of catch-up ticks.
    pub fn advance(&mut self, frame_secs: f32) -> u32 {
        let dt = frame_secs.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= SIM_DT {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        steps
    }

    /// Drop any banked time (after a pause or restart)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
