//! Frame-driven wrapper around the fixed-step simulation
//!
//! Render loops hand in wall-clock frame deltas; the simulation only ever
//! sees `SIM_DT` ticks.

use crate::besttimes::BestTimes;
use crate::consts::*;
use crate::sim::{Level, SimEvent, SimState, TickInput, tick};
use crate::tuning::Tuning;

pub struct Game {
    pub state: SimState,
    /// Buttons currently held
    pub input: TickInput,
    pub best_times: BestTimes,
    /// The finished run beat the stored best time
    pub new_record: bool,
    accumulator: f32,
}

impl Game {
    pub fn new(level: Level, tuning: Tuning, best_times: BestTimes, seed: u64) -> Self {
        Self {
            state: SimState::new(level, tuning, seed),
            input: TickInput::default(),
            best_times,
            new_record: false,
            accumulator: 0.0,
        }
    }

    /// Run as many ticks as `frame_dt` seconds cover. Returns their events.
    pub fn update(&mut self, frame_dt: f32) -> Vec<SimEvent> {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return Vec::new();
        }
        self.accumulator += frame_dt.min(0.1);

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            for event in self.state.events.drain(..) {
                if let SimEvent::GoalReached { elapsed_ms, .. } = event {
                    self.new_record = self.best_times.record(&self.state.level.id, elapsed_ms);
                    if self.new_record {
                        log::info!("New best time: {}", crate::format_time(elapsed_ms));
                    }
                }
                events.push(event);
            }
        }

        // Drop backlog the substep cap could not absorb
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        events
    }

    /// Start the same level over (seesaws included)
    pub fn restart(&mut self) {
        let level = self.state.level.clone();
        let tuning = self.state.tuning.clone();
        self.state = SimState::new(level, tuning, self.state.seed);
        self.input = TickInput::default();
        self.new_record = false;
        self.accumulator = 0.0;
    }

    /// Best time for the current level (0.0 = no record)
    pub fn best_time(&self) -> f64 {
        self.best_times.best(&self.state.level.id)
    }
}
